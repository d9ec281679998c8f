use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use super::StatusEngine;
use crate::error::StatusError;
use crate::http_probe::Transport;

/// Counts a live timer task for as long as it is held.
struct TimerLease(Arc<AtomicUsize>);

impl TimerLease {
    fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        TimerLease(Arc::clone(counter))
    }
}

impl Drop for TimerLease {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<T: Transport> StatusEngine<T> {
    /// Starts or stops the periodic check.
    ///
    /// Every call cancels the running timer first, so at most one timer exists per engine.
    /// Enabling starts a fresh one that runs a cycle each `refresh_interval` (first tick one
    /// interval from now) and then refreshes the elapsed display. Cancelling never interrupts
    /// a cycle that is already probing. Must be called from within a Tokio runtime.
    pub fn set_auto_refresh(self: &Arc<Self>, enabled: bool) {
        let mut state = self.state.lock();
        if let Some(task) = state.refresh_task.take() {
            task.abort();
        }
        state.auto_refresh = enabled;

        if enabled {
            state.refresh_task = Some(self.spawn_refresh_timer());
            log::info!("Auto-refresh on, every {}s", self.settings.refresh_interval.as_secs());
        } else {
            log::info!("Auto-refresh off");
        }
    }

    pub fn auto_refresh_enabled(&self) -> bool {
        self.state.lock().auto_refresh
    }

    /// Spawns the ticker that pushes the "time since last check" text to the presenter every
    /// `period`. It never probes and stops once the engine is dropped.
    pub fn watch_elapsed(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let engine = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(engine) = engine.upgrade() else { break };
                engine
                    .presenter
                    .present_elapsed(&engine.describe_elapsed_since_last_check());
            }
        })
    }

    fn spawn_refresh_timer(self: &Arc<Self>) -> JoinHandle<()> {
        let engine = Arc::downgrade(self);
        let period = self.settings.refresh_interval;
        let lease = TimerLease::acquire(&self.active_timers);

        tokio::spawn(async move {
            let _lease = lease;
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(engine) = engine.upgrade() else { break };
                // Own task, so aborting the timer leaves an in-flight cycle alone.
                tokio::spawn(async move { engine.refresh_tick().await });
            }
        })
    }

    async fn refresh_tick(&self) {
        match self.run_cycle().await {
            Ok(snapshot) => self.presenter.present_snapshot(&snapshot),
            Err(StatusError::CycleInProgress) => {
                log::debug!("Scheduled check skipped, previous cycle still probing");
            }
            Err(e) => {
                log::error!("Scheduled check failed: {e}");
                self.presenter
                    .present_error(&format!("Failed to check status: {e}"));
            }
        }
        self.presenter
            .present_elapsed(&self.describe_elapsed_since_last_check());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::Semaphore;

    use super::*;
    use crate::engine::{CyclePhase, EngineSettings};
    use crate::test_support::{RecordingPresenter, ScriptedTransport, registry_of, settle};

    fn engine(transport: ScriptedTransport, presenter: RecordingPresenter) -> Arc<StatusEngine<ScriptedTransport>> {
        let registry = registry_of(&[("Core", &[("a", "https://a.test/"), ("b", "https://b.test/")])]);
        Arc::new(
            StatusEngine::new(registry, transport, EngineSettings::default()).with_presenter(presenter),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn enabling_twice_leaves_one_timer() {
        let engine = engine(ScriptedTransport::new(), RecordingPresenter::default());

        engine.set_auto_refresh(true);
        engine.set_auto_refresh(true);
        settle().await;

        assert!(engine.auto_refresh_enabled());
        assert_eq!(engine.active_timers(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn disabling_without_timer_is_a_no_op() {
        let engine = engine(ScriptedTransport::new(), RecordingPresenter::default());

        engine.set_auto_refresh(false);
        settle().await;

        assert!(!engine.auto_refresh_enabled());
        assert_eq!(engine.active_timers(), 0);
        assert!(engine.last_snapshot().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn tick_runs_a_cycle_and_refreshes_elapsed() {
        let presenter = RecordingPresenter::default();
        let transport = ScriptedTransport::new().reachable("https://a.test/");
        let engine = engine(transport, presenter.clone());

        engine.set_auto_refresh(true);
        tokio::time::sleep(Duration::from_secs(29)).await;
        settle().await;
        assert!(engine.last_snapshot().is_none());

        tokio::time::sleep(Duration::from_secs(2)).await;
        settle().await;

        let snapshots = presenter.snapshots.lock().unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].stats.online, 1);
        assert_eq!(snapshots[0].stats.offline, 1);
        assert_eq!(presenter.elapsed.lock().unwrap().len(), 1);
        assert!(engine.last_snapshot().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn disabling_stops_future_cycles() {
        let transport = ScriptedTransport::new();
        let engine = engine(transport, RecordingPresenter::default());

        engine.set_auto_refresh(true);
        tokio::time::sleep(Duration::from_secs(31)).await;
        settle().await;
        assert_eq!(engine.transport.probe_count(), 2);

        engine.set_auto_refresh(false);
        tokio::time::sleep(Duration::from_secs(120)).await;
        settle().await;

        assert_eq!(engine.transport.probe_count(), 2);
        assert_eq!(engine.active_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn disabling_mid_cycle_lets_the_cycle_finish() {
        let gate = Arc::new(Semaphore::new(0));
        let presenter = RecordingPresenter::default();
        let transport = ScriptedTransport::new()
            .reachable("https://a.test/")
            .reachable("https://b.test/")
            .gated(Arc::clone(&gate));
        let engine = engine(transport, presenter.clone());

        engine.set_auto_refresh(true);
        tokio::time::sleep(Duration::from_secs(31)).await;
        settle().await;
        assert_eq!(engine.phase(), CyclePhase::Probing);

        engine.set_auto_refresh(false);
        gate.add_permits(2);
        settle().await;

        assert_eq!(engine.phase(), CyclePhase::Idle);
        assert_eq!(presenter.snapshots.lock().unwrap()[0].stats.online, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_during_manual_cycle_is_skipped() {
        let gate = Arc::new(Semaphore::new(0));
        let presenter = RecordingPresenter::default();
        let transport = ScriptedTransport::new()
            .reachable("https://a.test/")
            .gated(Arc::clone(&gate));
        let engine = engine(transport, presenter.clone());

        let manual = tokio::spawn({
            let engine = Arc::clone(&engine);
            async move { engine.run_cycle().await }
        });
        settle().await;

        engine.set_auto_refresh(true);
        tokio::time::sleep(Duration::from_secs(31)).await;
        settle().await;

        assert!(presenter.snapshots.lock().unwrap().is_empty());
        assert!(presenter.errors.lock().unwrap().is_empty());
        assert_eq!(presenter.elapsed.lock().unwrap().as_slice(), ["Never"]);

        gate.add_permits(2);
        assert!(manual.await.unwrap().is_ok());
        assert_eq!(engine.transport.probe_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_scheduled_cycle_is_reported() {
        let presenter = RecordingPresenter::default();
        let transport = ScriptedTransport::new()
            .reachable("https://a.test/")
            .panicking("https://b.test/");
        let engine = engine(transport, presenter.clone());

        engine.set_auto_refresh(true);
        tokio::time::sleep(Duration::from_secs(31)).await;
        settle().await;

        let errors = presenter.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Failed to check status:"));
        assert!(errors[0].contains("Core / b"));
        assert!(presenter.snapshots.lock().unwrap().is_empty());
        assert_eq!(presenter.elapsed.lock().unwrap().as_slice(), ["Never"]);
        assert_eq!(engine.phase(), CyclePhase::Idle);
        assert!(engine.auto_refresh_enabled());
        assert_eq!(engine.active_timers(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_watcher_reports_without_probing() {
        let presenter = RecordingPresenter::default();
        let engine = engine(ScriptedTransport::new(), presenter.clone());

        let watcher = engine.watch_elapsed(Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(25)).await;
        settle().await;
        watcher.abort();

        assert_eq!(presenter.elapsed.lock().unwrap().as_slice(), ["Never", "Never"]);
        assert_eq!(engine.transport.probe_count(), 0);
    }
}
