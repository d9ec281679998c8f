//! The status engine: probes every registry entry, aggregates the outcomes into a
//! [`Snapshot`] and keeps the state the dashboard reads between cycles.

mod elapsed;
pub mod export;
mod presenter;
mod refresh;
mod snapshot;
mod state;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;
use url::Url;

use crate::error::{Result, StatusError};
use crate::http_probe::{HttpTransport, Transport, probe_target};
use crate::manifest::{DEFAULT_MANIFEST_URL, lookup_release};
use crate::registry::ServiceRegistry;

pub use elapsed::{NEVER_CHECKED, describe_elapsed};
pub use export::ExportArtifact;
pub use presenter::{LogPresenter, Presenter};
pub use snapshot::{CategoryOutcomes, CycleStats, ServiceOutcome, Snapshot};
pub use state::CyclePhase;

use state::StateCell;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Manifest the platform version is read from.
    pub manifest_url: Url,
    /// Period of the auto-refresh timer.
    pub refresh_interval: Duration,
    /// Per request timeout; a probe that exceeds it is offline.
    pub probe_timeout: Duration,
    /// Upper bound on probes in flight at once.
    pub max_concurrency: usize,
    pub user_agent: String,
    pub export_prefix: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            manifest_url: Url::parse(DEFAULT_MANIFEST_URL).expect("default manifest URL"),
            refresh_interval: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(5),
            max_concurrency: 16,
            user_agent: concat!("mojang-status/", env!("CARGO_PKG_VERSION")).to_string(),
            export_prefix: "mojang-status".to_string(),
        }
    }
}

pub struct StatusEngine<T: Transport = HttpTransport> {
    registry: Arc<ServiceRegistry>,
    transport: Arc<T>,
    settings: EngineSettings,
    limiter: Arc<Semaphore>,
    presenter: Arc<dyn Presenter>,
    state: StateCell,
    active_timers: Arc<AtomicUsize>,
}

impl StatusEngine<HttpTransport> {
    /// Engine probing over HTTP with a client built from `settings`.
    pub fn with_http(registry: ServiceRegistry, settings: EngineSettings) -> Result<Self> {
        let transport = HttpTransport::new(settings.probe_timeout, &settings.user_agent)?;
        Ok(Self::new(registry, transport, settings))
    }
}

impl<T: Transport> StatusEngine<T> {
    pub fn new(registry: ServiceRegistry, transport: T, settings: EngineSettings) -> Self {
        Self {
            registry: Arc::new(registry),
            transport: Arc::new(transport),
            limiter: Arc::new(Semaphore::new(settings.max_concurrency.max(1))),
            settings,
            presenter: Arc::new(LogPresenter),
            state: StateCell::new(),
            active_timers: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_presenter(mut self, presenter: impl Presenter) -> Self {
        self.presenter = Arc::new(presenter);
        self
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Probes every service once and returns the resulting snapshot.
    ///
    /// All probes are spawned before any is awaited and joined in registry order. A probe that
    /// fails at the transport level is offline; it never affects other services. The version
    /// lookup runs alongside the probes and falls back to a sentinel on failure.
    ///
    /// Only one cycle runs at a time: a call made while another is probing returns
    /// [`StatusError::CycleInProgress`] without probing.
    pub async fn run_cycle(&self) -> Result<Snapshot> {
        let _probing = self.state.begin_cycle()?;
        let started = Instant::now();

        let mut handles = Vec::with_capacity(self.registry.service_count());
        for (_, service) in self.registry.services() {
            let transport = Arc::clone(&self.transport);
            let limiter = Arc::clone(&self.limiter);
            let target = service.descriptor.target.clone();

            handles.push(tokio::spawn(async move {
                let _permit = limiter.acquire_owned().await.ok();
                probe_target(transport.as_ref(), &target).await
            }));
        }

        let version = lookup_release(self.transport.as_ref(), &self.settings.manifest_url).await;

        let mut outcomes = Vec::with_capacity(handles.len());
        for ((category, service), handle) in self.registry.services().zip(handles) {
            let outcome = handle.await.map_err(|e| StatusError::CycleFailed {
                reason: format!("probe for {} / {} did not complete: {e}", category.name, service.name),
            })?;
            outcomes.push(outcome);
        }

        let snapshot = Snapshot::assemble(&self.registry, outcomes, version, Utc::now())?;
        log::info!(
            "Checked {} services in {:.2}s: {} online, {} offline, latest release {}",
            snapshot.stats.total,
            started.elapsed().as_secs_f64(),
            snapshot.stats.online,
            snapshot.stats.offline,
            snapshot.platform_version
        );

        {
            let mut state = self.state.lock();
            state.last_check = Some(snapshot.taken_at);
            state.last_snapshot = Some(Arc::new(snapshot.clone()));
        }
        Ok(snapshot)
    }

    pub fn last_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.state.lock().last_snapshot.clone()
    }

    pub fn last_check(&self) -> Option<DateTime<Utc>> {
        self.state.lock().last_check
    }

    pub fn phase(&self) -> CyclePhase {
        self.state.lock().phase
    }

    /// "N seconds ago", "N minutes ago" or a time of day; [`NEVER_CHECKED`] before the first
    /// cycle. Does not probe.
    pub fn describe_elapsed_since_last_check(&self) -> String {
        describe_elapsed(self.last_check(), Utc::now())
    }

    /// Serialises the registry with the current time as export timestamp.
    pub fn export_snapshot(&self) -> Result<ExportArtifact> {
        export::export_registry(&self.registry, &self.settings.export_prefix, Utc::now())
    }

    /// Number of auto-refresh timers still alive.
    pub fn active_timers(&self) -> usize {
        self.active_timers.load(Ordering::SeqCst)
    }
}

impl<T: Transport> Drop for StatusEngine<T> {
    fn drop(&mut self) {
        if let Some(task) = self.state.lock().refresh_task.take() {
            task.abort();
        }
    }
}
