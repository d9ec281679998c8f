use super::Snapshot;

/// Receives what the timers produce. Manual callers get the snapshot from `run_cycle` directly.
pub trait Presenter: Send + Sync + 'static {
    fn present_snapshot(&self, snapshot: &Snapshot);

    fn present_elapsed(&self, elapsed: &str);

    fn present_error(&self, message: &str);
}

/// Presenter that only writes to the log.
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn present_snapshot(&self, snapshot: &Snapshot) {
        log::info!(
            "{} services: {} online, {} offline (latest release {})",
            snapshot.stats.total,
            snapshot.stats.online,
            snapshot.stats.offline,
            snapshot.platform_version
        );
    }

    fn present_elapsed(&self, elapsed: &str) {
        log::debug!("Last checked: {elapsed}");
    }

    fn present_error(&self, message: &str) {
        log::error!("{message}");
    }
}
