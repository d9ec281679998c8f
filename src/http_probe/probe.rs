use url::Url;

use super::{ProbeOutcome, Transport, report};

/// Probes `target` once and classifies the attempt.
///
/// Reachability only: any answer counts as online, even a status outside the service's
/// accepted codes. A transport failure is offline with code 0.
pub async fn probe_target<T: Transport>(transport: &T, target: &Url) -> ProbeOutcome {
    match transport.reach(target).await {
        Ok(()) => ProbeOutcome::online(),
        Err(e) => {
            log::debug!("Probe failed for {target}: {}", report(&e));
            ProbeOutcome::offline()
        }
    }
}
