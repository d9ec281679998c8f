pub mod probe;
pub mod result;
pub mod transport;

use std::fmt::Write;
use std::future::Future;

use serde_json::Value;
use url::Url;

use crate::error::Result;

pub use probe::probe_target;
pub use result::{ProbeOutcome, ProbeStatus};
pub use transport::HttpTransport;

/// The network seam of the engine.
///
/// `reach` resolves `Ok` whenever something answered, whatever the status code; only
/// connection-level failures (DNS, refused, timeout, TLS) are errors.
pub trait Transport: Send + Sync + 'static {
    fn reach(&self, target: &Url) -> impl Future<Output = Result<()>> + Send;

    fn fetch_json(&self, url: &Url) -> impl Future<Output = Result<Value>> + Send;
}

/// Renders an error followed by its whole `source()` chain.
pub fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, "\n\nCaused by: {}", src);
        err = src;
    }
    s
}
