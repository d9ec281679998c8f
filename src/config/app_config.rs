use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::engine::EngineSettings;
use crate::error::{Result, StatusError};
use crate::registry::{self, ServiceRegistry};

pub struct AppConfig {
    pub registry: ServiceRegistry,
    pub engine: EngineSettings,
    pub auto_refresh: bool,
    pub elapsed_refresh: Duration,
    pub export_dir: Option<PathBuf>,
}

/// Load the application configuration from environment variables.
/// The registry is read from the YAML file named by `REGISTRY_FILE`, or the built-in
/// catalogue is used when it is unset. All other values fall back to their defaults.
pub fn load_config() -> Result<AppConfig> {
    load_config_from(|key| env::var(key).ok())
}

/// Same as [`load_config`], reading variables through `lookup`.
pub fn load_config_from(lookup: impl Fn(&str) -> Option<String>) -> Result<AppConfig> {
    let defaults = EngineSettings::default();

    let registry = match lookup("REGISTRY_FILE") {
        Some(path) => ServiceRegistry::load(path)?,
        None => registry::builtin(),
    };

    let manifest_url = match lookup("MANIFEST_URL") {
        Some(raw) => Url::parse(&raw).map_err(|e| StatusError::config("MANIFEST_URL", e.to_string()))?,
        None => defaults.manifest_url,
    };

    let refresh_interval = seconds(&lookup, "REFRESH_INTERVAL_SECONDS", defaults.refresh_interval)?;
    let probe_timeout = seconds(&lookup, "PROBE_TIMEOUT_SECONDS", defaults.probe_timeout)?;
    let elapsed_refresh = seconds(&lookup, "ELAPSED_REFRESH_SECONDS", Duration::from_secs(10))?;
    let max_concurrency: usize = parsed(&lookup, "MAX_CONCURRENCY", defaults.max_concurrency)?;
    if max_concurrency == 0 {
        return Err(StatusError::config("MAX_CONCURRENCY", "must be at least 1"));
    }
    let auto_refresh = parsed(&lookup, "AUTO_REFRESH", false)?;
    let export_prefix = lookup("EXPORT_PREFIX").unwrap_or(defaults.export_prefix);
    let export_dir = lookup("EXPORT_DIR").map(PathBuf::from);

    log::info!("Using version manifest: {}", manifest_url);

    Ok(AppConfig {
        registry,
        engine: EngineSettings {
            manifest_url,
            refresh_interval,
            probe_timeout,
            max_concurrency,
            user_agent: defaults.user_agent,
            export_prefix,
        },
        auto_refresh,
        elapsed_refresh,
        export_dir,
    })
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| StatusError::config(key, e.to_string())),
        None => Ok(default),
    }
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration> {
    let secs: u64 = parsed(lookup, key, default.as_secs())?;
    if secs == 0 {
        return Err(StatusError::config(key, "must be at least 1 second"));
    }
    Ok(Duration::from_secs(secs))
}
