use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;
use url::Url;

use crate::http_probe::{Transport, report};

pub const DEFAULT_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

/// Latest release id published in the version manifest, or why there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformVersion {
    Release(String),
    /// The manifest was fetched but carries no `latest.release`.
    Unknown,
    /// The manifest could not be fetched or decoded.
    Unavailable,
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformVersion::Release(release) => f.write_str(release),
            PlatformVersion::Unknown => f.write_str("Unknown"),
            PlatformVersion::Unavailable => f.write_str("Unable to fetch"),
        }
    }
}

impl Serialize for PlatformVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Extracts `latest.release` from a decoded manifest.
///
/// A root that is not a JSON object is no manifest at all and counts as
/// [`PlatformVersion::Unavailable`]; an object without a usable release is `Unknown`.
pub fn release_from_manifest(manifest: &Value) -> PlatformVersion {
    if !manifest.is_object() {
        return PlatformVersion::Unavailable;
    }
    manifest
        .get("latest")
        .and_then(|latest| latest.get("release"))
        .and_then(Value::as_str)
        .filter(|release| !release.is_empty())
        .map_or(PlatformVersion::Unknown, |release| {
            PlatformVersion::Release(release.to_string())
        })
}

/// Fetches the manifest and resolves the latest release. Never fails.
pub async fn lookup_release<T: Transport>(transport: &T, manifest_url: &Url) -> PlatformVersion {
    match transport.fetch_json(manifest_url).await {
        Ok(manifest) => {
            let version = release_from_manifest(&manifest);
            match version {
                PlatformVersion::Unknown => {
                    log::warn!("Version manifest at {manifest_url} has no latest.release")
                }
                PlatformVersion::Unavailable => {
                    log::warn!("Version manifest at {manifest_url} is not a JSON object")
                }
                PlatformVersion::Release(_) => {}
            }
            version
        }
        Err(e) => {
            log::warn!("Version lookup failed: {}", report(&e));
            PlatformVersion::Unavailable
        }
    }
}
