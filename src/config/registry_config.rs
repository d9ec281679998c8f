use serde::Deserialize;
use url::Url;

/// A category of the service registry file.
/// Categories are listed in the order they should be displayed.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    /// Display name of the category, e.g. "🎮 Core Services".
    pub name: String,

    /// The services belonging to this category, in display order.
    pub services: Vec<TargetConfig>,
}

/// A single probed service.
/// Contains the display name, the target URL and a list of accepted HTTP status codes.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    pub name: String,

    /// The URL of the target service to be probed.
    pub url: Url,

    /// The HTTP status codes the service is documented to answer with.
    /// Defaults to 200 if not specified.
    #[serde(default = "default_status_codes")]
    pub accepted_status_codes: Vec<u16>,
}

fn default_status_codes() -> Vec<u16> {
    vec![200]
}

pub type RegistryConfig = Vec<CategoryConfig>;
