pub mod app_config;
pub mod registry_config;

pub use app_config::{AppConfig, load_config, load_config_from};
