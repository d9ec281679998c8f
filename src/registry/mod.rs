use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::Serialize;
use url::Url;

use crate::config::registry_config::{CategoryConfig, RegistryConfig};
use crate::error::{Result, StatusError};

mod builtin;

pub use builtin::builtin;

/// Where a service is probed, plus the status codes the service is documented to answer with.
///
/// `accepted_codes` is descriptive only: probes classify on reachability and never compare the
/// response status against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeDescriptor {
    pub target: Url,
    pub accepted_codes: BTreeSet<u16>,
}

impl ProbeDescriptor {
    pub fn new(target: Url, accepted_codes: impl IntoIterator<Item = u16>) -> Self {
        Self {
            target,
            accepted_codes: accepted_codes.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub name: String,
    pub descriptor: ProbeDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    pub services: Vec<Service>,
}

/// Ordered catalogue of categories and their services. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceRegistry {
    categories: Vec<Category>,
}

impl ServiceRegistry {
    /// Builds a registry, rejecting duplicate category names and duplicate service names
    /// within a category.
    pub fn new(categories: Vec<Category>) -> Result<Self> {
        let mut seen_categories = HashSet::new();
        for category in &categories {
            if !seen_categories.insert(category.name.as_str()) {
                return Err(StatusError::InvalidRegistry {
                    reason: format!("duplicate category '{}'", category.name),
                });
            }
            let mut seen_services = HashSet::new();
            for service in &category.services {
                if !seen_services.insert(service.name.as_str()) {
                    return Err(StatusError::InvalidRegistry {
                        reason: format!(
                            "duplicate service '{}' in category '{}'",
                            service.name, category.name
                        ),
                    });
                }
            }
        }
        Ok(Self { categories })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: RegistryConfig = serde_yaml::from_str(yaml)?;
        Self::try_from(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        let registry = Self::from_yaml(&yaml)?;
        log::info!(
            "Loaded {} services in {} categories from {}",
            registry.service_count(),
            registry.categories.len(),
            path.display()
        );
        Ok(registry)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn service_count(&self) -> usize {
        self.categories.iter().map(|c| c.services.len()).sum()
    }

    /// Every (category, service) pair in display order.
    pub fn services(&self) -> impl Iterator<Item = (&Category, &Service)> {
        self.categories
            .iter()
            .flat_map(|category| category.services.iter().map(move |s| (category, s)))
    }
}

impl TryFrom<RegistryConfig> for ServiceRegistry {
    type Error = StatusError;

    fn try_from(config: RegistryConfig) -> Result<Self> {
        let categories = config
            .into_iter()
            .map(|CategoryConfig { name, services }| Category {
                name,
                services: services
                    .into_iter()
                    .map(|target| Service {
                        name: target.name,
                        descriptor: ProbeDescriptor::new(target.url, target.accepted_status_codes),
                    })
                    .collect(),
            })
            .collect();
        Self::new(categories)
    }
}
