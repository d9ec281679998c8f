use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value, json};
use url::Url;

use crate::error::{Result, StatusError};
use crate::registry::{Category, ProbeDescriptor, Service, ServiceRegistry};

/// A downloadable export: file name plus pretty printed JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// `<prefix>-YYYY-MM-DD.json`, dated in UTC.
pub fn export_filename(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{prefix}-{}.json", at.format("%Y-%m-%d"))
}

/// Serialises the registry (not the last outcomes) with an export timestamp.
pub fn export_registry(
    registry: &ServiceRegistry,
    prefix: &str,
    at: DateTime<Utc>,
) -> Result<ExportArtifact> {
    let mut services = Map::new();
    for category in registry.categories() {
        let mut entries = Map::new();
        for service in &category.services {
            entries.insert(
                service.name.clone(),
                json!({
                    "url": service.descriptor.target.as_str(),
                    "expected": service.descriptor.accepted_codes,
                }),
            );
        }
        services.insert(category.name.clone(), Value::Object(entries));
    }

    let document = json!({
        "services": services,
        "timestamp": at.to_rfc3339_opts(SecondsFormat::Millis, true),
    });

    Ok(ExportArtifact {
        filename: export_filename(prefix, at),
        bytes: serde_json::to_vec_pretty(&document)?,
    })
}

/// Reads an export back into a registry.
pub fn parse_export(bytes: &[u8]) -> Result<ServiceRegistry> {
    let document: Value = serde_json::from_slice(bytes)?;
    let services = document
        .get("services")
        .and_then(Value::as_object)
        .ok_or_else(|| invalid("missing 'services' object"))?;

    let mut categories = Vec::with_capacity(services.len());
    for (category, entries) in services {
        let entries = entries
            .as_object()
            .ok_or_else(|| invalid(format!("category '{category}' is not an object")))?;

        let mut parsed = Vec::with_capacity(entries.len());
        for (name, descriptor) in entries {
            let target = descriptor
                .get("url")
                .and_then(Value::as_str)
                .ok_or_else(|| invalid(format!("service '{name}' has no url")))?;
            let target = Url::parse(target)
                .map_err(|e| invalid(format!("service '{name}' has an invalid url: {e}")))?;
            let expected: Vec<u16> = match descriptor.get("expected") {
                Some(codes) => serde_json::from_value(codes.clone())?,
                None => Vec::new(),
            };
            parsed.push(Service {
                name: name.clone(),
                descriptor: ProbeDescriptor::new(target, expected),
            });
        }
        categories.push(Category {
            name: category.clone(),
            services: parsed,
        });
    }

    ServiceRegistry::new(categories)
}

fn invalid(reason: impl Into<String>) -> StatusError {
    StatusError::InvalidRegistry {
        reason: reason.into(),
    }
}
