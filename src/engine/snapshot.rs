use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Result, StatusError};
use crate::http_probe::ProbeOutcome;
use crate::manifest::PlatformVersion;
use crate::registry::ServiceRegistry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleStats {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceOutcome {
    pub name: String,
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOutcomes {
    pub name: String,
    pub services: Vec<ServiceOutcome>,
}

/// Everything one cycle observed. Categories and services follow registry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub categories: Vec<CategoryOutcomes>,
    pub stats: CycleStats,
    pub platform_version: PlatformVersion,
    pub taken_at: DateTime<Utc>,
}

impl Snapshot {
    /// Pairs `outcomes` (one per service, in registry order) with the registry and derives
    /// the stats.
    pub fn assemble(
        registry: &ServiceRegistry,
        outcomes: Vec<ProbeOutcome>,
        platform_version: PlatformVersion,
        taken_at: DateTime<Utc>,
    ) -> Result<Self> {
        if outcomes.len() != registry.service_count() {
            return Err(StatusError::CycleFailed {
                reason: format!(
                    "expected {} probe outcomes, got {}",
                    registry.service_count(),
                    outcomes.len()
                ),
            });
        }

        let mut outcomes = outcomes.into_iter();
        let categories: Vec<CategoryOutcomes> = registry
            .categories()
            .iter()
            .map(|category| CategoryOutcomes {
                name: category.name.clone(),
                services: category
                    .services
                    .iter()
                    .zip(outcomes.by_ref())
                    .map(|(service, outcome)| ServiceOutcome {
                        name: service.name.clone(),
                        outcome,
                    })
                    .collect(),
            })
            .collect();

        let stats = CycleStats::tally(&categories);
        Ok(Self {
            categories,
            stats,
            platform_version,
            taken_at,
        })
    }

    pub fn category(&self, name: &str) -> Option<&CategoryOutcomes> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn outcome(&self, category: &str, service: &str) -> Option<ProbeOutcome> {
        self.category(category)?
            .services
            .iter()
            .find(|s| s.name == service)
            .map(|s| s.outcome)
    }
}

impl CycleStats {
    fn tally(categories: &[CategoryOutcomes]) -> Self {
        categories
            .iter()
            .flat_map(|c| &c.services)
            .fold(CycleStats::default(), |mut stats, service| {
                stats.total += 1;
                if service.outcome.is_online() {
                    stats.online += 1;
                } else {
                    stats.offline += 1;
                }
                stats
            })
    }
}
