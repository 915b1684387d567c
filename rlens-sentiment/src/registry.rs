//! Availability Registry
//!
//! Built once per engine start (or reset) from the `[[adapters]]` entries.
//! Every enabled adapter is constructed exactly once; failures are logged and
//! recorded, never raised. The registry is read-only after `build` returns.

use crate::adapters::build_adapter;
use crate::types::ClassifierAdapter;
use rlens_common::config::{AdapterConfig, AdapterKind};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Constructed adapter and its fusion weight
#[derive(Clone)]
pub struct LiveAdapter {
    pub adapter: Arc<dyn ClassifierAdapter>,
    pub weight: f64,
}

impl LiveAdapter {
    pub fn name(&self) -> &str {
        self.adapter.name()
    }
}

impl std::fmt::Debug for LiveAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveAdapter")
            .field("name", &self.adapter.name())
            .field("weight", &self.weight)
            .finish()
    }
}

/// Construction outcome of one configured adapter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum AdapterState {
    Live,
    Failed(String),
    Disabled,
}

impl std::fmt::Display for AdapterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdapterState::Live => write!(f, "live"),
            AdapterState::Failed(reason) => write!(f, "failed: {}", reason),
            AdapterState::Disabled => write!(f, "disabled"),
        }
    }
}

/// Status report entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdapterStatus {
    pub name: String,
    /// Configured kind (None for injected adapters)
    pub kind: Option<AdapterKind>,
    pub weight: f64,
    #[serde(flatten)]
    pub state: AdapterState,
}

/// Live adapter set plus per-adapter status
#[derive(Debug, Default)]
pub struct AvailabilityRegistry {
    live: Vec<LiveAdapter>,
    statuses: Vec<AdapterStatus>,
}

impl AvailabilityRegistry {
    /// Registry with no adapters (everything falls back to basic)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attempt construction of every configured adapter
    ///
    /// Adapters are named after their kind; a repeated kind gets a numeric
    /// suffix (`model`, `model-2`, ...).
    pub async fn build(configs: &[AdapterConfig], call_timeout: Duration) -> Self {
        let mut registry = Self::default();
        let mut seen: HashMap<AdapterKind, usize> = HashMap::new();

        for config in configs {
            let occurrence = seen.entry(config.kind).or_insert(0);
            *occurrence += 1;
            let name = if *occurrence == 1 {
                config.kind.as_str().to_string()
            } else {
                format!("{}-{}", config.kind.as_str(), occurrence)
            };
            let weight = config.effective_weight();

            if !config.enabled {
                info!("Adapter '{}' disabled by configuration", name);
                registry.statuses.push(AdapterStatus {
                    name,
                    kind: Some(config.kind),
                    weight,
                    state: AdapterState::Disabled,
                });
                continue;
            }

            let state = match build_adapter(&name, config, call_timeout).await {
                Ok(adapter) => {
                    registry.live.push(LiveAdapter { adapter, weight });
                    AdapterState::Live
                }
                Err(e) => {
                    warn!("Adapter '{}' failed to initialize: {}", name, e);
                    AdapterState::Failed(e.to_string())
                }
            };

            registry.statuses.push(AdapterStatus {
                name,
                kind: Some(config.kind),
                weight,
                state,
            });
        }

        info!(
            "Availability registry built: {} of {} adapters live",
            registry.live.len(),
            registry.statuses.len()
        );
        registry
    }

    /// Registry over pre-constructed adapters and their weights
    pub fn from_adapters(adapters: Vec<(Arc<dyn ClassifierAdapter>, f64)>) -> Self {
        let mut registry = Self::default();
        for (adapter, weight) in adapters {
            registry.statuses.push(AdapterStatus {
                name: adapter.name().to_string(),
                kind: None,
                weight,
                state: AdapterState::Live,
            });
            registry.live.push(LiveAdapter { adapter, weight });
        }
        registry
    }

    /// Live adapters in configuration order
    pub fn live(&self) -> &[LiveAdapter] {
        &self.live
    }

    pub fn get(&self, name: &str) -> Option<&LiveAdapter> {
        self.live.iter().find(|a| a.name() == name)
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Status of every configured adapter, including failed and disabled
    pub fn statuses(&self) -> &[AdapterStatus] {
        &self.statuses
    }
}
