//! Configuration loading and config file resolution
//!
//! Configuration comes from a single TOML file. Every key has a built-in
//! default, so a missing file is not an error: the engine starts with the
//! defaults and logs where it looked.
//!
//! # Config file priority
//!
//! 1. Command-line argument (highest priority)
//! 2. `RLENS_CONFIG` environment variable
//! 3. `~/.config/rlens/config.toml` (platform config dir)
//! 4. Built-in defaults (no file)
//!
//! `RLENS_MODEL_ENDPOINT` overrides the endpoint of every configured model
//! adapter after the file is parsed.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "RLENS_CONFIG";

/// Environment variable overriding the model adapter endpoint
pub const MODEL_ENDPOINT_ENV_VAR: &str = "RLENS_MODEL_ENDPOINT";

/// Top-level configuration file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Engine-wide limits and method selection
    pub engine: EngineSettings,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Classifier adapters to attempt at startup, in registry order
    ///
    /// Empty means "use the default adapter set".
    pub adapters: Vec<AdapterConfig>,

    /// Aspect categories overlaid on the built-in defaults
    ///
    /// A category named here replaces the default keyword list of the same
    /// name; new names add categories.
    pub aspects: BTreeMap<String, Vec<String>>,

    /// Translation collaborator settings
    pub translation: TranslationConfig,
}

/// Engine-wide settings (`[engine]`)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Input longer than this many characters is truncated before scoring
    pub max_input_chars: usize,

    /// Budget for each external call (adapter, detection, translation)
    pub call_timeout_ms: u64,

    /// `"hybrid"`, `"basic"`, or an adapter name to bypass fusion
    pub preferred_method: String,

    /// Panic on an unknown aspect name instead of reporting it not mentioned
    ///
    /// Meant for development builds that want misspelled aspect names to fail
    /// loudly.
    pub strict_aspects: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_input_chars: 512,
            call_timeout_ms: 5_000,
            preferred_method: "hybrid".to_string(),
            strict_aspects: false,
        }
    }
}

/// Logging configuration (`[logging]`)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full EnvFilter directive
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Kind of classifier backend behind an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    /// Rule-based valence lexicon (lexicon-based family)
    Valence,
    /// Word polarity averaging (polarity-score family)
    Polarity,
    /// Remote transformer inference (model-based family)
    Model,
}

impl AdapterKind {
    /// Registry name of the adapter
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterKind::Valence => "valence",
            AdapterKind::Polarity => "polarity",
            AdapterKind::Model => "model",
        }
    }

    /// Fusion weight used when the config file does not set one
    pub fn default_weight(&self) -> f64 {
        match self {
            AdapterKind::Valence => 0.4,
            AdapterKind::Polarity => 0.3,
            AdapterKind::Model => 0.3,
        }
    }
}

impl std::fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label vocabulary of a model backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSpaceSetting {
    /// negative / neutral / positive
    #[default]
    ThreeWay,
    /// negative / positive, no neutral class
    Binary,
}

/// One `[[adapters]]` entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdapterConfig {
    pub kind: AdapterKind,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Fusion weight (defaults per kind: valence 0.4, polarity 0.3, model 0.3)
    #[serde(default)]
    pub weight: Option<f64>,

    /// Extra `word<TAB>valence` lexicon merged into the valence lexicon
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,

    /// Inference endpoint URL (model adapter)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Label vocabulary of the model behind `endpoint`
    #[serde(default)]
    pub label_space: LabelSpaceSetting,

    /// Send one probe request at startup (model adapter)
    #[serde(default = "default_true")]
    pub probe: bool,
}

impl AdapterConfig {
    /// Entry for `kind` with every optional key at its default
    pub fn new(kind: AdapterKind) -> Self {
        Self {
            kind,
            enabled: true,
            weight: None,
            lexicon_path: None,
            endpoint: None,
            label_space: LabelSpaceSetting::default(),
            probe: true,
        }
    }

    /// Configured weight, or the kind's default
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or_else(|| self.kind.default_weight())
    }
}

/// Translation collaborator settings (`[translation]`)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// LibreTranslate-compatible base URL; translation is disabled when absent
    pub endpoint: Option<String>,

    pub api_key: Option<String>,

    /// Client-side rate limit for translation requests
    pub requests_per_second: u32,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            requests_per_second: 3,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Built-in adapter set: all three backends at their default weights
pub fn default_adapters() -> Vec<AdapterConfig> {
    vec![
        AdapterConfig::new(AdapterKind::Valence),
        AdapterConfig::new(AdapterKind::Polarity),
        AdapterConfig::new(AdapterKind::Model),
    ]
}

/// Built-in aspect categories and their keywords
pub fn default_aspects() -> BTreeMap<String, Vec<String>> {
    let table: [(&str, &[&str]); 4] = [
        (
            "food",
            &[
                "food", "dish", "meal", "taste", "flavor", "cuisine", "recipe", "ingredient",
                "delicious", "tasty", "bland", "spicy", "sweet",
            ],
        ),
        (
            "service",
            &[
                "service", "staff", "waiter", "waitress", "server", "employee", "friendly",
                "rude", "helpful", "slow", "fast", "attentive",
            ],
        ),
        (
            "ambience",
            &[
                "ambience", "atmosphere", "environment", "decor", "music", "lighting", "noise",
                "cozy", "romantic", "loud", "quiet",
            ],
        ),
        (
            "price",
            &[
                "price", "cost", "expensive", "cheap", "value", "money", "affordable",
                "overpriced", "reasonable", "worth",
            ],
        ),
    ];

    table
        .iter()
        .map(|(name, words)| {
            (
                name.to_string(),
                words.iter().map(|w| w.to_string()).collect(),
            )
        })
        .collect()
}

impl TomlConfig {
    /// Parse configuration from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Adapters to attempt, falling back to the default set
    pub fn effective_adapters(&self) -> Vec<AdapterConfig> {
        if self.adapters.is_empty() {
            default_adapters()
        } else {
            self.adapters.clone()
        }
    }

    /// Default aspect categories overlaid with the configured ones
    ///
    /// Names and keywords are lowercased so lookups are case-insensitive.
    pub fn resolved_aspects(&self) -> BTreeMap<String, Vec<String>> {
        let mut aspects = default_aspects();
        for (name, keywords) in &self.aspects {
            aspects.insert(
                name.to_lowercase(),
                keywords.iter().map(|k| k.to_lowercase()).collect(),
            );
        }
        aspects
    }

    /// Apply environment overrides (ENV beats TOML)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var(MODEL_ENDPOINT_ENV_VAR) {
            if endpoint.trim().is_empty() {
                return;
            }
            info!("Model endpoint overridden from {}", MODEL_ENDPOINT_ENV_VAR);
            if self.adapters.is_empty() {
                self.adapters = default_adapters();
            }
            for adapter in self
                .adapters
                .iter_mut()
                .filter(|a| a.kind == AdapterKind::Model)
            {
                adapter.endpoint = Some(endpoint.clone());
            }
        }
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.engine.call_timeout_ms == 0 {
            return Err(Error::Config(
                "engine.call_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.engine.max_input_chars == 0 {
            return Err(Error::Config(
                "engine.max_input_chars must be greater than zero".to_string(),
            ));
        }
        if self.engine.preferred_method.trim().is_empty() {
            return Err(Error::Config(
                "engine.preferred_method must not be empty".to_string(),
            ));
        }

        for adapter in &self.adapters {
            let weight = adapter.effective_weight();
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::Config(format!(
                    "adapter '{}' has invalid weight {}",
                    adapter.kind, weight
                )));
            }
        }

        for (name, keywords) in &self.aspects {
            if keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(Error::Config(format!(
                    "aspect '{}' has no keywords",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// Locate the config file following the documented priority order
///
/// Returns `None` when no file was named and the default location does not
/// exist.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    default_config_path().filter(|p| p.exists())
}

/// `<config dir>/rlens/config.toml` for the current platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rlens").join("config.toml"))
}

/// Load, override and validate configuration
///
/// An explicitly named file (CLI or environment) that cannot be read is an
/// error; having no file at all yields the defaults.
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    let mut config = match resolve_config_path(cli_arg) {
        Some(path) => {
            debug!("Reading config file {}", path.display());
            let content = std::fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Read {} failed: {}", path.display(), e))
            })?;
            let config = TomlConfig::from_toml_str(&content)?;
            info!("Configuration loaded from {}", path.display());
            config
        }
        None => {
            info!("No config file found, using built-in defaults");
            TomlConfig::default()
        }
    };

    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.engine.max_input_chars, 512);
        assert_eq!(config.engine.preferred_method, "hybrid");
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());

        let adapters = config.effective_adapters();
        let weights: Vec<f64> = adapters.iter().map(|a| a.effective_weight()).collect();
        assert_eq!(weights, vec![0.4, 0.3, 0.3]);
    }

    #[test]
    fn test_default_aspects_present() {
        let aspects = default_aspects();
        for name in ["food", "service", "ambience", "price"] {
            assert!(aspects.contains_key(name), "missing aspect {}", name);
        }
        assert!(aspects["price"].contains(&"overpriced".to_string()));
    }

    #[test]
    fn test_aspect_overlay_is_case_insensitive() {
        let config = TomlConfig::from_toml_str(
            r#"
            [aspects]
            Drinks = ["Wine", "cocktail"]
            price = ["bill"]
            "#,
        )
        .unwrap();

        let aspects = config.resolved_aspects();
        assert_eq!(aspects["drinks"], vec!["wine", "cocktail"]);
        assert_eq!(aspects["price"], vec!["bill"]);
        assert!(aspects.contains_key("food"));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let result = TomlConfig::from_toml_str(
            r#"
            [[adapters]]
            kind = "valence"
            weight = -0.1
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let result = TomlConfig::from_toml_str("[engine]\ncall_timeout_ms = 0\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_empty_aspect() {
        let result = TomlConfig::from_toml_str("[aspects]\nparking = []\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
