//! Configuration loading for exhibitd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.exhibit/config.toml` (user)
//! 3. `/etc/exhibit/config.toml` (system)
//!
//! Models are declared inline as `[[models]]` tables, or as standalone JSON
//! files listed in `model_files`. Every model is validated at load time; an
//! invalid model is a fatal configuration error.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{Attacker, Interpreter};
use crate::{ExhibitError, Result};

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub permalinks: PermalinkConfig,
    #[serde(default)]
    pub models: Vec<ModelConfig>,
    /// Paths to per-model JSON config files.
    #[serde(default)]
    pub model_files: Vec<PathBuf>,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8000).
    #[serde(default = "default_address")]
    pub address: String,
    /// Development mode: pretty logs and engine error details in 500 bodies.
    #[serde(default)]
    pub development: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            development: false,
        }
    }
}

fn default_address() -> String {
    "0.0.0.0:8000".to_string()
}

/// Remote inference worker configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Worker base URL (default: http://127.0.0.1:8001).
    #[serde(default = "default_engine_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 120).
    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_engine_url(),
            timeout_secs: default_engine_timeout(),
        }
    }
}

fn default_engine_url() -> String {
    "http://127.0.0.1:8001".to_string()
}

fn default_engine_timeout() -> u64 {
    120
}

/// Permalink service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PermalinkConfig {
    /// Serve the permalink routes with an in-memory store (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for PermalinkConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

/// Options supported per model.
///
/// A model is loaded either from a pretrained id, or from an archive file
/// with an optional predictor name and parameter overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Unique name identifying the demo.
    pub id: String,
    #[serde(default)]
    pub pretrained_model_id: Option<String>,
    #[serde(default)]
    pub archive_file: Option<String>,
    /// Ignored unless `archive_file` is used.
    #[serde(default)]
    pub predictor_name: Option<String>,
    /// Parameter overrides passed through when loading the archive.
    #[serde(default)]
    pub overrides: Option<Map<String, Value>>,
    /// Enabled attackers. `None` enables all of them.
    #[serde(default)]
    pub attackers: Option<Vec<Attacker>>,
    /// Enabled interpreters. `None` enables all of them.
    #[serde(default)]
    pub interpreters: Option<Vec<Interpreter>>,
    /// Largest accepted request body, in bytes. `None` is unlimited.
    #[serde(default)]
    pub max_request_length: Option<usize>,
    /// Entries per operation cache. `None` uses the default; 0 disables caching.
    #[serde(default)]
    pub cache_size: Option<u64>,
}

impl ModelConfig {
    /// A model loaded from a pretrained id, with every capability enabled.
    pub fn pretrained(id: impl Into<String>, pretrained_model_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pretrained_model_id: Some(pretrained_model_id.into()),
            archive_file: None,
            predictor_name: None,
            overrides: None,
            attackers: None,
            interpreters: None,
            max_request_length: None,
            cache_size: None,
        }
    }

    /// A model loaded from an archive file, with every capability enabled.
    pub fn archive(id: impl Into<String>, archive_file: impl Into<String>) -> Self {
        Self {
            pretrained_model_id: None,
            archive_file: Some(archive_file.into()),
            ..Self::pretrained(id, "")
        }
    }

    pub fn with_attackers(mut self, attackers: impl Into<Vec<Attacker>>) -> Self {
        self.attackers = Some(attackers.into());
        self
    }

    pub fn with_interpreters(mut self, interpreters: impl Into<Vec<Interpreter>>) -> Self {
        self.interpreters = Some(interpreters.into());
        self
    }

    pub fn with_max_request_length(mut self, max: usize) -> Self {
        self.max_request_length = Some(max);
        self
    }

    pub fn with_cache_size(mut self, entries: u64) -> Self {
        self.cache_size = Some(entries);
        self
    }

    /// Check the load options are coherent.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(invalid(&self.id, "'id' must not be empty"));
        }
        if !is_path_segment(&self.id) {
            return Err(invalid(
                &self.id,
                "'id' must be a single URL path segment (letters, digits, '-', '_', '.')",
            ));
        }

        match (&self.pretrained_model_id, &self.archive_file) {
            (Some(_), Some(_)) => Err(invalid(
                &self.id,
                "'archive_file' option not supported with 'pretrained_model_id'",
            )),
            (None, None) => Err(invalid(
                &self.id,
                "either 'pretrained_model_id' or 'archive_file' required",
            )),
            (Some(_), None) if self.predictor_name.is_some() => Err(invalid(
                &self.id,
                "'predictor_name' option not supported with 'pretrained_model_id'",
            )),
            (Some(_), None) if self.overrides.is_some() => Err(invalid(
                &self.id,
                "'overrides' option not supported with 'pretrained_model_id'",
            )),
            _ => Ok(()),
        }
    }

    /// Parse and validate a model from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)
            .map_err(|e| ExhibitError::Configuration(format!("invalid model config: {e}")))?;
        model.validate()?;
        Ok(model)
    }

    /// Parse and validate a model from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ExhibitError::Configuration(format!("Failed to read model file {path:?}: {e}"))
        })?;
        Self::from_json_str(&content).map_err(|e| match e {
            ExhibitError::Configuration(msg) => {
                ExhibitError::Configuration(format!("{path:?}: {msg}"))
            }
            other => other,
        })
    }
}

/// Model ids are mounted verbatim under `/api/`, so they must not contain
/// separators or route syntax.
fn is_path_segment(id: &str) -> bool {
    id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn invalid(id: &str, reason: &str) -> ExhibitError {
    ExhibitError::Configuration(format!("invalid model config '{id}': {reason}"))
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.exhibit/config.toml`
    /// 3. `/etc/exhibit/config.toml`
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit_path)?;
        let content = fs::read_to_string(&path).map_err(|e| {
            ExhibitError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ExhibitError::Configuration(msg) => {
                ExhibitError::Configuration(format!("{path:?}: {msg}"))
            }
            other => other,
        })
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ExhibitError::Configuration(format!("Failed to parse config: {e}")))
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(ExhibitError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".exhibit").join("config.toml");
            if user_config.exists() {
                return Ok(user_config);
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/exhibit/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }

        Err(ExhibitError::Configuration(
            "No config file found. Create ~/.exhibit/config.toml or /etc/exhibit/config.toml"
                .to_string(),
        ))
    }

    /// Every configured model, inline ones first, validated and de-duplicated.
    pub fn resolve_models(&self) -> Result<Vec<ModelConfig>> {
        let mut models = Vec::with_capacity(self.models.len() + self.model_files.len());
        for model in &self.models {
            model.validate()?;
            models.push(model.clone());
        }
        for path in &self.model_files {
            models.push(ModelConfig::from_json_file(path)?);
        }

        let mut seen = HashSet::new();
        for model in &models {
            if !seen.insert(model.id.as_str()) {
                return Err(ExhibitError::Configuration(format!(
                    "duplicate model id '{}'",
                    model.id
                )));
            }
        }
        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.address, "0.0.0.0:8000");
        assert!(!config.server.development);
        assert_eq!(config.engine.base_url, "http://127.0.0.1:8001");
        assert_eq!(config.engine.timeout_secs, 120);
        assert!(config.permalinks.enabled);
        assert!(config.models.is_empty());
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [server]
            address = "127.0.0.1:9000"
        "#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.server.address, "127.0.0.1:9000");
        // Defaults preserved
        assert_eq!(config.engine.timeout_secs, 120);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [server]
            address = "0.0.0.0:8080"
            development = true

            [engine]
            base_url = "http://worker:8001"
            timeout_secs = 30

            [permalinks]
            enabled = false

            [[models]]
            id = "bidaf"
            archive_file = "https://storage/bidaf.tar.gz"
            predictor_name = "reading_comprehension"
            attackers = ["input_reduction"]
            interpreters = ["simple_gradient", "integrated_gradient"]
            max_request_length = 4096
            cache_size = 16

            [models.overrides]
            "dataset_reader.token_indexers.elmo.type" = "elmo_characters"

            [[models]]
            id = "ner"
            pretrained_model_id = "tagging-fine-grained-crf-tagger"
        "#;
        let config = Config::from_toml_str(toml).unwrap();
        assert!(config.server.development);
        assert_eq!(config.engine.base_url, "http://worker:8001");
        assert!(!config.permalinks.enabled);

        let models = config.resolve_models().unwrap();
        assert_eq!(models.len(), 2);
        let bidaf = &models[0];
        assert_eq!(bidaf.attackers, Some(vec![Attacker::InputReduction]));
        assert_eq!(
            bidaf.interpreters,
            Some(vec![
                Interpreter::SimpleGradient,
                Interpreter::IntegratedGradient
            ])
        );
        assert_eq!(bidaf.max_request_length, Some(4096));
        assert_eq!(bidaf.cache_size, Some(16));
        assert!(bidaf.overrides.as_ref().unwrap().contains_key("dataset_reader.token_indexers.elmo.type"));
        assert_eq!(
            models[1].pretrained_model_id.as_deref(),
            Some("tagging-fine-grained-crf-tagger")
        );
    }

    #[test]
    fn unknown_capability_id_fails_to_parse() {
        let toml = r#"
            [[models]]
            id = "m"
            pretrained_model_id = "p"
            attackers = ["hotflip", "deepfool"]
        "#;
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ExhibitError::Configuration(_)));
        assert!(err.to_string().contains("deepfool"));
    }

    #[test]
    fn both_sources_rejected() {
        let mut model = ModelConfig::pretrained("m", "p");
        model.archive_file = Some("a.tar.gz".into());
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("not supported with 'pretrained_model_id'"));
    }

    #[test]
    fn neither_source_rejected() {
        let mut model = ModelConfig::pretrained("m", "p");
        model.pretrained_model_id = None;
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("either 'pretrained_model_id' or 'archive_file' required"));
    }

    #[test]
    fn archive_only_options_rejected_with_pretrained() {
        let mut model = ModelConfig::pretrained("m", "p");
        model.predictor_name = Some("x".into());
        assert!(model.validate().is_err());

        let mut model = ModelConfig::pretrained("m", "p");
        model.overrides = Some(Map::new());
        assert!(model.validate().is_err());
    }

    #[test]
    fn ids_must_be_plain_path_segments() {
        for id in ["a/b", "{id}", "*rest", "has space", "q?x", "..", "."] {
            let err = ModelConfig::pretrained(id, "p").validate().unwrap_err();
            assert!(matches!(err, ExhibitError::Configuration(_)), "{id}");
            assert!(err.to_string().contains("single URL path segment"), "{id}");
        }
        for id in ["bidaf-elmo", "roberta_sst", "glove.v2", "NER2"] {
            assert!(ModelConfig::pretrained(id, "p").validate().is_ok(), "{id}");
        }
    }

    #[test]
    fn archive_constructor_is_valid() {
        let model = ModelConfig::archive("m", "model.tar.gz");
        assert!(model.validate().is_ok());
        assert!(model.pretrained_model_id.is_none());
    }

    #[test]
    fn duplicate_model_ids_rejected() {
        let config = Config {
            models: vec![
                ModelConfig::pretrained("dup", "a"),
                ModelConfig::pretrained("dup", "b"),
            ],
            ..Default::default()
        };
        let err = config.resolve_models().unwrap_err();
        assert!(err.to_string().contains("duplicate model id 'dup'"));
    }

    #[test]
    fn model_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(
            &path,
            r#"{"id": "sst", "archive_file": "sst.tar.gz", "interpreters": ["smooth_gradient"]}"#,
        )
        .unwrap();

        let model = ModelConfig::from_json_file(&path).unwrap();
        assert_eq!(model.id, "sst");
        assert_eq!(model.interpreters, Some(vec![Interpreter::SmoothGradient]));
    }

    #[test]
    fn model_json_rejects_unknown_fields() {
        let err = ModelConfig::from_json_str(r#"{"id": "m", "pretrained_model_id": "p", "extra": 1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("extra"));
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[engine]\nbase_url = \"http://w\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.engine.base_url, "http://w");
    }
}
