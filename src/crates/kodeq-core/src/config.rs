use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Runtime settings
///
/// Loaded from JSON, every field optional:
///
/// ```json
/// { "seed": 42, "log_diagnostics": false }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Seed for the shared generator; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Emit expression diagnostics through `log::warn!`
    pub log_diagnostics: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            seed: None,
            log_diagnostics: true,
        }
    }
}

impl RuntimeConfig {
    pub fn with_seed(seed: u64) -> Self {
        RuntimeConfig {
            seed: Some(seed),
            ..RuntimeConfig::default()
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = RuntimeConfig::from_json("{}").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert!(config.log_diagnostics);
    }

    #[test]
    fn test_partial_override() {
        let config = RuntimeConfig::from_json(r#"{"seed": 9}"#).unwrap();
        assert_eq!(config.seed, Some(9));
        assert!(config.log_diagnostics);
    }

    #[test]
    fn test_bad_json_is_a_config_error() {
        assert!(matches!(
            RuntimeConfig::from_json("{seed:"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            RuntimeConfig::load("/nonexistent/kodeq.json"),
            Err(Error::Config(_))
        ));
    }
}
