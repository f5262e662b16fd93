//! Extractor settings, loadable from JSON.

use crate::error::ExtractionError;
use config::constants::{
    ConfigError, ConverterConfig, RenderConfig, UnknownKindPolicy, CONDITION_DISPLAY_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for one [`Extractor`](crate::Extractor).
///
/// # Examples
/// ```
/// use code_extractor::ExtractorConfig;
/// let config: ExtractorConfig = serde_json::from_str(r#"{"threads": 2}"#).unwrap();
/// assert_eq!(config.threads, Some(2));
/// assert!(config.cache_dir.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractorConfig {
    /// Worker threads; `None` uses rayon's global pool.
    pub threads: Option<usize>,
    /// Directory of cached trees; `None` disables caching.
    pub cache_dir: Option<PathBuf>,
    /// Drop unknown translation units instead of leaving error placeholders.
    pub skip_unknown_kinds: bool,
    /// Longest condition printed verbatim in trace-level tree dumps.
    pub condition_display_limit: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            threads: None,
            cache_dir: None,
            skip_unknown_kinds: false,
            condition_display_limit: CONDITION_DISPLAY_LIMIT,
        }
    }
}

impl ExtractorConfig {
    /// Reads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ExtractionError> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|err| ExtractionError::Format(err.into()))
    }

    /// Converter settings derived from this configuration.
    pub fn converter_config(&self) -> ConverterConfig {
        let policy = if self.skip_unknown_kinds {
            UnknownKindPolicy::Skip
        } else {
            UnknownKindPolicy::Placeholder
        };
        ConverterConfig::new(policy)
    }

    /// Validated tree printer settings derived from this configuration.
    pub fn render_config(&self) -> Result<RenderConfig, ConfigError> {
        RenderConfig::new(self.condition_display_limit)
    }
}
