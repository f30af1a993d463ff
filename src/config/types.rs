//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/codeweave/) and project (.codeweave/) level configuration.

use serde::{Deserialize, Serialize};

use crate::analyzer::parser::Language;
use crate::constants::{pipeline, scan};
use crate::types::{Result, WeaveError};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Code analysis settings
    pub analysis: AnalysisConfig,

    /// Report output settings
    pub output: OutputConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `WeaveError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.max_concurrency == 0 {
            return Err(WeaveError::Config(
                "analysis.max_concurrency must be greater than 0".to_string(),
            ));
        }

        if self.analysis.max_file_size == 0 {
            return Err(WeaveError::Config(
                "analysis.max_file_size must be greater than 0".to_string(),
            ));
        }

        for name in &self.analysis.languages {
            match name.parse::<Language>() {
                Ok(lang) if lang.has_structurer() => {}
                Ok(lang) if lang.is_known() => {
                    return Err(WeaveError::Config(format!(
                        "analysis.languages: {} is recognized but cannot be structured",
                        lang
                    )));
                }
                _ => {
                    return Err(WeaveError::Config(format!(
                        "analysis.languages: unknown language '{}'",
                        name
                    )));
                }
            }
        }

        for pattern in self.analysis.include.iter().chain(&self.analysis.exclude) {
            glob::Pattern::new(pattern).map_err(|e| {
                WeaveError::Config(format!("Invalid glob pattern '{}': {}", pattern, e))
            })?;
        }

        Ok(())
    }
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Glob patterns a file (relative to the root) must match
    pub include: Vec<String>,

    /// Glob patterns that exclude a file
    pub exclude: Vec<String>,

    /// Files larger than this many bytes are skipped
    pub max_file_size: u64,

    /// Files structured concurrently
    pub max_concurrency: usize,

    /// Restrict analysis to these languages (empty = every structured language)
    pub languages: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            include: vec!["**/*".to_string()],
            exclude: scan::DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            max_file_size: scan::DEFAULT_MAX_FILE_SIZE,
            max_concurrency: pipeline::DEFAULT_MAX_CONCURRENCY,
            languages: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    /// Languages selected by `languages`; every structured language when empty.
    pub fn selected_languages(&self) -> Vec<Language> {
        if self.languages.is_empty() {
            return Language::all_variants()
                .iter()
                .copied()
                .filter(Language::has_structurer)
                .collect();
        }
        self.languages
            .iter()
            .filter_map(|name| name.parse::<Language>().ok())
            .filter(Language::has_structurer)
            .collect()
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Pretty-print JSON output
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(format!(
                "Unknown output format: {}. Valid values: text, json, yaml",
                s
            )),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.analysis.exclude.contains(&"node_modules/**".to_string()));
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.analysis.max_concurrency = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_concurrency"));
    }

    #[test]
    fn test_validate_rejects_zero_file_size() {
        let mut config = Config::default();
        config.analysis.max_file_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_languages() {
        let mut config = Config::default();
        config.analysis.languages = vec!["java".to_string(), "golang".to_string()];
        assert!(config.validate().is_ok());
        assert_eq!(
            config.analysis.selected_languages(),
            vec![Language::Java, Language::Go]
        );

        config.analysis.languages = vec!["kotlin".to_string()];
        assert!(config.validate().is_err());

        config.analysis.languages = vec!["cobol".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let mut config = Config::default();
        config.analysis.exclude = vec!["[".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_selected_languages_default() {
        let langs = AnalysisConfig::default().selected_languages();
        assert!(langs.contains(&Language::Rust));
        assert!(!langs.contains(&Language::Kotlin));
    }

    #[test]
    fn test_output_format() {
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!("YML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
