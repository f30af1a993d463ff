//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/codeweave/config.toml)
//! 3. Project config (.codeweave/config.toml)
//! 4. Environment variables (CODEWEAVE_* prefix, `__` separates sections)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::{Config, OutputFormat};
use crate::constants::paths;
use crate::types::{Result, WeaveError};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        Self::load_with(Self::global_config_path(), &Self::project_config_path())
    }

    fn load_with(global_path: Option<PathBuf>, project_path: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Merge global config
        if let Some(global_path) = global_path
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        // Merge project config
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(project_path));
        }

        // CODEWEAVE_ANALYSIS__MAX_CONCURRENCY -> analysis.max_concurrency
        figment = figment.merge(Env::prefixed(paths::ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| WeaveError::Config(format!("Configuration error: {}", e)))?;

        // Validate configuration after loading
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| WeaveError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/codeweave/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join(paths::APP_DIR))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join(paths::CONFIG_FILE))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join(paths::CONFIG_FILE)
    }

    pub fn project_dir() -> PathBuf {
        PathBuf::from(paths::PROJECT_DIR)
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(format: OutputFormat) -> Result<()> {
        let config = Self::load()?;
        println!("{}", Self::render(&config, format)?);
        Ok(())
    }

    /// Text renders as TOML, the on-disk format.
    fn render(config: &Config, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => {
                toml::to_string_pretty(config).map_err(|e| WeaveError::Config(e.to_string()))
            }
            OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(config)?),
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write a default config file, globally or for the current project.
    /// An existing file is kept unless `force` is set.
    pub fn init(global: bool, force: bool) -> Result<PathBuf> {
        let config_path = if global {
            Self::global_config_path().ok_or_else(|| {
                WeaveError::Config("Cannot determine global config directory".to_string())
            })?
        } else {
            Self::project_config_path()
        };
        Self::write_default(&config_path, force)?;
        Ok(config_path)
    }

    fn write_default(config_path: &Path, force: bool) -> Result<()> {
        if config_path.exists() && !force {
            info!("Config exists: {}", config_path.display());
            return Ok(());
        }
        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(config_path, Self::default_config_content())?;
        info!("Created config: {}", config_path.display());
        Ok(())
    }

    /// Generate default config content (TOML)
    fn default_config_content() -> String {
        r#"# codeweave configuration
# Project settings in .codeweave/config.toml override ~/.config/codeweave/config.toml.

[analysis]
include = ["**/*"]
exclude = [
    "node_modules/**",
    "target/**",
    ".git/**",
    "build/**",
    "dist/**",
]
max_file_size = 1048576
max_concurrency = 8
# Empty means every supported language
languages = []

[output]
format = "text"
pretty = true
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_without_files() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_with(None, &temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.analysis.max_concurrency, 8);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_project_overrides_global() {
        let temp_dir = TempDir::new().unwrap();
        let global = temp_dir.path().join("global.toml");
        let project = temp_dir.path().join("project.toml");
        fs::write(&global, "[analysis]\nmax_concurrency = 2\n[output]\nformat = \"yaml\"\n").unwrap();
        fs::write(&project, "[analysis]\nmax_concurrency = 3\n").unwrap();

        let config = ConfigLoader::load_with(Some(global), &project).unwrap();
        assert_eq!(config.analysis.max_concurrency, 3);
        assert_eq!(config.output.format, OutputFormat::Yaml);
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[analysis]\nmax_concurrency = 0\n").unwrap();
        assert!(ConfigLoader::load_from_file(&path).is_err());
    }

    #[test]
    fn test_default_content_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        ConfigLoader::write_default(&path, false).unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert!(config.output.pretty);
        assert!(config.analysis.languages.is_empty());

        // Existing files are kept without `force`
        fs::write(&path, "[output]\nformat = \"json\"\n").unwrap();
        ConfigLoader::write_default(&path, false).unwrap();
        let kept = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(kept.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_render_toml() {
        let rendered = ConfigLoader::render(&Config::default(), OutputFormat::Text).unwrap();
        assert!(rendered.contains("[analysis]"));
        assert!(rendered.contains("max_concurrency = 8"));
    }

    #[test]
    fn test_render_json_and_yaml() {
        let json = ConfigLoader::render(&Config::default(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["analysis"]["max_concurrency"], 8);

        let yaml = ConfigLoader::render(&Config::default(), OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("max_concurrency: 8"));
        assert!(yaml.contains("format: text"));
    }
}
