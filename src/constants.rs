//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// File scanning constants
pub mod scan {
    /// Default maximum file size for analysis (1MB)
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

    /// Directories skipped even when no ignore file mentions them
    pub const DEFAULT_EXCLUDES: &[&str] = &[
        "node_modules/**",
        "target/**",
        ".git/**",
        "build/**",
        "dist/**",
        "__pycache__/**",
        "vendor/**",
        ".venv/**",
    ];
}

/// Pipeline constants
pub mod pipeline {
    /// Default number of files structured concurrently
    pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
}

/// Configuration file locations
pub mod paths {
    /// Directory name under the user config dir and in project roots
    pub const APP_DIR: &str = "codeweave";

    /// Project-level config directory
    pub const PROJECT_DIR: &str = ".codeweave";

    pub const CONFIG_FILE: &str = "config.toml";

    /// Environment variable prefix (`CODEWEAVE_ANALYSIS__MAX_CONCURRENCY=4`)
    pub const ENV_PREFIX: &str = "CODEWEAVE_";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_defaults_are_sane() {
        assert!(scan::DEFAULT_MAX_FILE_SIZE > 0);
        assert!(scan::DEFAULT_EXCLUDES.iter().all(|p| p.ends_with("/**")));
        assert!(pipeline::DEFAULT_MAX_CONCURRENCY > 0);
    }
}
