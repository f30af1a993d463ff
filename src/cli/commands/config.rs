//! Config Command
//!
//! Manage codeweave configuration.
//!
//! Usage:
//!   codeweave config show [-f text|json|yaml]
//!   codeweave config path
//!   codeweave config init [-g] [--force]

use crate::cli::Output;
use crate::config::{ConfigLoader, OutputFormat};
use crate::types::Result;

/// Show the merged effective configuration
pub fn show(format: OutputFormat) -> Result<()> {
    ConfigLoader::show_config(format)
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Write a default config file
pub fn init(global: bool, force: bool) -> Result<()> {
    let path = ConfigLoader::init(global, force)?;
    let scope = if global { "global" } else { "project" };
    Output::new().success(&format!("Initialized {} configuration", scope));
    println!("  Config: {}", path.display());
    Ok(())
}
