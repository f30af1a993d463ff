//! Analyze Command
//!
//! Structures every supported source file under a root and reports interface
//! implementations and the class hierarchy.

use std::fs;
use std::path::PathBuf;

use crate::cli::Output;
use crate::cli::ui::report::render_text;
use crate::config::{Config, ConfigLoader, OutputFormat};
use crate::pipeline::AnalysisPipeline;
use crate::types::{AnalysisReport, Result};

pub async fn run(
    path: Option<PathBuf>,
    format: Option<OutputFormat>,
    output: Option<PathBuf>,
) -> Result<()> {
    let root = path.unwrap_or_else(|| PathBuf::from("."));
    let mut config = ConfigLoader::load()?;
    if let Some(format) = format {
        config.output.format = format;
    }

    let report = AnalysisPipeline::new(config.clone()).run(&root).await?;
    let rendered = render(&report, &config)?;

    match output {
        Some(path) => {
            fs::write(&path, rendered)?;
            Output::new().success(&format!("Report written to {}", path.display()));
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn render(report: &AnalysisReport, config: &Config) -> Result<String> {
    let mut rendered = match config.output.format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Json if config.output.pretty => serde_json::to_string_pretty(report)?,
        OutputFormat::Json => serde_json::to_string(report)?,
        OutputFormat::Yaml => serde_yaml::to_string(report)?,
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_formats() {
        let report = AnalysisReport {
            root: "demo".to_string(),
            files_scanned: 2,
            ..Default::default()
        };
        let mut config = Config::default();

        config.output.format = OutputFormat::Json;
        config.output.pretty = false;
        let json = render(&report, &config).unwrap();
        assert!(json.starts_with("{\"root\":\"demo\""));
        assert!(json.ends_with('\n'));

        config.output.format = OutputFormat::Yaml;
        let yaml = render(&report, &config).unwrap();
        assert!(yaml.contains("filesScanned: 2"));

        config.output.format = OutputFormat::Text;
        let text = render(&report, &config).unwrap();
        assert!(text.contains("demo"));
    }
}
