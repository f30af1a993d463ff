//! Symbols Command
//!
//! Lists the scope-qualified declarations of a single file.

use std::fs;
use std::path::Path;

use console::style;

use crate::analyzer::parser::Language;
use crate::analyzer::symbols::SymbolExtractor;
use crate::config::OutputFormat;
use crate::types::{CodeSymbol, Result, WeaveError};

pub fn run(file: &Path, format: OutputFormat) -> Result<()> {
    let language = Language::from_path(file);
    if !language.has_structurer() {
        return Err(WeaveError::UnsupportedLanguage(format!(
            "{} ({})",
            language,
            file.display()
        )));
    }

    let source = fs::read_to_string(file)?;
    let extractor = SymbolExtractor::for_language(language)?;
    let symbols = extractor.extract(&file.to_string_lossy(), &source);

    print!("{}", render(&symbols, format)?);
    Ok(())
}

fn render(symbols: &[CodeSymbol], format: OutputFormat) -> Result<String> {
    let mut rendered = match format {
        OutputFormat::Text => render_text(symbols),
        OutputFormat::Json => serde_json::to_string_pretty(symbols)?,
        OutputFormat::Yaml => serde_yaml::to_string(symbols)?,
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

fn render_text(symbols: &[CodeSymbol]) -> String {
    let width = symbols
        .iter()
        .map(|s| s.kind.as_str().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for symbol in symbols {
        out.push_str(&format!(
            "{:<width$}  {}  {}\n",
            style(symbol.kind.as_str()).cyan(),
            symbol.qualified_name,
            style(symbol.extent_range.start).dim(),
            width = width
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_text_lists_qualified_names() {
        let extractor = SymbolExtractor::for_language(Language::Java).unwrap();
        let symbols = extractor.extract("A.java", "class A { void run() {} }");
        let text = render_text(&symbols);
        assert!(text.contains("A.run"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_render_structured_formats() {
        let extractor = SymbolExtractor::for_language(Language::Java).unwrap();
        let symbols = extractor.extract("A.java", "class A { void run() {} }");

        let json = render(&symbols, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));

        let yaml = render(&symbols, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("A.run"));
        assert!(!yaml.starts_with('['));
    }

    #[test]
    fn test_unsupported_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("App.kt");
        fs::write(&path, "class App").unwrap();
        assert!(matches!(
            run(&path, OutputFormat::Text),
            Err(WeaveError::UnsupportedLanguage(_))
        ));
    }
}
