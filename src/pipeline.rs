//! Analysis Pipeline
//!
//! Scan → structure (concurrently) → collect (in path order) → analyze.
//!
//! Per-file failures are logged and counted; they never abort the run.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;

use crate::analyzer::parser::{Language, Structurer, create_structurer};
use crate::analyzer::scanner::{FileScanner, ScannedFile};
use crate::config::Config;
use crate::relations::{ClassHierarchyAnalyzer, InterfaceAnalyzer, StructureCollector};
use crate::types::{
    AnalysisReport, CodeFile, ExtensionAnalysis, InterfaceAnalysis, Result, WeaveError,
    log_filter_warn,
};

type StructurerMap = HashMap<Language, Arc<dyn Structurer>>;

pub struct AnalysisPipeline {
    config: Config,
}

impl AnalysisPipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self, root: impl AsRef<Path>) -> Result<AnalysisReport> {
        let root = root.as_ref();

        let scanner = FileScanner::from_config(root, &self.config.analysis)?;
        let files = scanner.scan()?;
        let files_scanned = files.len();
        tracing::info!("Scanned {} files under {}", files_scanned, root.display());

        let structurers = Arc::new(self.structurers());
        let mut code_files = self.structure_all(files, structurers).await;
        let files_structured = code_files.len();
        tracing::info!(
            "Structured {} files ({} skipped)",
            files_structured,
            files_scanned - files_structured
        );

        // Completion order is arbitrary; ingestion order decides map order
        code_files.sort_by(|a, b| a.filepath.cmp(&b.filepath));
        let (interface_analysis, extension_analysis) = analyze_code_files(&code_files);

        Ok(AnalysisReport {
            root: root.display().to_string(),
            files_scanned,
            files_structured,
            files_skipped: files_scanned - files_structured,
            interface_analysis,
            extension_analysis,
        })
    }

    /// One Structurer per selected language, shared by every task.
    fn structurers(&self) -> StructurerMap {
        self.config
            .analysis
            .selected_languages()
            .into_iter()
            .filter_map(|lang| {
                let structurer = log_filter_warn(
                    create_structurer(lang),
                    &format!("Creating {} structurer", lang),
                )?;
                Some((lang, Arc::from(structurer)))
            })
            .collect()
    }

    async fn structure_all(
        &self,
        files: Vec<ScannedFile>,
        structurers: Arc<StructurerMap>,
    ) -> Vec<CodeFile> {
        let max_concurrency = self.config.analysis.max_concurrency.max(1);
        let mut results = Vec::with_capacity(files.len());

        // Process files with concurrency limit using buffer_unordered
        let mut stream = futures::stream::iter(files)
            .map(|file| {
                let structurers = Arc::clone(&structurers);
                async move {
                    let relative = file.relative.clone();
                    let outcome = tokio::task::spawn_blocking(move || {
                        structure_file(&structurers, &file.path, &file.relative, file.language)
                    })
                    .await
                    .map_err(WeaveError::from)
                    .and_then(|r| r);
                    (relative, outcome)
                }
            })
            .buffer_unordered(max_concurrency);

        while let Some((path, outcome)) = stream.next().await {
            match outcome {
                Ok(code_file) => {
                    tracing::debug!(
                        "Structured {} ({} structures, {} functions)",
                        path,
                        code_file.classes.len(),
                        code_file.functions.len()
                    );
                    results.push(code_file);
                }
                Err(e) if e.is_per_file() => tracing::warn!("Skipping {}: {}", path, e),
                Err(e) => tracing::error!("Structuring {} failed: {}", path, e),
            }
        }

        results
    }
}

/// Read and structure one file. Runs on a blocking thread.
fn structure_file(
    structurers: &StructurerMap,
    path: &Path,
    relative: &str,
    language: Language,
) -> Result<CodeFile> {
    let structurer = structurers
        .get(&language)
        .ok_or_else(|| WeaveError::UnsupportedLanguage(language.to_string()))?;
    let source = std::fs::read_to_string(path)?;
    structurer.parse_file(&source, relative)
}

/// Collect `files` in the given order and run both analyzers.
pub fn analyze_code_files<'a, I>(files: I) -> (InterfaceAnalysis, ExtensionAnalysis)
where
    I: IntoIterator<Item = &'a CodeFile>,
{
    let mut collector = StructureCollector::new();
    collector.add_code_files(files);
    tracing::debug!(
        "Collected {} interfaces and {} classes",
        collector.interface_map().len(),
        collector.class_map().len()
    );

    let interfaces = InterfaceAnalyzer::new(&collector).analyze();
    let extensions = ClassHierarchyAnalyzer::new(&collector).analyze();
    (interfaces, extensions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CodeStructure, StructureType};
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, path: &str, content: &str) {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn greeter_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "src/com/acme/Greeter.java",
            "package com.acme;\npublic interface Greeter { String greet(String name); }\n",
        );
        write(
            dir.path(),
            "src/com/acme/English.java",
            "package com.acme;\npublic class English extends Base implements Greeter {\n    public String greet(String name) { return name; }\n}\n",
        );
        write(
            dir.path(),
            "src/com/acme/Spanish.java",
            "package com.acme;\npublic class Spanish implements Greeter {\n    public String greet(String name) { return name; }\n}\n",
        );
        write(
            dir.path(),
            "src/com/acme/Base.java",
            "package com.acme;\npublic class Base {}\n",
        );
        dir
    }

    #[tokio::test]
    async fn test_pipeline_end_to_end() {
        let dir = greeter_project();
        write(dir.path(), "notes.md", "# not code");

        let report = AnalysisPipeline::new(Config::default())
            .run(dir.path())
            .await
            .unwrap();

        assert_eq!(report.files_scanned, 4);
        assert_eq!(report.files_structured, 4);
        assert_eq!(report.files_skipped, 0);

        let interfaces = &report.interface_analysis;
        assert_eq!(interfaces.interfaces.len(), 1);
        let greeter = &interfaces.interfaces[0];
        assert_eq!(greeter.interface_name, "Greeter");
        assert_eq!(greeter.method_count, 1);
        let implementors: Vec<_> = greeter
            .implementations
            .iter()
            .map(|i| i.class_name.as_str())
            .collect();
        assert_eq!(implementors, vec!["English", "Spanish"]);

        let extensions = &report.extension_analysis;
        assert_eq!(extensions.extensions.len(), 1);
        assert_eq!(extensions.extensions[0].parent_name, "Base");
        assert_eq!(extensions.hierarchy.max_depth, 1);
    }

    #[tokio::test]
    async fn test_pipeline_is_deterministic_across_concurrency() {
        let dir = greeter_project();

        let mut serial = Config::default();
        serial.analysis.max_concurrency = 1;
        let mut parallel = Config::default();
        parallel.analysis.max_concurrency = 16;

        let a = AnalysisPipeline::new(serial).run(dir.path()).await.unwrap();
        let b = AnalysisPipeline::new(parallel).run(dir.path()).await.unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[tokio::test]
    async fn test_unreadable_file_is_skipped() {
        let dir = greeter_project();
        fs::write(dir.path().join("src/Broken.java"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let report = AnalysisPipeline::new(Config::default())
            .run(dir.path())
            .await
            .unwrap();
        assert_eq!(report.files_scanned, 5);
        assert_eq!(report.files_structured, 4);
        assert_eq!(report.files_skipped, 1);
        assert_eq!(report.interface_analysis.interfaces.len(), 1);
    }

    #[tokio::test]
    async fn test_language_selection() {
        let dir = greeter_project();
        write(dir.path(), "tools/gen.py", "class Gen: pass\n");

        let mut config = Config::default();
        config.analysis.languages = vec!["python".to_string()];
        let report = AnalysisPipeline::new(config).run(dir.path()).await.unwrap();
        assert_eq!(report.files_scanned, 1);
        assert!(report.interface_analysis.interfaces.is_empty());
    }

    #[tokio::test]
    async fn test_missing_root_is_an_error() {
        let result = AnalysisPipeline::new(Config::default())
            .run("/definitely/not/a/project")
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_analyze_code_files_in_memory() {
        let mut file = CodeFile::new("A.java", "java");
        let mut a = CodeStructure::new(StructureType::Class, "A", "p");
        a.extends.push("B".to_string());
        let b = CodeStructure::new(StructureType::Class, "B", "p");
        file.classes = vec![a, b];

        let (interfaces, extensions) = analyze_code_files([&file]);
        assert!(interfaces.interfaces.is_empty());
        assert_eq!(extensions.stats.total_extension_relations, 1);
        assert_eq!(extensions.hierarchy.max_depth, 1);
    }
}
