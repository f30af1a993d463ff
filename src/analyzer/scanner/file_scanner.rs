use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::analyzer::parser::Language;
use crate::config::AnalysisConfig;
use crate::constants::scan;
use crate::types::{Result, WeaveError};

/// Walks a project root and yields the files a Structurer can read.
///
/// Ignore files (`.gitignore`, global excludes) are honored by the walker; `include`/`exclude`
/// globs are matched against the path relative to the root.
pub struct FileScanner {
    root: PathBuf,
    include: Vec<glob::Pattern>,
    exclude: Vec<glob::Pattern>,
    max_file_size: u64,
    languages: Vec<Language>,
}

impl FileScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            include: Vec::new(),
            exclude: Vec::new(),
            max_file_size: scan::DEFAULT_MAX_FILE_SIZE,
            languages: Language::all_variants()
                .iter()
                .copied()
                .filter(Language::has_structurer)
                .collect(),
        }
    }

    /// Create a scanner configured from the `[analysis]` section
    pub fn from_config<P: AsRef<Path>>(root: P, config: &AnalysisConfig) -> Result<Self> {
        Ok(Self::new(root)
            .with_include(&config.include)?
            .with_exclude(&config.exclude)?
            .with_max_file_size(config.max_file_size)
            .with_languages(config.selected_languages()))
    }

    pub fn with_include(mut self, patterns: &[String]) -> Result<Self> {
        self.include = compile_patterns(patterns)?;
        Ok(self)
    }

    pub fn with_exclude(mut self, patterns: &[String]) -> Result<Self> {
        self.exclude = compile_patterns(patterns)?;
        Ok(self)
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    pub fn with_languages(mut self, languages: Vec<Language>) -> Self {
        self.languages = languages;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files to structure, sorted by relative path.
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        if !self.root.exists() {
            return Err(WeaveError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", self.root.display()),
            )));
        }

        let mut files = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false) // Security: prevent symlink traversal attacks
            .build();

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let relative = self.relative_path(path);

            if !self.is_included(&relative) || self.is_excluded(&relative) {
                continue;
            }

            let language = Language::from_path(path);
            if !self.languages.contains(&language) {
                continue;
            }

            if let Ok(metadata) = path.metadata() {
                if metadata.len() > self.max_file_size {
                    tracing::debug!(
                        "Skipping {} ({} bytes exceeds limit)",
                        relative,
                        metadata.len()
                    );
                    continue;
                }

                files.push(ScannedFile {
                    path: path.to_path_buf(),
                    relative,
                    size: metadata.len(),
                    language,
                });
            }
        }

        files.sort_by(|a, b| a.relative.cmp(&b.relative));
        Ok(files)
    }

    /// Forward-slash path relative to the root (the file name itself for a file root).
    fn relative_path(&self, path: &Path) -> String {
        let relative = path
            .strip_prefix(&self.root)
            .ok()
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| path.file_name().map(Path::new))
            .unwrap_or(path);
        relative.to_string_lossy().replace('\\', "/")
    }

    fn is_included(&self, relative: &str) -> bool {
        self.include.is_empty() || self.include.iter().any(|p| p.matches(relative))
    }

    fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(relative))
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<glob::Pattern>> {
    patterns
        .iter()
        .map(|p| {
            glob::Pattern::new(p)
                .map_err(|e| WeaveError::Config(format!("Invalid glob pattern '{}': {}", p, e)))
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Path relative to the scan root, used as the `CodeFile` path
    pub relative: String,
    pub size: u64,
    pub language: Language,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, path: &str, content: &str) {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn relatives(files: &[ScannedFile]) -> Vec<&str> {
        files.iter().map(|f| f.relative.as_str()).collect()
    }

    #[test]
    fn test_scan_filters_by_language_and_sorts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/b.rs", "struct B;");
        write(dir.path(), "src/a.py", "class A: pass");
        write(dir.path(), "README.md", "# readme");
        write(dir.path(), "App.kt", "class App");

        let files = FileScanner::new(dir.path()).scan().unwrap();
        assert_eq!(relatives(&files), vec!["src/a.py", "src/b.rs"]);
        assert_eq!(files[0].language, Language::Python);
    }

    #[test]
    fn test_scan_applies_excludes_and_size_limit() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "node_modules/lib/index.js", "class X {}");
        write(dir.path(), "src/main.go", "package main");
        write(dir.path(), "src/big.go", &"// padding\n".repeat(100));

        let config = AnalysisConfig {
            max_file_size: 64,
            ..Default::default()
        };
        let files = FileScanner::from_config(dir.path(), &config)
            .unwrap()
            .scan()
            .unwrap();
        assert_eq!(relatives(&files), vec!["src/main.go"]);
    }

    #[test]
    fn test_scan_include_and_language_selection() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "api/Service.java", "class Service {}");
        write(dir.path(), "web/app.ts", "class App {}");
        write(dir.path(), "web/util.go", "package web");

        let files = FileScanner::new(dir.path())
            .with_include(&["web/**".to_string()])
            .unwrap()
            .with_languages(vec![Language::TypeScript])
            .scan()
            .unwrap();
        assert_eq!(relatives(&files), vec!["web/app.ts"]);
    }

    #[test]
    fn test_scan_respects_gitignore() {
        let dir = TempDir::new().unwrap();
        // The ignore crate only reads .gitignore inside a repository
        fs::create_dir(dir.path().join(".git")).unwrap();
        write(dir.path(), ".gitignore", "generated/\n");
        write(dir.path(), "generated/Gen.java", "class Gen {}");
        write(dir.path(), "Main.java", "class Main {}");

        let files = FileScanner::new(dir.path()).scan().unwrap();
        assert_eq!(relatives(&files), vec!["Main.java"]);
    }

    #[test]
    fn test_single_file_root() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Main.java", "class Main {}");

        let files = FileScanner::new(dir.path().join("Main.java")).scan().unwrap();
        assert_eq!(relatives(&files), vec!["Main.java"]);
    }

    #[test]
    fn test_invalid_pattern_and_missing_root() {
        assert!(FileScanner::new(".").with_exclude(&["[".to_string()]).is_err());
        assert!(FileScanner::new("/definitely/not/here").scan().is_err());
    }
}
