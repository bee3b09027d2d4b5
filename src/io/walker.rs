//! Gitignore-aware file discovery.

use crate::languages::Language;
use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Extensions that are never source code; skipped silently instead of
/// producing unreadable-file findings.
const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "ico", "pdf", "zip", "gz", "tar", "exe", "dll", "so", "dylib",
    "a", "o", "class", "jar", "pyc", "wasm", "woff", "woff2", "ttf",
];

pub struct FileWalker {
    root: PathBuf,
    languages: Option<Vec<Language>>,
    ignore_patterns: Vec<String>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            languages: None,
            ignore_patterns: Vec::new(),
        }
    }

    /// Restrict discovery to files of the given languages. Without a filter
    /// every non-binary file is analyzed, so unknown extensions still get
    /// generic style checks.
    pub fn with_languages(mut self, languages: Option<Vec<Language>>) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }
        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(true)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }
        // Stable input order keeps logs and progress readable; report order
        // is enforced later by the aggregator regardless.
        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        // Extensionless files (Makefile, shebang scripts) stay in; they
        // classify as Generic and still get raw-line style checks.
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
                return false;
            }
        }
        if let Some(languages) = &self.languages {
            if !languages.contains(&Language::from_path(path)) {
                return false;
            }
        }
        let path_str = path.to_string_lossy();
        for pattern in &self.ignore_patterns {
            if glob::Pattern::new(pattern)
                .map(|p| p.matches(&path_str))
                .unwrap_or(false)
            {
                return false;
            }
        }
        true
    }
}
