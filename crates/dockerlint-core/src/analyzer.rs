//! Multi-file analysis: Dockerfile discovery and linting.

use crate::catalog::RuleCatalog;
use crate::config::Config;
use crate::engine::Linter;
use crate::types::LintResult;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// File name globs recognized as Dockerfiles.
pub const DOCKERFILE_GLOBS: [&str; 4] = ["Dockerfile", "Dockerfile.*", "*.Dockerfile", "*.dockerfile"];

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum LintError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file or directory to analyze does not exist.
    #[error("{} not found", path.display())]
    NotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    catalog: Option<Arc<RuleCatalog>>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the file or directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the rule catalog.
    #[must_use]
    pub fn catalog(mut self, catalog: Arc<RuleCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclude pattern is not a valid glob or the
    /// current directory cannot be resolved.
    pub fn build(self) -> Result<Analyzer, LintError> {
        let root = self.root.unwrap_or_else(|| PathBuf::from("."));
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let config = self.config.unwrap_or_default();

        // Config excludes carry the defaults unless the file overrides them
        let excludes = self
            .exclude_patterns
            .iter()
            .chain(&config.linter.exclude)
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let catalog = self
            .catalog
            .unwrap_or_else(|| Arc::new(RuleCatalog::empty()));
        let linter = Linter::with_config(catalog, &config);

        Ok(Analyzer {
            root,
            linter,
            excludes,
        })
    }
}

/// Lints one Dockerfile or every Dockerfile under a directory.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    linter: Linter,
    excludes: Vec<glob::Pattern>,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the path being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the linter used for each file.
    #[must_use]
    pub fn linter(&self) -> &Linter {
        &self.linter
    }

    /// Returns the number of rules in the catalog.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.linter.catalog().len()
    }

    /// Analyzes the root and returns per-file reports.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::NotFound`] if the root does not exist, or an
    /// error if discovery or reading fails.
    pub fn analyze(&self) -> Result<LintResult, LintError> {
        if !self.root.exists() {
            return Err(LintError::NotFound {
                path: self.root.clone(),
            });
        }
        info!("Starting analysis at {:?}", self.root);

        let files = if self.root.is_file() {
            vec![self.root.clone()]
        } else {
            self.discover_files()?
        };
        info!("Found {} Dockerfiles to analyze", files.len());

        let mut result = LintResult::new();
        for path in &files {
            result.push(self.linter.lint_file(path)?);
        }

        info!(
            "Analysis complete: {} issues in {} files",
            result.issue_count(),
            result.files_checked
        );
        Ok(result)
    }

    /// Discovers Dockerfiles under the root, sorted by path.
    fn discover_files(&self) -> Result<Vec<PathBuf>, LintError> {
        let mut files = Vec::new();
        for name in DOCKERFILE_GLOBS {
            let pattern = format!("{}/**/{name}", self.root.display());
            for entry in glob::glob(&pattern)? {
                let path = entry.map_err(|e| LintError::Io(e.into()))?;
                if !path.is_file() {
                    continue;
                }
                if self.should_exclude(&path) {
                    debug!("Excluding: {}", path.display());
                    continue;
                }
                files.push(path);
            }
        }
        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Checks a path against the exclude globs, absolute and relative to the root.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.excludes
            .iter()
            .any(|p| p.matches_path(path) || p.matches_path(relative))
    }
}
