//! Per-distro package/version catalog.
//!
//! ```yaml
//! alpine: [curl, git]            # names only: every pin is stripped
//! debian:
//!   curl: ["7.88.1-10+deb12u5"]  # literal versions
//!   git:
//!     versions: ["1:2.39.*"]     # ordered glob patterns
//! ```

use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::distro::Distro;
use crate::version::{VersionMatch, VersionPattern};

/// Errors reading a package catalog or building a validator over it.
#[derive(Debug, thiserror::Error)]
pub enum PinCatalogError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// YAML deserialization failed.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON deserialization failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The pin discovery pattern failed to compile.
    #[error("pin pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DistroEntryDto {
    Names(Vec<String>),
    Packages(BTreeMap<String, PackageSpecDto>),
    Unrecognized(IgnoredAny),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PackageSpecDto {
    Exact(Vec<String>),
    Patterns { versions: Vec<String> },
    Unrecognized(IgnoredAny),
}

/// Catalog entry for one distro family.
#[derive(Debug, Clone)]
pub enum DistroPackages {
    /// Package names without version data.
    NamesOnly(BTreeSet<String>),
    /// Version data per package.
    Versioned(BTreeMap<String, PackageVersions>),
    /// Any other shape.
    Unrecognized,
}

/// Allowed versions of one package.
#[derive(Debug, Clone)]
pub enum PackageVersions {
    /// Literal version strings.
    Exact(Vec<String>),
    /// Ordered patterns; the first that accepts a version decides.
    Patterns(Vec<VersionPattern>),
    /// Any other shape.
    Unrecognized,
}

impl From<DistroEntryDto> for DistroPackages {
    fn from(dto: DistroEntryDto) -> Self {
        match dto {
            DistroEntryDto::Names(names) => Self::NamesOnly(names.into_iter().collect()),
            DistroEntryDto::Packages(packages) => Self::Versioned(
                packages
                    .into_iter()
                    .map(|(name, spec)| (name, PackageVersions::from(spec)))
                    .collect(),
            ),
            DistroEntryDto::Unrecognized(_) => Self::Unrecognized,
        }
    }
}

impl From<PackageSpecDto> for PackageVersions {
    fn from(dto: PackageSpecDto) -> Self {
        match dto {
            PackageSpecDto::Exact(versions) => Self::Exact(versions),
            PackageSpecDto::Patterns { versions } => {
                Self::Patterns(versions.into_iter().map(VersionPattern::new).collect())
            }
            PackageSpecDto::Unrecognized(_) => Self::Unrecognized,
        }
    }
}

/// Immutable package catalog keyed by distro family name.
#[derive(Debug, Clone, Default)]
pub struct PackageCatalog {
    distros: BTreeMap<String, DistroPackages>,
}

impl PackageCatalog {
    /// Creates an empty catalog. Every pin classifies as [`VersionMatch::NoMatch`].
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a mapping.
    pub fn from_yaml(content: &str) -> Result<Self, PinCatalogError> {
        // An empty YAML document is null
        if content.trim().is_empty() {
            return Ok(Self::empty());
        }
        let raw: BTreeMap<String, DistroEntryDto> = serde_yaml::from_str(content)?;
        Ok(Self::from_raw(raw))
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not an object.
    pub fn from_json(content: &str) -> Result<Self, PinCatalogError> {
        let raw: BTreeMap<String, DistroEntryDto> = serde_json::from_str(content)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: BTreeMap<String, DistroEntryDto>) -> Self {
        let distros = raw
            .into_iter()
            .map(|(distro, entry)| {
                let entry = DistroPackages::from(entry);
                if matches!(entry, DistroPackages::Unrecognized) {
                    warn!("Package catalog entry for `{distro}` has an unrecognized shape");
                }
                (distro.to_ascii_lowercase(), entry)
            })
            .collect();
        Self { distros }
    }

    /// Reads a catalog file (`.json` as JSON, anything else as YAML).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn try_load(path: &Path) -> Result<Self, PinCatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| PinCatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Reads a catalog file, degrading to an empty catalog on failure.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(catalog) => {
                debug!(path = %path.display(), distros = catalog.distros.len(), "Loaded package catalog");
                catalog
            }
            Err(e) => {
                warn!("Package catalog {} unavailable: {e}", path.display());
                Self::empty()
            }
        }
    }

    /// Entry for a distro family.
    #[must_use]
    pub fn distro(&self, distro: Distro) -> Option<&DistroPackages> {
        self.distros.get(distro.key())
    }

    /// Returns true if the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distros.is_empty()
    }

    /// Classifies `package=version` for `distro`.
    #[must_use]
    pub fn classify(&self, distro: Distro, package: &str, version: &str) -> VersionMatch {
        let Some(DistroPackages::Versioned(packages)) = self.distro(distro) else {
            return VersionMatch::NoMatch;
        };
        match packages.get(package) {
            Some(PackageVersions::Exact(versions)) => {
                if versions.iter().any(|v| v == version) {
                    VersionMatch::ExactStringMatch
                } else {
                    VersionMatch::NoMatch
                }
            }
            Some(PackageVersions::Patterns(patterns)) => patterns
                .iter()
                .find_map(|p| p.classify(version))
                .unwrap_or(VersionMatch::NoMatch),
            Some(PackageVersions::Unrecognized) | None => VersionMatch::NoMatch,
        }
    }
}
