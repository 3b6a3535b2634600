//! # dockerlint-pins
//!
//! Package pin compatibility validation for generated Dockerfiles.
//!
//! Install commands (`apt-get install`, `apt install`, `apk add`) often carry
//! `name=version` pins that only exist for one distro release. The
//! [`PinValidator`] checks each pin against a [`PackageCatalog`] for the
//! distro family of the base image:
//!
//! | Catalog says | Result | Pin |
//! |--------------|--------|-----|
//! | literal version equal to the pin | [`VersionMatch::ExactStringMatch`] | kept |
//! | glob pattern accepts the pin | [`VersionMatch::WildcardPatternMatch`] | `=version` removed |
//! | nothing, or a malformed entry | [`VersionMatch::NoMatch`] | `=version` removed |
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use dockerlint_pins::{PackageCatalog, PinValidator};
//!
//! let catalog = PackageCatalog::from_yaml("debian:\n  curl:\n    versions: [\"7.1.*\"]\n")?;
//! let validator = PinValidator::new(Arc::new(catalog))?;
//! let result = validator.validate("FROM debian:12\nRUN apt-get install -y curl=7.1.0\n");
//! assert!(result.modified);
//! assert!(result.rewritten_text.contains("install -y curl #"));
//! # Ok::<(), dockerlint_pins::PinCatalogError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod distro;
mod rewrite;
mod version;

pub use catalog::{DistroPackages, PackageCatalog, PackageVersions, PinCatalogError};
pub use distro::Distro;
pub use rewrite::{PinChange, PinRewrite, PinValidator, PIN_MARKER};
pub use version::{has_wildcard, VersionMatch, VersionPattern};
