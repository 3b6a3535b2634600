//! Distro family detection from the base image.

use dockerlint_core::instruction;
use std::fmt;

/// Package ecosystem family of a base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Distro {
    /// Alpine Linux (`apk`).
    Alpine,
    /// Ubuntu (`apt`).
    Ubuntu,
    /// Debian (`apt`). The fallback family.
    #[default]
    Debian,
}

impl Distro {
    /// Families in detection priority order.
    pub const PRIORITY: [Self; 3] = [Self::Alpine, Self::Ubuntu, Self::Debian];

    /// Catalog key for this family.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Alpine => "alpine",
            Self::Ubuntu => "ubuntu",
            Self::Debian => "debian",
        }
    }

    /// Classifies an image reference by case-insensitive substring.
    #[must_use]
    pub fn from_image(image: &str) -> Option<Self> {
        let image = image.to_ascii_lowercase();
        Self::PRIORITY
            .into_iter()
            .find(|distro| image.contains(distro.key()))
    }

    /// Detects the family from the first `FROM` line of `content`.
    ///
    /// Defaults to [`Distro::Debian`] when there is no `FROM` line or its
    /// image names no known family.
    #[must_use]
    pub fn detect(content: &str) -> Self {
        content
            .lines()
            .find(|line| instruction::starts_with_keyword(line, "FROM"))
            .and_then(instruction::parse_from)
            .and_then(|from| Self::from_image(from.image))
            .unwrap_or_default()
    }
}

impl fmt::Display for Distro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
