//! Install-command pin rewriting.

use regex::Regex;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::catalog::{PackageCatalog, PinCatalogError};
use crate::distro::Distro;
use crate::version::VersionMatch;
use dockerlint_core::instruction;

/// Marker appended to a block whose pins were changed.
pub const PIN_MARKER: &str = "Pins modified by post-processor for compatibility";

/// A `name=version` pin. The package must start at the line start, after
/// whitespace or after a shell operator or quote, and must begin with a
/// lowercase letter or digit, so `DEBIAN_FRONTEND=...` and `--opt=...` never
/// match. The version stops at the first character a version cannot hold,
/// which lets pins glued to `\`, `&&` or `;` be found.
const PIN_PATTERN: &str = r#"(?:^|[\s;&|('"])(?P<package>[a-z0-9][a-z0-9.+_-]*(?::[a-z0-9-]+)?)=(?P<version>[A-Za-z0-9.:+~_-]+)"#;

/// Package manager commands and the sub-command that installs packages.
const INSTALL_COMMANDS: [(&str, &str); 3] =
    [("apt-get", "install"), ("apt", "install"), ("apk", "add")];

/// One pin that was generalized or stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinChange {
    /// 1-based line of the pin.
    pub line: usize,
    /// Package name.
    pub package: String,
    /// Version that was removed.
    pub version: String,
    /// Why it was removed.
    pub kind: VersionMatch,
}

/// Result of validating one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinRewrite {
    /// Rewritten text. Identical to the input when `modified` is false.
    pub rewritten_text: String,
    /// Whether any pin was changed.
    pub modified: bool,
    /// Detected distro family.
    #[serde(serialize_with = "serialize_distro")]
    pub distro: Distro,
    /// Every changed pin in document order.
    pub changes: Vec<PinChange>,
}

fn serialize_distro<S: serde::Serializer>(
    distro: &Distro,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(distro.key())
}

/// Rewrites version pins in install commands against a [`PackageCatalog`].
#[derive(Debug, Clone)]
pub struct PinValidator {
    catalog: Arc<PackageCatalog>,
    pin_pattern: Regex,
}

/// A physical line split from its terminator.
struct Segment<'a> {
    body: &'a str,
    ending: &'a str,
}

impl<'a> Segment<'a> {
    fn split(text: &'a str) -> Vec<Self> {
        text.split_inclusive('\n')
            .map(|line| {
                let body = line.trim_end_matches(['\n', '\r']);
                Segment {
                    body,
                    ending: &line[body.len()..],
                }
            })
            .collect()
    }
}

impl PinValidator {
    /// Creates a validator over a shared catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the pin pattern fails to compile.
    pub fn new(catalog: Arc<PackageCatalog>) -> Result<Self, PinCatalogError> {
        Ok(Self {
            catalog,
            pin_pattern: Regex::new(PIN_PATTERN)?,
        })
    }

    /// The catalog pins are checked against.
    #[must_use]
    pub fn catalog(&self) -> &PackageCatalog {
        &self.catalog
    }

    /// Validates every install block in `content`.
    #[must_use]
    pub fn validate(&self, content: &str) -> PinRewrite {
        let distro = Distro::detect(content);
        debug!(%distro, "Validating package pins");

        let segments = Segment::split(content);
        let mut output = String::with_capacity(content.len());
        let mut changes = Vec::new();
        let mut index = 0;

        while index < segments.len() {
            if !instruction::starts_with_keyword(segments[index].body, "RUN") {
                push(&mut output, segments[index].body, segments[index].ending);
                index += 1;
                continue;
            }

            let mut end = index;
            while end + 1 < segments.len() && instruction::continues(segments[end].body) {
                end += 1;
            }
            let block = &segments[index..=end];
            if is_install_block(block.iter().map(|s| s.body)) {
                let before = changes.len();
                let mut bodies: Vec<String> = block
                    .iter()
                    .enumerate()
                    .map(|(offset, segment)| {
                        self.rewrite_line(segment.body, index + offset + 1, distro, &mut changes)
                    })
                    .collect();
                if changes.len() > before {
                    if let Some(last) = bodies.last_mut() {
                        *last = with_marker(last);
                    }
                }
                for (body, segment) in bodies.iter().zip(block) {
                    push(&mut output, body, segment.ending);
                }
            } else {
                for segment in block {
                    push(&mut output, segment.body, segment.ending);
                }
            }
            index = end + 1;
        }

        let modified = !changes.is_empty();
        PinRewrite {
            rewritten_text: if modified { output } else { content.to_string() },
            modified,
            distro,
            changes,
        }
    }

    /// Rewrites pins in one line, stopping at a `#` comment.
    fn rewrite_line(
        &self,
        body: &str,
        line: usize,
        distro: Distro,
        changes: &mut Vec<PinChange>,
    ) -> String {
        let code = &body[..comment_start(body)];
        let mut result = String::with_capacity(body.len());
        let mut cursor = 0;
        for captures in self.pin_pattern.captures_iter(code) {
            let (Some(package), Some(version)) = (captures.name("package"), captures.name("version"))
            else {
                continue;
            };
            let kind = self
                .catalog
                .classify(distro, package.as_str(), version.as_str());
            if kind.keeps_pin() {
                continue;
            }
            debug!(line, package = package.as_str(), version = version.as_str(), %kind, "Removing pin");
            result.push_str(&body[cursor..package.end()]);
            cursor = version.end();
            changes.push(PinChange {
                line,
                package: package.as_str().to_string(),
                version: version.as_str().to_string(),
                kind,
            });
        }
        result.push_str(&body[cursor..]);
        result
    }
}

/// Returns true if the block invokes a package manager install, e.g.
/// `apt-get -y install` or `apk --no-cache add`, possibly across lines.
fn is_install_block<'a>(lines: impl Iterator<Item = &'a str>) -> bool {
    let words: Vec<&str> = lines
        .flat_map(|line| line.split(|c: char| !(c.is_ascii_alphanumeric() || "-_".contains(c))))
        .filter(|w| !w.is_empty())
        .collect();
    INSTALL_COMMANDS.iter().any(|(command, sub)| {
        words
            .iter()
            .position(|w| w.eq_ignore_ascii_case(command))
            .is_some_and(|at| words[at + 1..].iter().any(|w| w.eq_ignore_ascii_case(sub)))
    })
}

fn push(output: &mut String, body: &str, ending: &str) {
    output.push_str(body);
    output.push_str(ending);
}

/// Byte offset of a `#` comment: a `#` at the line start or after whitespace.
fn comment_start(body: &str) -> usize {
    body.char_indices()
        .find(|&(at, c)| {
            c == '#' && body[..at].chars().next_back().map_or(true, char::is_whitespace)
        })
        .map_or(body.len(), |(at, _)| at)
}

/// Appends the marker to the last line of a changed block, or merges it
/// into an existing ` # ` comment. Never adds it twice.
fn with_marker(body: &str) -> String {
    if let Some(at) = body.find(" # ") {
        let main = body[..at].trim_end();
        let existing = &body[at + 3..];
        if existing.contains(PIN_MARKER) {
            return body.to_string();
        }
        format!("{main} # {existing}; {PIN_MARKER}")
    } else if body.contains(PIN_MARKER) {
        body.to_string()
    } else {
        format!("{} # {PIN_MARKER}", body.trim_end())
    }
}
