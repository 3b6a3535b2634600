//! Integration test: catalog file → PinValidator → rewritten Dockerfile.

use dockerlint_pins::{Distro, PackageCatalog, PinValidator, VersionMatch, PIN_MARKER};
use std::sync::Arc;

fn validator(yaml: &str) -> PinValidator {
    PinValidator::new(Arc::new(
        PackageCatalog::from_yaml(yaml).expect("fixture catalog should parse"),
    ))
    .expect("pin pattern compiles")
}

const WILDCARD_CURL: &str = "debian:\n  curl:\n    versions: [\"7.1.*\"]\n";
const EXACT_CURL: &str = "debian:\n  curl:\n    versions: [\"7.1.0\"]\n";

#[test]
fn wildcard_match_is_generalized() {
    let result = validator(WILDCARD_CURL)
        .validate("FROM debian:12\nRUN apt-get install -y curl=7.1.0\n");
    assert!(result.modified);
    assert_eq!(
        result.rewritten_text,
        format!("FROM debian:12\nRUN apt-get install -y curl # {PIN_MARKER}\n")
    );
    assert_eq!(result.changes[0].kind, VersionMatch::WildcardPatternMatch);
}

#[test]
fn exact_match_is_kept() {
    let text = "FROM debian:12\nRUN apt-get install -y curl=7.1.0\n";
    let result = validator(EXACT_CURL).validate(text);
    assert!(!result.modified);
    assert_eq!(result.rewritten_text, text);
}

#[test]
fn absent_package_is_stripped() {
    let result = validator(EXACT_CURL)
        .validate("FROM debian:12\nRUN apt-get install -y curl=7.1.0 foo=1.0\n");
    assert!(result.modified);
    assert!(result.rewritten_text.contains("curl=7.1.0 foo #"));
    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.changes[0].package, "foo");
    assert_eq!(result.changes[0].kind, VersionMatch::NoMatch);
}

#[test]
fn distro_selects_catalog_entry() {
    let catalog = "alpine:\n  curl: [\"8.5.0-r0\"]\ndebian:\n  curl: [\"7.88.1\"]\n";
    let alpine = validator(catalog).validate("FROM alpine:3.19\nRUN apk add --no-cache curl=8.5.0-r0\n");
    assert_eq!(alpine.distro, Distro::Alpine);
    assert!(!alpine.modified);

    let unknown = validator(catalog).validate("FROM node:20\nRUN apt-get install -y curl=8.5.0-r0\n");
    assert_eq!(unknown.distro, Distro::Debian);
    assert!(unknown.modified);
}

#[test]
fn names_only_catalog_strips_every_pin() {
    let result = validator("alpine: [curl, git]\n")
        .validate("FROM alpine:3.19\nRUN apk add curl=8.5.0-r0 git=2.43.0-r0\n");
    assert_eq!(result.changes.len(), 2);
    assert!(result.rewritten_text.contains("apk add curl git #"));
}

#[test]
fn content_without_pins_round_trips_byte_identical() {
    let text = "# syntax=docker/dockerfile:1\r\nFROM debian:12\r\n\r\nRUN apt-get update && \\\r\n    apt-get install -y curl\r\nCMD [\"curl\"]";
    let result = validator(WILDCARD_CURL).validate(text);
    assert!(!result.modified);
    assert_eq!(result.rewritten_text, text);
}

#[test]
fn multi_line_block_marks_last_line_and_keeps_line_endings() {
    let text = "FROM debian:12\r\nRUN apt-get update && \\\r\n    apt-get install -y \\\r\n      curl=7.1.0 \\\r\n      ca-certificates\r\nUSER app\r\n";
    let result = validator(WILDCARD_CURL).validate(text);
    assert!(result.modified);
    assert_eq!(
        result.rewritten_text,
        format!(
            "FROM debian:12\r\nRUN apt-get update && \\\r\n    apt-get install -y \\\r\n      curl \\\r\n      ca-certificates # {PIN_MARKER}\r\nUSER app\r\n"
        )
    );
    assert_eq!(result.changes[0].line, 4);
}

#[test]
fn existing_comment_is_merged() {
    let result = validator(WILDCARD_CURL)
        .validate("FROM debian:12\nRUN apt-get install -y curl=7.1.0 # network tools\n");
    assert!(result
        .rewritten_text
        .contains(&format!("curl # network tools; {PIN_MARKER}")));
}

#[test]
fn rerun_on_output_is_unmodified() {
    let v = validator(WILDCARD_CURL);
    let first = v.validate(
        "FROM debian:12\nRUN apt-get install -y curl=7.1.0 # tools\nRUN apk add jq=1.7\n",
    );
    assert!(first.modified);
    let second = v.validate(&first.rewritten_text);
    assert!(!second.modified);
    assert_eq!(second.rewritten_text, first.rewritten_text);
    assert_eq!(second.rewritten_text.matches(PIN_MARKER).count(), 2);
}

#[test]
fn frontend_variable_is_not_a_pin() {
    let text = "FROM debian:12\nRUN DEBIAN_FRONTEND=noninteractive apt-get install -y --no-install-recommends curl=7.1.0\n";
    let result = validator(EXACT_CURL).validate(text);
    assert!(!result.modified);
    assert_eq!(result.rewritten_text, text);
}

#[test]
fn non_install_run_is_untouched() {
    let text = "FROM debian:12\nRUN echo version=1.0 > /etc/build-info\n";
    let result = validator("").validate(text);
    assert!(!result.modified);
    assert_eq!(result.rewritten_text, text);
}

#[test]
fn empty_catalog_strips_all_pins() {
    let result = PinValidator::new(Arc::new(PackageCatalog::empty()))
        .unwrap()
        .validate("FROM ubuntu:22.04\nRUN apt install -y curl=7.81.0-1ubuntu1.15\n");
    assert_eq!(result.distro, Distro::Ubuntu);
    assert_eq!(result.changes.len(), 1);
    assert!(result.rewritten_text.contains("apt install -y curl #"));
}

#[test]
fn glued_pins_are_stripped_with_empty_catalog() {
    let result = validator("").validate(
        "FROM debian:12\nRUN apt-get install -y curl=7.1.0\\\n    git=1:2.39.2&& rm -rf /var/lib/apt/lists/*\n",
    );
    assert!(result.modified);
    assert!(!result.rewritten_text.contains("=7.1.0"));
    assert!(!result.rewritten_text.contains("=1:2.39.2"));
    assert!(result.rewritten_text.contains("    git&& rm -rf"));
}
