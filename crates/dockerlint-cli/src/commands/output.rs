//! Shared output formatting for lint results.

use anyhow::Result;
use dockerlint_core::{FileReport, IssueDiagnostic, LintResult, Severity, SeverityCounts};
use miette::GraphicalReportHandler;
use serde::Serialize;

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => return print_pretty(result),
    }
    Ok(())
}

fn severity_indicator(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "\x1b[1;31mCRITICAL\x1b[0m",
        Severity::High => "\x1b[31mHIGH\x1b[0m",
        Severity::Medium => "\x1b[33mMEDIUM\x1b[0m",
        Severity::Low => "\x1b[34mLOW\x1b[0m",
    }
}

fn print_text(result: &LintResult) {
    for report in &result.files {
        if report.issues.is_empty() {
            continue;
        }
        println!("{}", report.path.display());
        for (severity, issues) in report.grouped_by_severity() {
            println!("  {} ({})", severity_indicator(severity), issues.len());
            for issue in issues {
                for line in issue.format().lines() {
                    println!("    {line}");
                }
            }
        }
        println!();
    }
    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let counts = result.count_by_severity();
    let summary_color = if counts.critical > 0 || counts.high > 0 {
        "\x1b[31m"
    } else if counts.medium > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} critical, {} high, {} medium, {} low issue(s) in {} file(s)\x1b[0m",
        summary_color,
        counts.critical,
        counts.high,
        counts.medium,
        counts.low,
        result.files_checked
    );
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: &'a [FileReport],
    files_checked: usize,
    summary: SeverityCounts,
}

fn print_json(result: &LintResult) -> Result<()> {
    let report = JsonReport {
        files: &result.files,
        files_checked: result.files_checked,
        summary: result.count_by_severity(),
    };
    let json = serde_json::to_string_pretty(&report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for report in &result.files {
        for issue in &report.issues {
            println!(
                "{}:{}: {} [{}] {}",
                report.path.display(),
                issue.line_number,
                issue.severity(),
                issue.rule.id(),
                issue.rule.title(),
            );
        }
    }
}

fn print_pretty(result: &LintResult) -> Result<()> {
    let handler = GraphicalReportHandler::new();
    for report in &result.files {
        let file_name = report.path.display().to_string();
        for issue in &report.issues {
            let diagnostic = IssueDiagnostic::new(issue, &file_name, &report.content);
            let mut rendered = String::new();
            handler.render_report(&mut rendered, &diagnostic)?;
            println!("{rendered}");
        }
    }
    print_summary(result);
    Ok(())
}
