//! Output rendering for check and fix runs.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-rule verdicts and diagnostics plus a top-level summary.

use crate::runner::RunReport;
use crate::rules::Verdict;
use owo_colors::OwoColorize;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Prefix for fatal usage/config errors on stderr.
pub fn error_prefix() -> String {
    if std::env::var_os("NO_COLOR").is_none() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

/// Prefix for friendly notes on stderr.
pub fn note_prefix() -> String {
    if std::env::var_os("NO_COLOR").is_none() {
        "note:".blue().bold().to_string()
    } else {
        "note:".to_string()
    }
}

/// Print a run report in the requested format.
pub fn print_report(report: &RunReport, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_report_json(report)).unwrap()
        ),
        _ => {
            let color = use_colors(output);
            for entry in &report.rules {
                let icon = match entry.verdict {
                    Verdict::Passed => "✔",
                    Verdict::Fixed => "✏",
                    Verdict::Failed => "✖",
                    Verdict::Skipped => "⏭",
                };
                let tag = format!("⟦{}⟧", entry.verdict);
                let line = if color {
                    let tag = match entry.verdict {
                        Verdict::Passed => tag.green().bold().to_string(),
                        Verdict::Fixed => tag.cyan().bold().to_string(),
                        Verdict::Failed => tag.red().bold().to_string(),
                        Verdict::Skipped => tag.yellow().bold().to_string(),
                    };
                    format!("{} {} {}", icon, tag, entry.rule.clone().bold())
                } else {
                    format!("{} {} {}", icon, tag, entry.rule)
                };
                println!("{}", line);
                for diag in &entry.lines {
                    println!("    {}", diag);
                }
            }
            let summary = format!(
                "— Summary — passed={} fixed={} failed={} skipped={}",
                report.summary.passed,
                report.summary.fixed,
                report.summary.failed,
                report.summary.skipped
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Compose report JSON (pure) for testing/snapshot purposes.
pub fn compose_report_json(report: &RunReport) -> JsonVal {
    // Directly serialize RunReport as JSON, keeping stable shape
    serde_json::to_value(report).unwrap()
}
