//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "repotidy",
    version,
    about = "Check and fix repository conformance",
    long_about = "repotidy — validate a project's file layout, file headers, and top-level artifacts against the beman tree standard, and optionally auto-correct violations.\n\nConfiguration precedence: CLI > repotidy.toml > defaults.",
    after_help = "Examples:\n  repotidy check\n  repotidy check --rules file.copyright,directory.tests\n  repotidy fix --repo-root ../exemplar\n  repotidy check --output json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands for checking and fixing.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current repotidy version.")]
    Version,
    /// Run conformance checks without modifying the repository
    #[command(
        about = "Run conformance checks",
        long_about = "Run all (or selected) rules in read-only mode. Exits 1 when any run rule fails.",
        after_help = "Examples:\n  repotidy check\n  repotidy check --rules toplevel.license --output json"
    )]
    Check {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Comma-separated rule names to run (default: all)")]
        rules: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Suppress per-rule diagnostics")]
        quiet: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Emit verbose diagnostics")]
        verbose: bool,
    },
    /// Check, then repair what can be repaired
    #[command(
        about = "Check and auto-fix violations",
        long_about = "Run all (or selected) rules and invoke each failing rule's fix. Irreparable violations are reported with guidance and keep the exit code non-zero.",
        after_help = "Examples:\n  repotidy fix\n  repotidy fix --rules file.copyright"
    )]
    Fix {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Comma-separated rule names to run (default: all)")]
        rules: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Suppress per-rule diagnostics")]
        quiet: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Emit verbose diagnostics")]
        verbose: bool,
    },
    /// List registered rules
    #[command(
        about = "List rules",
        long_about = "Print the name of every registered rule, one per line."
    )]
    Rules,
}
