//! repotidy CLI binary entry point.
//! Delegates to the library for rule execution and prints results.

use clap::Parser;
use repotidy::cli::{Cli, Commands};
use repotidy::config;
use repotidy::context::RepoContext;
use repotidy::output;
use repotidy::rules::registry::Registry;
use repotidy::rules::LogConfig;
use repotidy::runner::{self, Mode};

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Check {
            repo_root,
            rules,
            output,
            quiet,
            verbose,
        } => run_command(
            Mode::Check,
            repo_root.as_deref(),
            rules.as_deref(),
            output.as_deref(),
            quiet,
            verbose,
        ),
        Commands::Fix {
            repo_root,
            rules,
            output,
            quiet,
            verbose,
        } => run_command(
            Mode::Fix,
            repo_root.as_deref(),
            rules.as_deref(),
            output.as_deref(),
            quiet,
            verbose,
        ),
        Commands::Rules => {
            for name in Registry::builtin().names() {
                println!("{}", name);
            }
        }
    }
}

fn run_command(
    mode: Mode,
    repo_root: Option<&str>,
    rules: Option<&str>,
    output: Option<&str>,
    quiet: bool,
    verbose: bool,
) {
    let eff = config::resolve_effective(
        repo_root,
        output,
        if quiet { Some(true) } else { None },
        if verbose { Some(true) } else { None },
    );
    // Friendly note if no repotidy config was found
    if eff.output != "json" && config::load_config(&eff.repo_root).is_none() {
        eprintln!(
            "{} {}",
            output::note_prefix(),
            "No repotidy.toml found; using defaults."
        );
    }

    let selection: Option<Vec<String>> = rules.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    });

    let repo = RepoContext::discover(&eff.repo_root);
    let registry = Registry::builtin();
    let log = LogConfig {
        enabled: !eff.quiet,
        verbose: eff.verbose,
    };

    let report = match runner::run(
        &repo,
        &eff.settings,
        &registry,
        selection.as_deref(),
        log,
        mode,
    ) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} {}", output::error_prefix(), e);
            std::process::exit(2);
        }
    };

    output::print_report(&report, &eff.output);
    if !report.passed() {
        std::process::exit(1);
    }
}
