mod cli;

use chrono::Utc;
use clap::Parser;
use reportcard::analyze::Linter;
use reportcard::config;
use reportcard::error::Result;
use reportcard::pipeline::Pipeline;
use reportcard::report::{self, OutputFormat};
use reportcard::results::ResultStore;
use reportcard::store;
use reportcard::types::config::ReportcardConfig;
use reportcard::types::repo::RepoIdentity;
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn output_format(format: cli::ReportFormat) -> OutputFormat {
    match format {
        cli::ReportFormat::Json => OutputFormat::Json,
        cli::ReportFormat::Md => OutputFormat::Md,
    }
}

fn open_results(config: &ReportcardConfig, root: &Path) -> Result<ResultStore> {
    Ok(ResultStore::new(store::open(&config.storage, root)?))
}

fn run() -> Result<i32> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let loaded = config::load_config(&cli.root, cli.config.as_deref())?;
    match cli.command {
        cli::Commands::Check(cmd) => {
            let mut identity = RepoIdentity::parse(&cmd.repo);
            if identity.branch.is_empty() {
                identity.branch = cmd.branch;
            }

            let pipeline = Pipeline::from_config(&loaded, &cli.root)?;
            let outcome = pipeline.process(&identity, cmd.refresh);
            pipeline.store().close()?;
            let result = outcome?;

            let rendered = report::render_result(&result, output_format(cmd.format), Utc::now())?;
            println!("{rendered}");

            if result.scores.iter().any(|score| score.error.is_some()) {
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Lint(cmd) => {
            let checks = Linter::from_config(&loaded).run(&cmd.path)?;
            let rendered =
                report::render_checks(&checks, output_format(cmd.format), cmd.verbose_files)?;
            println!("{rendered}");

            if checks.scores.iter().any(|score| score.error.is_some()) {
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Leaderboard(cmd) => {
            let results = open_results(&loaded, &cli.root)?;
            let entries = results.get_leaderboard()?;
            results.close()?;
            println!("{}", report::render_leaderboard(&entries, output_format(cmd.format))?);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Recent(cmd) => {
            let results = open_results(&loaded, &cli.root)?;
            let entries = results.get_recently_viewed()?;
            results.close()?;
            println!(
                "{}",
                report::render_recent(&entries, output_format(cmd.format), Utc::now())?
            );
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Stats(cmd) => {
            let results = open_results(&loaded, &cli.root)?;
            let total = results.get_repo_counter()?;
            results.close()?;
            println!("{}", report::render_stats(total, output_format(cmd.format))?);
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
