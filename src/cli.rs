use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "reportcard",
    version,
    about = "Grade repositories with weighted static-analysis checks"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Config file used instead of <root>/reportcard.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the config, result store and checkouts
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download, grade and cache a remote repository
    Check(CheckCommand),
    /// Grade a local directory without touching the cache
    Lint(LintCommand),
    /// Show the highest scoring repositories
    Leaderboard(ListCommand),
    /// Show recently graded repositories
    Recent(ListCommand),
    /// Show how many distinct repositories were graded
    Stats(ListCommand),
}

#[derive(Args)]
pub struct CheckCommand {
    /// host/owner/name, optionally suffixed with @branch
    pub repo: String,
    #[arg(long, default_value = "master")]
    pub branch: String,
    /// Recompute even when a cached result exists
    #[arg(long)]
    pub refresh: bool,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct LintCommand {
    pub path: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// List every flagged line
    #[arg(long)]
    pub verbose_files: bool,
}

#[derive(Args)]
pub struct ListCommand {
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
