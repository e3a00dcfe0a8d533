pub mod json;
pub mod md;

use crate::error::Result;
use crate::types::report::{ChecksResult, LeaderboardEntry, LintResult, RecentEntry};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render_result(result: &LintResult, format: OutputFormat, now: DateTime<Utc>) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(json::result_to_json(result, now)?),
        OutputFormat::Md => Ok(md::result_to_markdown(result, now)),
    }
}

/// `verbose_files` lists every flagged line instead of per-file counts.
pub fn render_checks(checks: &ChecksResult, format: OutputFormat, verbose_files: bool) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(json::to_json(checks)?),
        OutputFormat::Md => Ok(md::checks_to_markdown(checks, verbose_files)),
    }
}

pub fn render_leaderboard(entries: &[LeaderboardEntry], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(json::to_json(entries)?),
        OutputFormat::Md => Ok(md::leaderboard_to_markdown(entries)),
    }
}

pub fn render_recent(entries: &[RecentEntry], format: OutputFormat, now: DateTime<Utc>) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(json::to_json(entries)?),
        OutputFormat::Md => Ok(md::recent_to_markdown(entries, now)),
    }
}

pub fn render_stats(total_repos: u64, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(json::stats_to_json(total_repos)?),
        OutputFormat::Md => Ok(format!("Repositories graded: {total_repos}\n")),
    }
}
