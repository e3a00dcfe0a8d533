use crate::types::repo::RepoIdentity;
use crate::types::scoring::{grade_from_percentage, Grade};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One reported issue: line number and message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintError {
    pub line_number: u32,
    #[serde(rename = "error_string")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    pub filename: String,
    #[serde(default)]
    pub file_url: String,
    #[serde(default)]
    pub errors: Vec<LintError>,
}

impl FileSummary {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            file_url: String::new(),
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: LintError) {
        self.errors.push(error);
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub name: String,
    pub description: String,
    pub weight: f64,
    pub percentage: f64,
    #[serde(default)]
    pub file_summaries: Vec<FileSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Score {
    pub fn issue_count(&self) -> usize {
        self.file_summaries
            .iter()
            .map(|summary| summary.errors.len())
            .sum()
    }
}

/// Aggregate of one lint pass over a working copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecksResult {
    pub scores: Vec<Score>,
    pub average: f64,
    pub grade: Grade,
    pub files: usize,
    pub issues: usize,
}

impl ChecksResult {
    /// Fills every summary's `file_url` using `link`; `None` leaves it empty.
    pub fn link_files<F>(&mut self, link: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for summary in self
            .scores
            .iter_mut()
            .flat_map(|score| score.file_summaries.iter_mut())
        {
            summary.file_url = link(&summary.filename).unwrap_or_default();
        }
    }
}

/// The cached artifact for one repository identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintResult {
    #[serde(rename = "checks")]
    pub scores: Vec<Score>,
    pub average: f64,
    pub grade: Grade,
    pub files: usize,
    pub issues: usize,
    pub repo: String,
    pub branch: String,
    pub last_refresh: DateTime<Utc>,
}

impl LintResult {
    pub fn from_checks(
        identity: &RepoIdentity,
        checks: ChecksResult,
        last_refresh: DateTime<Utc>,
    ) -> Self {
        Self {
            scores: checks.scores,
            average: checks.average,
            grade: checks.grade,
            files: checks.files,
            issues: checks.issues,
            repo: identity.repo_path.clone(),
            branch: identity.branch.clone(),
            last_refresh,
        }
    }

    pub fn identity(&self) -> RepoIdentity {
        RepoIdentity::new(self.repo.clone(), self.branch.clone())
    }

    /// Score on the 0-100 scale used by the leaderboard.
    pub fn score(&self) -> f64 {
        self.average * 100.0
    }

    pub fn regrade(&mut self) {
        self.grade = grade_from_percentage(self.score());
    }

    pub fn formatted_last_refresh(&self) -> String {
        self.last_refresh
            .format("%a %b %e %H:%M:%S UTC %Y")
            .to_string()
    }

    pub fn humanized_last_refresh(&self, now: DateTime<Utc>) -> String {
        humanize_since(self.last_refresh, now)
    }
}

pub fn humanize_since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(then).num_seconds().max(0);
    let (amount, unit) = match seconds {
        0..=59 => return "just now".to_string(),
        60..=3_599 => (seconds / 60, "minute"),
        3_600..=86_399 => (seconds / 3_600, "hour"),
        86_400..=2_591_999 => (seconds / 86_400, "day"),
        2_592_000..=31_535_999 => (seconds / 2_592_000, "month"),
        _ => (seconds / 31_536_000, "year"),
    };
    if amount == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{amount} {unit}s ago")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub repo: String,
    pub branch: String,
    pub score: f64,
    pub files: usize,
}

impl LeaderboardEntry {
    pub fn identity(&self) -> RepoIdentity {
        RepoIdentity::new(self.repo.clone(), self.branch.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentEntry {
    pub repo: String,
    pub branch: String,
    pub grade: Grade,
    pub score: f64,
    pub last_generated: DateTime<Utc>,
}

impl RecentEntry {
    pub fn identity(&self) -> RepoIdentity {
        RepoIdentity::new(self.repo.clone(), self.branch.clone())
    }
}
