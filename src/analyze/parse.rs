use crate::error::Result;
use crate::types::report::{FileSummary, LintError};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct ToolReport {
    #[serde(rename = "Issues", default)]
    issues: Option<Vec<ToolIssue>>,
}

#[derive(Debug, Deserialize)]
struct ToolIssue {
    #[serde(rename = "Text")]
    text: String,
    #[serde(rename = "Pos")]
    pos: ToolPosition,
}

#[derive(Debug, Deserialize)]
struct ToolPosition {
    #[serde(rename = "Filename")]
    filename: String,
    #[serde(rename = "Line", default)]
    line: u32,
}

/// Parses the tool's JSON report into per-file summaries, in first-seen file
/// order. Empty output means no issues.
pub fn parse_report(stdout: &str) -> Result<Vec<FileSummary>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let report: ToolReport = serde_json::from_str(trimmed)?;

    let mut summaries: Vec<FileSummary> = Vec::new();
    for issue in report.issues.unwrap_or_default() {
        let error = LintError {
            line_number: issue.pos.line,
            message: issue.text,
        };
        match summaries
            .iter_mut()
            .find(|summary| summary.filename == issue.pos.filename)
        {
            Some(summary) => summary.add_error(error),
            None => {
                let mut summary = FileSummary::new(issue.pos.filename);
                summary.add_error(error);
                summaries.push(summary);
            }
        }
    }
    Ok(summaries)
}

/// Share of eligible files without any reported issue, on a 0-100 scale.
/// Reports for files outside `files` (vendored, generated, absolute paths
/// elsewhere) do not count against the score.
pub fn passing_percentage(dir: &Path, files: &[PathBuf], summaries: &[FileSummary]) -> f64 {
    if files.is_empty() {
        return 0.0;
    }
    let eligible = files
        .iter()
        .map(|file| normalize(dir, file))
        .collect::<HashSet<_>>();
    let failing = summaries
        .iter()
        .map(|summary| normalize(dir, Path::new(&summary.filename)))
        .filter(|file| eligible.contains(file))
        .collect::<HashSet<_>>()
        .len();
    (eligible.len() - failing) as f64 / eligible.len() as f64 * 100.0
}

fn normalize(dir: &Path, file: &Path) -> PathBuf {
    let relative = file.strip_prefix(dir).unwrap_or(file);
    relative
        .components()
        .filter(|component| !matches!(component, std::path::Component::CurDir))
        .collect()
}
