use crate::types::report::{humanize_since, ChecksResult, LeaderboardEntry, LintResult, RecentEntry, Score};
use chrono::{DateTime, Utc};

pub fn result_to_markdown(result: &LintResult, now: DateTime<Utc>) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {} ({})\n\n", result.repo, result.branch));
    output.push_str(&format!(
        "Grade: {} ({:.1}%)\n\n",
        result.grade,
        result.score()
    ));
    output.push_str(&format!(
        "Files: {}  Issues: {}\n\n",
        result.files, result.issues
    ));
    output.push_str(&format!(
        "Last refresh: {} ({})\n\n",
        result.formatted_last_refresh(),
        result.humanized_last_refresh(now)
    ));
    push_scores(&mut output, &result.scores, false);
    output
}

pub fn checks_to_markdown(checks: &ChecksResult, verbose_files: bool) -> String {
    let mut output = String::new();
    output.push_str("# Report Card\n\n");
    output.push_str(&format!(
        "Grade: {} ({:.1}%)\n\n",
        checks.grade,
        checks.average * 100.0
    ));
    output.push_str(&format!(
        "Files: {}  Issues: {}\n\n",
        checks.files, checks.issues
    ));
    push_scores(&mut output, &checks.scores, verbose_files);
    output
}

fn push_scores(output: &mut String, scores: &[Score], verbose_files: bool) {
    output.push_str("## Checks\n\n");
    for score in scores {
        output.push_str(&format!(
            "- {}: {:.0}% (weight {:.2}) {}\n",
            score.name, score.percentage, score.weight, score.description
        ));
        if let Some(error) = &score.error {
            output.push_str(&format!("  - error: {error}\n"));
        }
        for summary in &score.file_summaries {
            let label = if summary.file_url.is_empty() {
                summary.filename.clone()
            } else {
                format!("[{}]({})", summary.filename, summary.file_url)
            };
            if verbose_files {
                for error in &summary.errors {
                    output.push_str(&format!(
                        "  - {}:{} {}\n",
                        label, error.line_number, error.message
                    ));
                }
            } else {
                output.push_str(&format!("  - {} ({})\n", label, summary.errors.len()));
            }
        }
    }
}

pub fn leaderboard_to_markdown(entries: &[LeaderboardEntry]) -> String {
    let mut output = String::from("# Leaderboard\n\n");
    if entries.is_empty() {
        output.push_str("- none\n");
        return output;
    }
    output.push_str("| # | Repository | Branch | Score | Files |\n");
    output.push_str("|---|---|---|---|---|\n");
    for (rank, entry) in entries.iter().enumerate() {
        output.push_str(&format!(
            "| {} | {} | {} | {:.1} | {} |\n",
            rank + 1,
            entry.repo,
            entry.branch,
            entry.score,
            entry.files
        ));
    }
    output
}

pub fn recent_to_markdown(entries: &[RecentEntry], now: DateTime<Utc>) -> String {
    let mut output = String::from("# Recently Viewed\n\n");
    if entries.is_empty() {
        output.push_str("- none\n");
        return output;
    }
    for entry in entries {
        output.push_str(&format!(
            "- {} ({}): {} {:.1}%, {}\n",
            entry.repo,
            entry.branch,
            entry.grade,
            entry.score,
            humanize_since(entry.last_generated, now)
        ));
    }
    output
}
