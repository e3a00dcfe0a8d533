pub mod parse;
pub mod registry;
pub mod runner;

use crate::error::{ReportcardError, Result};
use crate::scan::{list_source_files, SkipPolicy};
use crate::types::config::ReportcardConfig;
use crate::types::report::{ChecksResult, Score};
use crate::types::scoring::{grade_from_percentage, weighted_average};
use crossbeam_channel::unbounded;
use registry::CheckDefinition;
use runner::{CheckRunner, ToolRunner};
use std::path::{Path, PathBuf};
use std::thread;

/// Runs every registered check against a working copy and grades the result.
pub struct Linter {
    checks: Vec<CheckDefinition>,
    runner: Box<dyn CheckRunner>,
    policy: SkipPolicy,
}

impl Linter {
    pub fn new(
        checks: Vec<CheckDefinition>,
        runner: Box<dyn CheckRunner>,
        policy: SkipPolicy,
    ) -> Self {
        Self {
            checks,
            runner,
            policy,
        }
    }

    pub fn from_config(config: &ReportcardConfig) -> Self {
        Self::new(
            registry::default_checks(),
            Box::new(ToolRunner::from_config(&config.lint)),
            SkipPolicy::new(
                config.lint.source_extension.clone(),
                config.lint.skip_dirs.clone(),
            ),
        )
    }

    pub fn run(&self, local_dir: &Path) -> Result<ChecksResult> {
        tracing::debug!("lint {}", local_dir.display());
        if !local_dir.is_dir() {
            return Err(ReportcardError::PathNotFound(
                local_dir.display().to_string(),
            ));
        }

        let files = list_source_files(local_dir, &self.policy);
        if files.is_empty() {
            return Err(ReportcardError::NoFiles(local_dir.display().to_string()));
        }

        let mut scores = self.run_checks(local_dir, &files);
        let average = weighted_average(
            scores
                .iter()
                .map(|score| (score.percentage, score.weight)),
        );
        let issues = scores.iter().map(Score::issue_count).sum();
        scores.sort_by(|a, b| b.weight.total_cmp(&a.weight));

        Ok(ChecksResult {
            scores,
            average,
            grade: grade_from_percentage(average * 100.0),
            files: files.len(),
            issues,
        })
    }

    /// One thread per check; blocks until every check has reported. Completion
    /// order is arbitrary and nothing is cancelled.
    fn run_checks(&self, dir: &Path, files: &[PathBuf]) -> Vec<Score> {
        let expected = self.checks.len();
        let (tx, rx) = unbounded::<Score>();
        let runner = self.runner.as_ref();

        thread::scope(|scope| {
            for check in &self.checks {
                let tx = tx.clone();
                scope.spawn(move || {
                    let score = execute_check(runner, check, dir, files);
                    // receiver outlives every worker inside the scope
                    let _ = tx.send(score);
                });
            }
            drop(tx);

            let mut scores = Vec::with_capacity(expected);
            while scores.len() < expected {
                match rx.recv() {
                    Ok(score) => scores.push(score),
                    Err(_) => break,
                }
            }
            scores
        })
    }
}

fn execute_check(
    runner: &dyn CheckRunner,
    check: &CheckDefinition,
    dir: &Path,
    files: &[PathBuf],
) -> Score {
    let (percentage, file_summaries, error) = match runner.run(check, dir, files) {
        Ok(outcome) => (outcome.percentage, outcome.file_summaries, None),
        Err(e) => {
            tracing::error!("check {} failed: {}", check.name, e);
            (0.0, Vec::new(), Some(e.to_string()))
        }
    };
    Score {
        name: check.name.to_string(),
        description: check.description.to_string(),
        weight: check.weight,
        percentage,
        file_summaries,
        error,
    }
}
