//! Cache-or-compute orchestration for one repository identity.

use crate::analyze::Linter;
use crate::error::Result;
use crate::results::ResultStore;
use crate::store;
use crate::types::config::{ReportConfig, ReportcardConfig};
use crate::types::report::LintResult;
use crate::types::repo::RepoIdentity;
use crate::vcs::{Downloader, GitDownloader};
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

type RepoLocks = Mutex<HashMap<String, Arc<Mutex<()>>>>;

pub struct Pipeline {
    store: ResultStore,
    downloader: Box<dyn Downloader>,
    linter: Linter,
    repo_root: PathBuf,
    report: ReportConfig,
    in_flight: Option<RepoLocks>,
}

impl Pipeline {
    pub fn new(
        store: ResultStore,
        downloader: Box<dyn Downloader>,
        linter: Linter,
        repo_root: impl Into<PathBuf>,
        report: ReportConfig,
    ) -> Self {
        Self {
            store,
            downloader,
            linter,
            repo_root: repo_root.into(),
            report,
            in_flight: Some(Mutex::new(HashMap::new())),
        }
    }

    /// Concurrent requests for one identity wait for each other when enabled.
    pub fn serialize_per_repo(mut self, enabled: bool) -> Self {
        self.in_flight = enabled.then(|| Mutex::new(HashMap::new()));
        self
    }

    /// Wires the configured store, git downloader and linter. Relative paths
    /// resolve against `root`.
    pub fn from_config(config: &ReportcardConfig, root: &Path) -> Result<Self> {
        let kv = store::open(&config.storage, root)?;
        let repo_root = if config.vcs.repo_root.is_absolute() {
            config.vcs.repo_root.clone()
        } else {
            root.join(&config.vcs.repo_root)
        };
        Ok(Self::new(
            ResultStore::new(kv),
            Box::new(GitDownloader::from_config(config)),
            Linter::from_config(config),
            repo_root,
            config.report.clone(),
        )
        .serialize_per_repo(config.pipeline.serialize_per_repo))
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Returns the cached result unless `force_refresh` is set or nothing is
    /// cached; otherwise downloads, lints, stores and counts first sightings.
    /// A failed download or lint leaves the store untouched.
    pub fn process(&self, identity: &RepoIdentity, force_refresh: bool) -> Result<LintResult> {
        if !force_refresh {
            if let Some(cached) = self.store.get_cached_result(identity)? {
                tracing::debug!(repo = %identity, "cache hit");
                return Ok(cached);
            }
        }

        let key = identity.key();
        let lock = self.acquire(&key);
        let outcome = {
            let _guard = lock
                .as_ref()
                .map(|lock| lock.lock().unwrap_or_else(PoisonError::into_inner));
            self.compute(identity, force_refresh)
        };
        if let Some(lock) = lock {
            self.release(&key, lock);
        }
        outcome
    }

    fn compute(&self, identity: &RepoIdentity, force_refresh: bool) -> Result<LintResult> {
        // another request may have finished this identity while we waited
        if !force_refresh && self.in_flight.is_some() {
            if let Some(cached) = self.store.get_cached_result(identity)? {
                return Ok(cached);
            }
        }

        let was_present = self.store.contains(identity)?;
        tracing::info!(repo = %identity, force_refresh, "analyzing repository");

        let local_dir = self.downloader.materialize(identity, &self.repo_root)?;
        let mut checks = self.linter.run(&local_dir)?;
        checks.link_files(|file| self.report.file_url(identity, file));
        let result = LintResult::from_checks(identity, checks, Utc::now());

        if let Err(err) = self.store.put_result(identity, &result) {
            tracing::error!(repo = %identity, error = %err, "could not cache result");
        }
        if !was_present {
            match self.store.increment_repo_counter() {
                Ok(total) => tracing::debug!(total, "new repository"),
                Err(err) => tracing::warn!(error = %err, "repo counter update failed"),
            }
        }

        tracing::info!(
            repo = %identity,
            grade = %result.grade,
            files = result.files,
            issues = result.issues,
            "analysis complete"
        );
        Ok(result)
    }

    fn acquire(&self, key: &str) -> Option<Arc<Mutex<()>>> {
        let in_flight = self.in_flight.as_ref()?;
        let mut locks = in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        Some(Arc::clone(locks.entry(key.to_string()).or_default()))
    }

    fn release(&self, key: &str, lock: Arc<Mutex<()>>) {
        let Some(in_flight) = self.in_flight.as_ref() else {
            return;
        };
        let mut locks = in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        // map plus this handle means no one else is waiting
        if Arc::strong_count(&lock) == 2 {
            locks.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::registry::CheckDefinition;
    use crate::analyze::runner::{CheckOutcome, CheckRunner};
    use crate::error::ReportcardError;
    use crate::scan::SkipPolicy;
    use crate::results::result_key;
    use crate::store::{KvStore, MemoryStore};
    use crate::types::config::UriFormatRule;
    use crate::types::report::{FileSummary, LintError};
    use crate::types::scoring::Grade;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    struct FakeDownloader {
        files: usize,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    impl Downloader for FakeDownloader {
        fn materialize(&self, identity: &RepoIdentity, local_root: &Path) -> Result<PathBuf> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // widen the window for concurrent callers
            thread::sleep(Duration::from_millis(20));
            if self.fail {
                return Err(ReportcardError::Download {
                    command: "git clone".to_string(),
                    output: "repository not found".to_string(),
                });
            }
            let dir = local_root.join(&identity.repo_path);
            fs::create_dir_all(&dir)?;
            for i in 0..self.files {
                fs::write(dir.join(format!("f{i}.go")), "package widget\n")?;
            }
            Ok(dir)
        }
    }

    struct FixedRunner;

    impl CheckRunner for FixedRunner {
        fn run(&self, check: &CheckDefinition, _dir: &Path, files: &[PathBuf]) -> Result<CheckOutcome> {
            if check.name == "errcheck" {
                return Ok(CheckOutcome {
                    percentage: 50.0,
                    file_summaries: vec![FileSummary {
                        filename: files[0].display().to_string(),
                        file_url: String::new(),
                        errors: vec![LintError {
                            line_number: 7,
                            message: "unchecked error".to_string(),
                        }],
                    }],
                });
            }
            Ok(CheckOutcome {
                percentage: 100.0,
                file_summaries: Vec::new(),
            })
        }
    }

    fn checks() -> Vec<CheckDefinition> {
        vec![
            CheckDefinition::new("govet", 0.30, "vet"),
            CheckDefinition::new("errcheck", 0.10, "errors"),
            CheckDefinition::new("gosimple", 0.20, "simplify"),
            CheckDefinition::new("unused", 0.20, "unused"),
            CheckDefinition::new("nestif", 0.20, "nesting"),
        ]
    }

    struct Fixture {
        pipeline: Pipeline,
        downloads: Arc<AtomicUsize>,
        _root: TempDir,
    }

    fn fixture(files: usize, fail: bool) -> Fixture {
        fixture_with_store(MemoryStore::new(), files, fail)
    }

    fn fixture_with_store(kv: MemoryStore, files: usize, fail: bool) -> Fixture {
        let root = TempDir::new().expect("temp dir should be created");
        let downloads = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new(
            ResultStore::new(Box::new(kv)),
            Box::new(FakeDownloader {
                files,
                fail,
                calls: Arc::clone(&downloads),
            }),
            Linter::new(checks(), Box::new(FixedRunner), SkipPolicy::new("go", Vec::new())),
            root.path().join("repos"),
            ReportConfig {
                uri_format_rules: vec![UriFormatRule {
                    prefix: "github.com".to_string(),
                    uri_format: "https://{repo}/blob/{branch}/{file}".to_string(),
                }],
            },
        );
        Fixture {
            pipeline,
            downloads,
            _root: root,
        }
    }

    fn widget() -> RepoIdentity {
        RepoIdentity::new("github.com/acme/widget", "main")
    }

    #[test]
    fn fresh_repository_is_graded_cached_and_counted() {
        let fx = fixture(12, false);
        let result = fx
            .pipeline
            .process(&widget(), false)
            .expect("process should succeed");

        assert!((result.average - 0.95).abs() < 1e-9);
        assert_eq!(result.grade, Grade::A);
        assert_eq!(result.files, 12);
        assert_eq!(result.issues, 1);
        assert_eq!(result.repo, "github.com/acme/widget");

        let store = fx.pipeline.store();
        assert_eq!(store.get_cached_result(&widget()).unwrap(), Some(result));
        assert_eq!(store.get_repo_counter().unwrap(), 1);
        let board = store.get_leaderboard().unwrap();
        assert_eq!(board.len(), 1);
        assert!((board[0].score - 95.0).abs() < 1e-9);
        assert_eq!(store.get_recently_viewed().unwrap().len(), 1);
    }

    #[test]
    fn file_links_follow_uri_rules() {
        let fx = fixture(12, false);
        let result = fx.pipeline.process(&widget(), false).unwrap();
        let errcheck = result
            .scores
            .iter()
            .find(|score| score.name == "errcheck")
            .expect("errcheck should be scored");
        assert_eq!(
            errcheck.file_summaries[0].file_url,
            "https://github.com/acme/widget/blob/main/f0.go"
        );
    }

    #[test]
    fn cache_hit_skips_download_and_projections() {
        let fx = fixture(12, false);
        let first = fx.pipeline.process(&widget(), false).unwrap();
        let second = fx.pipeline.process(&widget(), false).unwrap();

        assert_eq!(first, second);
        assert_eq!(fx.downloads.load(Ordering::SeqCst), 1);
        assert_eq!(fx.pipeline.store().get_repo_counter().unwrap(), 1);
    }

    #[test]
    fn forced_refresh_recomputes_without_recounting() {
        let fx = fixture(12, false);
        fx.pipeline.process(&widget(), false).unwrap();
        fx.pipeline.process(&widget(), true).unwrap();

        assert_eq!(fx.downloads.load(Ordering::SeqCst), 2);
        assert_eq!(fx.pipeline.store().get_repo_counter().unwrap(), 1);
        assert_eq!(fx.pipeline.store().get_leaderboard().unwrap().len(), 1);
    }

    #[test]
    fn corrupt_cached_result_is_recomputed_without_recounting() {
        let kv = MemoryStore::new();
        kv.update(&result_key(&widget()), b"{garbage")
            .expect("seed should write");
        let fx = fixture_with_store(kv, 12, false);

        let result = fx
            .pipeline
            .process(&widget(), false)
            .expect("process should succeed");

        assert_eq!(fx.downloads.load(Ordering::SeqCst), 1);
        let store = fx.pipeline.store();
        assert_eq!(store.get_repo_counter().unwrap(), 0);
        assert_eq!(store.get_cached_result(&widget()).unwrap(), Some(result));
    }

    #[test]
    fn small_repository_stays_off_leaderboard() {
        let fx = fixture(3, false);
        fx.pipeline.process(&widget(), false).unwrap();
        let store = fx.pipeline.store();
        assert!(store.get_leaderboard().unwrap().is_empty());
        assert_eq!(store.get_repo_counter().unwrap(), 1);
    }

    #[test]
    fn download_failure_leaves_store_untouched() {
        let fx = fixture(12, true);
        let err = fx.pipeline.process(&widget(), false).unwrap_err();
        assert!(matches!(err, ReportcardError::Download { .. }));

        let store = fx.pipeline.store();
        assert!(!store.contains(&widget()).unwrap());
        assert_eq!(store.get_repo_counter().unwrap(), 0);
        assert!(store.get_recently_viewed().unwrap().is_empty());
    }

    #[test]
    fn empty_checkout_reports_no_files() {
        let fx = fixture(0, false);
        let err = fx.pipeline.process(&widget(), false).unwrap_err();
        assert!(matches!(err, ReportcardError::NoFiles(_)));
        assert_eq!(fx.pipeline.store().get_repo_counter().unwrap(), 0);
    }

    #[test]
    fn concurrent_requests_for_one_repository_download_once() {
        let fx = fixture(12, false);
        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    fx.pipeline
                        .process(&widget(), false)
                        .expect("process should succeed");
                });
            }
        });
        assert_eq!(fx.downloads.load(Ordering::SeqCst), 1);
        assert_eq!(fx.pipeline.store().get_repo_counter().unwrap(), 1);
    }
}
