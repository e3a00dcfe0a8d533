//! Cached lint results plus the projections derived from them: the
//! recently-viewed list, the leaderboard and the distinct-repo counter.
//!
//! Projections are best-effort read-modify-write updates on their own keys.
//! They are not atomic with the primary write or with each other.

pub mod leaderboard;
pub mod recent;

use crate::error::{ReportcardError, Result};
use crate::store::KvStore;
use crate::types::report::{LeaderboardEntry, LintResult, RecentEntry};
use crate::types::repo::RepoIdentity;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use self::leaderboard::Leaderboard;
pub use self::recent::RecentList;

pub const RESULT_KEY_PREFIX: &str = "repos-";
pub const RECENT_KEY: &str = "recent";
pub const LEADERBOARD_KEY: &str = "scores";
pub const REPO_COUNTER_KEY: &str = "total_repos";

pub const LEADERBOARD_CAPACITY: usize = 50;
pub const LEADERBOARD_MIN_FILES: usize = 10;
pub const RECENT_CAPACITY: usize = 5;

pub fn result_key(identity: &RepoIdentity) -> String {
    format!("{RESULT_KEY_PREFIX}{}", identity.key())
}

pub struct ResultStore {
    kv: Box<dyn KvStore>,
}

impl ResultStore {
    pub fn new(kv: Box<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Cached result for `identity`, regraded on read. A corrupt payload is
    /// logged and reported as a miss.
    pub fn get_cached_result(&self, identity: &RepoIdentity) -> Result<Option<LintResult>> {
        let key = result_key(identity);
        let Some(bytes) = self.kv.get(&key)? else {
            return Ok(None);
        };
        match serde_json::from_slice::<LintResult>(&bytes) {
            Ok(mut result) => {
                result.regrade();
                Ok(Some(result))
            }
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "ignoring corrupt cached result");
                Ok(None)
            }
        }
    }

    /// Whether anything, decodable or not, was ever stored for `identity`.
    pub fn contains(&self, identity: &RepoIdentity) -> Result<bool> {
        Ok(self.kv.get(&result_key(identity))?.is_some())
    }

    /// Writes the result, then refreshes the recent list and leaderboard.
    /// Only the primary write can fail the call.
    pub fn put_result(&self, identity: &RepoIdentity, result: &LintResult) -> Result<()> {
        let bytes = serde_json::to_vec(result)?;
        self.kv.update(&result_key(identity), &bytes)?;

        if let Err(err) = self.update_recently_viewed(identity, result) {
            tracing::warn!(repo = %identity, error = %err, "recently viewed update failed");
        }
        if let Err(err) = self.update_leaderboard(identity, result) {
            tracing::warn!(repo = %identity, error = %err, "leaderboard update failed");
        }
        Ok(())
    }

    /// Returns `true` when the list changed.
    pub fn update_recently_viewed(
        &self,
        identity: &RepoIdentity,
        result: &LintResult,
    ) -> Result<bool> {
        let entries = self.load_json::<Vec<RecentEntry>>(RECENT_KEY)?.unwrap_or_default();
        let mut recent = RecentList::from_entries(RECENT_CAPACITY, entries);
        let changed = recent.record(RecentEntry {
            repo: identity.repo_path.clone(),
            branch: identity.branch.clone(),
            grade: result.grade,
            score: result.score(),
            last_generated: result.last_refresh,
        });
        if changed {
            self.store_json(RECENT_KEY, recent.entries())?;
        }
        Ok(changed)
    }

    /// Returns `true` when the board changed.
    pub fn update_leaderboard(&self, identity: &RepoIdentity, result: &LintResult) -> Result<bool> {
        if result.files < LEADERBOARD_MIN_FILES {
            tracing::debug!(repo = %identity, files = result.files, "too few files for leaderboard");
            return Ok(false);
        }
        let mut board = self.load_leaderboard()?;
        let admitted = board.offer(LeaderboardEntry {
            repo: identity.repo_path.clone(),
            branch: identity.branch.clone(),
            score: result.score(),
            files: result.files,
        });
        if admitted {
            self.store_json(LEADERBOARD_KEY, &board.into_sorted_asc())?;
        }
        Ok(admitted)
    }

    pub fn increment_repo_counter(&self) -> Result<u64> {
        let next = self.get_repo_counter()? + 1;
        self.store_json(REPO_COUNTER_KEY, &next)?;
        Ok(next)
    }

    /// Highest score first.
    pub fn get_leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        Ok(self.load_leaderboard()?.sorted_desc())
    }

    /// Most recent first.
    pub fn get_recently_viewed(&self) -> Result<Vec<RecentEntry>> {
        let entries = self.load_json::<Vec<RecentEntry>>(RECENT_KEY)?.unwrap_or_default();
        Ok(RecentList::from_entries(RECENT_CAPACITY, entries).most_recent_first())
    }

    pub fn get_repo_counter(&self) -> Result<u64> {
        Ok(self.load_json::<u64>(REPO_COUNTER_KEY)?.unwrap_or(0))
    }

    pub fn close(&self) -> Result<()> {
        self.kv.close()
    }

    fn load_leaderboard(&self) -> Result<Leaderboard> {
        let entries = self.load_json::<Vec<LeaderboardEntry>>(LEADERBOARD_KEY)?.unwrap_or_default();
        Ok(Leaderboard::from_entries(LEADERBOARD_CAPACITY, entries))
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(bytes) = self.kv.get(key)? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| ReportcardError::CacheDecode {
                key: key.to_string(),
                message: err.to_string(),
            })
    }

    fn store_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.kv.update(key, &bytes)
    }
}
