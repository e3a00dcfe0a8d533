use crate::types::report::LeaderboardEntry;
use crate::types::repo::RepoIdentity;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Heap slot ordered by score, ties broken by identity so ordering is total.
#[derive(Debug, Clone)]
struct Ranked(LeaderboardEntry);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .score
            .total_cmp(&other.0.score)
            .then_with(|| other.0.repo.cmp(&self.0.repo))
            .then_with(|| other.0.branch.cmp(&self.0.branch))
    }
}

/// Size-bounded min-heap of leaderboard entries. The root is the lowest score
/// and the first to be evicted.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    capacity: usize,
    heap: BinaryHeap<Reverse<Ranked>>,
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity + 1),
        }
    }

    /// Rebuilds from persisted entries, trimming the lowest scores if the
    /// snapshot is over capacity.
    pub fn from_entries(capacity: usize, entries: Vec<LeaderboardEntry>) -> Self {
        let mut board = Self::new(capacity);
        board.heap = entries.into_iter().map(|entry| Reverse(Ranked(entry))).collect();
        board.trim();
        board
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    pub fn push(&mut self, entry: LeaderboardEntry) {
        self.heap.push(Reverse(Ranked(entry)));
    }

    pub fn peek_min(&self) -> Option<&LeaderboardEntry> {
        self.heap.peek().map(|Reverse(Ranked(entry))| entry)
    }

    pub fn evict_min(&mut self) -> Option<LeaderboardEntry> {
        self.heap.pop().map(|Reverse(Ranked(entry))| entry)
    }

    pub fn remove(&mut self, identity: &RepoIdentity) -> Option<LeaderboardEntry> {
        let mut entries = std::mem::take(&mut self.heap).into_vec();
        let position = entries.iter().position(|Reverse(Ranked(entry))| {
            entry.repo == identity.repo_path && entry.branch == identity.branch
        });
        let removed = position.map(|index| entries.swap_remove(index).0 .0);
        self.heap = BinaryHeap::from(entries);
        removed
    }

    /// Admission rule: a full board ignores scores that do not beat its
    /// minimum; otherwise any previous entry for the same identity is replaced
    /// and the lowest scores are evicted down to capacity.
    pub fn offer(&mut self, entry: LeaderboardEntry) -> bool {
        if self.is_full() {
            if let Some(min) = self.peek_min() {
                if entry.score <= min.score {
                    return false;
                }
            }
        }
        self.remove(&entry.identity());
        self.push(entry);
        self.trim();
        true
    }

    /// Entries highest score first. Does not consume the board.
    pub fn sorted_desc(&self) -> Vec<LeaderboardEntry> {
        let mut ranked = self.heap.iter().map(|Reverse(ranked)| ranked.clone()).collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.cmp(a));
        ranked.into_iter().map(|Ranked(entry)| entry).collect()
    }

    /// Entries lowest score first, the order they are persisted in.
    pub fn into_sorted_asc(self) -> Vec<LeaderboardEntry> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .rev()
            .map(|Reverse(Ranked(entry))| entry)
            .collect()
    }

    fn trim(&mut self) {
        while self.heap.len() > self.capacity {
            self.heap.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(repo: &str, score: f64) -> LeaderboardEntry {
        LeaderboardEntry {
            repo: repo.to_string(),
            branch: "main".to_string(),
            score,
            files: 20,
        }
    }

    #[test]
    fn peek_and_evict_follow_lowest_score() {
        let mut board = Leaderboard::new(10);
        board.push(entry("b", 80.0));
        board.push(entry("a", 40.0));
        board.push(entry("c", 95.0));
        assert_eq!(board.peek_min().map(|e| e.repo.as_str()), Some("a"));
        assert_eq!(board.evict_min().map(|e| e.repo), Some("a".to_string()));
        assert_eq!(board.peek_min().map(|e| e.repo.as_str()), Some("b"));
    }

    #[test]
    fn offer_never_exceeds_capacity_and_evicts_lowest() {
        let mut board = Leaderboard::new(50);
        for i in 0..51 {
            // scores 10.0 .. 60.0, the first one is the lowest
            board.offer(entry(&format!("repo{i}"), 10.0 + f64::from(i)));
        }
        assert_eq!(board.len(), 50);
        let repos = board
            .sorted_desc()
            .into_iter()
            .map(|e| e.repo)
            .collect::<Vec<_>>();
        assert!(!repos.contains(&"repo0".to_string()));
        assert!(repos.contains(&"repo1".to_string()));
    }

    #[test]
    fn offer_evicts_lowest_even_when_inserted_last() {
        let mut board = Leaderboard::new(3);
        board.offer(entry("a", 70.0));
        board.offer(entry("b", 80.0));
        board.offer(entry("c", 90.0));
        assert!(!board.offer(entry("d", 60.0)));
        assert!(!board.offer(entry("e", 70.0)));
        assert!(board.offer(entry("f", 75.0)));
        let repos = board.sorted_desc().into_iter().map(|e| e.repo).collect::<Vec<_>>();
        assert_eq!(repos, vec!["c", "b", "f"]);
    }

    #[test]
    fn offer_replaces_existing_identity() {
        let mut board = Leaderboard::new(50);
        board.offer(entry("a", 70.0));
        board.offer(entry("b", 80.0));
        board.offer(entry("a", 90.0));
        let entries = board.sorted_desc();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].repo, "a");
        assert_eq!(entries[0].score, 90.0);
    }

    #[test]
    fn remove_distinguishes_branches() {
        let mut board = Leaderboard::new(5);
        board.push(entry("a", 70.0));
        let mut dev = entry("a", 60.0);
        dev.branch = "dev".to_string();
        board.push(dev);
        let removed = board.remove(&RepoIdentity::new("a", "dev"));
        assert_eq!(removed.map(|e| e.score), Some(60.0));
        assert_eq!(board.len(), 1);
        assert!(board.remove(&RepoIdentity::new("zzz", "main")).is_none());
    }

    #[test]
    fn from_entries_trims_and_orders() {
        let entries = (0..8).map(|i| entry(&format!("r{i}"), f64::from(i))).collect();
        let board = Leaderboard::from_entries(5, entries);
        let asc = board.into_sorted_asc();
        let scores = asc.iter().map(|e| e.score).collect::<Vec<_>>();
        assert_eq!(scores, vec![3.0, 4.0, 5.0, 6.0, 7.0]);
    }
}
