use crate::types::report::RecentEntry;

/// Insertion-ordered list of the last few distinct identities, oldest first.
#[derive(Debug, Clone)]
pub struct RecentList {
    capacity: usize,
    entries: Vec<RecentEntry>,
}

impl RecentList {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    /// Rebuilds from a stored snapshot, dropping the oldest entries if it is
    /// over capacity.
    pub fn from_entries(capacity: usize, entries: Vec<RecentEntry>) -> Self {
        let mut list = Self { capacity, entries };
        list.trim();
        list
    }

    /// Appends unless the identity is already listed; a repeat view does not
    /// move it. Drops the oldest entries past capacity.
    pub fn record(&mut self, entry: RecentEntry) -> bool {
        let identity = entry.identity();
        if self
            .entries
            .iter()
            .any(|existing| existing.identity() == identity)
        {
            return false;
        }
        self.entries.push(entry);
        self.trim();
        true
    }

    fn trim(&mut self) {
        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
        }
    }

    pub fn entries(&self) -> &[RecentEntry] {
        &self.entries
    }

    pub fn most_recent_first(&self) -> Vec<RecentEntry> {
        self.entries.iter().rev().cloned().collect()
    }
}
