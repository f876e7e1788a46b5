//! Undo/redo history of store snapshots

use crate::store::Store;

/// Linear snapshot log with a cursor.
///
/// The log always holds at least one entry (the initial store) and the cursor
/// points at the snapshot currently shown. Recording after an undo discards
/// the redo branch.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Store>,
    cursor: usize,
    limit: Option<usize>,
}

impl History {
    /// A log whose only entry is `initial`
    pub fn new(initial: Store) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            limit: None,
        }
    }

    /// Keep at most `limit` snapshots, dropping the oldest first
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit.map(|n| n.max(1));
        self.enforce_limit();
        self
    }

    /// Append a snapshot after the cursor, discarding any redo branch
    pub fn record(&mut self, snapshot: Store) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        self.cursor = self.entries.len() - 1;
        self.enforce_limit();
    }

    /// Step back; `None` at the oldest entry
    pub fn undo(&mut self) -> Option<&Store> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward; `None` at the newest entry
    pub fn redo(&mut self) -> Option<&Store> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Forget everything and start over from `initial`
    pub fn reset(&mut self, initial: Store) {
        self.entries.clear();
        self.entries.push(initial);
        self.cursor = 0;
    }

    pub fn current(&self) -> &Store {
        &self.entries[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn enforce_limit(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        if self.entries.len() > limit {
            let excess = self.entries.len() - limit;
            self.entries.drain(..excess);
            self.cursor = self.cursor.saturating_sub(excess);
        }
    }
}
