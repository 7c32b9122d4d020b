//! Undo/Redo history for row reorders.

/// One recorded move. `order[i]` is the pre-move index of the row that sits
/// at position `i` after the move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReorderEntry {
    pub order: Vec<usize>,
    pub selection_before: Vec<usize>,
    pub selection_after: Vec<usize>,
}

impl ReorderEntry {
    /// Inverse permutation: `inverse()[old] = new`.
    pub fn inverse(&self) -> Vec<usize> {
        let mut inv = vec![0; self.order.len()];
        for (new_pos, &old_pos) in self.order.iter().enumerate() {
            inv[old_pos] = new_pos;
        }
        inv
    }
}

#[derive(Debug)]
pub struct ReorderHistory {
    undo_stack: Vec<ReorderEntry>,
    redo_stack: Vec<ReorderEntry>,
    max_entries: usize,
}

impl ReorderHistory {
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries,
        }
    }

    /// Record a move. Identity permutations are not recorded.
    pub fn record(&mut self, entry: ReorderEntry) {
        if entry.order.iter().enumerate().all(|(i, &o)| i == o) {
            return;
        }

        self.undo_stack.push(entry);
        self.redo_stack.clear();

        // Limit history size
        if self.undo_stack.len() > self.max_entries {
            self.undo_stack.remove(0);
        }
    }

    /// Pop the last entry for undo
    pub fn undo(&mut self) -> Option<ReorderEntry> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(entry.clone());
        Some(entry)
    }

    /// Pop from redo stack
    pub fn redo(&mut self) -> Option<ReorderEntry> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(entry.clone());
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for ReorderHistory {
    fn default() -> Self {
        Self::new()
    }
}
