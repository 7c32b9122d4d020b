use std::collections::BTreeSet;

/// The row selection model: a set of row indices plus an anchor for range clicks.
///
/// Indices iterate in ascending order, so every operation applied against the
/// selection sees the same order regardless of how the set was built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    selected: BTreeSet<usize>,
    anchor: Option<usize>,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the anchor row (last clicked index, used for shift+click).
    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn set_anchor(&mut self, index: Option<usize>) {
        self.anchor = index;
    }

    /// Check if a row is selected.
    pub fn contains(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected indices, ascending.
    pub fn indices(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    pub fn first(&self) -> Option<usize> {
        self.selected.first().copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.selected.last().copied()
    }

    pub fn select(&mut self, index: usize) {
        self.selected.insert(index);
    }

    pub fn deselect(&mut self, index: usize) {
        self.selected.remove(&index);
    }

    /// Flip one row (ctrl+click, checkbox).
    pub fn toggle(&mut self, index: usize) {
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
    }

    /// Add the inclusive span between anchor and target (shift+click).
    /// Additive: prior selection is kept.
    pub fn select_range(&mut self, anchor: usize, target: usize) {
        let (lo, hi) = (anchor.min(target), anchor.max(target));
        self.selected.extend(lo..=hi);
    }

    /// Clear, then select exactly one row (plain click).
    pub fn select_single(&mut self, index: usize) {
        self.selected.clear();
        self.selected.insert(index);
    }

    pub fn select_all(&mut self, row_count: usize) {
        self.selected = (0..row_count).collect();
    }

    /// Empty the set. The anchor is kept; `reset` drops both.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn reset(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    /// Replace the set with the contiguous span `[start, start + len)`.
    pub fn set_contiguous(&mut self, start: usize, len: usize) {
        self.selected = (start..start + len).collect();
    }

    /// Drop indices at or past `row_count` (after the backing rows shrank).
    pub fn retain_in_bounds(&mut self, row_count: usize) {
        self.selected.retain(|&i| i < row_count);
        if self.anchor.is_some_and(|a| a >= row_count) {
            self.anchor = None;
        }
    }

    /// Check if the selection forms one contiguous block.
    pub fn is_contiguous(&self) -> bool {
        match (self.first(), self.last()) {
            (Some(lo), Some(hi)) => hi - lo + 1 == self.selected.len(),
            _ => true,
        }
    }
}
