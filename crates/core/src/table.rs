//! Row table: an ordered list of rows, the selection over it, and the
//! move/reorder operations that keep both in step.

use crate::history::{ReorderEntry, ReorderHistory};
use crate::selection::RowSelection;

/// What part of a row received the click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Row,
    Checkbox,
    /// An inline action button; never changes the selection.
    ActionButton,
}

/// Modifier keys held during a click. `ctrl` also stands for cmd on macOS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { ctrl: false, shift: false };
    pub const CTRL: Self = Self { ctrl: true, shift: false };
    pub const SHIFT: Self = Self { ctrl: false, shift: true };
}

/// Rows captured at drag start. Exists for one drop gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragOperation {
    indices: Vec<usize>,
}

impl DragOperation {
    /// Dragged row indices, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

#[derive(Debug, Clone, Copy)]
enum Placement {
    /// Before the row whose pre-move index is given.
    Before(usize),
    /// After the row whose pre-move index is given.
    After(usize),
}

/// Ordered rows plus their selection and reorder history.
///
/// Generic over the row type so callers can keep whatever row
/// representation their renderer wants. Every index is bounds-checked;
/// stale or out-of-range indices turn an operation into a no-op that
/// returns `false`.
#[derive(Debug)]
pub struct RowTable<T> {
    rows: Vec<T>,
    selection: RowSelection,
    history: ReorderHistory,
}

impl<T> RowTable<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows,
            selection: RowSelection::new(),
            history: ReorderHistory::new(),
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    /// Swap in a freshly loaded row list. Selection and history start over.
    pub fn replace_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.selection.reset();
        self.history.clear();
    }

    fn in_bounds(&self, index: usize) -> bool {
        index < self.rows.len()
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn select(&mut self, index: usize) -> bool {
        if !self.in_bounds(index) {
            return false;
        }
        self.selection.select(index);
        true
    }

    pub fn deselect(&mut self, index: usize) -> bool {
        if !self.in_bounds(index) {
            return false;
        }
        self.selection.deselect(index);
        true
    }

    pub fn toggle(&mut self, index: usize) -> bool {
        if !self.in_bounds(index) {
            return false;
        }
        self.selection.toggle(index);
        true
    }

    pub fn select_range(&mut self, anchor: usize, target: usize) -> bool {
        if !self.in_bounds(anchor) || !self.in_bounds(target) {
            return false;
        }
        self.selection.select_range(anchor, target);
        true
    }

    pub fn select_single(&mut self, index: usize) -> bool {
        if !self.in_bounds(index) {
            return false;
        }
        self.selection.select_single(index);
        true
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(self.rows.len());
    }

    pub fn clear_selection(&mut self) {
        self.selection.reset();
    }

    /// Apply one click to the selection.
    ///
    /// Shift wins over ctrl when both are held. Shift without an anchor
    /// behaves like a plain click.
    pub fn click(&mut self, index: usize, target: ClickTarget, modifiers: Modifiers) -> bool {
        if !self.in_bounds(index) {
            return false;
        }

        match target {
            ClickTarget::ActionButton => return false,
            ClickTarget::Checkbox => {
                self.selection.toggle(index);
                self.selection.set_anchor(Some(index));
            }
            ClickTarget::Row => match (modifiers.shift, self.selection.anchor()) {
                (true, Some(anchor)) if self.in_bounds(anchor) => {
                    self.selection.select_range(anchor, index);
                }
                _ if modifiers.ctrl && !modifiers.shift => {
                    self.selection.toggle(index);
                    self.selection.set_anchor(Some(index));
                }
                _ => {
                    self.selection.select_single(index);
                    self.selection.set_anchor(Some(index));
                }
            },
        }
        true
    }

    // ------------------------------------------------------------------
    // Drag and drop
    // ------------------------------------------------------------------

    /// Start dragging `index`. An unselected row is dragged alone (it becomes
    /// the whole selection); a selected row drags the full selection.
    pub fn begin_drag(&mut self, index: usize) -> Option<DragOperation> {
        if !self.in_bounds(index) {
            return None;
        }
        if !self.selection.contains(index) {
            self.selection.select_single(index);
            self.selection.set_anchor(Some(index));
        }
        self.selection.retain_in_bounds(self.rows.len());
        Some(DragOperation {
            indices: self.selection.indices(),
        })
    }

    /// Drop a drag onto `target`. Dropping onto a dragged or selected row is ignored.
    pub fn drop_on(&mut self, drag: &DragOperation, target: usize) -> bool {
        if self.selection.contains(target) {
            return false;
        }
        self.relocate(&drag.indices, target)
    }

    /// Move every selected row in front of `target`, keeping their relative order.
    ///
    /// Afterwards the selection covers the moved rows at their new positions
    /// and the anchor sits on the first of them. A move that would leave the
    /// order unchanged returns `false` and records nothing.
    pub fn move_selection_to(&mut self, target: usize) -> bool {
        self.selection.retain_in_bounds(self.rows.len());
        if self.selection.contains(target) {
            return false;
        }
        let moving = self.selection.indices();
        self.relocate(&moving, target)
    }

    fn relocate(&mut self, moving: &[usize], target: usize) -> bool {
        if !self.in_bounds(target) || moving.is_empty() {
            return false;
        }
        if moving.contains(&target) {
            return false;
        }
        let moving: Vec<usize> = moving.iter().copied().filter(|&i| self.in_bounds(i)).collect();
        self.extract_reinsert(&moving, Placement::Before(target))
    }

    // ------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------

    /// Move the selection one row up. No-op when the topmost selected row is row 0.
    pub fn move_selection_up(&mut self) -> bool {
        self.selection.retain_in_bounds(self.rows.len());
        match self.selection.first() {
            Some(first) if first > 0 => {
                let moving = self.selection.indices();
                self.extract_reinsert(&moving, Placement::Before(first - 1))
            }
            _ => false,
        }
    }

    /// Move the selection one row down. No-op when the bottommost selected row is the last row.
    pub fn move_selection_down(&mut self) -> bool {
        self.selection.retain_in_bounds(self.rows.len());
        match self.selection.last() {
            Some(last) if last + 1 < self.rows.len() => {
                let moving = self.selection.indices();
                self.extract_reinsert(&moving, Placement::After(last + 1))
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Undo / redo
    // ------------------------------------------------------------------

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.undo() else {
            return false;
        };
        if entry.order.len() != self.rows.len() {
            log::warn!("reorder history out of sync with rows; dropping history");
            self.history.clear();
            return false;
        }
        self.apply_order(&entry.inverse());
        self.restore_selection(&entry.selection_before);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.redo() else {
            return false;
        };
        if entry.order.len() != self.rows.len() {
            log::warn!("reorder history out of sync with rows; dropping history");
            self.history.clear();
            return false;
        }
        self.apply_order(&entry.order);
        self.restore_selection(&entry.selection_after);
        true
    }

    // ------------------------------------------------------------------
    // Core primitive
    // ------------------------------------------------------------------

    /// Stable multi-extract-reinsert.
    ///
    /// `moving` must be ascending and in bounds. Rows are split into the
    /// moving block and the staying rows (both keep their relative order);
    /// the placement is resolved against the staying rows by pre-move index,
    /// since positions shift once the moving rows are pulled out.
    fn extract_reinsert(&mut self, moving: &[usize], placement: Placement) -> bool {
        if moving.is_empty() {
            return false;
        }

        let selection_before = self.selection.indices();
        let rows = std::mem::take(&mut self.rows);

        let mut moved: Vec<(usize, T)> = Vec::with_capacity(moving.len());
        let mut staying: Vec<(usize, T)> = Vec::with_capacity(rows.len() - moving.len());
        let mut pending = moving.iter().peekable();
        for (i, row) in rows.into_iter().enumerate() {
            if pending.peek() == Some(&&i) {
                pending.next();
                moved.push((i, row));
            } else {
                staying.push((i, row));
            }
        }

        let position_of = |orig: usize| staying.iter().position(|(i, _)| *i == orig);
        let insert_at = match placement {
            Placement::Before(orig) => position_of(orig).unwrap_or(staying.len()),
            Placement::After(orig) => position_of(orig).map_or(staying.len(), |p| p + 1),
        };

        let count = moved.len();
        staying.splice(insert_at..insert_at, moved);

        let order: Vec<usize> = staying.iter().map(|(i, _)| *i).collect();
        self.rows = staying.into_iter().map(|(_, row)| row).collect();
        if order.iter().enumerate().all(|(pos, &orig)| pos == orig) {
            return false;
        }
        self.selection.set_contiguous(insert_at, count);
        self.selection.set_anchor(Some(insert_at));

        log::debug!("moved {count} row(s) to position {insert_at}");

        self.history.record(ReorderEntry {
            order,
            selection_before,
            selection_after: self.selection.indices(),
        });
        true
    }

    /// Rearrange rows so that new position `i` holds the row now at `order[i]`.
    fn apply_order(&mut self, order: &[usize]) {
        let mut slots: Vec<Option<T>> = std::mem::take(&mut self.rows).into_iter().map(Some).collect();
        self.rows = order.iter().filter_map(|&i| slots.get_mut(i).and_then(Option::take)).collect();
    }

    fn restore_selection(&mut self, indices: &[usize]) {
        self.selection.clear();
        for &i in indices {
            self.selection.select(i);
        }
        self.selection.set_anchor(indices.first().copied());
    }
}

impl<T> Default for RowTable<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(n: usize) -> RowTable<String> {
        RowTable::new((0..n).map(|i| format!("r{i}")).collect())
    }

    fn names(t: &RowTable<String>) -> Vec<&str> {
        t.rows().iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn move_multi_selection_to_top() {
        let mut t = table(5);
        t.select(1);
        t.select(3);
        assert!(t.move_selection_to(0));
        assert_eq!(names(&t), vec!["r1", "r3", "r0", "r2", "r4"]);
        assert_eq!(t.selection().indices(), vec![0, 1]);
    }

    #[test]
    fn move_down_past_gap() {
        let mut t = table(5);
        t.select(0);
        t.select(1);
        assert!(t.move_selection_to(4));
        assert_eq!(names(&t), vec!["r2", "r3", "r0", "r1", "r4"]);
        assert_eq!(t.selection().indices(), vec![2, 3]);
    }

    #[test]
    fn move_onto_selected_row_is_noop() {
        let mut t = table(5);
        t.select(1);
        t.select(3);
        assert!(!t.move_selection_to(3));
        assert_eq!(names(&t), vec!["r0", "r1", "r2", "r3", "r4"]);
        assert_eq!(t.selection().indices(), vec![1, 3]);
        assert!(!t.can_undo());
    }

    #[test]
    fn move_out_of_range_is_noop() {
        let mut t = table(3);
        t.select(0);
        assert!(!t.move_selection_to(7));
        assert_eq!(names(&t), vec!["r0", "r1", "r2"]);
    }

    #[test]
    fn move_with_empty_selection_is_noop() {
        let mut t = table(3);
        assert!(!t.move_selection_to(1));
    }

    #[test]
    fn out_of_range_selection_calls_are_noops() {
        let mut t = table(3);
        assert!(!t.select(3));
        assert!(!t.toggle(10));
        assert!(!t.select_range(0, 3));
        assert!(!t.select_single(99));
        assert!(!t.deselect(3));
        assert!(t.selection().is_empty());
    }

    #[test]
    fn move_that_keeps_order_is_noop() {
        let mut t = table(3);
        t.select(0);
        assert!(!t.move_selection_to(1));
        assert_eq!(names(&t), vec!["r0", "r1", "r2"]);
        assert_eq!(t.selection().indices(), vec![0]);
        assert!(!t.can_undo());
        assert!(!t.undo());

        t.select(1);
        assert!(!t.move_selection_to(2));
        assert_eq!(names(&t), vec!["r0", "r1", "r2"]);
        assert!(!t.can_undo());
    }

    #[test]
    fn deselect_and_clear_selection() {
        let mut t = table(4);
        t.select(0);
        t.select(2);
        assert!(t.deselect(2));
        assert_eq!(t.selection().indices(), vec![0]);
        assert!(t.deselect(3));
        assert_eq!(t.selection().indices(), vec![0]);

        t.click(1, ClickTarget::Row, Modifiers::NONE);
        assert_eq!(t.selection().anchor(), Some(1));
        t.clear_selection();
        assert!(t.selection().is_empty());
        assert_eq!(t.selection().anchor(), None);
    }

    #[test]
    fn anchor_follows_moved_rows() {
        let mut t = table(6);
        t.click(4, ClickTarget::Row, Modifiers::NONE);
        t.click(5, ClickTarget::Row, Modifiers::CTRL);
        assert!(t.move_selection_to(1));
        assert_eq!(names(&t), vec!["r0", "r4", "r5", "r1", "r2", "r3"]);
        assert_eq!(t.selection().anchor(), Some(1));

        t.click(3, ClickTarget::Row, Modifiers::SHIFT);
        assert_eq!(t.selection().indices(), vec![1, 2, 3]);
    }

    #[test]
    fn undo_and_redo_reset_anchor_to_restored_selection() {
        let mut t = table(5);
        t.click(3, ClickTarget::Row, Modifiers::NONE);
        t.click(4, ClickTarget::Row, Modifiers::CTRL);
        assert!(t.move_selection_to(0));
        assert!(t.undo());
        assert_eq!(t.selection().indices(), vec![3, 4]);
        assert_eq!(t.selection().anchor(), Some(3));

        assert!(t.redo());
        assert_eq!(t.selection().indices(), vec![0, 1]);
        assert_eq!(t.selection().anchor(), Some(0));

        t.click(2, ClickTarget::Row, Modifiers::SHIFT);
        assert_eq!(t.selection().indices(), vec![0, 1, 2]);
    }

    #[test]
    fn plain_click_selects_single_and_sets_anchor() {
        let mut t = table(5);
        t.select_all();
        assert!(t.click(2, ClickTarget::Row, Modifiers::NONE));
        assert_eq!(t.selection().indices(), vec![2]);
        assert_eq!(t.selection().anchor(), Some(2));
    }

    #[test]
    fn ctrl_click_toggles() {
        let mut t = table(5);
        t.click(1, ClickTarget::Row, Modifiers::NONE);
        t.click(3, ClickTarget::Row, Modifiers::CTRL);
        assert_eq!(t.selection().indices(), vec![1, 3]);
        t.click(1, ClickTarget::Row, Modifiers::CTRL);
        assert_eq!(t.selection().indices(), vec![3]);
        assert_eq!(t.selection().anchor(), Some(1));
    }

    #[test]
    fn shift_click_extends_from_anchor() {
        let mut t = table(8);
        t.click(2, ClickTarget::Row, Modifiers::NONE);
        t.click(5, ClickTarget::Row, Modifiers::SHIFT);
        assert_eq!(t.selection().indices(), vec![2, 3, 4, 5]);
        assert_eq!(t.selection().anchor(), Some(2));

        // Anchor unchanged, range is additive
        t.click(0, ClickTarget::Row, Modifiers::SHIFT);
        assert_eq!(t.selection().indices(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn shift_click_without_anchor_acts_as_plain_click() {
        let mut t = table(4);
        t.click(3, ClickTarget::Row, Modifiers::SHIFT);
        assert_eq!(t.selection().indices(), vec![3]);
        assert_eq!(t.selection().anchor(), Some(3));
    }

    #[test]
    fn checkbox_toggles_regardless_of_modifiers() {
        let mut t = table(4);
        t.click(1, ClickTarget::Checkbox, Modifiers::NONE);
        t.click(2, ClickTarget::Checkbox, Modifiers::SHIFT);
        assert_eq!(t.selection().indices(), vec![1, 2]);
        assert_eq!(t.selection().anchor(), Some(2));
        t.click(1, ClickTarget::Checkbox, Modifiers::CTRL);
        assert_eq!(t.selection().indices(), vec![2]);
    }

    #[test]
    fn action_button_click_is_ignored() {
        let mut t = table(4);
        t.click(1, ClickTarget::Row, Modifiers::NONE);
        assert!(!t.click(3, ClickTarget::ActionButton, Modifiers::NONE));
        assert_eq!(t.selection().indices(), vec![1]);
        assert_eq!(t.selection().anchor(), Some(1));
    }

    #[test]
    fn drag_unselected_row_drags_it_alone() {
        let mut t = table(5);
        t.select(0);
        t.select(1);
        let drag = t.begin_drag(3).unwrap();
        assert_eq!(drag.indices(), &[3]);
        assert_eq!(t.selection().indices(), vec![3]);
        assert!(t.drop_on(&drag, 0));
        assert_eq!(names(&t), vec!["r3", "r0", "r1", "r2", "r4"]);
        assert_eq!(t.selection().indices(), vec![0]);
    }

    #[test]
    fn drag_selected_row_drags_whole_selection() {
        let mut t = table(5);
        t.select(1);
        t.select(3);
        let drag = t.begin_drag(3).unwrap();
        assert_eq!(drag.indices(), &[1, 3]);
        assert!(t.drop_on(&drag, 0));
        assert_eq!(names(&t), vec!["r1", "r3", "r0", "r2", "r4"]);
        assert_eq!(t.selection().indices(), vec![0, 1]);
    }

    #[test]
    fn drop_on_dragged_row_is_ignored() {
        let mut t = table(5);
        t.select(1);
        t.select(2);
        let drag = t.begin_drag(1).unwrap();
        assert!(!t.drop_on(&drag, 2));
        assert_eq!(names(&t), vec!["r0", "r1", "r2", "r3", "r4"]);
    }

    #[test]
    fn keyboard_move_up_and_down() {
        let mut t = table(5);
        t.select(2);
        t.select(3);
        assert!(t.move_selection_up());
        assert_eq!(names(&t), vec!["r0", "r2", "r3", "r1", "r4"]);
        assert_eq!(t.selection().indices(), vec![1, 2]);

        assert!(t.move_selection_down());
        assert!(t.move_selection_down());
        assert_eq!(names(&t), vec!["r0", "r1", "r4", "r2", "r3"]);
        assert_eq!(t.selection().indices(), vec![3, 4]);
    }

    #[test]
    fn keyboard_move_boundaries_are_noops() {
        let mut t = table(3);
        t.select(0);
        assert!(!t.move_selection_up());
        t.select_single(2);
        assert!(!t.move_selection_down());
        assert_eq!(names(&t), vec!["r0", "r1", "r2"]);
    }

    #[test]
    fn undo_and_redo_restore_order_and_selection() {
        let mut t = table(5);
        t.select(1);
        t.select(3);
        t.move_selection_to(0);

        assert!(t.undo());
        assert_eq!(names(&t), vec!["r0", "r1", "r2", "r3", "r4"]);
        assert_eq!(t.selection().indices(), vec![1, 3]);

        assert!(t.redo());
        assert_eq!(names(&t), vec!["r1", "r3", "r0", "r2", "r4"]);
        assert_eq!(t.selection().indices(), vec![0, 1]);
        assert!(!t.redo());
    }

    #[test]
    fn replace_rows_resets_selection_and_history() {
        let mut t = table(4);
        t.select(1);
        t.move_selection_to(3);
        t.replace_rows(vec!["x".to_string(), "y".to_string()]);
        assert!(t.selection().is_empty());
        assert_eq!(t.selection().anchor(), None);
        assert!(!t.can_undo());
    }

    #[test]
    fn stale_selection_indices_are_dropped_before_move() {
        let mut t = table(3);
        t.select(1);
        t.selection.select(10);
        assert!(t.move_selection_to(0));
        assert_eq!(names(&t), vec!["r1", "r0", "r2"]);
        assert_eq!(t.selection().indices(), vec![0]);
    }
}
