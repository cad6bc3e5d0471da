//! Undo/redo history for text box edits.
//!
//! Every mutation is recorded as an [`EditOperation`] in flat char offsets.
//! Consecutive typing and backspacing within a short interval merge into a
//! single step.

use std::time::{Duration, Instant};

use unicode_segmentation::UnicodeSegmentation;

use crate::unicode::char_len;

/// Maximum number of undo groups to keep.
pub const DEFAULT_UNDO_LIMIT: usize = 1000;

/// Time threshold for grouping consecutive typing.
const TYPING_GROUP_THRESHOLD: Duration = Duration::from_millis(500);

/// A single replacement: `removed` at `offset` became `inserted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOperation {
    /// Flat char offset where the change starts.
    pub offset: usize,
    pub removed: String,
    pub inserted: String,
    /// Cursor offset before the edit.
    pub cursor_before: usize,
    /// Cursor offset after the edit.
    pub cursor_after: usize,
}

impl EditOperation {
    pub fn is_insert(&self) -> bool {
        self.removed.is_empty() && !self.inserted.is_empty()
    }

    pub fn is_delete(&self) -> bool {
        self.inserted.is_empty() && !self.removed.is_empty()
    }

    /// Whether `next` continues this operation as typing or backspacing.
    pub fn can_group_with(&self, next: &EditOperation) -> bool {
        if self.is_insert() && next.is_insert() {
            return is_single_grapheme(&next.inserted)
                && !next.inserted.contains('\n')
                && next.offset == self.offset + char_len(&self.inserted);
        }
        if self.is_delete() && next.is_delete() {
            return is_single_grapheme(&next.removed)
                && next.offset + char_len(&next.removed) == self.offset;
        }
        false
    }

    /// Combine this operation with a following one that groups with it.
    pub fn merge_with(&self, next: &EditOperation) -> Option<EditOperation> {
        if !self.can_group_with(next) {
            return None;
        }
        if self.is_insert() {
            let mut inserted = self.inserted.clone();
            inserted.push_str(&next.inserted);
            Some(EditOperation {
                offset: self.offset,
                removed: String::new(),
                inserted,
                cursor_before: self.cursor_before,
                cursor_after: next.cursor_after,
            })
        } else {
            let mut removed = next.removed.clone();
            removed.push_str(&self.removed);
            Some(EditOperation {
                offset: next.offset,
                removed,
                inserted: String::new(),
                cursor_before: self.cursor_before,
                cursor_after: next.cursor_after,
            })
        }
    }

    /// The operation that reverts this one.
    pub fn inverse(&self) -> EditOperation {
        EditOperation {
            offset: self.offset,
            removed: self.inserted.clone(),
            inserted: self.removed.clone(),
            cursor_before: self.cursor_after,
            cursor_after: self.cursor_before,
        }
    }
}

fn is_single_grapheme(text: &str) -> bool {
    text.graphemes(true).count() == 1
}

/// Operations undone or redone together.
#[derive(Debug, Clone)]
struct OperationGroup {
    operations: Vec<EditOperation>,
    /// Time of the latest operation in the group.
    last_edit: Instant,
}

impl OperationGroup {
    fn new(operation: EditOperation, now: Instant) -> Self {
        Self {
            operations: vec![operation],
            last_edit: now,
        }
    }

    /// Merge `operation` into the last one if it continues it in time.
    fn try_add(&mut self, operation: &EditOperation, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_edit) > TYPING_GROUP_THRESHOLD {
            return false;
        }
        let Some(last) = self.operations.last_mut() else {
            return false;
        };
        match last.merge_with(operation) {
            Some(merged) => {
                *last = merged;
                self.last_edit = now;
                true
            }
            None => false,
        }
    }
}

/// Undo/redo stacks.
#[derive(Debug)]
pub struct UndoStack {
    undo_stack: Vec<OperationGroup>,
    redo_stack: Vec<OperationGroup>,
    limit: usize,
    group_operations: bool,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_UNDO_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit,
            group_operations: true,
        }
    }

    /// Build a stack from the `[history]` configuration section.
    pub fn from_config(config: &quire_config::HistoryConfig) -> Self {
        let mut stack = Self::with_limit(config.undo_limit);
        stack.set_grouping(config.group_typing);
        stack
    }

    pub fn set_grouping(&mut self, enabled: bool) {
        self.group_operations = enabled;
    }

    /// Record an operation. Clears the redo stack.
    pub fn push(&mut self, operation: EditOperation) {
        self.push_at(operation, Instant::now());
    }

    fn push_at(&mut self, operation: EditOperation, now: Instant) {
        self.redo_stack.clear();

        if self.group_operations {
            if let Some(last_group) = self.undo_stack.last_mut() {
                if last_group.try_add(&operation, now) {
                    return;
                }
            }
        }

        self.undo_stack.push(OperationGroup::new(operation, now));
        if self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
    }

    /// Pop the latest group. The operations are returned already inverted
    /// and in the order they must be applied.
    pub fn undo(&mut self) -> Option<Vec<EditOperation>> {
        let group = self.undo_stack.pop()?;
        let inverted = group.operations.iter().rev().map(EditOperation::inverse).collect();
        self.redo_stack.push(group);
        Some(inverted)
    }

    /// Re-apply the latest undone group.
    pub fn redo(&mut self) -> Option<Vec<EditOperation>> {
        let group = self.redo_stack.pop()?;
        let operations = group.operations.clone();
        self.undo_stack.push(group);
        Some(operations)
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

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        if self.undo_stack.len() > limit {
            let excess = self.undo_stack.len() - limit;
            self.undo_stack.drain(..excess);
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(offset: usize, text: &str) -> EditOperation {
        EditOperation {
            offset,
            removed: String::new(),
            inserted: text.to_string(),
            cursor_before: offset,
            cursor_after: offset + text.chars().count(),
        }
    }

    fn backspace(offset: usize, text: &str) -> EditOperation {
        EditOperation {
            offset,
            removed: text.to_string(),
            inserted: String::new(),
            cursor_before: offset + text.chars().count(),
            cursor_after: offset,
        }
    }

    #[test]
    fn push_undo_redo() {
        let mut stack = UndoStack::new();
        stack.push(insert(0, "Hello"));
        assert!(stack.can_undo());
        assert!(!stack.can_redo());

        let undone = stack.undo().unwrap();
        assert_eq!(undone, vec![insert(0, "Hello").inverse()]);
        assert!(stack.can_redo());

        let redone = stack.redo().unwrap();
        assert_eq!(redone, vec![insert(0, "Hello")]);
        assert!(!stack.can_redo());
    }

    #[test]
    fn push_clears_redo() {
        let mut stack = UndoStack::new();
        stack.push(insert(0, "Hello"));
        stack.undo();
        stack.push(insert(0, "World"));
        assert!(!stack.can_redo());
    }

    #[test]
    fn typing_groups_within_threshold() {
        let mut stack = UndoStack::new();
        let start = Instant::now();
        stack.push_at(insert(0, "H"), start);
        stack.push_at(insert(1, "é"), start + Duration::from_millis(200));
        stack.push_at(insert(2, "y"), start + Duration::from_millis(600));
        assert_eq!(stack.undo_count(), 1);
        assert_eq!(stack.undo().unwrap()[0].removed, "Héy");

        // A pause longer than the threshold starts a new step.
        stack.push_at(insert(0, "a"), start + Duration::from_secs(5));
        stack.push_at(insert(1, "b"), start + Duration::from_secs(6));
        assert_eq!(stack.undo_count(), 2);
    }

    #[test]
    fn pastes_and_newlines_are_separate_steps() {
        let mut stack = UndoStack::new();
        let now = Instant::now();
        stack.push_at(insert(0, "a"), now);
        stack.push_at(insert(1, "pasted"), now);
        stack.push_at(insert(7, "\n"), now);
        assert_eq!(stack.undo_count(), 3);
    }

    #[test]
    fn backspaces_group() {
        let mut stack = UndoStack::new();
        let now = Instant::now();
        stack.push_at(backspace(2, "l"), now);
        stack.push_at(backspace(1, "e"), now);
        assert_eq!(stack.undo_count(), 1);
        let undone = stack.undo().unwrap();
        assert_eq!(undone[0].inserted, "el");
        assert_eq!(undone[0].offset, 1);
        assert_eq!(undone[0].cursor_after, 3);
    }

    #[test]
    fn grouping_can_be_disabled() {
        let mut stack = UndoStack::new();
        stack.set_grouping(false);
        stack.push(insert(0, "H"));
        stack.push(insert(1, "e"));
        assert_eq!(stack.undo_count(), 2);
    }

    #[test]
    fn limit_drops_oldest() {
        let mut stack = UndoStack::with_limit(3);
        stack.set_grouping(false);
        for i in 0..5 {
            stack.push(insert(i, "x"));
        }
        assert_eq!(stack.undo_count(), 3);
        stack.set_limit(1);
        assert_eq!(stack.undo_count(), 1);
        assert_eq!(stack.undo().unwrap()[0].offset, 4);
    }

    #[test]
    fn clear_empties_both_stacks() {
        let mut stack = UndoStack::new();
        stack.push(insert(0, "Hello"));
        stack.undo();
        stack.clear();
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn inverse_swaps_text_and_cursors() {
        let op = EditOperation {
            offset: 3,
            removed: "ab".into(),
            inserted: "xyz".into(),
            cursor_before: 5,
            cursor_after: 6,
        };
        let inv = op.inverse();
        assert_eq!(inv.removed, "xyz");
        assert_eq!(inv.inserted, "ab");
        assert_eq!(inv.cursor_after, 5);
        assert_eq!(inv.inverse(), op);
    }
}
