//! Undo/redo manager

use crate::{Command, EditError, Result};

/// An entry in the undo stack
#[derive(Debug)]
struct UndoEntry {
    /// The original command
    command: Box<dyn Command>,
    /// The inverse command (for undo)
    inverse: Box<dyn Command>,
}

/// Manages undo and redo stacks
#[derive(Debug)]
pub struct UndoManager {
    /// Stack of commands that can be undone
    undo_stack: Vec<UndoEntry>,
    /// Stack of commands that can be redone
    redo_stack: Vec<Box<dyn Command>>,
    /// Maximum number of undo entries
    max_entries: usize,
}

impl UndoManager {
    /// Create a new undo manager
    pub fn new() -> Self {
        Self::with_limit(100)
    }

    /// Create with a custom history limit
    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries,
        }
    }

    /// Push a command onto the undo stack
    pub fn push(&mut self, command: Box<dyn Command>, inverse: Box<dyn Command>) {
        // A new edit invalidates anything that was undone
        self.redo_stack.clear();

        self.undo_stack.push(UndoEntry { command, inverse });

        while self.undo_stack.len() > self.max_entries {
            self.undo_stack.remove(0);
        }
    }

    /// Pop the last command for undo
    pub fn pop_undo(&mut self) -> Result<Box<dyn Command>> {
        let entry = self.undo_stack.pop().ok_or(EditError::UndoStackEmpty)?;
        self.redo_stack.push(entry.command);
        Ok(entry.inverse)
    }

    /// Pop a command for redo
    pub fn pop_redo(&mut self) -> Result<Box<dyn Command>> {
        self.redo_stack.pop().ok_or(EditError::RedoStackEmpty)
    }

    /// Record the inverse of a redone command so it can be undone again
    pub fn push_redone(&mut self, command: Box<dyn Command>, inverse: Box<dyn Command>) {
        self.undo_stack.push(UndoEntry { command, inverse });
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undoable entries
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InsertText;

    fn cmd() -> Box<dyn Command> {
        Box::new(InsertText::new("x"))
    }

    #[test]
    fn test_push_and_pop() {
        let mut undo = UndoManager::new();
        assert!(!undo.can_undo());

        undo.push(cmd(), cmd());
        assert!(undo.can_undo());
        assert!(!undo.can_redo());

        undo.pop_undo().unwrap();
        assert!(!undo.can_undo());
        assert!(undo.can_redo());
    }

    #[test]
    fn test_new_command_clears_redo() {
        let mut undo = UndoManager::new();
        undo.push(cmd(), cmd());
        undo.pop_undo().unwrap();
        undo.push(cmd(), cmd());
        assert!(!undo.can_redo());
    }

    #[test]
    fn test_limit() {
        let mut undo = UndoManager::with_limit(3);
        for _ in 0..5 {
            undo.push(cmd(), cmd());
        }
        assert_eq!(undo.undo_depth(), 3);
    }

    #[test]
    fn test_empty_stacks_error() {
        let mut undo = UndoManager::new();
        assert!(matches!(undo.pop_undo(), Err(EditError::UndoStackEmpty)));
        assert!(matches!(undo.pop_redo(), Err(EditError::RedoStackEmpty)));
    }
}
