//! Command execution engine

use crate::{Command, Result, UndoManager};
use doc_model::{DocumentTree, Selection};

/// The editing engine that owns the document state and runs commands
#[derive(Debug)]
pub struct EditingEngine {
    /// Current document tree
    tree: DocumentTree,
    /// Current selection
    selection: Selection,
    /// Undo manager
    undo_manager: UndoManager,
}

impl EditingEngine {
    /// Create a new editing engine with an empty document
    pub fn new() -> Self {
        Self::with_tree(DocumentTree::with_empty_paragraph())
    }

    /// Create an editing engine with a specific document tree.
    /// The caret starts inside the first block.
    pub fn with_tree(tree: DocumentTree) -> Self {
        let selection = Selection::collapsed(1.min(tree.content_size()));
        Self {
            tree,
            selection,
            undo_manager: UndoManager::new(),
        }
    }

    /// Get the current document tree
    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    /// Get the current selection
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Set the selection, clamped to the document
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamp(self.tree.content_size());
    }

    /// Execute a command
    pub fn execute(&mut self, command: Box<dyn Command>) -> Result<()> {
        let result = command.apply(&self.tree, &self.selection)?;

        self.undo_manager.push(command, result.inverse);
        self.tree = result.tree;
        self.selection = result.selection;

        Ok(())
    }

    /// Execute a command, reporting success as a boolean.
    ///
    /// This is the chaining convention exposed to UI hosts: a failed command
    /// leaves the document untouched and returns `false`.
    pub fn run(&mut self, command: Box<dyn Command>) -> bool {
        let name = command.display_name().to_string();
        match self.execute(command) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Command '{}' failed: {}", name, e);
                false
            }
        }
    }

    /// Undo the last command
    pub fn undo(&mut self) -> Result<()> {
        let inverse = self.undo_manager.pop_undo()?;
        let result = inverse.apply(&self.tree, &self.selection)?;

        self.tree = result.tree;
        self.selection = result.selection;

        Ok(())
    }

    /// Redo the last undone command
    pub fn redo(&mut self) -> Result<()> {
        let command = self.undo_manager.pop_redo()?;
        let result = command.apply(&self.tree, &self.selection)?;

        self.undo_manager.push_redone(command, result.inverse);
        self.tree = result.tree;
        self.selection = result.selection;

        Ok(())
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.undo_manager.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.undo_manager.can_redo()
    }

    /// Replace the whole document, dropping history
    pub fn load(&mut self, tree: DocumentTree) {
        *self = Self::with_tree(tree);
    }
}

impl Default for EditingEngine {
    fn default() -> Self {
        Self::new()
    }
}
