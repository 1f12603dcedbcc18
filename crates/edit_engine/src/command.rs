//! Command system for document editing

use doc_model::{DocumentTree, Selection};

/// Result of applying a command
#[derive(Debug)]
pub struct CommandResult {
    /// The new document tree after the command
    pub tree: DocumentTree,
    /// The new selection after the command
    pub selection: Selection,
    /// The inverse command (for undo)
    pub inverse: Box<dyn Command>,
}

/// Trait for all editing commands
pub trait Command: std::fmt::Debug + Send + Sync {
    /// Apply this command to a document
    fn apply(&self, tree: &DocumentTree, selection: &Selection) -> crate::Result<CommandResult>;

    /// Get a display name for this command
    fn display_name(&self) -> &str;

    /// Clone this command into a box
    fn clone_box(&self) -> Box<dyn Command>;
}

/// Put back a previous document state.
///
/// Used as the inverse of structural edits (splits, joins, replacements)
/// where an exact step-by-step inverse would need the same bookkeeping as a
/// snapshot anyway.
#[derive(Debug, Clone)]
pub struct RestoreSnapshot {
    pub tree: DocumentTree,
    pub selection: Selection,
}

impl RestoreSnapshot {
    pub fn new(tree: &DocumentTree, selection: &Selection) -> Self {
        Self {
            tree: tree.clone(),
            selection: *selection,
        }
    }
}

impl Command for RestoreSnapshot {
    fn apply(&self, tree: &DocumentTree, selection: &Selection) -> crate::Result<CommandResult> {
        Ok(CommandResult {
            tree: self.tree.clone(),
            selection: self.selection,
            inverse: Box::new(RestoreSnapshot::new(tree, selection)),
        })
    }

    fn display_name(&self) -> &str {
        "Restore"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}
