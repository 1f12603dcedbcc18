//! Ordinary text edits: typing and deleting the selection

use crate::{Command, CommandResult, RestoreSnapshot, Result};
use doc_model::{DocumentTree, Selection};
use serde::{Deserialize, Serialize};

/// Replace the selection with text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertText {
    pub text: String,
}

impl InsertText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Command for InsertText {
    fn apply(&self, tree: &DocumentTree, selection: &Selection) -> Result<CommandResult> {
        let mut new_tree = tree.clone();
        let from = selection.from();
        new_tree.delete_range(from, selection.to())?;
        let caret = new_tree.insert_text(from, &self.text)?;

        Ok(CommandResult {
            tree: new_tree,
            selection: Selection::collapsed(caret),
            inverse: Box::new(RestoreSnapshot::new(tree, selection)),
        })
    }

    fn display_name(&self) -> &str {
        "Insert Text"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Delete whatever the selection covers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteSelection;

impl Command for DeleteSelection {
    fn apply(&self, tree: &DocumentTree, selection: &Selection) -> Result<CommandResult> {
        let mut new_tree = tree.clone();
        new_tree.delete_range(selection.from(), selection.to())?;
        new_tree.ensure_block();
        let caret = selection.from().min(new_tree.content_size());

        Ok(CommandResult {
            tree: new_tree,
            selection: Selection::collapsed(caret),
            inverse: Box::new(RestoreSnapshot::new(tree, selection)),
        })
    }

    fn display_name(&self) -> &str {
        "Delete"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{ImageAttrs, Node};

    #[test]
    fn test_insert_text_at_caret() {
        let mut tree = DocumentTree::new();
        tree.push_paragraph("Hello");

        let result = InsertText::new("!").apply(&tree, &Selection::collapsed(6)).unwrap();
        assert_eq!(result.tree.plain_text(), "Hello!");
        assert_eq!(result.selection, Selection::collapsed(7));
    }

    #[test]
    fn test_insert_text_replaces_selection() {
        let mut tree = DocumentTree::new();
        tree.push_paragraph("Hello");

        let result = InsertText::new("J").apply(&tree, &Selection::new(1, 2)).unwrap();
        assert_eq!(result.tree.plain_text(), "Jello");
    }

    #[test]
    fn test_delete_selected_image() {
        let mut tree = DocumentTree::new();
        tree.push_paragraph("a");
        tree.push_image(ImageAttrs::with_src("x.png"));

        let result = DeleteSelection.apply(&tree, &Selection::node(3)).unwrap();
        assert!(result.tree.image_ids().is_empty());
        assert_eq!(result.selection, Selection::collapsed(3));

        let undone = result.inverse.apply(&result.tree, &result.selection).unwrap();
        assert_eq!(undone.tree.image_ids().len(), 1);
    }

    #[test]
    fn test_delete_everything_leaves_empty_paragraph() {
        let mut tree = DocumentTree::new();
        tree.push_image(ImageAttrs::default());

        let result = DeleteSelection.apply(&tree, &Selection::all(1)).unwrap();
        assert_eq!(result.tree.document.children().len(), 1);
        assert_eq!(result.tree.content_size(), 2);
        assert_eq!(result.selection, Selection::collapsed(0));
    }
}
