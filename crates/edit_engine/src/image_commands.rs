//! Image commands for inserting, updating, and removing resizable images

use crate::{Command, CommandResult, EditError, RestoreSnapshot, Result};
use doc_model::{DocumentTree, ImageAttrs, ImageNode, NodeId, Selection};
use serde::{Deserialize, Serialize};

/// Insert a resizable image at the current selection.
///
/// A non-empty selection is replaced. The `src` is not validated: any string
/// is accepted and an unreachable URL simply renders as a broken image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetResizableImage {
    /// Image URL
    pub src: String,
    /// Alternative text
    #[serde(default)]
    pub alt: Option<String>,
    /// Width in pixels
    #[serde(default)]
    pub width: Option<u32>,
    /// Height in pixels
    #[serde(default)]
    pub height: Option<u32>,
}

impl SetResizableImage {
    /// Insert an image with only a source URL
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: None,
            width: None,
            height: None,
        }
    }

    /// Set the alt text
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// Set both display dimensions
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Attributes of the node this command creates
    pub fn attrs(&self) -> ImageAttrs {
        ImageAttrs {
            src: Some(self.src.clone()),
            alt: self.alt.clone(),
            title: None,
            width: self.width,
            height: self.height,
        }
    }
}

impl Command for SetResizableImage {
    fn apply(&self, tree: &DocumentTree, selection: &Selection) -> Result<CommandResult> {
        let mut new_tree = tree.clone();
        let from = selection.from();
        new_tree.delete_range(from, selection.to())?;

        let image_pos = new_tree.insert_image_at(from, ImageNode::new(self.attrs()))?;

        Ok(CommandResult {
            tree: new_tree,
            // Caret lands right after the image
            selection: Selection::collapsed(image_pos + 1),
            inverse: Box::new(RestoreSnapshot::new(tree, selection)),
        })
    }

    fn display_name(&self) -> &str {
        "Insert Image"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Replace every attribute of an image at once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateImageAttributes {
    pub image_id: NodeId,
    pub attrs: ImageAttrs,
}

impl UpdateImageAttributes {
    pub fn new(image_id: NodeId, attrs: ImageAttrs) -> Self {
        Self { image_id, attrs }
    }
}

impl Command for UpdateImageAttributes {
    fn apply(&self, tree: &DocumentTree, selection: &Selection) -> Result<CommandResult> {
        let previous = tree
            .get_image(self.image_id)
            .ok_or(EditError::ImageNotFound(self.image_id))?
            .attrs
            .clone();

        let mut new_tree = tree.clone();
        new_tree.set_image_attrs(self.image_id, self.attrs.clone())?;

        Ok(CommandResult {
            tree: new_tree,
            selection: *selection,
            inverse: Box::new(UpdateImageAttributes::new(self.image_id, previous)),
        })
    }

    fn display_name(&self) -> &str {
        "Update Image"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Delete an image by ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteImage {
    pub image_id: NodeId,
}

impl DeleteImage {
    pub fn new(image_id: NodeId) -> Self {
        Self { image_id }
    }
}

impl Command for DeleteImage {
    fn apply(&self, tree: &DocumentTree, selection: &Selection) -> Result<CommandResult> {
        if tree.get_image(self.image_id).is_none() {
            return Err(EditError::ImageNotFound(self.image_id));
        }
        let mut new_tree = tree.clone();
        new_tree.remove_block(self.image_id)?;
        new_tree.ensure_block();

        Ok(CommandResult {
            selection: selection.clamp(new_tree.content_size()),
            tree: new_tree,
            inverse: Box::new(RestoreSnapshot::new(tree, selection)),
        })
    }

    fn display_name(&self) -> &str {
        "Delete Image"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}
