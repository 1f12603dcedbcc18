//! Paragraph node - a block of inline content

use crate::{Node, NodeId, NodeType};
use serde::{Deserialize, Serialize};

/// A paragraph containing text runs and hard breaks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    id: NodeId,
    parent: Option<NodeId>,
    /// IDs of inline children
    children: Vec<NodeId>,
}

impl Paragraph {
    /// Create a new empty paragraph
    pub fn new() -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Add a child at the end
    pub fn add_child(&mut self, child_id: NodeId) {
        self.children.push(child_id);
    }

    /// Insert a child at a specific index
    pub fn insert_child(&mut self, index: usize, child_id: NodeId) {
        let index = index.min(self.children.len());
        self.children.insert(index, child_id);
    }

    /// Remove a child by ID
    pub fn remove_child(&mut self, child_id: NodeId) -> bool {
        if let Some(pos) = self.children.iter().position(|&id| id == child_id) {
            self.children.remove(pos);
            true
        } else {
            false
        }
    }

    /// Detach and return the children from `index` onwards
    pub fn split_off_children(&mut self, index: usize) -> Vec<NodeId> {
        let index = index.min(self.children.len());
        self.children.split_off(index)
    }

    /// Whether the paragraph has no inline content
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Paragraph {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::Paragraph
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn can_have_children(&self) -> bool {
        true
    }
}
