//! Inline nodes - text runs and hard line breaks

use crate::{Node, NodeId, NodeType};
use serde::{Deserialize, Serialize};

/// A run of plain text inside a paragraph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    id: NodeId,
    parent: Option<NodeId>,
    /// The text content of this run
    pub text: String,
}

impl Run {
    /// Create a new run with text content
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            text: text.into(),
        }
    }

    /// Length of the run in document positions (one per character)
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the run holds no text
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl Node for Run {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::Run
    }

    fn children(&self) -> &[NodeId] {
        &[]
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn can_have_children(&self) -> bool {
        false
    }

    fn text_content(&self) -> Option<&str> {
        Some(&self.text)
    }
}

/// A forced line break inside a paragraph (`<br>`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardBreak {
    id: NodeId,
    parent: Option<NodeId>,
}

impl HardBreak {
    pub fn new() -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
        }
    }
}

impl Default for HardBreak {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for HardBreak {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::HardBreak
    }

    fn children(&self) -> &[NodeId] {
        &[]
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn can_have_children(&self) -> bool {
        false
    }

    fn text_content(&self) -> Option<&str> {
        Some("\n")
    }
}
