//! Core node trait and types

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// Enumeration of all node types in the document tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Document,
    Paragraph,
    Run,
    HardBreak,
    ResizableImage,
}

impl NodeType {
    /// Schema name of the node type, as used by extensions and plugins
    pub fn name(&self) -> &'static str {
        match self {
            NodeType::Document => "doc",
            NodeType::Paragraph => "paragraph",
            NodeType::Run => "text",
            NodeType::HardBreak => "hardBreak",
            NodeType::ResizableImage => crate::IMAGE_NODE_NAME,
        }
    }
}

/// Common interface for all document nodes
pub trait Node: std::fmt::Debug {
    /// Get the unique ID of this node
    fn id(&self) -> NodeId;

    /// Get the type of this node
    fn node_type(&self) -> NodeType;

    /// Get the IDs of child nodes
    fn children(&self) -> &[NodeId];

    /// Get the ID of the parent node (None for root and detached nodes)
    fn parent(&self) -> Option<NodeId>;

    /// Set the parent node ID
    fn set_parent(&mut self, parent: Option<NodeId>);

    /// Check if this node can have children
    fn can_have_children(&self) -> bool;

    /// Get the text content of this node (if any)
    fn text_content(&self) -> Option<&str> {
        None
    }
}
