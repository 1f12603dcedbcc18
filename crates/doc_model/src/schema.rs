//! Node schema - structural rules for each node type

use crate::NodeType;
use serde::{Deserialize, Serialize};

/// Content group a node type belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
    Block,
    Inline,
}

/// Structural description of a node type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Schema name (e.g. "paragraph", "resizableImage")
    pub name: &'static str,
    /// Group the node is allowed in
    pub group: NodeGroup,
    /// Whether the node flows inline with text
    pub inline: bool,
    /// Leaf nodes have no content and occupy a single position
    pub leaf: bool,
    /// Whether the node can be dragged as a whole in the view
    pub draggable: bool,
}

impl NodeSpec {
    /// Look up the spec for a node type
    pub fn for_type(node_type: NodeType) -> NodeSpec {
        match node_type {
            NodeType::Document => NodeSpec {
                name: node_type.name(),
                group: NodeGroup::Block,
                inline: false,
                leaf: false,
                draggable: false,
            },
            NodeType::Paragraph => NodeSpec {
                name: node_type.name(),
                group: NodeGroup::Block,
                inline: false,
                leaf: false,
                draggable: false,
            },
            NodeType::Run => NodeSpec {
                name: node_type.name(),
                group: NodeGroup::Inline,
                inline: true,
                leaf: true,
                draggable: false,
            },
            NodeType::HardBreak => NodeSpec {
                name: node_type.name(),
                group: NodeGroup::Inline,
                inline: true,
                leaf: true,
                draggable: false,
            },
            NodeType::ResizableImage => crate::ImageNode::spec(),
        }
    }

    /// Whether the node sits directly in the document body
    pub fn is_block(&self) -> bool {
        self.group == NodeGroup::Block
    }
}
