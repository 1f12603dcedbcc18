//! Selection model - cursor position and range selection
//!
//! Positions are integer offsets into the document content: position 0 is
//! before the first block, entering a paragraph costs one position, each
//! character costs one, and leaving the paragraph costs one more. Leaf blocks
//! such as images occupy exactly one position.

use serde::{Deserialize, Serialize};

/// A selection in the document
///
/// A selection has an anchor (where the selection started) and a focus
/// (where the selection ends / where the caret is). When anchor == focus,
/// the selection is collapsed (just a caret).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    /// Where the selection started
    pub anchor: usize,
    /// Where the selection ends (caret position)
    pub focus: usize,
}

impl Selection {
    /// Create a new selection
    pub fn new(anchor: usize, focus: usize) -> Self {
        Self { anchor, focus }
    }

    /// Create a collapsed selection (caret only)
    pub fn collapsed(pos: usize) -> Self {
        Self {
            anchor: pos,
            focus: pos,
        }
    }

    /// Select a whole leaf node starting at `pos`
    pub fn node(pos: usize) -> Self {
        Self::new(pos, pos + 1)
    }

    /// Select the whole document content
    pub fn all(content_size: usize) -> Self {
        Self::new(0, content_size)
    }

    /// Check if this selection is collapsed (just a caret)
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Lower bound of the selection, regardless of direction
    pub fn from(&self) -> usize {
        self.anchor.min(self.focus)
    }

    /// Upper bound of the selection, regardless of direction
    pub fn to(&self) -> usize {
        self.anchor.max(self.focus)
    }

    /// Whether the range `[start, end]` lies entirely inside the selection
    pub fn encloses(&self, start: usize, end: usize) -> bool {
        self.from() <= start && self.to() >= end
    }

    /// Move the focus, extending the selection
    pub fn extend_to(&self, focus: usize) -> Self {
        Self {
            anchor: self.anchor,
            focus,
        }
    }

    /// Collapse the selection to its end
    pub fn collapse_to_end(&self) -> Self {
        Self::collapsed(self.to())
    }

    /// Collapse the selection to its start
    pub fn collapse_to_start(&self) -> Self {
        Self::collapsed(self.from())
    }

    /// Clamp both ends into `0..=content_size`
    pub fn clamp(&self, content_size: usize) -> Self {
        Self {
            anchor: self.anchor.min(content_size),
            focus: self.focus.min(content_size),
        }
    }
}
