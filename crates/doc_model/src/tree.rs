//! Document tree operations and storage

use crate::{
    DocModelError, Document, HardBreak, ImageAttrs, ImageNode, Node, NodeId, NodeType, Paragraph,
    Result, Run,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage for different node types
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeStorage {
    pub paragraphs: HashMap<NodeId, Paragraph>,
    pub runs: HashMap<NodeId, Run>,
    pub hard_breaks: HashMap<NodeId, HardBreak>,
    pub images: HashMap<NodeId, ImageNode>,
}

/// Borrowed view of any non-root node
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Paragraph(&'a Paragraph),
    Run(&'a Run),
    HardBreak(&'a HardBreak),
    Image(&'a ImageNode),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        match self {
            NodeRef::Paragraph(n) => n.id(),
            NodeRef::Run(n) => n.id(),
            NodeRef::HardBreak(n) => n.id(),
            NodeRef::Image(n) => n.id(),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeRef::Paragraph(_) => NodeType::Paragraph,
            NodeRef::Run(_) => NodeType::Run,
            NodeRef::HardBreak(_) => NodeType::HardBreak,
            NodeRef::Image(_) => NodeType::ResizableImage,
        }
    }

    /// The image node, if this is one
    pub fn as_image(&self) -> Option<&'a ImageNode> {
        match *self {
            NodeRef::Image(image) => Some(image),
            _ => None,
        }
    }
}

/// A node together with its absolute position, as yielded by
/// [`DocumentTree::descendants`]
#[derive(Debug, Clone, Copy)]
pub struct NodeEntry<'a> {
    pub node: NodeRef<'a>,
    /// Position directly before the node
    pub pos: usize,
    /// Number of positions the node occupies
    pub size: usize,
}

impl NodeEntry<'_> {
    /// Position directly after the node
    pub fn end(&self) -> usize {
        self.pos + self.size
    }
}

/// A document position resolved against the block structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedPos {
    /// Between top-level blocks; `index` is the block that follows
    Boundary { index: usize },
    /// Inside a paragraph, `offset` positions after its opening
    InParagraph {
        index: usize,
        para_id: NodeId,
        offset: usize,
    },
}

/// Position and extent of a top-level block
#[derive(Debug, Clone, Copy)]
struct BlockSpan {
    id: NodeId,
    start: usize,
    size: usize,
}

impl BlockSpan {
    fn end(&self) -> usize {
        self.start + self.size
    }
}

/// The complete document tree structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTree {
    /// The root document
    pub document: Document,
    /// Storage for all nodes
    pub nodes: NodeStorage,
}

impl DocumentTree {
    /// Create a new empty document tree
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            nodes: NodeStorage::default(),
        }
    }

    /// Create a document tree with a single empty paragraph
    pub fn with_empty_paragraph() -> Self {
        let mut tree = Self::new();
        tree.push_paragraph("");
        tree
    }

    /// Get the document root ID
    pub fn root_id(&self) -> NodeId {
        self.document.id()
    }

    /// Get a paragraph by ID
    pub fn get_paragraph(&self, id: NodeId) -> Option<&Paragraph> {
        self.nodes.paragraphs.get(&id)
    }

    /// Get a run by ID
    pub fn get_run(&self, id: NodeId) -> Option<&Run> {
        self.nodes.runs.get(&id)
    }

    /// Get an image by ID
    pub fn get_image(&self, id: NodeId) -> Option<&ImageNode> {
        self.nodes.images.get(&id)
    }

    /// Get a mutable image by ID
    pub fn get_image_mut(&mut self, id: NodeId) -> Option<&mut ImageNode> {
        self.nodes.images.get_mut(&id)
    }

    /// Get the node type for a given ID
    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        if id == self.document.id() {
            return Some(NodeType::Document);
        }
        if self.nodes.paragraphs.contains_key(&id) {
            return Some(NodeType::Paragraph);
        }
        if self.nodes.runs.contains_key(&id) {
            return Some(NodeType::Run);
        }
        if self.nodes.hard_breaks.contains_key(&id) {
            return Some(NodeType::HardBreak);
        }
        if self.nodes.images.contains_key(&id) {
            return Some(NodeType::ResizableImage);
        }
        None
    }

    /// Borrow any non-root node
    pub fn node_ref(&self, id: NodeId) -> Option<NodeRef<'_>> {
        if let Some(p) = self.nodes.paragraphs.get(&id) {
            return Some(NodeRef::Paragraph(p));
        }
        if let Some(r) = self.nodes.runs.get(&id) {
            return Some(NodeRef::Run(r));
        }
        if let Some(b) = self.nodes.hard_breaks.get(&id) {
            return Some(NodeRef::HardBreak(b));
        }
        self.nodes.images.get(&id).map(NodeRef::Image)
    }

    /// IDs of all images in document order
    pub fn image_ids(&self) -> Vec<NodeId> {
        self.document
            .children()
            .iter()
            .copied()
            .filter(|id| self.nodes.images.contains_key(id))
            .collect()
    }

    // ------------------------------------------------------------------
    // Sizes and positions
    // ------------------------------------------------------------------

    fn inline_size(&self, id: NodeId) -> usize {
        if let Some(run) = self.nodes.runs.get(&id) {
            run.len()
        } else if self.nodes.hard_breaks.contains_key(&id) {
            1
        } else {
            0
        }
    }

    /// Number of positions inside a paragraph (between its open and close)
    pub fn paragraph_content_size(&self, para_id: NodeId) -> usize {
        self.get_paragraph(para_id)
            .map(|p| p.children().iter().map(|&c| self.inline_size(c)).sum())
            .unwrap_or(0)
    }

    /// Number of positions a top-level block occupies
    pub fn block_size(&self, id: NodeId) -> usize {
        if self.nodes.paragraphs.contains_key(&id) {
            2 + self.paragraph_content_size(id)
        } else if self.nodes.images.contains_key(&id) {
            1
        } else {
            0
        }
    }

    /// Size of the whole document content
    pub fn content_size(&self) -> usize {
        self.document
            .children()
            .iter()
            .map(|&id| self.block_size(id))
            .sum()
    }

    fn block_spans(&self) -> Vec<BlockSpan> {
        let mut start = 0;
        self.document
            .children()
            .iter()
            .map(|&id| {
                let size = self.block_size(id);
                let span = BlockSpan { id, start, size };
                start += size;
                span
            })
            .collect()
    }

    /// Position directly before a top-level block
    pub fn block_position(&self, id: NodeId) -> Option<usize> {
        self.block_spans()
            .into_iter()
            .find(|span| span.id == id)
            .map(|span| span.start)
    }

    /// All nodes below the root in document order, with their positions
    pub fn descendants(&self) -> Vec<NodeEntry<'_>> {
        let mut entries = Vec::new();
        for span in self.block_spans() {
            let Some(node) = self.node_ref(span.id) else {
                continue;
            };
            entries.push(NodeEntry {
                node,
                pos: span.start,
                size: span.size,
            });

            if let NodeRef::Paragraph(para) = node {
                let mut pos = span.start + 1;
                for &child in para.children() {
                    if let Some(child_node) = self.node_ref(child) {
                        let size = self.inline_size(child);
                        entries.push(NodeEntry {
                            node: child_node,
                            pos,
                            size,
                        });
                        pos += size;
                    }
                }
            }
        }
        entries
    }

    /// Resolve a document position against the block structure
    pub fn resolve(&self, pos: usize) -> Result<ResolvedPos> {
        let size = self.content_size();
        if pos > size {
            return Err(DocModelError::InvalidPosition { pos, size });
        }

        for (index, span) in self.block_spans().into_iter().enumerate() {
            if pos == span.start {
                return Ok(ResolvedPos::Boundary { index });
            }
            if pos < span.end() {
                // Only paragraphs have interior positions
                return Ok(ResolvedPos::InParagraph {
                    index,
                    para_id: span.id,
                    offset: pos - span.start - 1,
                });
            }
        }

        Ok(ResolvedPos::Boundary {
            index: self.document.children().len(),
        })
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Insert a paragraph at a body index
    pub fn insert_paragraph(&mut self, index: usize, mut para: Paragraph) -> NodeId {
        let id = para.id();
        para.set_parent(Some(self.document.id()));
        self.nodes.paragraphs.insert(id, para);
        self.document.insert_body_child(index, id);
        id
    }

    /// Insert an image block at a body index
    pub fn insert_image(&mut self, index: usize, mut image: ImageNode) -> NodeId {
        let id = image.id();
        image.set_parent(Some(self.document.id()));
        self.nodes.images.insert(id, image);
        self.document.insert_body_child(index, id);
        id
    }

    /// Append a paragraph holding `text` (no run when empty)
    pub fn push_paragraph(&mut self, text: &str) -> NodeId {
        let index = self.document.children().len();
        let para_id = self.insert_paragraph(index, Paragraph::new());
        if !text.is_empty() {
            // The paragraph was just inserted
            let _ = self.append_run(para_id, Run::new(text));
        }
        para_id
    }

    /// Append an image block
    pub fn push_image(&mut self, attrs: ImageAttrs) -> NodeId {
        let index = self.document.children().len();
        self.insert_image(index, ImageNode::new(attrs))
    }

    /// Append a run to a paragraph
    pub fn append_run(&mut self, para_id: NodeId, mut run: Run) -> Result<NodeId> {
        let run_id = run.id();
        run.set_parent(Some(para_id));
        let para = self
            .nodes
            .paragraphs
            .get_mut(&para_id)
            .ok_or(DocModelError::NodeNotFound(para_id.as_uuid()))?;
        para.add_child(run_id);
        self.nodes.runs.insert(run_id, run);
        self.document.increment_version();
        Ok(run_id)
    }

    /// Append a hard break to a paragraph
    pub fn append_hard_break(&mut self, para_id: NodeId) -> Result<NodeId> {
        let mut hard_break = HardBreak::new();
        let id = hard_break.id();
        hard_break.set_parent(Some(para_id));
        let para = self
            .nodes
            .paragraphs
            .get_mut(&para_id)
            .ok_or(DocModelError::NodeNotFound(para_id.as_uuid()))?;
        para.add_child(id);
        self.nodes.hard_breaks.insert(id, hard_break);
        self.document.increment_version();
        Ok(id)
    }

    /// Keep at least one (empty) paragraph in the body
    pub fn ensure_block(&mut self) {
        if self.document.children().is_empty() {
            self.push_paragraph("");
        }
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Remove a top-level block and everything below it
    pub fn remove_block(&mut self, id: NodeId) -> Result<()> {
        if !self.document.remove_body_child(id) {
            return Err(DocModelError::NodeNotFound(id.as_uuid()));
        }
        if let Some(para) = self.nodes.paragraphs.remove(&id) {
            for child in para.children() {
                self.remove_inline_storage(*child);
            }
        }
        self.nodes.images.remove(&id);
        Ok(())
    }

    fn remove_inline_storage(&mut self, id: NodeId) {
        self.nodes.runs.remove(&id);
        self.nodes.hard_breaks.remove(&id);
    }

    /// Replace all attributes of an image
    pub fn set_image_attrs(&mut self, id: NodeId, attrs: ImageAttrs) -> Result<()> {
        let image = self
            .nodes
            .images
            .get_mut(&id)
            .ok_or(DocModelError::NodeNotFound(id.as_uuid()))?;
        image.set_attrs(attrs);
        self.document.increment_version();
        Ok(())
    }

    /// Make sure a child boundary exists at `offset` inside a paragraph,
    /// splitting a run if needed. Returns the index of the first child at or
    /// after the offset.
    fn split_inline_at(&mut self, para_id: NodeId, offset: usize) -> Result<usize> {
        let children: Vec<NodeId> = self
            .get_paragraph(para_id)
            .ok_or(DocModelError::NodeNotFound(para_id.as_uuid()))?
            .children()
            .to_vec();

        let mut cumulative = 0;
        for (index, child) in children.iter().enumerate() {
            if offset <= cumulative {
                return Ok(index);
            }
            let size = self.inline_size(*child);
            if offset < cumulative + size {
                // Falls inside a run: split its text
                let split_at = offset - cumulative;
                let run = self
                    .nodes
                    .runs
                    .get_mut(child)
                    .ok_or_else(|| DocModelError::InvalidOperation("split inside a leaf".into()))?;
                let byte_index = run
                    .text
                    .char_indices()
                    .nth(split_at)
                    .map(|(i, _)| i)
                    .unwrap_or(run.text.len());
                let tail = run.text.split_off(byte_index);

                let mut tail_run = Run::new(tail);
                tail_run.set_parent(Some(para_id));
                let tail_id = tail_run.id();
                self.nodes.runs.insert(tail_id, tail_run);
                if let Some(para) = self.nodes.paragraphs.get_mut(&para_id) {
                    para.insert_child(index + 1, tail_id);
                }
                return Ok(index + 1);
            }
            cumulative += size;
        }
        Ok(children.len())
    }

    /// Split a paragraph at a content offset; the tail moves into a new
    /// paragraph inserted right after it. Returns the new paragraph's ID.
    pub fn split_paragraph(&mut self, para_id: NodeId, offset: usize) -> Result<NodeId> {
        let index = self
            .document
            .index_of(para_id)
            .ok_or(DocModelError::NodeNotFound(para_id.as_uuid()))?;
        let split_index = self.split_inline_at(para_id, offset)?;

        let tail = match self.nodes.paragraphs.get_mut(&para_id) {
            Some(para) => para.split_off_children(split_index),
            None => return Err(DocModelError::NodeNotFound(para_id.as_uuid())),
        };

        let mut new_para = Paragraph::new();
        let new_id = new_para.id();
        for child in tail {
            new_para.add_child(child);
            self.reparent_inline(child, new_id);
        }
        self.insert_paragraph(index + 1, new_para);
        Ok(new_id)
    }

    fn reparent_inline(&mut self, child: NodeId, parent: NodeId) {
        if let Some(run) = self.nodes.runs.get_mut(&child) {
            run.set_parent(Some(parent));
        } else if let Some(hard_break) = self.nodes.hard_breaks.get_mut(&child) {
            hard_break.set_parent(Some(parent));
        }
    }

    /// Move all content of `second` to the end of `first` and drop `second`
    pub fn join_paragraphs(&mut self, first: NodeId, second: NodeId) -> Result<()> {
        let moved: Vec<NodeId> = self
            .get_paragraph(second)
            .ok_or(DocModelError::NodeNotFound(second.as_uuid()))?
            .children()
            .to_vec();
        if !self.nodes.paragraphs.contains_key(&first) {
            return Err(DocModelError::NodeNotFound(first.as_uuid()));
        }

        for child in &moved {
            self.reparent_inline(*child, first);
            if let Some(para) = self.nodes.paragraphs.get_mut(&first) {
                para.add_child(*child);
            }
        }
        self.nodes.paragraphs.remove(&second);
        self.document.remove_body_child(second);
        Ok(())
    }

    /// Insert an image at a document position and return the position
    /// directly before the inserted image.
    ///
    /// At a block boundary the image goes there. Inside an empty paragraph the
    /// paragraph is replaced. At the start or end of a paragraph the image is
    /// placed before or after it; anywhere else the paragraph is split and the
    /// image lands between the halves.
    pub fn insert_image_at(&mut self, pos: usize, image: ImageNode) -> Result<usize> {
        match self.resolve(pos)? {
            ResolvedPos::Boundary { index } => {
                self.insert_image(index, image);
                Ok(pos)
            }
            ResolvedPos::InParagraph {
                index,
                para_id,
                offset,
            } => {
                let content = self.paragraph_content_size(para_id);
                let para_start = pos - offset - 1;
                if content == 0 {
                    self.remove_block(para_id)?;
                    self.insert_image(index, image);
                    Ok(para_start)
                } else if offset == 0 {
                    self.insert_image(index, image);
                    Ok(para_start)
                } else if offset == content {
                    self.insert_image(index + 1, image);
                    Ok(para_start + content + 2)
                } else {
                    self.split_paragraph(para_id, offset)?;
                    self.insert_image(index + 1, image);
                    Ok(pos + 1)
                }
            }
        }
    }

    /// Insert plain text at a position. Each `'\n'` becomes a hard break.
    /// Returns the caret position after the inserted text.
    pub fn insert_text(&mut self, pos: usize, text: &str) -> Result<usize> {
        let mut caret = pos;
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                caret = self.insert_hard_break_at(caret)?;
            }
            caret = self.insert_line(caret, line.trim_end_matches('\r'))?;
        }
        Ok(caret)
    }

    /// Insert a hard break at a position. Returns the position after it.
    pub fn insert_hard_break_at(&mut self, pos: usize) -> Result<usize> {
        match self.resolve(pos)? {
            ResolvedPos::Boundary { index } => {
                let para_id = self.insert_paragraph(index, Paragraph::new());
                self.append_hard_break(para_id)?;
                Ok(pos + 2)
            }
            ResolvedPos::InParagraph { para_id, offset, .. } => {
                let index = self.split_inline_at(para_id, offset)?;
                let mut hard_break = HardBreak::new();
                hard_break.set_parent(Some(para_id));
                let id = hard_break.id();
                self.nodes.hard_breaks.insert(id, hard_break);
                if let Some(para) = self.nodes.paragraphs.get_mut(&para_id) {
                    para.insert_child(index, id);
                }
                self.document.increment_version();
                Ok(pos + 1)
            }
        }
    }

    fn insert_line(&mut self, pos: usize, text: &str) -> Result<usize> {
        let len = text.chars().count();
        match self.resolve(pos)? {
            ResolvedPos::Boundary { index } => {
                let para_id = self.insert_paragraph(index, Paragraph::new());
                if len > 0 {
                    self.append_run(para_id, Run::new(text))?;
                }
                Ok(pos + 1 + len)
            }
            ResolvedPos::InParagraph { para_id, offset, .. } => {
                if len == 0 {
                    return Ok(pos);
                }
                let index = self.split_inline_at(para_id, offset)?;
                let previous = self
                    .get_paragraph(para_id)
                    .and_then(|p| index.checked_sub(1).and_then(|i| p.children().get(i)))
                    .copied();

                match previous.and_then(|id| self.nodes.runs.get_mut(&id)) {
                    Some(run) => run.text.push_str(text),
                    None => {
                        let mut run = Run::new(text);
                        run.set_parent(Some(para_id));
                        let run_id = run.id();
                        self.nodes.runs.insert(run_id, run);
                        if let Some(para) = self.nodes.paragraphs.get_mut(&para_id) {
                            para.insert_child(index, run_id);
                        }
                    }
                }
                self.document.increment_version();
                Ok(pos + len)
            }
        }
    }

    /// Delete everything between two positions.
    ///
    /// Blocks entirely inside the range are removed, partially covered
    /// paragraphs are trimmed, and when the range starts and ends inside two
    /// different paragraphs those are joined.
    pub fn delete_range(&mut self, from: usize, to: usize) -> Result<()> {
        let (from, to) = (from.min(to), from.max(to));
        let from_res = self.resolve(from)?;
        let to_res = self.resolve(to)?;
        if from == to {
            return Ok(());
        }

        for span in self.block_spans() {
            if span.end() <= from || span.start >= to {
                continue;
            }
            if from <= span.start && span.end() <= to {
                self.remove_block(span.id)?;
                continue;
            }

            // Partially covered; only paragraphs can be
            let content = self.paragraph_content_size(span.id);
            let inner = span.start + 1;
            let local_from = from.saturating_sub(inner).min(content);
            let local_to = to.saturating_sub(inner).min(content);
            self.delete_inline(span.id, local_from, local_to)?;
        }

        if let (
            ResolvedPos::InParagraph { para_id: first, .. },
            ResolvedPos::InParagraph { para_id: second, .. },
        ) = (from_res, to_res)
        {
            if first != second
                && self.nodes.paragraphs.contains_key(&first)
                && self.nodes.paragraphs.contains_key(&second)
            {
                self.join_paragraphs(first, second)?;
            }
        }

        self.document.increment_version();
        Ok(())
    }

    fn delete_inline(&mut self, para_id: NodeId, from: usize, to: usize) -> Result<()> {
        if from >= to {
            return Ok(());
        }
        let start = self.split_inline_at(para_id, from)?;
        let end = self.split_inline_at(para_id, to)?;

        let removed: Vec<NodeId> = match self.nodes.paragraphs.get_mut(&para_id) {
            Some(para) => {
                let mut tail = para.split_off_children(start);
                let keep = tail.split_off(end - start);
                for id in keep {
                    para.add_child(id);
                }
                tail
            }
            None => return Err(DocModelError::NodeNotFound(para_id.as_uuid())),
        };
        for id in removed {
            self.remove_inline_storage(id);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Text of a paragraph, with hard breaks as newlines
    pub fn paragraph_text(&self, para_id: NodeId) -> String {
        let Some(para) = self.get_paragraph(para_id) else {
            return String::new();
        };
        para.children()
            .iter()
            .filter_map(|&id| self.node_ref(id))
            .filter_map(|node| match node {
                NodeRef::Run(run) => Some(run.text.as_str()),
                NodeRef::HardBreak(_) => Some("\n"),
                _ => None,
            })
            .collect()
    }

    /// Text of all paragraphs, one line per paragraph
    pub fn plain_text(&self) -> String {
        self.document
            .children()
            .iter()
            .filter(|id| self.nodes.paragraphs.contains_key(id))
            .map(|&id| self.paragraph_text(id))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::with_empty_paragraph()
    }
}
