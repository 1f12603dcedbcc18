//! Note editor
//!
//! A single open note: the editing engine holding its document, the view
//! plugins decorating it, and the bridge back to the notes store.

use crate::ResizableImage;
use doc_model::{DocumentTree, ImageAttrs, NodeId, NodeType, Selection};
use edit_engine::{
    Command, DeleteImage, DeleteSelection, EditingEngine, InsertText, SetResizableImage,
    UpdateImageAttributes,
};
use render_model::{DecorationSet, EditorView};
use store::{NoteUpdate, NotesStore};

/// Editor for one note's rich-text content
#[derive(Debug)]
pub struct NoteEditor {
    engine: EditingEngine,
    view: EditorView,
    extension: ResizableImage,
}

impl NoteEditor {
    /// Open an editor on HTML content
    pub fn open(extension: ResizableImage, content: &str) -> Self {
        let tree = extension.parse(content);
        let view = EditorView::new().with_plugin(Box::new(extension.overlay()));
        Self {
            engine: EditingEngine::with_tree(tree),
            view,
            extension,
        }
    }

    /// Open an editor on an empty document
    pub fn empty(extension: ResizableImage) -> Self {
        Self::open(extension, "")
    }

    /// Replace the content, dropping undo history
    pub fn load(&mut self, content: &str) {
        self.engine.load(self.extension.parse(content));
    }

    pub fn tree(&self) -> &DocumentTree {
        self.engine.tree()
    }

    pub fn selection(&self) -> Selection {
        self.engine.selection()
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.engine.set_selection(selection);
    }

    pub fn select_all(&mut self) {
        let size = self.tree().content_size();
        self.engine.set_selection(Selection::all(size));
    }

    /// Select an image node. Returns `false` if `image_id` is not an image.
    pub fn select_image(&mut self, image_id: NodeId) -> bool {
        if self.tree().node_type(image_id) != Some(NodeType::ResizableImage) {
            return false;
        }
        match self.tree().block_position(image_id) {
            Some(pos) => {
                self.engine.set_selection(Selection::node(pos));
                true
            }
            None => false,
        }
    }

    /// Ids of all images in document order
    pub fn image_ids(&self) -> Vec<NodeId> {
        self.tree().image_ids()
    }

    /// Insert an image at the selection
    pub fn set_resizable_image(&mut self, command: SetResizableImage) -> bool {
        self.run(Box::new(command))
    }

    /// Replace every attribute of an image
    pub fn update_image(&mut self, image_id: NodeId, attrs: ImageAttrs) -> bool {
        self.run(Box::new(UpdateImageAttributes::new(image_id, attrs)))
    }

    pub fn delete_image(&mut self, image_id: NodeId) -> bool {
        self.run(Box::new(DeleteImage::new(image_id)))
    }

    pub fn insert_text(&mut self, text: &str) -> bool {
        self.run(Box::new(InsertText::new(text)))
    }

    pub fn delete_selection(&mut self) -> bool {
        self.run(Box::new(DeleteSelection))
    }

    pub fn undo(&mut self) -> bool {
        self.engine.undo().is_ok()
    }

    pub fn redo(&mut self) -> bool {
        self.engine.redo().is_ok()
    }

    /// Decorations for the current document and selection
    pub fn decorations(&self) -> DecorationSet {
        self.view.decorations(self.engine.tree(), &self.engine.selection())
    }

    /// The content as HTML
    pub fn html(&self) -> String {
        self.extension.serialize(self.engine.tree())
    }

    pub fn plain_text(&self) -> String {
        self.engine.tree().plain_text()
    }

    /// Hand the current content to the notes store
    pub fn save_to(&self, notes: &NotesStore, note_id: &str) -> store::Result<()> {
        notes.update_note(note_id, NoteUpdate::content(self.html()))
    }

    fn run(&mut self, command: Box<dyn Command>) -> bool {
        self.engine.run(command)
    }
}
