//! Resize overlay for selected images
//!
//! Whenever a selection fully covers a resizable image, a frame with four
//! corner handles is drawn over it. The overlay is decorative: the handles
//! carry resize cursors but no drag behaviour is attached.

use crate::{Decoration, DecorationSet, ViewPlugin, WidgetElement};
use doc_model::{DocumentTree, NodeType, Selection, IMAGE_NODE_NAME};
use serde::{Deserialize, Serialize};

/// Class of the frame element
pub const CONTAINER_CLASS: &str = "image-resize-container";

/// Base class shared by every handle element
pub const HANDLE_CLASS: &str = "resize-handle";

/// A corner handle of the overlay frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    /// Top left
    Nw,
    /// Top right
    Ne,
    /// Bottom left
    Sw,
    /// Bottom right
    Se,
}

impl ResizeHandle {
    /// Handles in rendering order
    pub const ALL: [ResizeHandle; 4] = [
        ResizeHandle::Nw,
        ResizeHandle::Ne,
        ResizeHandle::Sw,
        ResizeHandle::Se,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeHandle::Nw => "nw",
            ResizeHandle::Ne => "ne",
            ResizeHandle::Sw => "sw",
            ResizeHandle::Se => "se",
        }
    }

    /// CSS cursor shown over the handle
    pub fn cursor(&self) -> String {
        format!("{}-resize", self.as_str())
    }

    /// Class list of the handle element
    pub fn class_name(&self) -> String {
        format!("{} {}-{}", HANDLE_CLASS, HANDLE_CLASS, self.as_str())
    }

    /// The vertical and horizontal edges the handle is pinned to
    pub fn edges(&self) -> (&'static str, &'static str) {
        match self {
            ResizeHandle::Nw => ("top", "left"),
            ResizeHandle::Ne => ("top", "right"),
            ResizeHandle::Sw => ("bottom", "left"),
            ResizeHandle::Se => ("bottom", "right"),
        }
    }
}

/// Visual parameters of the overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// Accent color used for the frame border and handle fill
    pub accent: String,
    /// Frame border width in px
    pub frame_border_width: u32,
    /// Frame corner radius in px
    pub frame_radius: u32,
    /// Stacking order of the frame
    pub z_index: i32,
    /// Edge length of a handle in px
    pub handle_size: u32,
    /// Handle outline
    pub handle_border: String,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            accent: "hsl(var(--primary))".to_string(),
            frame_border_width: 2,
            frame_radius: 4,
            z_index: 10,
            handle_size: 8,
            handle_border: "1px solid white".to_string(),
        }
    }
}

impl OverlayStyle {
    /// Offset that centers a handle on the frame corner
    pub fn handle_offset(&self) -> String {
        format!("-{}px", self.handle_size / 2)
    }

    /// Build the handle element for one corner
    pub fn handle(&self, handle: ResizeHandle) -> WidgetElement {
        let (vertical, horizontal) = handle.edges();
        let offset = self.handle_offset();
        let size = format!("{}px", self.handle_size);

        WidgetElement::new("div")
            .with_class(handle.class_name())
            .with_attribute("data-handle", handle.as_str())
            .with_style("position", "absolute")
            .with_style("width", size.clone())
            .with_style("height", size)
            .with_style("background", self.accent.clone())
            .with_style("border", self.handle_border.clone())
            .with_style("border-radius", "50%")
            .with_style("cursor", handle.cursor())
            .with_style("pointer-events", "auto")
            .with_style(vertical, offset.clone())
            .with_style(horizontal, offset)
    }

    /// Build the frame element with its four handles
    pub fn frame(&self) -> WidgetElement {
        let frame = WidgetElement::new("div")
            .with_class(CONTAINER_CLASS)
            .with_attribute("contenteditable", "false")
            .with_style("position", "absolute")
            .with_style(
                "border",
                format!("{}px solid {}", self.frame_border_width, self.accent),
            )
            .with_style("border-radius", format!("{}px", self.frame_radius))
            .with_style("pointer-events", "none")
            .with_style("z-index", self.z_index.to_string());

        ResizeHandle::ALL
            .iter()
            .fold(frame, |frame, &handle| frame.with_child(self.handle(handle)))
    }
}

/// View plugin that frames every image lying fully inside the selection
#[derive(Debug, Clone, Default)]
pub struct ImageResizeOverlay {
    style: OverlayStyle,
}

impl ImageResizeOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: OverlayStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }
}

impl ViewPlugin for ImageResizeOverlay {
    fn key(&self) -> &str {
        IMAGE_NODE_NAME
    }

    fn decorations(&self, tree: &DocumentTree, selection: &Selection) -> DecorationSet {
        if selection.is_collapsed() {
            return DecorationSet::empty();
        }

        let decorations = tree
            .descendants()
            .into_iter()
            .filter(|entry| entry.node.node_type() == NodeType::ResizableImage)
            .filter(|entry| selection.encloses(entry.pos, entry.end()))
            .map(|entry| {
                Decoration::widget(entry.pos + 1, self.style.frame()).for_node(entry.node.id())
            })
            .collect();

        DecorationSet::create(decorations)
    }
}

/// Overlay decorations with the default style
pub fn image_resize_decorations(tree: &DocumentTree, selection: &Selection) -> DecorationSet {
    ImageResizeOverlay::new().decorations(tree, selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::ImageAttrs;
    use proptest::prelude::*;

    /// "ab" paragraph, image, "cd" paragraph, image
    fn sample_tree() -> DocumentTree {
        let mut tree = DocumentTree::new();
        tree.push_paragraph("ab");
        tree.push_image(ImageAttrs::with_src("one.png"));
        tree.push_paragraph("cd");
        tree.push_image(ImageAttrs::with_src("two.png"));
        tree
    }

    #[test]
    fn test_sample_positions() {
        let tree = sample_tree();
        let images: Vec<usize> = tree
            .descendants()
            .into_iter()
            .filter(|e| e.node.node_type() == NodeType::ResizableImage)
            .map(|e| e.pos)
            .collect();
        assert_eq!(images, vec![4, 9]);
        assert_eq!(tree.content_size(), 10);
    }

    #[test]
    fn test_collapsed_selection_has_no_overlay() {
        let tree = sample_tree();
        for pos in 0..=tree.content_size() {
            assert!(image_resize_decorations(&tree, &Selection::collapsed(pos)).is_empty());
        }
    }

    #[test]
    fn test_node_selection_frames_image() {
        let tree = sample_tree();
        let set = image_resize_decorations(&tree, &Selection::node(4));
        assert_eq!(set.len(), 1);

        let decoration = set.iter().next().unwrap();
        assert_eq!(decoration.pos, 5);
        assert_eq!(decoration.target, Some(tree.image_ids()[0]));
        assert!(decoration.widget.has_class(CONTAINER_CLASS));
        assert_eq!(decoration.widget.children.len(), 4);
    }

    #[test]
    fn test_select_all_frames_every_image() {
        let tree = sample_tree();
        let set = image_resize_decorations(&tree, &Selection::all(tree.content_size()));
        let positions: Vec<usize> = set.iter().map(|d| d.pos).collect();
        assert_eq!(positions, vec![5, 10]);
    }

    #[test]
    fn test_partial_cover_is_ignored() {
        let tree = sample_tree();
        // Ends directly before the first image
        assert!(image_resize_decorations(&tree, &Selection::new(1, 4)).is_empty());
        // Covers text around, but only the start of the second image
        let set = image_resize_decorations(&tree, &Selection::new(2, 9));
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().unwrap().pos, 5);
    }

    #[test]
    fn test_backwards_selection() {
        let tree = sample_tree();
        let set = image_resize_decorations(&tree, &Selection::new(5, 4));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_text_only_document() {
        let mut tree = DocumentTree::new();
        tree.push_paragraph("hello");
        let set = image_resize_decorations(&tree, &Selection::all(tree.content_size()));
        assert!(set.is_empty());
    }

    #[test]
    fn test_frame_styles() {
        let frame = OverlayStyle::default().frame();
        assert_eq!(frame.tag, "div");
        assert_eq!(frame.attribute("contenteditable"), Some("false"));
        assert_eq!(frame.style("position"), Some("absolute"));
        assert_eq!(frame.style("border"), Some("2px solid hsl(var(--primary))"));
        assert_eq!(frame.style("border-radius"), Some("4px"));
        assert_eq!(frame.style("pointer-events"), Some("none"));
        assert_eq!(frame.style("z-index"), Some("10"));
    }

    #[test]
    fn test_handle_styles() {
        let frame = OverlayStyle::default().frame();
        let classes: Vec<&str> = frame.children.iter().map(|c| c.class_name.as_str()).collect();
        assert_eq!(
            classes,
            vec![
                "resize-handle resize-handle-nw",
                "resize-handle resize-handle-ne",
                "resize-handle resize-handle-sw",
                "resize-handle resize-handle-se",
            ]
        );

        let se = &frame.children[3];
        assert_eq!(se.style("cursor"), Some("se-resize"));
        assert_eq!(se.style("bottom"), Some("-4px"));
        assert_eq!(se.style("right"), Some("-4px"));
        assert_eq!(se.style("top"), None);
        assert_eq!(se.style("width"), Some("8px"));
        assert_eq!(se.style("border-radius"), Some("50%"));
        assert_eq!(se.style("border"), Some("1px solid white"));
        assert_eq!(se.style("pointer-events"), Some("auto"));

        let nw = &frame.children[0];
        assert_eq!(nw.style("top"), Some("-4px"));
        assert_eq!(nw.style("left"), Some("-4px"));
    }

    #[test]
    fn test_custom_handle_size() {
        let style = OverlayStyle {
            handle_size: 12,
            ..OverlayStyle::default()
        };
        let handle = style.handle(ResizeHandle::Ne);
        assert_eq!(handle.style("top"), Some("-6px"));
        assert_eq!(handle.style("right"), Some("-6px"));
        assert_eq!(handle.style("height"), Some("12px"));
    }

    #[test]
    fn test_plugin_key() {
        assert_eq!(ImageResizeOverlay::new().key(), "resizableImage");
    }

    proptest! {
        #[test]
        fn prop_decorations_are_pure(anchor in 0usize..=10, focus in 0usize..=10) {
            let tree = sample_tree();
            let selection = Selection::new(anchor, focus);
            let first = image_resize_decorations(&tree, &selection);
            let second = image_resize_decorations(&tree, &selection);
            prop_assert_eq!(&first, &second);

            let (from, to) = (anchor.min(focus), anchor.max(focus));
            let expected = [4usize, 9]
                .iter()
                .filter(|&&pos| from <= pos && to >= pos + 1)
                .count();
            prop_assert_eq!(first.len(), expected);
        }
    }
}
