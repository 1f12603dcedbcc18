//! The resizable image editor extension
//!
//! Bundles everything the editor needs to support images: the node schema,
//! the HTML parse and serialize rules, the insertion command, and the view
//! plugin drawing resize handles over selected images.

use doc_model::{
    html, DocumentTree, HtmlAttributes, ImageAttrs, ImageNode, NodeSpec, IMAGE_NODE_NAME,
};
use edit_engine::SetResizableImage;
use render_model::{ImageResizeOverlay, OverlayStyle};
use serde::{Deserialize, Serialize};
use store::ImageSettings;

/// Configuration of the extension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizableImageOptions {
    /// Attributes added to every rendered `img` unless the node overrides them
    pub html_attributes: HtmlAttributes,
    /// Look of the resize overlay
    #[serde(default)]
    pub overlay: OverlayStyle,
}

impl From<&ImageSettings> for ResizableImageOptions {
    fn from(settings: &ImageSettings) -> Self {
        Self {
            html_attributes: settings.html_attributes.clone(),
            overlay: OverlayStyle::default(),
        }
    }
}

/// The `resizableImage` extension
#[derive(Debug, Clone, Default)]
pub struct ResizableImage {
    options: ResizableImageOptions,
}

impl ResizableImage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure(options: ResizableImageOptions) -> Self {
        Self { options }
    }

    pub fn name(&self) -> &'static str {
        IMAGE_NODE_NAME
    }

    pub fn options(&self) -> &ResizableImageOptions {
        &self.options
    }

    /// Schema of the node this extension adds
    pub fn node_spec(&self) -> NodeSpec {
        ImageNode::spec()
    }

    /// Parse HTML content into a document
    pub fn parse(&self, content: &str) -> DocumentTree {
        html::parse_html(content)
    }

    /// Serialize a document, applying the configured image attributes
    pub fn serialize(&self, tree: &DocumentTree) -> String {
        html::to_html_with(tree, &self.options.html_attributes)
    }

    /// Render one image node as an `img` element
    pub fn render_image(&self, attrs: &ImageAttrs) -> String {
        html::image_element(attrs, &self.options.html_attributes)
    }

    /// The view plugin drawing resize handles
    pub fn overlay(&self) -> ImageResizeOverlay {
        ImageResizeOverlay::with_style(self.options.overlay.clone())
    }

    /// Build the insertion command for an image at `src`
    pub fn set_resizable_image(&self, src: impl Into<String>) -> SetResizableImage {
        SetResizableImage::new(src)
    }
}
