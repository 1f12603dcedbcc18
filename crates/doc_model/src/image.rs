//! Resizable image node
//!
//! Images are block-level, draggable leaf nodes referenced by URL. The node
//! carries only presentational attributes; there is no image data pipeline.
//! Every attribute is optional at rest: a missing `src` is structurally valid
//! and simply renders as a broken image.

use crate::{Node, NodeGroup, NodeId, NodeSpec, NodeType};
use serde::{Deserialize, Serialize};

/// Schema name of the image node type
pub const IMAGE_NODE_NAME: &str = "resizableImage";

/// Ordered list of HTML attributes (`name`, `value`)
pub type HtmlAttributes = Vec<(String, String)>;

/// Attributes of an image node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttrs {
    /// Image URL
    pub src: Option<String>,
    /// Alternative text for accessibility
    pub alt: Option<String>,
    /// Tooltip text
    pub title: Option<String>,
    /// Display width in pixels. Negative or non-numeric values parse to `None`.
    pub width: Option<u32>,
    /// Display height in pixels. Negative or non-numeric values parse to `None`.
    pub height: Option<u32>,
}

impl ImageAttrs {
    /// Attributes with only a source URL
    pub fn with_src(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            ..Default::default()
        }
    }

    /// Build attributes from the attributes of an `img` element.
    ///
    /// Returns `None` when the element has no `src` attribute, in which case
    /// the element is not an image node.
    pub fn from_element(attrs: &[(String, String)]) -> Option<Self> {
        let get = |name: &str| {
            attrs
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.clone())
        };

        let src = get("src")?;
        Some(Self {
            src: Some(src),
            alt: get("alt"),
            title: get("title"),
            width: get("width").as_deref().and_then(parse_dimension),
            height: get("height").as_deref().and_then(parse_dimension),
        })
    }

    /// Render the attributes of the `img` element for this node.
    ///
    /// `defaults` are the extension's configured HTML attributes; the node's
    /// own non-null values override entries with the same name.
    pub fn to_html_attributes(&self, defaults: &[(String, String)]) -> HtmlAttributes {
        let mut merged: HtmlAttributes = defaults.to_vec();
        let own = [
            ("src", self.src.clone()),
            ("alt", self.alt.clone()),
            ("title", self.title.clone()),
            ("width", self.width.map(|w| w.to_string())),
            ("height", self.height.map(|h| h.to_string())),
        ];

        for (name, value) in own {
            let Some(value) = value else { continue };
            match merged.iter_mut().find(|(key, _)| key == name) {
                Some(entry) => entry.1 = value,
                None => merged.push((name.to_string(), value)),
            }
        }
        merged
    }
}

/// Parse a `width`/`height` attribute value.
///
/// Follows the usual lenient integer parse: leading whitespace is skipped and
/// trailing garbage after the digits is ignored (`"120px"` is 120). Values
/// with no leading digits, negative values and values that overflow are
/// treated as absent rather than producing a sentinel.
pub fn parse_dimension(value: &str) -> Option<u32> {
    let trimmed = value.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: &str = {
        let end = unsigned
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(unsigned.len());
        &unsigned[..end]
    };

    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// An image node in the document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageNode {
    id: NodeId,
    parent: Option<NodeId>,
    /// Presentational attributes
    pub attrs: ImageAttrs,
}

impl ImageNode {
    /// Create a new image node
    pub fn new(attrs: ImageAttrs) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            attrs,
        }
    }

    /// Schema of the image node type
    pub fn spec() -> NodeSpec {
        NodeSpec {
            name: IMAGE_NODE_NAME,
            group: NodeGroup::Block,
            inline: false,
            leaf: true,
            draggable: true,
        }
    }

    /// Replace all attributes at once
    pub fn set_attrs(&mut self, attrs: ImageAttrs) {
        self.attrs = attrs;
    }
}

impl Node for ImageNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::ResizableImage
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("300"), Some(300));
        assert_eq!(parse_dimension("  42"), Some(42));
        assert_eq!(parse_dimension("120px"), Some(120));
        assert_eq!(parse_dimension("+7"), Some(7));
        assert_eq!(parse_dimension("abc"), None);
        assert_eq!(parse_dimension("   "), None);
        assert_eq!(parse_dimension(""), None);
        assert_eq!(parse_dimension("-5"), None);
        assert_eq!(parse_dimension("99999999999"), None);
    }

    #[test]
    fn test_from_element_requires_src() {
        assert!(ImageAttrs::from_element(&attrs(&[("alt", "x")])).is_none());
    }

    #[test]
    fn test_from_element_copies_attributes() {
        let parsed = ImageAttrs::from_element(&attrs(&[
            ("src", "https://example.com/cat.png"),
            ("alt", "A cat"),
            ("title", "Cat"),
            ("width", "320"),
            ("height", "wide"),
        ]))
        .unwrap();

        assert_eq!(parsed.src.as_deref(), Some("https://example.com/cat.png"));
        assert_eq!(parsed.alt.as_deref(), Some("A cat"));
        assert_eq!(parsed.title.as_deref(), Some("Cat"));
        assert_eq!(parsed.width, Some(320));
        assert_eq!(parsed.height, None);
    }

    #[test]
    fn test_empty_src_still_matches() {
        let parsed = ImageAttrs::from_element(&attrs(&[("src", "")])).unwrap();
        assert_eq!(parsed.src.as_deref(), Some(""));
    }

    #[test]
    fn test_html_attributes_override_defaults() {
        let defaults = attrs(&[("class", "note-image"), ("alt", "default alt")]);
        let image = ImageAttrs {
            src: Some("a.png".into()),
            alt: Some("mine".into()),
            width: Some(100),
            ..Default::default()
        };

        let rendered = image.to_html_attributes(&defaults);
        assert_eq!(
            rendered,
            attrs(&[
                ("class", "note-image"),
                ("alt", "mine"),
                ("src", "a.png"),
                ("width", "100"),
            ])
        );
    }

    #[test]
    fn test_null_attributes_are_omitted() {
        let rendered = ImageAttrs::default().to_html_attributes(&[]);
        assert!(rendered.is_empty());
    }
}
