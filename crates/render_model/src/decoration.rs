//! Decoration types

use doc_model::NodeId;
use serde::{Deserialize, Serialize};

/// A detached element rendered by the view as a widget decoration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetElement {
    /// Element tag name
    pub tag: String,
    /// Space separated class list
    pub class_name: String,
    /// Inline style declarations, in order
    pub styles: Vec<(String, String)>,
    /// Extra element attributes
    pub attributes: Vec<(String, String)>,
    /// Child elements
    pub children: Vec<WidgetElement>,
}

impl WidgetElement {
    /// Create an element with no class, style or children
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class_name: String::new(),
            styles: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.push((property.into(), value.into()));
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: WidgetElement) -> Self {
        self.children.push(child);
        self
    }

    /// Value of an inline style property
    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles
            .iter()
            .rev()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Value of an attribute
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the class list contains `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.class_name.split_whitespace().any(|c| c == class)
    }

    /// The `style` attribute text
    pub fn css_text(&self) -> String {
        self.styles
            .iter()
            .map(|(p, v)| format!("{}: {};", p, v))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Render as an HTML string for hosts that mount widgets from markup
    pub fn to_html(&self) -> String {
        let mut out = format!("<{}", self.tag);
        if !self.class_name.is_empty() {
            out.push_str(&format!(" class=\"{}\"", self.class_name));
        }
        for (name, value) in &self.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, value.replace('"', "&quot;")));
        }
        if !self.styles.is_empty() {
            out.push_str(&format!(" style=\"{}\"", self.css_text().replace('"', "&quot;")));
        }
        out.push('>');
        for child in &self.children {
            out.push_str(&child.to_html());
        }
        out.push_str(&format!("</{}>", self.tag));
        out
    }
}

/// A widget decoration placed at a document position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration {
    /// Position the widget is anchored at
    pub pos: usize,
    /// Node the decoration belongs to, if any
    pub target: Option<NodeId>,
    /// The element to render
    pub widget: WidgetElement,
}

impl Decoration {
    pub fn widget(pos: usize, widget: WidgetElement) -> Self {
        Self {
            pos,
            target: None,
            widget,
        }
    }

    pub fn for_node(mut self, node_id: NodeId) -> Self {
        self.target = Some(node_id);
        self
    }
}

/// An ordered set of decorations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationSet {
    decorations: Vec<Decoration>,
}

impl DecorationSet {
    /// The empty set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set, ordering decorations by position
    pub fn create(mut decorations: Vec<Decoration>) -> Self {
        // Stable: decorations at the same position keep their order
        decorations.sort_by_key(|d| d.pos);
        Self { decorations }
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.decorations.iter()
    }

    /// Decorations anchored at `pos`
    pub fn at(&self, pos: usize) -> impl Iterator<Item = &Decoration> {
        self.decorations.iter().filter(move |d| d.pos == pos)
    }

    /// Combine two sets
    pub fn merge(self, other: DecorationSet) -> Self {
        let mut all = self.decorations;
        all.extend(other.decorations);
        Self::create(all)
    }
}

impl IntoIterator for DecorationSet {
    type Item = Decoration;
    type IntoIter = std::vec::IntoIter<Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.decorations.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sorts_by_position() {
        let set = DecorationSet::create(vec![
            Decoration::widget(9, WidgetElement::new("span")),
            Decoration::widget(2, WidgetElement::new("div")),
        ]);
        let positions: Vec<usize> = set.iter().map(|d| d.pos).collect();
        assert_eq!(positions, vec![2, 9]);
        assert_eq!(set.at(9).count(), 1);
    }

    #[test]
    fn test_widget_to_html() {
        let widget = WidgetElement::new("div")
            .with_class("frame")
            .with_attribute("contenteditable", "false")
            .with_style("position", "absolute")
            .with_style("z-index", "10")
            .with_child(WidgetElement::new("span"));

        assert_eq!(
            widget.to_html(),
            r#"<div class="frame" contenteditable="false" style="position: absolute; z-index: 10;"><span></span></div>"#
        );
        assert_eq!(widget.style("z-index"), Some("10"));
        assert!(widget.has_class("frame"));
    }

    #[test]
    fn test_merge() {
        let a = DecorationSet::create(vec![Decoration::widget(5, WidgetElement::new("a"))]);
        let b = DecorationSet::create(vec![Decoration::widget(1, WidgetElement::new("b"))]);
        let merged = a.merge(b);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.iter().next().unwrap().widget.tag, "b");
    }
}
