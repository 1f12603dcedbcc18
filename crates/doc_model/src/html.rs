//! HTML interchange for document trees
//!
//! Notes are stored as HTML fragments. Parsing is tolerant: block elements
//! become paragraphs, `<br>` becomes a hard break, `<img>` elements carrying a
//! `src` become image nodes, inline formatting tags are transparent and
//! anything else contributes only its text.

use crate::{DocumentTree, ImageAttrs, ImageNode, Node, NodeId, NodeRef, Run};
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use std::cell::RefCell;

/// Elements that open a paragraph of their own
const PARAGRAPH_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "div", "li", "pre",
];

/// Elements that only delimit blocks (their children form the paragraphs)
const CONTAINER_TAGS: &[&str] = &["ul", "ol", "blockquote", "body", "html"];

/// Elements whose content is never document text
const SKIPPED_TAGS: &[&str] = &["script", "style", "template"];

// ── Parsing ────────────────────────────────────────────────────────

struct HtmlSink {
    tokens: RefCell<Vec<HtmlToken>>,
}

#[derive(Debug)]
enum HtmlToken {
    StartTag(String, Vec<(String, String)>),
    EndTag(String),
    Text(String),
}

impl TokenSink for HtmlSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => {
                let name = tag.name.to_string();
                let attrs: Vec<(String, String)> = tag
                    .attrs
                    .iter()
                    .map(|a| (a.name.local.to_string(), a.value.to_string()))
                    .collect();
                match tag.kind {
                    TagKind::StartTag => self.tokens.borrow_mut().push(HtmlToken::StartTag(name, attrs)),
                    TagKind::EndTag => self.tokens.borrow_mut().push(HtmlToken::EndTag(name)),
                }
            }
            Token::CharacterTokens(s) => {
                self.tokens.borrow_mut().push(HtmlToken::Text(s.to_string()));
            }
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

fn tokenize(html: &str) -> Vec<HtmlToken> {
    let sink = HtmlSink {
        tokens: RefCell::new(Vec::new()),
    };
    let tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    let mut queue = BufferQueue::default();
    queue.push_back(StrTendril::from(html));
    let _ = tokenizer.feed(&mut queue);
    tokenizer.end();

    tokenizer.sink.tokens.into_inner()
}

/// Incrementally builds a tree from the token stream
struct TreeBuilder {
    tree: DocumentTree,
    open: Option<NodeId>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            tree: DocumentTree::new(),
            open: None,
        }
    }

    fn open_paragraph(&mut self) -> NodeId {
        match self.open {
            Some(id) => id,
            None => {
                let id = self.tree.push_paragraph("");
                self.open = Some(id);
                id
            }
        }
    }

    fn close_paragraph(&mut self) {
        self.open = None;
    }

    fn push_text(&mut self, raw: &str) {
        let collapsed = collapse_whitespace(raw);
        if self.open.is_none() && collapsed.trim().is_empty() {
            return;
        }
        let para_id = self.open_paragraph();

        let last_run = self
            .tree
            .get_paragraph(para_id)
            .and_then(|p| p.children().last().copied())
            .filter(|id| self.tree.nodes.runs.contains_key(id));

        match last_run.and_then(|id| self.tree.nodes.runs.get_mut(&id)) {
            Some(run) => {
                if run.text.ends_with(' ') {
                    run.text.push_str(collapsed.trim_start_matches(' '));
                } else {
                    run.text.push_str(&collapsed);
                }
            }
            None => {
                // The paragraph is open, so appending cannot fail
                let _ = self.tree.append_run(para_id, Run::new(collapsed));
            }
        }
    }

    fn push_hard_break(&mut self) {
        let para_id = self.open_paragraph();
        let _ = self.tree.append_hard_break(para_id);
    }

    fn push_image(&mut self, attrs: ImageAttrs) {
        self.close_paragraph();
        let index = self.tree.document.children().len();
        self.tree.insert_image(index, ImageNode::new(attrs));
    }

    fn finish(mut self) -> DocumentTree {
        for run in self.tree.nodes.runs.values_mut() {
            if run.text.contains(NBSP) {
                run.text = run.text.replace(NBSP, " ");
            }
        }
        self.tree.ensure_block();
        self.tree
    }
}

const NBSP: char = '\u{a0}';

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Parse an HTML fragment into a document tree.
///
/// Always yields at least one block; empty input gives a single empty
/// paragraph.
pub fn parse_html(html: &str) -> DocumentTree {
    let mut builder = TreeBuilder::new();
    let mut skip_depth = 0usize;

    for token in tokenize(html) {
        match &token {
            HtmlToken::StartTag(name, _) if SKIPPED_TAGS.contains(&name.as_str()) => {
                skip_depth += 1;
                continue;
            }
            HtmlToken::EndTag(name) if SKIPPED_TAGS.contains(&name.as_str()) => {
                skip_depth = skip_depth.saturating_sub(1);
                continue;
            }
            _ if skip_depth > 0 => continue,
            _ => {}
        }

        match token {
            HtmlToken::StartTag(name, attrs) => match name.as_str() {
                "img" => {
                    if let Some(image) = ImageAttrs::from_element(&attrs) {
                        builder.push_image(image);
                    }
                }
                "br" => builder.push_hard_break(),
                tag if PARAGRAPH_TAGS.contains(&tag) => {
                    builder.close_paragraph();
                    builder.open_paragraph();
                }
                tag if CONTAINER_TAGS.contains(&tag) => builder.close_paragraph(),
                _ => {}
            },
            HtmlToken::EndTag(name) => {
                let tag = name.as_str();
                if PARAGRAPH_TAGS.contains(&tag) || CONTAINER_TAGS.contains(&tag) {
                    builder.close_paragraph();
                }
            }
            HtmlToken::Text(text) => builder.push_text(&text),
        }
    }

    builder.finish()
}

// ── Serialization ──────────────────────────────────────────────────

/// Serialize a document tree to HTML
pub fn to_html(tree: &DocumentTree) -> String {
    to_html_with(tree, &[])
}

/// Serialize a document tree, merging `image_defaults` into every `img`
/// element (node attributes win)
pub fn to_html_with(tree: &DocumentTree, image_defaults: &[(String, String)]) -> String {
    let mut out = String::new();

    for &block_id in tree.document.children() {
        match tree.node_ref(block_id) {
            Some(NodeRef::Paragraph(para)) => {
                out.push_str("<p>");
                let mut after_space = false;
                for &child in para.children() {
                    match tree.node_ref(child) {
                        Some(NodeRef::Run(run)) => {
                            push_run_text(&mut out, &run.text, &mut after_space)
                        }
                        Some(NodeRef::HardBreak(_)) => {
                            after_space = false;
                            out.push_str("<br>");
                        }
                        _ => {}
                    }
                }
                out.push_str("</p>");
            }
            Some(NodeRef::Image(image)) => {
                out.push_str(&image_element(&image.attrs, image_defaults));
            }
            _ => {}
        }
    }

    out
}

/// Render a single `img` element for an image node
pub fn image_element(attrs: &ImageAttrs, defaults: &[(String, String)]) -> String {
    let mut out = String::from("<img");
    for (name, value) in attrs.to_html_attributes(defaults) {
        out.push(' ');
        out.push_str(&name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(&value));
        out.push('"');
    }
    out.push('>');
    out
}

/// Escape run text. A space directly after another space is written as
/// `&nbsp;` so the parser's whitespace collapsing leaves it intact.
fn push_run_text(out: &mut String, text: &str, after_space: &mut bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            ' ' if *after_space => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
        *after_space = c == ' ';
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeType;
    use proptest::prelude::*;

    fn images(tree: &DocumentTree) -> Vec<ImageAttrs> {
        tree.image_ids()
            .into_iter()
            .filter_map(|id| tree.get_image(id))
            .map(|image| image.attrs.clone())
            .collect()
    }

    #[test]
    fn test_parse_paragraphs_and_image() {
        let tree = parse_html(
            r#"<p>Hello <strong>world</strong></p><img src="a.png" alt="A" width="100" height="50"><p>After</p>"#,
        );

        let types: Vec<NodeType> = tree
            .document
            .children()
            .iter()
            .filter_map(|&id| tree.node_type(id))
            .collect();
        assert_eq!(
            types,
            vec![NodeType::Paragraph, NodeType::ResizableImage, NodeType::Paragraph]
        );
        assert_eq!(tree.plain_text(), "Hello world\nAfter");

        let parsed = &images(&tree)[0];
        assert_eq!(parsed.src.as_deref(), Some("a.png"));
        assert_eq!(parsed.alt.as_deref(), Some("A"));
        assert_eq!(parsed.title, None);
        assert_eq!(parsed.width, Some(100));
        assert_eq!(parsed.height, Some(50));
    }

    #[test]
    fn test_non_numeric_dimensions_become_null() {
        let tree = parse_html(r#"<img src="a.png" width="wide" height="">"#);
        let parsed = &images(&tree)[0];
        assert_eq!(parsed.width, None);
        assert_eq!(parsed.height, None);
    }

    #[test]
    fn test_img_without_src_is_ignored() {
        let tree = parse_html(r#"<p>x</p><img alt="nothing">"#);
        assert!(tree.image_ids().is_empty());
    }

    #[test]
    fn test_image_inside_paragraph_splits_it() {
        let tree = parse_html(r#"<p>Before<img src="x.png">After</p>"#);
        assert_eq!(tree.document.children().len(), 3);
        assert_eq!(tree.plain_text(), "Before\nAfter");
    }

    #[test]
    fn test_hard_break_and_entities() {
        let tree = parse_html("<p>a &amp; b<br>c &lt; d</p>");
        assert_eq!(tree.plain_text(), "a & b\nc < d");
        assert_eq!(to_html(&tree), "<p>a &amp; b<br>c &lt; d</p>");
    }

    #[test]
    fn test_empty_input_gives_empty_paragraph() {
        let tree = parse_html("");
        assert_eq!(tree.document.children().len(), 1);
        assert_eq!(to_html(&tree), "<p></p>");
    }

    #[test]
    fn test_whitespace_collapses() {
        let tree = parse_html("<p>one\n   two</p>\n\n<p>three</p>");
        assert_eq!(tree.plain_text(), "one two\nthree");
    }

    #[test]
    fn test_repeated_spaces_survive_round_trip() {
        let mut tree = DocumentTree::new();
        let para = tree.push_paragraph("a  b   c ");
        tree.append_run(para, Run::new(" d")).unwrap();

        let html = to_html(&tree);
        assert_eq!(html, "<p>a &nbsp;b &nbsp;&nbsp;c &nbsp;d</p>");
        assert_eq!(parse_html(&html).plain_text(), "a  b   c  d");
    }

    #[test]
    fn test_nbsp_reads_as_space() {
        let tree = parse_html("<p>x&nbsp;&nbsp;y</p>");
        assert_eq!(tree.plain_text(), "x  y");
    }

    #[test]
    fn test_script_and_style_bodies_are_dropped() {
        let tree = parse_html("<style>p{color:red}</style><p>x</p><script>let a = 1;</script>");
        assert_eq!(tree.plain_text(), "x");
        assert_eq!(tree.document.children().len(), 1);

        let tree = parse_html("<p>a<template><p>hidden</p></template>b</p>");
        assert_eq!(tree.plain_text(), "ab");
    }

    #[test]
    fn test_serialize_merges_default_attributes() {
        let mut tree = DocumentTree::new();
        tree.push_image(ImageAttrs {
            src: Some("a.png".into()),
            width: Some(64),
            ..Default::default()
        });
        let defaults = vec![("class".to_string(), "rounded".to_string())];
        assert_eq!(
            to_html_with(&tree, &defaults),
            r#"<img class="rounded" src="a.png" width="64">"#
        );
    }

    #[test]
    fn test_attribute_escaping() {
        let mut tree = DocumentTree::new();
        tree.push_image(ImageAttrs {
            src: Some("a.png?x=1&y=2".into()),
            alt: Some("say \"hi\"".into()),
            ..Default::default()
        });
        let html = to_html(&tree);
        assert_eq!(html, r#"<img src="a.png?x=1&amp;y=2" alt="say &quot;hi&quot;">"#);
        assert_eq!(images(&parse_html(&html))[0].alt.as_deref(), Some("say \"hi\""));
    }

    fn image_attrs_strategy() -> impl Strategy<Value = ImageAttrs> {
        (
            "[a-z0-9:/._-]{1,40}",
            proptest::option::of("[A-Za-z0-9 &<>\"']{0,20}"),
            proptest::option::of("[A-Za-z0-9 ]{0,20}"),
            proptest::option::of(0u32..100_000),
            proptest::option::of(0u32..100_000),
        )
            .prop_map(|(src, alt, title, width, height)| ImageAttrs {
                src: Some(src),
                alt,
                title,
                width,
                height,
            })
    }

    proptest! {
        #[test]
        fn prop_image_attributes_round_trip(attrs in image_attrs_strategy()) {
            let mut tree = DocumentTree::new();
            tree.push_image(attrs.clone());
            let reparsed = parse_html(&to_html(&tree));
            prop_assert_eq!(images(&reparsed), vec![attrs]);
        }

        #[test]
        fn prop_non_numeric_dimensions_parse_to_none(value in "[a-zA-Z%][a-zA-Z0-9%]{0,8}") {
            let html = format!(r#"<img src="a.png" width="{value}" height="{value}">"#);
            let tree = parse_html(&html);
            let parsed = &images(&tree)[0];
            prop_assert_eq!(parsed.width, None);
            prop_assert_eq!(parsed.height, None);
        }
    }
}
