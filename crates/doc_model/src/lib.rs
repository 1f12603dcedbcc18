//! Document Model - Core document tree structure and types
//!
//! This crate provides the document model behind the note editor: an
//! arena-backed tree of paragraphs, text runs and block images addressed by
//! stable node IDs, integer document positions for selections, and the HTML
//! interchange format notes are stored in.

mod node;
mod node_id;
mod schema;
mod document;
mod paragraph;
mod run;
mod image;
mod selection;
mod tree;
mod error;
pub mod html;

pub use node::*;
pub use node_id::*;
pub use schema::*;
pub use document::*;
pub use paragraph::*;
pub use run::*;
pub use image::*;
pub use selection::*;
pub use tree::*;
pub use error::*;
pub use html::{parse_html, to_html};
