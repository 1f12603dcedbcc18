//! Render Model - View decorations over the document
//!
//! This crate computes the transient visual layer drawn on top of the
//! document view. Decorations are never part of document content: they are
//! derived from a document snapshot and a selection each time the view reads
//! its state.

mod decoration;
mod plugin;
mod resize_overlay;

pub use decoration::*;
pub use plugin::*;
pub use resize_overlay::*;
