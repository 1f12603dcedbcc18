//! Noty - note taking application core
//!
//! Wires the document model, editing engine, view decorations and
//! persistent stores into an application context with a defined lifetime.

mod context;
mod editor;
mod error;
mod extension;
mod logging;

pub use context::*;
pub use editor::*;
pub use error::*;
pub use extension::*;
pub use logging::*;
