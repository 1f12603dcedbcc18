//! Edit Engine - Command system, selection handling, and undo/redo
//!
//! Every edit is a [`Command`] applied to an immutable snapshot of the
//! document tree, producing a new tree, a new selection and an inverse for
//! the undo stack.

mod command;
mod executor;
mod undo;
mod error;
mod text_commands;
mod image_commands;

pub use command::*;
pub use executor::*;
pub use undo::*;
pub use error::*;
pub use text_commands::*;
pub use image_commands::*;
