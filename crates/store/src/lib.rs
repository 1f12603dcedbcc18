//! Store - Persistence and reactive application state
//!
//! This crate holds the note collection, the freeform text buffer and the
//! theme preference. Each store keeps its value in an observable container
//! and writes it to a key-value storage backend, either at once or after a
//! debounce window, plus the JSON settings file.

mod error;
mod storage;
mod scheduler;
mod reactive;
mod note;
mod notes;
mod text;
mod theme;
mod settings;

pub use error::*;
pub use storage::*;
pub use scheduler::*;
pub use reactive::*;
pub use note::*;
pub use notes::*;
pub use text::*;
pub use theme::*;
pub use settings::*;
