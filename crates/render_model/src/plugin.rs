//! View plugins - sources of decorations

use crate::DecorationSet;
use doc_model::{DocumentTree, Selection};

/// A view plugin contributes decorations for a document state.
///
/// Implementations must be pure: the same tree and selection always yield the
/// same set, and no state is carried between calls.
pub trait ViewPlugin: Send + Sync {
    /// Unique key of the plugin
    fn key(&self) -> &str;

    /// Decorations for the given document state
    fn decorations(&self, tree: &DocumentTree, selection: &Selection) -> DecorationSet;
}

/// The document view's plugin list
#[derive(Default)]
pub struct EditorView {
    plugins: Vec<Box<dyn ViewPlugin>>,
}

impl EditorView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin. A plugin with the same key replaces the old one.
    pub fn register(&mut self, plugin: Box<dyn ViewPlugin>) {
        self.plugins.retain(|p| p.key() != plugin.key());
        self.plugins.push(plugin);
    }

    pub fn with_plugin(mut self, plugin: Box<dyn ViewPlugin>) -> Self {
        self.register(plugin);
        self
    }

    /// Keys of the registered plugins, in registration order
    pub fn plugin_keys(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.key()).collect()
    }

    /// Collect the decorations of every plugin for this state
    pub fn decorations(&self, tree: &DocumentTree, selection: &Selection) -> DecorationSet {
        self.plugins
            .iter()
            .fold(DecorationSet::empty(), |set, plugin| {
                set.merge(plugin.decorations(tree, selection))
            })
    }
}

impl std::fmt::Debug for EditorView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorView")
            .field("plugins", &self.plugin_keys())
            .finish()
    }
}
