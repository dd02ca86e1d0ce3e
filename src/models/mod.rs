//! Pure data models: paths, the lazy tree, buffers and navigation history.

pub mod file_tree;
pub mod language;
pub mod nav_history;
pub mod path;
pub mod text_buffer;

pub use file_tree::{
    is_hidden, DirEntry, FileTree, FileTreeError, FileTreeRow, LoadState, Node, NodeId, NodeKind,
};
pub use language::LanguageHint;
pub use nav_history::{NavigationEntry, NavigationHistory, DEFAULT_HISTORY_CAPACITY};
pub use text_buffer::TextBuffer;
