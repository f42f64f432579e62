//! `ratatui-pickers` is a small component library for ratatui apps: a date-range picker and a
//! tree view with cascading selection and lazily loaded children.
//!
//! This crate re-exports `ratatui-pickers-core`. Enable `crossterm` for event conversion helpers
//! and `serde` for (de)serializing ranges, formats, and tree nodes.
//!
//! ```no_run
//! use ratatui_pickers::date::DateRangePicker;
//! use ratatui_pickers::tree::TreeNode;
//! use ratatui_pickers::tree::TreeView;
//!
//! let picker = DateRangePicker::new();
//! let tree = TreeView::new(vec![
//!     TreeNode::new(1, "src").with_children(vec![TreeNode::new(2, "main.rs")]),
//!     TreeNode::new(3, "remote").loadable(),
//! ]);
//! # let _ = (picker, tree);
//! ```
pub use ratatui_pickers_core::date;
pub use ratatui_pickers_core::error;
pub use ratatui_pickers_core::input;
pub use ratatui_pickers_core::keymap;
pub use ratatui_pickers_core::render;
pub use ratatui_pickers_core::tree;
pub use ratatui_pickers_core::viewport;

#[cfg(feature = "crossterm")]
pub use ratatui_pickers_core::crossterm_input;
