//! Tree selection and expansion engine.
//!
//! The forest ([`TreeNode`]) is plain data; expansion, selection and loading live in
//! [`TreeState`] beside it. [`TreeModel`] pairs the two and runs lazy child loads through a
//! [`ChildLoader`]. [`TreeView`] is the terminal front end.

pub mod loader;
pub mod model;
pub mod node;
pub mod state;
pub mod view;

pub use loader::ChildLoader;
pub use loader::ErrorSink;
pub use loader::LoadOutcome;
pub use loader::LogSink;
pub use loader::PendingLoad;
pub use model::TreeEffect;
pub use model::TreeModel;
pub use model::plan_expand;
pub use node::NodeId;
pub use node::TreeNode;
pub use node::VisibleRow;
pub use node::all_ids;
pub use node::descendant_ids;
pub use node::find_node;
pub use node::find_node_mut;
pub use node::replace_children;
pub use node::visible_rows;
pub use state::FlagMap;
pub use state::SelectionChange;
pub use state::TreeState;
pub use state::toggle_expand;
pub use state::toggle_select;
pub use view::TreeAction;
pub use view::TreeView;
pub use view::TreeViewOptions;
