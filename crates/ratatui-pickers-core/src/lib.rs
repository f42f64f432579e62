//! `ratatui-pickers-core` provides the selection engines behind two terminal pickers: a
//! date-range picker and a lazily loaded tree.
//!
//! The engines are plain data plus pure functions, usable without any widget. The widgets on top
//! of them follow one shape: an options struct, `handle_event` returning an action enum, and
//! `render` into a `ratatui` buffer.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you drive input + rendering from your app.
//! - No async runtime: child loads are handed back as futures and the caller decides how to poll
//!   them.
//! - Change notifications are return values, not callbacks.
//!
//! ## Getting started
//!
//! Most users should depend on the facade crate `ratatui-pickers`. Use this crate directly if
//! you only need the engines.
//!
//! Useful entry points:
//! - [`date::accept_typed`] / [`date::select_day`]: typed and clicked range transitions.
//! - [`date::DateRangePicker`]: two masked inputs and a calendar popover.
//! - [`tree::TreeModel`]: expansion, cascading selection, lazy child loading.
//! - [`tree::TreeView`]: keyboard and mouse driven tree widget.
//!
//! ## Lazy loading
//!
//! [`tree::TreeView`] queues a [`tree::PendingLoad`] when a loadable node is first opened. Drain
//! them with `take_pending_loads`, poll them however your app likes, and pass each
//! [`tree::LoadOutcome`] back to `complete_load`.
pub mod date;
pub mod error;
pub mod tree;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod input;
pub mod keymap;
pub mod render;
pub mod viewport;
