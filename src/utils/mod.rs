//! Shared utilities.

pub mod ids;

pub use ids::{now_millis, IdSource};

/// Callback invoked after a store mutation so UI collaborators can
/// re-render derived state.
pub type ChangeCallback = Box<dyn Fn() + Send + Sync>;
