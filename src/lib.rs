//! State-management core for a multi-company business document scanner.
//!
//! This crate owns the business rules of the application: the auth/company
//! store, the document store, the pure filter/sort engine, and the durable
//! key-value persistence both stores write through. UI layers (screens,
//! camera capture, navigation) are external collaborators that read derived
//! state and invoke the store operations exposed here.

pub mod app;
pub mod auth;
pub mod config;
pub mod documents;
pub mod error;
pub mod storage;
pub mod utils;

pub use app::App;
pub use error::{AppError, AppResult};
