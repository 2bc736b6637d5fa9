//! Authentication and company-scope management.
//!
//! This module owns the authenticated user, the company collection, and the
//! currently active company, including:
//! - Entity definitions (`User`, `Company`) and their draft/patch forms
//! - The `AuthStore` with login/logout and company CRUD/switch operations
//! - Auth error handling

mod error;
mod resource;
mod store;

pub use error::AuthError;
pub use resource::{Company, CompanyDraft, User, UserPatch};
pub use store::AuthStore;
