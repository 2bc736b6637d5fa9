//! Auth/company store error types.

/// Errors that can occur during auth/company store operations.
///
/// Most store operations are deliberately silent no-ops on bad input; only
/// invariant violations surface as errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Refusing to remove the last remaining company
    #[error("At least one company must remain")]
    LastCompany,

    /// User not set in store
    #[error("User not set")]
    #[allow(dead_code)]
    UserNotSet,

    /// Generic auth error
    #[error("Auth error: {0}")]
    #[allow(dead_code)]
    Other(String),
}
