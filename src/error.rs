pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The failure classes produced by the backend client. Everything except `Auth` is non-fatal and
/// leaves the in-memory snapshot untouched; `Auth` means the stored session has been cleared and
/// the user must log in again.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing, invalid or expired credentials, including a failed token refresh.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The backend rejected a create payload. Carries the backend's message verbatim.
    #[error("the backend rejected the request: {0}")]
    Validation(String),

    /// Transport-level failure, or a response body we could not make sense of.
    #[error("network failure: {0}")]
    Network(String),

    /// The target of a delete does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}
