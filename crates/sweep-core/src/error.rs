/// Core validation errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid credential length: expected {expected} bytes, got {actual}")]
    InvalidCredentialLength { expected: usize, actual: usize },

    #[error("invalid credential material: {0}")]
    InvalidCredential(String),

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),
}
