/// Payload decode errors. All are terminal for the whole batch and never
/// retried.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("empty payload")]
    EmptyInput,

    #[error("invalid transport encoding: {0}")]
    InvalidEncoding(String),

    #[error("payload is not a structured batch")]
    NotStructured,
}
