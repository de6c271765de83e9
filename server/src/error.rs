use thiserror::Error;

/// The server crate error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("the vendor class {class:?} is not vendor/architecture/system-id")]
    UnresolvedClientClass { class: String },
    #[error("the required vendor option {0} is missing")]
    MissingOption(&'static str),
    #[error("protocol error: {0}")]
    Protocol(#[from] bsdp_protocol::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
