use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

/// Duplicate key error code reported by MongoDB on unique index violations.
const DUPLICATE_KEY: i32 = 11000;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the connection manager, the save pipelines and the stores.
///
/// The type is `Clone` so a single connection attempt can hand the same failure
/// to every caller waiting on it.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("{0}")]
    Validation(String),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

impl From<mongodb::error::Error> for Error {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
                Error::ConstraintViolation(write.message.clone())
            }
            ErrorKind::Command(command) if command.code == DUPLICATE_KEY => {
                Error::ConstraintViolation(command.message.clone())
            }
            ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::DnsResolve { .. } => {
                Error::Connection(err.to_string())
            }
            ErrorKind::InvalidArgument { .. } => Error::Configuration(err.to_string()),
            _ => Error::Database(err.to_string()),
        }
    }
}
