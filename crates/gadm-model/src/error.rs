use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GadmError {
    #[error("threshold must be between 0 and 100, got {0}")]
    InvalidThreshold(u8),
}

pub type Result<T> = std::result::Result<T, GadmError>;
