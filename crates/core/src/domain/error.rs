// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid item id: {0}")]
    InvalidId(String),

    #[error("Invalid rate: {0}")]
    InvalidRate(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
