//! Error types for Booth Core

use thiserror::Error;

use crate::config::ConfigError;
use crate::models::{BoothId, BoothStatus};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Booth not found: {0}")]
    NotFound(BoothId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Booth {0} is already registered")]
    AlreadyRegistered(BoothId),

    #[error("Duplicate booth id in seed data: {0}")]
    DuplicateId(BoothId),

    #[error("Booth {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: BoothId,
        from: BoothStatus,
        to: BoothStatus,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registry lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, Error>;
