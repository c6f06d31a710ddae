use thiserror::Error;

use crate::ValidationError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(ValidationError),
}

impl From<ValidationError> for GameError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidConfig(err)
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
