use thiserror::Error;

use crate::*;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {mines} mines do not fit a {size}x{size} board")]
    InvalidConfiguration { size: Coord, mines: CellCount },
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Unknown difficulty")]
    UnknownDifficulty,
}

pub type Result<T> = std::result::Result<T, GameError>;
