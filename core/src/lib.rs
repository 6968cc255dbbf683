//! Minesweeper board-state engine: grid, mine placement, flood-fill opening, win/loss detection
//! and the symbol grid used to brief the AI player.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use controller::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use snapshot::*;
pub use types::*;

mod board;
mod cell;
mod controller;
mod engine;
mod error;
mod generator;
mod snapshot;
mod types;

/// Side length and mine count of a square board.
///
/// Construction guarantees `size >= 1` and `mines < size * size`, so mine placement always
/// terminates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    size: Coord,
    mines: CellCount,
}

impl GameConfig {
    pub fn new(size: Coord, mines: CellCount) -> Result<Self> {
        if size == 0 || mines >= CellCount::from(size) * CellCount::from(size) {
            return Err(GameError::InvalidConfiguration { size, mines });
        }
        Ok(Self { size, mines })
    }

    pub const fn size(&self) -> Coord {
        self.size
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn total_cells(&self) -> CellCount {
        self.size as CellCount * self.size as CellCount
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Custom(GameConfig),
}

impl Difficulty {
    pub const PRESETS: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn config(self) -> GameConfig {
        match self {
            Self::Easy => GameConfig { size: 8, mines: 10 },
            Self::Medium => GameConfig { size: 16, mines: 40 },
            Self::Hard => GameConfig { size: 24, mines: 99 },
            Self::Custom(config) => config,
        }
    }

    /// The preset with exactly this size and mine count, or `Custom`.
    pub fn from_config(config: GameConfig) -> Self {
        Self::PRESETS
            .into_iter()
            .find(|preset| preset.config() == config)
            .unwrap_or(Self::Custom(config))
    }

    /// Key used by the stats collaborator.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Custom(_) => "custom",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(config) => write!(f, "custom {}x{} ({} mines)", config.size, config.size, config.mines),
            preset => f.write_str(preset.label()),
        }
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    /// Accepts a preset name or `SIZExMINES` for a custom board.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            custom => {
                let (size, mines) = custom.split_once('x').ok_or(GameError::UnknownDifficulty)?;
                let size = size.parse().map_err(|_| GameError::UnknownDifficulty)?;
                let mines = mines.parse().map_err(|_| GameError::UnknownDifficulty)?;
                Ok(Self::from_config(GameConfig::new(size, mines)?))
            }
        }
    }
}

/// Who initiated the most recent action chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Actor {
    #[default]
    Human,
    Ai,
}

impl Actor {
    pub const fn label(self) -> mineai_protocol::ActorLabel {
        match self {
            Self::Human => mineai_protocol::ActorLabel::User,
            Self::Ai => mineai_protocol::ActorLabel::Ai,
        }
    }
}

/// Result of pushing one move through the action interface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Precondition not met (finished game, opened or flagged target, out of range).
    Ignored,
    Continue,
    Lost,
    Won,
}

impl MoveOutcome {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Lost | Self::Won)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_full_and_empty_boards() {
        assert_eq!(
            GameConfig::new(3, 9),
            Err(GameError::InvalidConfiguration { size: 3, mines: 9 })
        );
        assert!(GameConfig::new(0, 0).is_err());
        assert_eq!(GameConfig::new(3, 8).unwrap().safe_cell_count(), 1);
        assert_eq!(GameConfig::new(1, 0).unwrap().safe_cell_count(), 1);
    }

    #[test]
    fn presets_match_selector_values() {
        assert_eq!(Difficulty::Easy.config(), GameConfig::new(8, 10).unwrap());
        assert_eq!(Difficulty::Medium.config(), GameConfig::new(16, 40).unwrap());
        assert_eq!(Difficulty::Hard.config(), GameConfig::new(24, 99).unwrap());
    }

    #[test]
    fn difficulty_parses_presets_and_custom() {
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(
            "10x12".parse::<Difficulty>(),
            Ok(Difficulty::Custom(GameConfig::new(10, 12).unwrap()))
        );
        assert_eq!(
            "4x16".parse::<Difficulty>(),
            Err(GameError::InvalidConfiguration { size: 4, mines: 16 })
        );
        assert_eq!("expert".parse::<Difficulty>(), Err(GameError::UnknownDifficulty));
    }

    #[test]
    fn custom_sizes_matching_a_preset_are_that_preset() {
        assert_eq!("8x10".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("24X99".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("8x11".parse::<Difficulty>().map(Difficulty::label), Ok("custom"));
        assert_eq!(
            Difficulty::from_config(GameConfig::new(16, 40).unwrap()).label(),
            "medium"
        );
    }
}
