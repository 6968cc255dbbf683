//! Wire types shared between the game engine, the AI collaborator and the stats collaborator.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Per-cell symbol handed to the AI collaborator.
///
/// Encodes as the JSON strings `"F"`, `"E"`, `"O"` or as a bare integer `1..=8`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Symbol {
    /// `"F"`
    Flagged,
    /// `"E"`
    Closed,
    /// `"O"`, opened with no adjacent mines
    Empty,
    /// Opened with this many adjacent mines.
    Count(u8),
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Flagged => serializer.serialize_str("F"),
            Self::Closed => serializer.serialize_str("E"),
            Self::Empty => serializer.serialize_str("O"),
            Self::Count(count) => serializer.serialize_u8(*count),
        }
    }
}

struct SymbolVisitor;

impl Visitor<'_> for SymbolVisitor {
    type Value = Symbol;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("one of \"F\", \"E\", \"O\" or an integer between 1 and 8")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Symbol, E> {
        match value {
            "F" => Ok(Symbol::Flagged),
            "E" => Ok(Symbol::Closed),
            "O" => Ok(Symbol::Empty),
            other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Symbol, E> {
        match value {
            1..=8 => Ok(Symbol::Count(value as u8)),
            other => Err(E::invalid_value(de::Unexpected::Unsigned(other), &self)),
        }
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Symbol, E> {
        match u64::try_from(value) {
            Ok(value) => self.visit_u64(value),
            Err(_) => Err(E::invalid_value(de::Unexpected::Signed(value), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SymbolVisitor)
    }
}

/// Row-major `size x size` symbol grid, the sole payload sent to the AI collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardState(pub Vec<Vec<Symbol>>);

impl BoardState {
    pub fn size(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Symbol> {
        self.0.get(row)?.get(col).copied()
    }

    pub fn to_json(&self) -> String {
        // Vec of plain symbols cannot fail to serialize
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "F")]
    Flag,
    #[serde(rename = "O")]
    Open,
}

/// A single proposed move.
///
/// Coordinates are kept signed and wide so that out-of-range replies still decode and can be
/// ignored by the engine instead of failing the whole batch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub decision: Decision,
    pub row: i64,
    pub col: i64,
}

impl Move {
    pub const fn open(row: i64, col: i64) -> Self {
        Self {
            decision: Decision::Open,
            row,
            col,
        }
    }

    pub const fn flag(row: i64, col: i64) -> Self {
        Self {
            decision: Decision::Flag,
            row,
            col,
        }
    }
}

/// Arguments of the `action_mine` function call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveBatch {
    pub moves: Vec<Move>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorLabel {
    User,
    Ai,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

/// Emitted once per finished game to the stats collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub actor: ActorLabel,
    pub difficulty: String,
    pub outcome: Outcome,
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_state_encodes_mixed_symbols() {
        let state = BoardState(vec![
            vec![Symbol::Flagged, Symbol::Closed],
            vec![Symbol::Empty, Symbol::Count(3)],
        ]);

        assert_eq!(state.to_json(), r#"[["F","E"],["O",3]]"#);
    }

    #[test]
    fn symbol_rejects_out_of_range_counts() {
        assert!(serde_json::from_str::<Symbol>("0").is_err());
        assert!(serde_json::from_str::<Symbol>("9").is_err());
        assert!(serde_json::from_str::<Symbol>("\"X\"").is_err());
        assert_eq!(serde_json::from_str::<Symbol>("8").unwrap(), Symbol::Count(8));
    }

    #[test]
    fn move_batch_decodes_function_call_args() {
        let args = r#"{"moves":[{"decision":"O","row":0,"col":1},{"decision":"F","row":-1,"col":2}]}"#;

        let batch: MoveBatch = serde_json::from_str(args).unwrap();

        assert_eq!(batch.moves, vec![Move::open(0, 1), Move::flag(-1, 2)]);
    }

    #[test]
    fn game_record_uses_lowercase_labels() {
        let record = GameRecord {
            actor: ActorLabel::Ai,
            difficulty: "easy".into(),
            outcome: Outcome::Loss,
            elapsed_ms: 1500,
        };

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["actor"], "ai");
        assert_eq!(json["outcome"], "loss");
        assert_eq!(json["elapsed_ms"], 1500);
    }
}
