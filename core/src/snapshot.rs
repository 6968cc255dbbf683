use mineai_protocol::{BoardState, Symbol};

use crate::*;

/// Symbol the AI collaborator sees for one cell. A flag wins over everything else.
pub fn encode_cell(cell: Cell) -> Symbol {
    match cell {
        Cell { flagged: true, .. } => Symbol::Flagged,
        Cell { opened: false, .. } => Symbol::Closed,
        Cell {
            has_mine: false,
            adjacent_mines: Some(0),
            ..
        } => Symbol::Empty,
        Cell {
            has_mine: false,
            adjacent_mines: Some(count @ 1..=8),
            ..
        } => Symbol::Count(count),
        // opened mines only exist once the game is over
        _ => Symbol::Closed,
    }
}

impl Board {
    pub fn symbol_at(&self, coords: Coord2) -> Symbol {
        encode_cell(self[coords])
    }

    /// Row-major symbol grid handed to the AI collaborator.
    pub fn board_state(&self) -> BoardState {
        let size = self.size();
        BoardState(
            (0..size)
                .map(|row| (0..size).map(|col| self.symbol_at((row, col))).collect())
                .collect(),
        )
    }
}
