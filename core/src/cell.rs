use serde::{Deserialize, Serialize};

/// State of a single board cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub has_mine: bool,
    pub opened: bool,
    pub flagged: bool,
    /// Set once when a mine-free cell is opened, never recomputed. Always `None` for mines.
    pub adjacent_mines: Option<u8>,
}

impl Cell {
    /// Counts toward the win condition.
    pub const fn is_cleared(self) -> bool {
        self.opened && (!self.has_mine || self.flagged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_opened_cells_count_as_cleared() {
        let closed = Cell::default();
        let opened = Cell {
            opened: true,
            adjacent_mines: Some(2),
            ..closed
        };
        let exploded = Cell {
            has_mine: true,
            opened: true,
            ..closed
        };

        assert!(!closed.is_cleared());
        assert!(opened.is_cleared());
        assert!(!exploded.is_cleared());
    }

    #[test]
    fn flagged_open_mine_counts_as_cleared() {
        // not reachable through moves: a flagged cell cannot be opened
        let cell = Cell {
            has_mine: true,
            opened: true,
            flagged: true,
            adjacent_mines: None,
        };

        assert!(cell.is_cleared());
    }
}
