use std::ops::Index;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Cells touched by one flood-fill.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FloodFill {
    /// Newly opened mine-free cells.
    pub opened: CellCount,
    pub hit_mine: bool,
}

/// Square grid of cells and the fixed number of mines it holds.
///
/// The grid is the source of truth; renderers read from it and never write back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: GameConfig,
    cells: Array2<Cell>,
}

fn nd(coords: Coord2) -> [usize; 2] {
    [coords.0.into(), coords.1.into()]
}

impl Board {
    /// Allocates an all-closed, mine-free grid. Mines are added by a [`MinePlacer`].
    pub fn new(config: GameConfig) -> Self {
        let size = config.size();
        Self {
            config,
            cells: Array2::default(nd((size, size))),
        }
    }

    /// Builds a board with mines at exactly `mine_coords`.
    pub fn with_mines(size: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        let mines = CellCount::try_from(mine_coords.len()).map_err(|_| {
            GameError::InvalidConfiguration {
                size,
                mines: CellCount::MAX,
            }
        })?;
        let mut board = Self::new(GameConfig::new(size, mines)?);
        FixedLayout::new(mine_coords.to_vec()).place(&mut board)?;
        Ok(board)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord {
        self.config.size()
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines()
    }

    pub fn total_cells(&self) -> CellCount {
        self.config.total_cells()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.config.safe_cell_count()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size && coords.1 < size {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords])
    }

    /// Row-major iterator over all coordinates.
    pub fn coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let size = self.size();
        (0..size).flat_map(move |row| (0..size).map(move |col| (row, col)))
    }

    /// In-bounds 8-neighbourhood of `coords`, excluding `coords` itself.
    pub fn neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + use<> {
        let last = self.size() - 1;
        let (row, col) = coords;
        let rows = row.saturating_sub(1)..=row.saturating_add(1).min(last);
        let cols = col.saturating_sub(1)..=col.saturating_add(1).min(last);
        rows.flat_map(move |r| cols.clone().map(move |c| (r, c)))
            .filter(move |&pos| pos != coords)
    }

    pub fn placed_mine_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.has_mine).count() as CellCount
    }

    pub(crate) fn set_mine(&mut self, coords: Coord2) {
        self.cells[nd(coords)].has_mine = true;
    }

    /// Number of mines among the in-bounds 8 neighbours of `coords`.
    pub fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        self.neighbors(coords)
            .filter(|&pos| self[pos].has_mine)
            .count() as u8
    }

    /// Opens `start` and, through an explicit work stack, every cell reachable from it via
    /// zero-count cells.
    ///
    /// Opened and flagged cells are skipped, so the opened flag alone prevents revisits. Only
    /// `start` itself can turn out to be a mine: recursion happens from zero-count cells, which
    /// have no mined neighbours.
    pub fn open_flood_fill(&mut self, start: Coord2) -> Result<FloodFill> {
        let start = self.validate_coords(start)?;
        let mut fill = FloodFill::default();
        let mut pending = vec![start];

        while let Some(coords) = pending.pop() {
            let cell = self[coords];
            if cell.opened || cell.flagged {
                continue;
            }

            if cell.has_mine {
                self.cells[nd(coords)].opened = true;
                fill.hit_mine = true;
                continue;
            }

            let adjacent_mines = self.count_adjacent_mines(coords);
            let cell = &mut self.cells[nd(coords)];
            cell.opened = true;
            cell.adjacent_mines = Some(adjacent_mines);
            fill.opened += 1;

            if adjacent_mines == 0 {
                pending.extend(self.neighbors(coords));
            }
        }

        Ok(fill)
    }

    /// Flips the flag on a closed cell. Returns `false` when the cell is already open.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<bool> {
        let coords = self.validate_coords(coords)?;
        let cell = &mut self.cells[nd(coords)];
        if cell.opened {
            return Ok(false);
        }
        cell.flagged = !cell.flagged;
        Ok(true)
    }

    /// Opens every cell at the end of a game. Mine-free cells that were still closed get their
    /// count now; mines never do.
    pub fn reveal_all(&mut self) {
        for coords in self.coords() {
            if self[coords].opened {
                continue;
            }
            let adjacent_mines = (!self[coords].has_mine).then(|| self.count_adjacent_mines(coords));
            let cell = &mut self.cells[nd(coords)];
            cell.opened = true;
            cell.adjacent_mines = adjacent_mines;
        }
    }

    /// Cells that are open and either mine-free or flagged.
    pub fn cleared_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_cleared()).count() as CellCount
    }

    pub fn flagged_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.flagged).count() as CellCount
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[nd(coords)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened(board: &Board) -> Vec<Coord2> {
        board.coords().filter(|&pos| board[pos].opened).collect()
    }

    #[test]
    fn new_board_is_closed_and_mine_free() {
        let board = Board::new(GameConfig::new(4, 3).unwrap());

        assert_eq!(board.placed_mine_count(), 0);
        assert!(board.coords().all(|pos| board[pos] == Cell::default()));
        assert_eq!(board.coords().count(), 16);
    }

    #[test]
    fn adjacency_clips_at_corners_and_edges() {
        // every cell but the center is a mine
        let full = Board::new(GameConfig::new(9, 0).unwrap());
        let mines: Vec<Coord2> = full.coords().filter(|&pos| pos != (4, 4)).collect();
        let board = Board::with_mines(9, &mines).unwrap();

        assert_eq!(board.count_adjacent_mines((0, 0)), 3);
        assert_eq!(board.count_adjacent_mines((8, 8)), 3);
        assert_eq!(board.count_adjacent_mines((0, 4)), 5);
        assert_eq!(board.count_adjacent_mines((4, 0)), 5);
        assert_eq!(board.count_adjacent_mines((4, 4)), 8);
        assert_eq!(board.count_adjacent_mines((3, 3)), 7);
    }

    #[test]
    fn adjacency_is_symmetric() {
        let board = Board::with_mines(5, &[(1, 1)]).unwrap();

        for pos in board.neighbors((1, 1)) {
            assert_eq!(board.count_adjacent_mines(pos), 1, "{pos:?}");
        }
        assert_eq!(board.count_adjacent_mines((1, 1)), 0);
        assert_eq!(board.count_adjacent_mines((3, 3)), 0);
    }

    #[test]
    fn flood_fill_stops_at_numbered_boundary() {
        // mine in the bottom-right corner, a wall of numbers around it
        let mut board = Board::with_mines(4, &[(3, 3)]).unwrap();

        let fill = board.open_flood_fill((0, 0)).unwrap();

        assert_eq!(fill, FloodFill { opened: 15, hit_mine: false });
        assert_eq!(board[(0, 0)].adjacent_mines, Some(0));
        assert_eq!(board[(2, 2)].adjacent_mines, Some(1));
        assert!(!board[(3, 3)].opened);
        assert_eq!(board[(3, 3)].adjacent_mines, None);
    }

    #[test]
    fn flood_fill_skips_flagged_cells() {
        let mut board = Board::with_mines(4, &[(3, 3)]).unwrap();
        assert!(board.toggle_flag((0, 3)).unwrap());

        let fill = board.open_flood_fill((0, 0)).unwrap();

        assert_eq!(fill.opened, 14);
        assert!(!board[(0, 3)].opened);
        assert!(board[(0, 3)].flagged);
    }

    #[test]
    fn flood_fill_is_idempotent_on_opened_cells() {
        let mut board = Board::with_mines(5, &[(4, 4), (0, 4)]).unwrap();

        board.open_flood_fill((2, 0)).unwrap();
        let first = opened(&board);
        let again = board.open_flood_fill((2, 0)).unwrap();

        assert_eq!(again, FloodFill::default());
        assert_eq!(opened(&board), first);
    }

    #[test]
    fn flood_fill_of_numbered_cell_opens_only_that_cell() {
        let mut board = Board::with_mines(3, &[(0, 0)]).unwrap();

        let fill = board.open_flood_fill((1, 1)).unwrap();

        assert_eq!(fill.opened, 1);
        assert_eq!(opened(&board), vec![(1, 1)]);
    }

    #[test]
    fn flood_fill_on_mine_reports_hit() {
        let mut board = Board::with_mines(3, &[(1, 1)]).unwrap();

        let fill = board.open_flood_fill((1, 1)).unwrap();

        assert_eq!(fill, FloodFill { opened: 0, hit_mine: true });
        assert!(board[(1, 1)].opened);
        assert_eq!(board[(1, 1)].adjacent_mines, None);
    }

    #[test]
    fn toggle_flag_refuses_opened_cells() {
        let mut board = Board::with_mines(3, &[(0, 0)]).unwrap();
        board.open_flood_fill((2, 2)).unwrap();

        assert!(!board.toggle_flag((2, 2)).unwrap());
        assert!(board.toggle_flag((0, 0)).unwrap());
        assert!(board[(0, 0)].flagged);
        assert!(board.toggle_flag((0, 0)).unwrap());
        assert!(!board[(0, 0)].flagged);
    }

    #[test]
    fn reveal_all_opens_everything_without_counting_mines() {
        let mut board = Board::with_mines(3, &[(0, 0)]).unwrap();

        board.reveal_all();

        assert!(board.coords().all(|pos| board[pos].opened));
        assert_eq!(board[(0, 0)].adjacent_mines, None);
        assert_eq!(board[(1, 1)].adjacent_mines, Some(1));
        assert_eq!(board[(2, 2)].adjacent_mines, Some(0));
    }

    #[test]
    fn neighbors_clip_at_corners_and_edges() {
        let board = Board::new(GameConfig::new(9, 0).unwrap());

        for corner in [(0, 0), (0, 8), (8, 0), (8, 8)] {
            assert_eq!(board.neighbors(corner).count(), 3, "{corner:?}");
        }
        for edge in [(0, 4), (4, 0), (8, 4), (4, 8)] {
            assert_eq!(board.neighbors(edge).count(), 5, "{edge:?}");
        }
        let inner: Vec<_> = board.neighbors((4, 4)).collect();
        assert_eq!(inner.len(), 8);
        assert!(!inner.contains(&(4, 4)));
    }

    #[test]
    fn single_cell_board_has_no_neighbors() {
        let board = Board::new(GameConfig::new(1, 0).unwrap());

        assert_eq!(board.neighbors((0, 0)).count(), 0);
    }

    #[test]
    fn out_of_range_mutations_are_rejected() {
        let mut board = Board::with_mines(3, &[(0, 0)]).unwrap();

        assert_eq!(board.open_flood_fill((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(board.toggle_flag((0, 3)), Err(GameError::InvalidCoords));
        assert!(board.coords().all(|pos| !board[pos].opened && !board[pos].flagged));
    }
}
