use hashbrown::HashSet;

use super::*;

/// Places mines at an explicit list of coordinates. Used for replays and hand-built boards.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedLayout {
    mine_coords: Vec<Coord2>,
}

impl FixedLayout {
    pub fn new(mine_coords: Vec<Coord2>) -> Self {
        Self { mine_coords }
    }
}

impl MinePlacer for FixedLayout {
    fn place(self, board: &mut Board) -> Result<()> {
        check_fits(board)?;

        let distinct: HashSet<Coord2> = self.mine_coords.iter().copied().collect();
        if distinct.len() != usize::from(board.mine_count()) {
            return Err(GameError::InvalidConfiguration {
                size: board.size(),
                mines: board.mine_count(),
            });
        }

        for coords in distinct {
            let coords = board.validate_coords(coords)?;
            board.set_mine(coords);
        }
        Ok(())
    }
}
