use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Marks exactly `board.mine_count()` distinct cells of a fresh board as mines.
///
/// Must run once per game, after the grid is created and before any action is accepted.
pub trait MinePlacer {
    fn place(self, board: &mut Board) -> Result<()>;
}

fn check_fits(board: &Board) -> Result<()> {
    if board.mine_count() >= board.total_cells() {
        return Err(GameError::InvalidConfiguration {
            size: board.size(),
            mines: board.mine_count(),
        });
    }
    Ok(())
}
