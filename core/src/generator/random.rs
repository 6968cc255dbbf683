use hashbrown::HashSet;

use super::*;

/// Uniform placement by rejection sampling: draws random coordinates until enough distinct ones
/// have been collected.
#[derive(Clone, Debug, PartialEq)]
pub struct RejectionSampler {
    seed: u64,
}

impl RejectionSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinePlacer for RejectionSampler {
    fn place(self, board: &mut Board) -> Result<()> {
        use rand::prelude::*;

        check_fits(board)?;

        let size = board.size();
        let wanted = usize::from(board.mine_count());
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut positions: HashSet<Coord2> = HashSet::with_capacity(wanted);
        let mut draws = 0usize;

        while positions.len() < wanted {
            let row = rng.random_range(0..size);
            let col = rng.random_range(0..size);
            positions.insert((row, col));
            draws += 1;
        }

        for &coords in &positions {
            board.set_mine(coords);
        }

        log::debug!(
            "placed {} mines on {}x{} after {} draws",
            wanted,
            size,
            size,
            draws
        );
        Ok(())
    }
}
