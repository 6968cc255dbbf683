use std::time::Duration;

use web_time::Instant;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game: the board, its status and who is currently driving it.
///
/// All cell mutation goes through [`GameSession::apply_open`] and [`GameSession::apply_flag`].
/// Once the status is terminal both become no-ops.
#[derive(Clone, Debug)]
pub struct GameSession {
    board: Board,
    difficulty: Difficulty,
    status: GameStatus,
    actor: Actor,
    triggered_mine: Option<Coord2>,
    started_at: Option<Instant>,
    finished_after: Option<Duration>,
}

impl GameSession {
    /// Creates a session for `difficulty` and runs `placer` on the fresh grid before any action
    /// can be applied.
    pub fn new(difficulty: Difficulty, placer: impl MinePlacer) -> Result<Self> {
        let mut board = Board::new(difficulty.config());
        placer.place(&mut board)?;
        Ok(Self::from_board(difficulty, board))
    }

    /// Wraps an already mined board.
    pub fn from_board(difficulty: Difficulty, board: Board) -> Self {
        Self {
            board,
            difficulty,
            status: GameStatus::InProgress,
            actor: Actor::default(),
            triggered_mine: None,
            started_at: None,
            finished_after: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn actor(&self) -> Actor {
        self.actor
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn mines_left(&self) -> isize {
        self.board.mine_count() as isize - self.board.flagged_count() as isize
    }

    /// Time from the first accepted action until the end of the game, or until now while it is
    /// still running.
    pub fn elapsed(&self) -> Duration {
        match (self.started_at, self.finished_after) {
            (_, Some(finished_after)) => finished_after,
            (Some(started_at), None) => started_at.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }

    pub fn apply_open(&mut self, actor: Actor, coords: Coord2) -> MoveOutcome {
        self.try_open(actor, coords).unwrap_or(MoveOutcome::Ignored)
    }

    pub fn apply_flag(&mut self, actor: Actor, coords: Coord2) -> MoveOutcome {
        self.try_flag(actor, coords).unwrap_or(MoveOutcome::Ignored)
    }

    fn try_open(&mut self, actor: Actor, coords: Coord2) -> Result<MoveOutcome> {
        let cell = self.board.cell(coords)?;
        if self.status.is_finished() || cell.opened || cell.flagged {
            return Ok(MoveOutcome::Ignored);
        }
        self.accept(actor);

        let fill = self.board.open_flood_fill(coords)?;
        log::debug!("{actor:?} opened {coords:?}: {fill:?}");

        Ok(if fill.hit_mine {
            self.triggered_mine = Some(coords);
            self.finish(GameStatus::Lost);
            MoveOutcome::Lost
        } else if self.board.cleared_count() == self.board.safe_cell_count() {
            self.finish(GameStatus::Won);
            MoveOutcome::Won
        } else {
            MoveOutcome::Continue
        })
    }

    fn try_flag(&mut self, actor: Actor, coords: Coord2) -> Result<MoveOutcome> {
        let cell = self.board.cell(coords)?;
        if self.status.is_finished() || cell.opened {
            return Ok(MoveOutcome::Ignored);
        }
        self.accept(actor);

        self.board.toggle_flag(coords)?;
        Ok(MoveOutcome::Continue)
    }

    fn accept(&mut self, actor: Actor) {
        self.actor = actor;
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn finish(&mut self, status: GameStatus) {
        if self.status.is_finished() {
            return;
        }

        self.board.reveal_all();
        self.status = status;
        self.finished_after = Some(self.elapsed());
        log::info!(
            "game {:?} by {:?} after {} ms",
            status,
            self.actor,
            self.elapsed().as_millis()
        );
    }
}
