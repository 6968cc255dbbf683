use mineai_protocol::{BoardState, Decision, GameRecord, Move, Outcome};
use rand::prelude::*;

use crate::*;

/// Receives one record per finished game.
pub trait StatsSink {
    fn record(&mut self, record: GameRecord);
}

impl StatsSink for Vec<GameRecord> {
    fn record(&mut self, record: GameRecord) {
        self.push(record);
    }
}

/// Sink for callers that do not keep statistics.
#[derive(Copy, Clone, Debug, Default)]
pub struct DiscardStats;

impl StatsSink for DiscardStats {
    fn record(&mut self, _record: GameRecord) {}
}

/// Owns the current [`GameSession`] and is the single entry point for moves, whether they come
/// from a person or from the AI.
#[derive(Debug)]
pub struct GameController<S> {
    session: GameSession,
    rng: SmallRng,
    stats: S,
}

impl<S: StatsSink> GameController<S> {
    pub fn new(difficulty: Difficulty, seed: u64, stats: S) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let seed = rng.random_range(0..u64::MAX);
        let session = GameSession::new(difficulty, RejectionSampler::new(seed))?;
        Ok(Self {
            session,
            rng,
            stats,
        })
    }

    /// Starts over on a freshly mined board, dropping the previous session.
    pub fn new_game(&mut self, difficulty: Difficulty) -> Result<()> {
        let seed = self.rng.random_range(0..u64::MAX);
        self.start_game(difficulty, RejectionSampler::new(seed))
    }

    pub fn start_game(&mut self, difficulty: Difficulty, placer: impl MinePlacer) -> Result<()> {
        self.session = GameSession::new(difficulty, placer)?;
        log::info!("new {} game", difficulty);
        Ok(())
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn stats(&self) -> &S {
        &self.stats
    }

    pub fn board_state(&self) -> BoardState {
        self.session.board().board_state()
    }

    pub fn open(&mut self, actor: Actor, coords: Coord2) -> MoveOutcome {
        let outcome = self.session.apply_open(actor, coords);
        self.after_move(outcome);
        outcome
    }

    pub fn flag(&mut self, actor: Actor, coords: Coord2) -> MoveOutcome {
        let outcome = self.session.apply_flag(actor, coords);
        self.after_move(outcome);
        outcome
    }

    /// Applies a wire-format move. Coordinates outside the board are ignored.
    pub fn apply(&mut self, actor: Actor, mv: Move) -> MoveOutcome {
        let Some(coords) = checked_coords(mv.row, mv.col, self.session.board().size()) else {
            log::warn!("{actor:?} move out of range: {mv:?}");
            return MoveOutcome::Ignored;
        };

        match mv.decision {
            Decision::Open => self.open(actor, coords),
            Decision::Flag => self.flag(actor, coords),
        }
    }

    fn after_move(&mut self, outcome: MoveOutcome) {
        let outcome = match outcome {
            MoveOutcome::Won => Outcome::Win,
            MoveOutcome::Lost => Outcome::Loss,
            MoveOutcome::Ignored | MoveOutcome::Continue => return,
        };

        self.stats.record(GameRecord {
            actor: self.session.actor().label(),
            difficulty: self.session.difficulty().label().into(),
            outcome,
            elapsed_ms: self.session.elapsed().as_millis() as u64,
        });
    }
}

#[cfg(test)]
mod tests {
    use mineai_protocol::{ActorLabel, Symbol};

    use super::*;

    fn controller(mines: &[Coord2]) -> GameController<Vec<GameRecord>> {
        let mut controller = GameController::new(Difficulty::Easy, 1, Vec::new()).unwrap();
        controller
            .start_game(Difficulty::Easy, FixedLayout::new(mines.to_vec()))
            .unwrap();
        controller
    }

    const EASY_MINES: [Coord2; 10] = [
        (0, 7),
        (1, 7),
        (2, 7),
        (3, 7),
        (4, 7),
        (5, 7),
        (6, 7),
        (7, 7),
        (7, 6),
        (7, 5),
    ];

    #[test]
    fn new_game_places_preset_mines() {
        let mut controller = GameController::new(Difficulty::Easy, 9, DiscardStats).unwrap();
        assert_eq!(controller.session().board().placed_mine_count(), 10);

        controller.new_game(Difficulty::Hard).unwrap();
        assert_eq!(controller.session().board().size(), 24);
        assert_eq!(controller.session().board().placed_mine_count(), 99);
        assert_eq!(controller.session().status(), GameStatus::InProgress);
    }

    #[test]
    fn loss_emits_one_record_for_the_acting_player() {
        let mut controller = controller(&EASY_MINES);

        assert_eq!(controller.apply(Actor::Ai, Move::open(0, 7)), MoveOutcome::Lost);
        assert_eq!(controller.apply(Actor::Ai, Move::open(0, 0)), MoveOutcome::Ignored);

        let records = controller.stats();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].actor, ActorLabel::Ai);
        assert_eq!(records[0].difficulty, "easy");
        assert_eq!(records[0].outcome, Outcome::Loss);
    }

    #[test]
    fn win_is_recorded_for_the_human() {
        let mut controller = controller(&EASY_MINES);

        assert_eq!(controller.apply(Actor::Human, Move::flag(0, 7)), MoveOutcome::Continue);
        assert_eq!(controller.apply(Actor::Human, Move::open(0, 0)), MoveOutcome::Won);

        assert_eq!(controller.stats()[0].actor, ActorLabel::User);
        assert_eq!(controller.stats()[0].outcome, Outcome::Win);
    }

    #[test]
    fn out_of_range_moves_are_ignored() {
        let mut controller = controller(&EASY_MINES);

        assert_eq!(controller.apply(Actor::Ai, Move::open(-1, 0)), MoveOutcome::Ignored);
        assert_eq!(controller.apply(Actor::Ai, Move::flag(0, 8)), MoveOutcome::Ignored);
        let state = controller.board_state();
        assert!(state.0.iter().flatten().all(|&symbol| symbol == Symbol::Closed));
    }
}
