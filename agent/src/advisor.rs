use std::future::Future;

use mineai_protocol::{BoardState, Move};

use crate::*;

/// Something that proposes moves for a board.
///
/// Implementations return the moves in the order they should be applied and never an empty list:
/// an empty reply is reported as [`AgentError::NoAiMove`].
pub trait MoveAdvisor {
    fn suggest_moves(&self, state: &BoardState) -> impl Future<Output = Result<Vec<Move>>>;
}
