use std::fmt::Write;

use mineai_core::{Cell, Coord2, GameSession, GameStatus};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ViewCell {
    Hidden,
    Revealed(u8),
    Flagged,
    TriggeredMine,
    Mine,
    Misflagged,
}

impl ViewCell {
    fn glyph(self) -> char {
        match self {
            Self::Hidden => '#',
            Self::Revealed(0) => '.',
            Self::Revealed(count) => char::from(b'0' + count),
            Self::Flagged => 'F',
            Self::TriggeredMine => 'X',
            Self::Mine => '*',
            Self::Misflagged => '!',
        }
    }
}

fn view_cell(session: &GameSession, coords: Coord2) -> ViewCell {
    let cell = session.board()[coords];
    if !session.status().is_finished() {
        return match cell {
            Cell { flagged: true, .. } => ViewCell::Flagged,
            Cell { opened: false, .. } => ViewCell::Hidden,
            Cell { adjacent_mines, .. } => ViewCell::Revealed(adjacent_mines.unwrap_or(0)),
        };
    }

    if session.triggered_mine() == Some(coords) {
        return ViewCell::TriggeredMine;
    }
    match cell {
        Cell {
            has_mine: true,
            flagged: true,
            ..
        } => ViewCell::Flagged,
        Cell { has_mine: true, .. } => ViewCell::Mine,
        Cell { flagged: true, .. } => ViewCell::Misflagged,
        Cell { adjacent_mines, .. } => ViewCell::Revealed(adjacent_mines.unwrap_or(0)),
    }
}

/// Text rendering of the board, read straight from the session grid.
pub fn render(session: &GameSession) -> String {
    let board = session.board();
    let size = board.size();
    let mut out = String::new();

    let status = match session.status() {
        GameStatus::InProgress => "playing",
        GameStatus::Won => "won",
        GameStatus::Lost => "lost",
    };
    let _ = writeln!(
        out,
        "{} | mines left {} | {}s | {}",
        session.difficulty(),
        session.mines_left(),
        session.elapsed().as_secs(),
        status
    );

    out.push_str("   ");
    for col in 0..size {
        let _ = write!(out, "{:>3}", col);
    }
    out.push('\n');

    for row in 0..size {
        let _ = write!(out, "{:>3}", row);
        for col in 0..size {
            let _ = write!(out, "{:>3}", view_cell(session, (row, col)).glyph());
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use mineai_core::{Actor, Board, Difficulty};

    use super::*;

    fn session(mines: &[Coord2]) -> GameSession {
        let board = Board::with_mines(3, mines).unwrap();
        GameSession::from_board(Difficulty::Custom(board.config()), board)
    }

    fn rows(rendered: &str) -> Vec<String> {
        rendered
            .lines()
            .skip(2)
            .map(|line| line.split_whitespace().skip(1).collect())
            .collect()
    }

    #[test]
    fn running_game_hides_mines() {
        let mut game = session(&[(0, 0), (0, 2)]);
        game.apply_open(Actor::Human, (2, 2));
        game.apply_flag(Actor::Human, (0, 0));

        assert_eq!(rows(&render(&game)), vec!["F##", "121", "..."]);
    }

    #[test]
    fn lost_game_shows_triggered_mine_and_misflags() {
        let mut game = session(&[(0, 0), (2, 2)]);
        game.apply_flag(Actor::Human, (0, 1));
        game.apply_open(Actor::Human, (2, 2));

        let rendered = render(&game);

        assert!(rendered.lines().next().unwrap().ends_with("lost"));
        assert_eq!(rows(&rendered), vec!["*!.", "121", ".1X"]);
    }
}
