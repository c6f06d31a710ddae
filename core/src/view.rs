use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::Serialize;

use crate::*;

/// Read-only picture of a session, everything a UI needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionView {
    pub rows: Coord,
    pub cols: Coord,
    pub mine_ratio: u8,
    pub difficulty: Difficulty,
    pub total_mines: CellCount,
    pub remaining_mines: i32,
    pub elapsed_secs: u32,
    pub outcome: Outcome,
    pub round: u32,
    /// Row-major.
    pub cells: Vec<CellView>,
}

impl SessionView {
    pub fn new<G: MineGenerator>(session: &GameSession<G>) -> Self {
        let board = session.board();
        Self {
            rows: board.rows(),
            cols: board.cols(),
            mine_ratio: board.mine_ratio(),
            difficulty: board.config().difficulty(),
            total_mines: session.total_mines(),
            remaining_mines: session.remaining_mines(),
            elapsed_secs: session.elapsed_secs(),
            outcome: session.outcome(),
            round: session.round(),
            cells: board.cells().map(CellView::from).collect(),
        }
    }

    pub fn cell(&self, (row, col): Coord2) -> Option<&CellView> {
        if !in_bounds((row, col), (self.rows, self.cols)) {
            return None;
        }
        let index = usize::from(row - 1) * usize::from(self.cols) + usize::from(col - 1);
        self.cells.get(index)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CellView {
    pub row: Coord,
    pub col: Coord,
    pub status: CellStatus,
    pub text: String,
    pub color: Color,
}

impl From<&Cell> for CellView {
    fn from(cell: &Cell) -> Self {
        let Appearance { glyph, color } = cell.appearance();
        Self {
            row: cell.row(),
            col: cell.col(),
            status: cell.status(),
            text: glyph.to_string(),
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_session_state() {
        let config = GameConfig::new(5, 5, 5).unwrap();
        let mut session = GameSession::new(config, FixedMineGenerator::new([(1, 1)])).unwrap();
        session.left_click((2, 2)).unwrap();
        session.right_click((1, 1)).unwrap();

        let view = session.snapshot();

        assert_eq!(view.cells.len(), 25);
        assert_eq!(view.remaining_mines, 0);
        assert_eq!(view.difficulty, Difficulty::Casual);
        assert_eq!(view.cell((2, 2)).unwrap().text, "1");
        assert_eq!(view.cell((1, 1)).unwrap().status, CellStatus::Flagged);
        assert_eq!(view.cell((1, 1)).unwrap().color, Color::Yellow);
        assert_eq!(view.cell((5, 5)).unwrap().color, Color::Grey);
        assert_eq!(view.cell((6, 1)), None);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let config = GameConfig::new(5, 5, 5).unwrap();
        let mut session = GameSession::new(config, FixedMineGenerator::new([(1, 1)])).unwrap();
        session.left_click((1, 1)).unwrap();

        let json = serde_json::to_value(session.snapshot()).unwrap();

        assert_eq!(json["outcome"], "Defeat");
        assert_eq!(json["cells"][0]["status"], "Exploded");
        assert_eq!(json["cells"][0]["color"], "red");
        assert_eq!(json["cells"][1]["status"], "Hidden");
    }
}
