use serde::{Deserialize, Serialize};

use super::state::{Board, Cell, GameSession, Outcome};

fn default_place_mark() -> Cell {
    Cell::Human
}

/// 前端上报的落子请求。`mark` 缺省为人类棋子。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaceAction {
    pub row: usize,
    pub col: usize,
    #[serde(default = "default_place_mark")]
    pub mark: Cell,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum RuleError {
    CellOccupied { row: usize, col: usize },
    OutOfRange { row: usize, col: usize },
    NoLegalMove,
}

/// 一次落子后的完整回执：更新后的会话与重新推导的结果。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveResolution {
    pub session: GameSession,
    pub outcome: Outcome,
}

impl MoveResolution {
    pub fn new(session: GameSession) -> Self {
        let outcome = session.outcome;
        Self { session, outcome }
    }
}

/// 规则引擎：合法性检查与终局判定。不校验先后手，轮换由调用方负责。
pub struct RuleEngine;

impl RuleEngine {
    /// 扫描三行、三列、两条对角线；无制胜线且棋盘已满为平局。
    pub fn evaluate(board: &Board) -> Outcome {
        for line in &Board::WINNING_LINES {
            let [a, b, c] = line;
            let first = board.cell(a.0, a.1);
            if !first.is_empty()
                && first == board.cell(b.0, b.1)
                && first == board.cell(c.0, c.1)
            {
                return Outcome::Win { winner: first };
            }
        }

        if board.is_full() {
            Outcome::Draw
        } else {
            Outcome::Ongoing
        }
    }

    /// 在空格上落子。越界或占用时报错，棋盘保持原样。
    pub fn place(board: &mut Board, row: usize, col: usize, mark: Cell) -> Result<(), RuleError> {
        if !Board::in_range(row, col) {
            return Err(RuleError::OutOfRange { row, col });
        }
        if !board.cell(row, col).is_empty() {
            return Err(RuleError::CellOccupied { row, col });
        }
        board.set_cell(row, col, mark);
        Ok(())
    }

    /// 会话级落子：执行 `place` 并刷新结果快照。
    pub fn apply_move(
        session: &mut GameSession,
        action: PlaceAction,
    ) -> Result<MoveResolution, RuleError> {
        Self::place(&mut session.board, action.row, action.col, action.mark)?;
        session.outcome = Self::evaluate(&session.board);
        Ok(MoveResolution::new(session.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from_rows(rows: [&str; 3]) -> Board {
        let mut board = Board::new();
        for (row, pattern) in rows.iter().enumerate() {
            for (col, ch) in pattern.chars().enumerate() {
                let cell = match ch {
                    'X' => Cell::Human,
                    'O' => Cell::Ai,
                    _ => Cell::Empty,
                };
                board.set_cell(row, col, cell);
            }
        }
        board
    }

    #[test]
    fn evaluate_detects_row_win() {
        let board = board_from_rows(["XXX", "OO.", "..."]);
        assert_eq!(
            RuleEngine::evaluate(&board),
            Outcome::Win {
                winner: Cell::Human
            }
        );
    }

    #[test]
    fn evaluate_detects_column_win() {
        let board = board_from_rows(["OX.", "OX.", "O.X"]);
        assert_eq!(
            RuleEngine::evaluate(&board),
            Outcome::Win { winner: Cell::Ai }
        );
    }

    #[test]
    fn evaluate_detects_both_diagonals() {
        let main_diag = board_from_rows(["X.O", ".XO", "..X"]);
        assert_eq!(
            RuleEngine::evaluate(&main_diag),
            Outcome::Win {
                winner: Cell::Human
            }
        );

        let anti_diag = board_from_rows(["XXO", ".O.", "OX."]);
        assert_eq!(
            RuleEngine::evaluate(&anti_diag),
            Outcome::Win { winner: Cell::Ai }
        );
    }

    #[test]
    fn evaluate_reports_draw_only_when_full_without_winner() {
        let full = board_from_rows(["XOX", "XXO", "OXO"]);
        assert_eq!(RuleEngine::evaluate(&full), Outcome::Draw);

        let open = board_from_rows(["XXO", "OOX", "XO."]);
        assert_eq!(RuleEngine::evaluate(&open), Outcome::Ongoing);
    }

    #[test]
    fn full_board_with_completed_line_is_a_win_not_a_draw() {
        let board = board_from_rows(["XXX", "OOX", "XOO"]);
        assert_eq!(
            RuleEngine::evaluate(&board),
            Outcome::Win {
                winner: Cell::Human
            }
        );
    }

    #[test]
    fn place_rejects_occupied_cell_and_leaves_board_unmodified() {
        let mut board = board_from_rows(["X..", "...", "..."]);
        let snapshot = board.clone();

        let result = RuleEngine::place(&mut board, 0, 0, Cell::Ai);

        assert_eq!(result, Err(RuleError::CellOccupied { row: 0, col: 0 }));
        assert_eq!(board, snapshot, "failed place must not touch the board");
    }

    #[test]
    fn place_rejects_out_of_range_coordinates() {
        let mut board = Board::new();
        assert_eq!(
            RuleEngine::place(&mut board, 3, 0, Cell::Human),
            Err(RuleError::OutOfRange { row: 3, col: 0 })
        );
        assert_eq!(
            RuleEngine::place(&mut board, 0, 7, Cell::Human),
            Err(RuleError::OutOfRange { row: 0, col: 7 })
        );
        assert_eq!(board, Board::new());
    }

    #[test]
    fn place_does_not_enforce_turn_alternation() {
        let mut board = Board::new();
        RuleEngine::place(&mut board, 0, 0, Cell::Human).expect("first place");
        RuleEngine::place(&mut board, 0, 1, Cell::Human).expect("same mark twice is allowed");
        assert_eq!(board.mark_count(Cell::Human), 2);
    }

    #[test]
    fn apply_move_refreshes_the_outcome_snapshot() {
        let mut session = GameSession::default();
        session.board = board_from_rows(["XX.", "OO.", "..."]);

        let resolution = RuleEngine::apply_move(
            &mut session,
            PlaceAction {
                row: 0,
                col: 2,
                mark: Cell::Human,
            },
        )
        .expect("move should succeed");

        assert_eq!(
            resolution.outcome,
            Outcome::Win {
                winner: Cell::Human
            }
        );
        assert!(session.is_finished());
    }
}
