use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 棋盘边长，固定为 3。
pub const BOARD_SIZE: usize = 3;

/// 单元格内容：空、玩家（人类）、AI。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    Empty,
    Human,
    Ai,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn opponent(self) -> Cell {
        match self {
            Cell::Human => Cell::Ai,
            Cell::Ai => Cell::Human,
            Cell::Empty => Cell::Empty,
        }
    }
}

/// 对局结果，始终由棋盘内容重新推导。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Outcome {
    Ongoing,
    Win { winner: Cell },
    Draw,
}

impl Default for Outcome {
    fn default() -> Self {
        Outcome::Ongoing
    }
}

impl Outcome {
    pub fn is_ongoing(self) -> bool {
        matches!(self, Outcome::Ongoing)
    }
}

/// AI 难度，由前端在两步之间随时修改。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "normal" => Ok(Difficulty::Medium),
            "hard" | "expert" => Ok(Difficulty::Hard),
            _ => Err(()),
        }
    }
}

/// 3×3 棋盘，按行优先存储。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Board {
    #[serde(default)]
    pub cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// 全部 8 条制胜线：先三行、再三列、最后两条对角线。
    pub const WINNING_LINES: [[(usize, usize); 3]; 8] = [
        [(0, 0), (0, 1), (0, 2)],
        [(1, 0), (1, 1), (1, 2)],
        [(2, 0), (2, 1), (2, 2)],
        [(0, 0), (1, 0), (2, 0)],
        [(0, 1), (1, 1), (2, 1)],
        [(0, 2), (1, 2), (2, 2)],
        [(0, 0), (1, 1), (2, 2)],
        [(0, 2), (1, 1), (2, 0)],
    ];

    pub fn new() -> Self {
        Self::default()
    }

    /// 读取单元格。行列必须在范围内。
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// 直接写入单元格，不做占用检查。行列必须在范围内。
    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
    }

    pub fn clear(&mut self) {
        self.cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
    }

    pub fn in_range(row: usize, col: usize) -> bool {
        row < BOARD_SIZE && col < BOARD_SIZE
    }

    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| !cell.is_empty()))
    }

    /// 行优先顺序列出所有空格。
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut empty = Vec::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if self.cells[row][col].is_empty() {
                    empty.push((row, col));
                }
            }
        }
        empty
    }

    pub fn mark_count(&self, mark: Cell) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell == mark)
            .count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum IntegrityError {
    MarkCountImbalance { human: usize, ai: usize },
    ConflictingWinners,
}

/// 一局对战的完整状态：棋盘、难度、结果快照。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSession {
    #[serde(default)]
    pub board: Board,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub outcome: Outcome,
}

impl GameSession {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            board: Board::new(),
            difficulty,
            outcome: Outcome::Ongoing,
        }
    }

    pub fn is_finished(&self) -> bool {
        !self.outcome.is_ongoing()
    }

    /// 清空棋盘并清除结果，保留难度设置。
    pub fn reset(&mut self) {
        self.board.clear();
        self.outcome = Outcome::Ongoing;
    }

    pub fn integrity_check(&self) -> Result<(), IntegrityError> {
        let human = self.board.mark_count(Cell::Human);
        let ai = self.board.mark_count(Cell::Ai);

        // 人类先手，落子交替：ai <= human <= ai + 1
        if ai > human || human > ai + 1 {
            return Err(IntegrityError::MarkCountImbalance { human, ai });
        }

        let mut human_lines = 0;
        let mut ai_lines = 0;
        for line in &Board::WINNING_LINES {
            let [a, b, c] = line;
            let first = self.board.cell(a.0, a.1);
            if !first.is_empty()
                && first == self.board.cell(b.0, b.1)
                && first == self.board.cell(c.0, c.1)
            {
                match first {
                    Cell::Human => human_lines += 1,
                    Cell::Ai => ai_lines += 1,
                    Cell::Empty => {}
                }
            }
        }
        if human_lines > 0 && ai_lines > 0 {
            return Err(IntegrityError::ConflictingWinners);
        }

        Ok(())
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}
