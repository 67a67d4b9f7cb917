use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::{Board, Cell, Difficulty, Outcome, RuleEngine, RuleError};

const WIN_SCORE: i32 = 10;

/// 决策出自哪条路径：随机落子或完整搜索。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MovePolicy {
    Random,
    Minimax,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AiConfig {
    /// 本次决策走随机分支的概率。
    pub random_move_chance: f64,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                random_move_chance: 1.0,
            },
            Difficulty::Medium => Self {
                random_move_chance: 0.5,
            },
            Difficulty::Hard => Self {
                random_move_chance: 0.0,
            },
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig::from_difficulty(Difficulty::Medium)
    }
}

/// AI 给前端的完整决策回执。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveDecision {
    pub row: usize,
    pub col: usize,
    pub score: i32,
    pub policy: MovePolicy,
    pub nodes: u64,
    pub depth_reached: u8,
}

struct SearchStats {
    nodes: u64,
    depth_reached: u8,
}

impl SearchStats {
    fn new() -> Self {
        Self {
            nodes: 0,
            depth_reached: 0,
        }
    }
}

pub struct AiAgent {
    config: AiConfig,
    rng: SmallRng,
}

impl AiAgent {
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(config: AiConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// 为 AI 挑选一个落子位置。借用期间会在棋盘上试走，返回前全部撤销。
    ///
    /// 调用前提：对局仍在进行且存在空格，否则返回 `NoLegalMove`。
    pub fn decide_move(&mut self, board: &mut Board) -> Result<MoveDecision, RuleError> {
        if !RuleEngine::evaluate(board).is_ongoing() {
            return Err(RuleError::NoLegalMove);
        }
        let empty = board.empty_cells();
        if empty.is_empty() {
            return Err(RuleError::NoLegalMove);
        }

        if self.config.random_move_chance > 0.0
            && self.rng.gen::<f64>() < self.config.random_move_chance
        {
            if let Some(decision) = self.random_decision(&empty) {
                return Ok(decision);
            }
        }

        self.minimax_decision(board).ok_or(RuleError::NoLegalMove)
    }

    fn random_decision(&mut self, empty: &[(usize, usize)]) -> Option<MoveDecision> {
        let (row, col) = *empty.choose(&mut self.rng)?;
        Some(MoveDecision {
            row,
            col,
            score: 0,
            policy: MovePolicy::Random,
            nodes: 1,
            depth_reached: 0,
        })
    }

    fn minimax_decision(&mut self, board: &mut Board) -> Option<MoveDecision> {
        let mut stats = SearchStats::new();
        let mut best: Option<(usize, usize)> = None;
        let mut best_score = i32::MIN;

        // 根节点按行优先枚举，每个子分支用全开的 α-β 窗口，
        // 平手时保留最先扫到的落点。
        for (row, col) in board.empty_cells() {
            board.set_cell(row, col, Cell::Ai);
            let score = minimax_score(board, 0, false, i32::MIN, i32::MAX, &mut stats);
            board.set_cell(row, col, Cell::Empty);

            if score > best_score {
                best_score = score;
                best = Some((row, col));
            }
        }

        best.map(|(row, col)| MoveDecision {
            row,
            col,
            score: best_score,
            policy: MovePolicy::Minimax,
            nodes: stats.nodes,
            depth_reached: stats.depth_reached,
        })
    }
}

/// 深度感知的极小极大打分：AI 胜 `10 - depth`，人类胜 `depth - 10`，平局 0。
/// 在传入的棋盘上试走并撤销，`beta <= alpha` 时剪掉剩余兄弟分支。
fn minimax_score(
    board: &mut Board,
    depth: u8,
    maximizing: bool,
    mut alpha: i32,
    mut beta: i32,
    stats: &mut SearchStats,
) -> i32 {
    stats.nodes += 1;
    if depth > stats.depth_reached {
        stats.depth_reached = depth;
    }

    match RuleEngine::evaluate(board) {
        Outcome::Win { winner: Cell::Ai } => return WIN_SCORE - depth as i32,
        Outcome::Win { winner: _ } => return depth as i32 - WIN_SCORE,
        Outcome::Draw => return 0,
        Outcome::Ongoing => {}
    }

    if maximizing {
        let mut value = i32::MIN;
        for (row, col) in board.empty_cells() {
            board.set_cell(row, col, Cell::Ai);
            let score = minimax_score(board, depth + 1, false, alpha, beta, stats);
            board.set_cell(row, col, Cell::Empty);
            value = value.max(score);
            alpha = alpha.max(score);
            if beta <= alpha {
                break;
            }
        }
        value
    } else {
        let mut value = i32::MAX;
        for (row, col) in board.empty_cells() {
            board.set_cell(row, col, Cell::Human);
            let score = minimax_score(board, depth + 1, true, alpha, beta, stats);
            board.set_cell(row, col, Cell::Empty);
            value = value.min(score);
            beta = beta.min(score);
            if beta <= alpha {
                break;
            }
        }
        value
    }
}
