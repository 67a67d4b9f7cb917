//! 游戏核心逻辑模块（棋盘状态、规则引擎等）。

pub mod rules;
pub mod state;

pub use rules::{MoveResolution, PlaceAction, RuleEngine, RuleError};
pub use state::{
    Board,
    Cell,
    Difficulty,
    GameSession,
    IntegrityError,
    Outcome,
    BOARD_SIZE,
};
