//! AI 决策模块（极小极大搜索与难度策略）。

pub mod minimax;

pub use minimax::{AiAgent, AiConfig, MoveDecision, MovePolicy};
