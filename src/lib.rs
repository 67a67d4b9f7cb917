pub mod ai;
pub mod game;

use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use std::str::FromStr;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use ai::{AiAgent, AiConfig, MoveDecision, MovePolicy};
pub use game::{
    Board, Cell, Difficulty, GameSession, IntegrityError, MoveResolution, Outcome, PlaceAction,
    RuleEngine, RuleError, BOARD_SIZE,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
}

#[wasm_bindgen]
pub fn greet(name: &str) -> String {
    let message = format!("你好，{name}! 欢迎来到井字棋对战。");
    web_sys::console::log_1(&message.clone().into());
    message
}

fn to_js_error(error: RuleError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn resolution_json(resolution: &MoveResolution) -> Result<String, JsValue> {
    serde_json::to_string(resolution).map_err(serde_to_js_error)
}

fn parse_difficulty(value: Option<String>, fallback: Difficulty) -> Difficulty {
    value
        .as_deref()
        .and_then(|value| Difficulty::from_str(value).ok())
        .unwrap_or(fallback)
}

fn build_agent(difficulty: Difficulty, seed: Option<u32>) -> AiAgent {
    let config = AiConfig::from_difficulty(difficulty);
    match seed {
        Some(seed) => AiAgent::with_seed(config, u64::from(seed)),
        None => AiAgent::new(config),
    }
}

#[derive(Serialize)]
struct AiMoveResponse {
    decision: MoveDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    applied: Option<MoveResolution>,
}

#[wasm_bindgen]
pub struct GameEngine {
    session: GameSession,
}

#[wasm_bindgen]
impl GameEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(initial_session_json: Option<String>) -> Result<GameEngine, JsValue> {
        let session = if let Some(json) = initial_session_json {
            serde_json::from_str(&json).map_err(serde_to_js_error)?
        } else {
            GameSession::default()
        };
        Ok(GameEngine { session })
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session).map_err(serde_to_js_error)
    }

    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        let session: GameSession = serde_json::from_str(json).map_err(serde_to_js_error)?;
        self.session = session;
        Ok(())
    }

    pub fn difficulty(&self) -> String {
        match self.session.difficulty {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
        .to_string()
    }

    pub fn set_difficulty(&mut self, value: &str) -> Result<(), JsValue> {
        let difficulty = Difficulty::from_str(value)
            .map_err(|_| JsValue::from_str(&format!("unknown difficulty: {value}")))?;
        self.session.difficulty = difficulty;
        Ok(())
    }

    /// 人类落子。对局已结束时忽略点击，原样返回当前回执。
    pub fn place_json(&mut self, action_json: &str) -> Result<String, JsValue> {
        let action: PlaceAction = serde_json::from_str(action_json).map_err(serde_to_js_error)?;
        if self.session.is_finished() {
            return resolution_json(&MoveResolution::new(self.session.clone()));
        }
        let resolution = RuleEngine::apply_move(&mut self.session, action).map_err(to_js_error)?;
        resolution_json(&resolution)
    }

    /// 计算并应用 AI 的回手。难度参数可临时覆盖会话配置。
    pub fn apply_ai_move(
        &mut self,
        difficulty: Option<String>,
        seed: Option<u32>,
    ) -> Result<String, JsValue> {
        let difficulty = parse_difficulty(difficulty, self.session.difficulty);
        let mut agent = build_agent(difficulty, seed);
        let decision = agent
            .decide_move(&mut self.session.board)
            .map_err(to_js_error)?;

        let applied = RuleEngine::apply_move(
            &mut self.session,
            PlaceAction {
                row: decision.row,
                col: decision.col,
                mark: Cell::Ai,
            },
        )
        .map_err(to_js_error)?;

        let response = AiMoveResponse {
            decision,
            applied: Some(applied),
        };
        serde_json::to_string(&response).map_err(serde_to_js_error)
    }

    pub fn reset(&mut self) -> Result<String, JsValue> {
        self.session.reset();
        resolution_json(&MoveResolution::new(self.session.clone()))
    }

    pub fn think(
        &self,
        difficulty: Option<String>,
        seed: Option<u32>,
        delay_ms: Option<u32>,
    ) -> Promise {
        // 先克隆会话，异步计算不触碰正在进行的对局
        let mut session = self.session.clone();
        let difficulty = parse_difficulty(difficulty, session.difficulty);
        let delay = delay_ms.unwrap_or(0);

        future_to_promise(async move {
            if delay > 0 {
                TimeoutFuture::new(delay).await;
            }
            let mut agent = build_agent(difficulty, seed);
            let decision = agent
                .decide_move(&mut session.board)
                .map_err(to_js_error)?;
            let json = serde_json::to_string(&decision).map_err(serde_to_js_error)?;
            Ok(JsValue::from_str(&json))
        })
    }
}

/// 返回一个全新会话，方便前端初始化。
#[wasm_bindgen(js_name = "createSession")]
pub fn create_session() -> Result<JsValue, JsValue> {
    to_value(&GameSession::default()).map_err(JsValue::from)
}

/// 将传入的会话深拷贝后返回。
#[wasm_bindgen(js_name = "cloneSession")]
pub fn clone_session(session: JsValue) -> Result<JsValue, JsValue> {
    let session: GameSession = from_value(session).map_err(JsValue::from)?;
    let cloned = session.clone();
    to_value(&cloned).map_err(JsValue::from)
}

/// 重新推导给定会话棋盘的对局结果。
#[wasm_bindgen(js_name = "evaluateBoard")]
pub fn evaluate_board(session: JsValue) -> Result<JsValue, JsValue> {
    let session: GameSession = from_value(session).map_err(JsValue::from)?;
    let outcome = RuleEngine::evaluate(&session.board);
    to_value(&outcome).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "placeMark")]
pub fn place_mark(session: JsValue, action: JsValue) -> Result<JsValue, JsValue> {
    let mut session: GameSession = from_value(session).map_err(JsValue::from)?;
    let action: PlaceAction = from_value(action).map_err(JsValue::from)?;
    match RuleEngine::apply_move(&mut session, action) {
        Ok(resolution) => to_value(&resolution).map_err(JsValue::from),
        Err(error) => Err(to_js_error(error)),
    }
}

#[wasm_bindgen(js_name = "computeAiMove")]
pub fn compute_ai_move(
    session: JsValue,
    difficulty: Option<String>,
    seed: Option<u32>,
) -> Result<JsValue, JsValue> {
    let mut session: GameSession = from_value(session).map_err(JsValue::from)?;
    let difficulty = parse_difficulty(difficulty, session.difficulty);
    let mut agent = build_agent(difficulty, seed);
    match agent.decide_move(&mut session.board) {
        Ok(decision) => to_value(&decision).map_err(JsValue::from),
        Err(error) => Err(to_js_error(error)),
    }
}

#[wasm_bindgen(js_name = "validateSession")]
pub fn validate_session(session: JsValue) -> Result<(), JsValue> {
    let session: GameSession = from_value(session).map_err(JsValue::from)?;
    session
        .integrity_check()
        .map_err(|error| to_value(&error).unwrap_or_else(|e| JsValue::from_str(&e.to_string())))
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
