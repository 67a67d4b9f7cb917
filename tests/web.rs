#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use wasm_tictactoe::GameEngine;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn human_move_then_hard_reply() {
    let mut engine = GameEngine::new(None).expect("fresh session");
    engine.set_difficulty("hard").expect("known difficulty");

    let resolution = engine
        .place_json(r#"{"row":1,"col":1}"#)
        .expect("legal human move");
    assert!(resolution.contains("\"outcome\""));

    let response = engine.apply_ai_move(None, Some(1)).expect("ai reply");
    assert!(response.contains("\"decision\""));
}

#[wasm_bindgen_test]
fn reset_returns_an_ongoing_session() {
    let mut engine = GameEngine::new(None).expect("fresh session");
    engine
        .place_json(r#"{"row":0,"col":0}"#)
        .expect("legal move");

    let resolution = engine.reset().expect("reset serializes");
    assert!(resolution.contains("Ongoing"));
}
