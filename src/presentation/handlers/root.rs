use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::application::services::EngineState;
use crate::presentation::state::AppState;

pub const SYSTEM_NAME: &str = "E.I.D.O.S. Neural Bridge";

#[derive(Serialize)]
pub struct RootResponse {
    pub system: String,
    pub status: String,
    pub model_loaded: bool,
    pub engine: String,
}

pub async fn root_handler(State(state): State<AppState>) -> Json<RootResponse> {
    let engine_state = state.engine.state();
    Json(RootResponse {
        system: SYSTEM_NAME.to_string(),
        status: "ONLINE".to_string(),
        model_loaded: engine_state == EngineState::Ready,
        engine: engine_state.as_str().to_string(),
    })
}
