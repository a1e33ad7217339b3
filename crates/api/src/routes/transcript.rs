use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{error::ApiError, state::AppState};

pub async fn list(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Json<Value> {
    let files = state.transcripts.list(&room_id).await;
    Json(json!({ "roomId": room_id, "files": files }))
}

pub async fn get(
    State(state): State<AppState>,
    Path((room_id, file)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let data = state.transcripts.get(&room_id, &file).await?;
    Ok(Json(data))
}
