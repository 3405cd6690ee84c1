/*
 * Responsibility
 * - GET /health (疎通用, credential store の DB も確認)
 * - basic_auth middleware は通さない
 */
use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{error::AppError, repos::user_repo, state::AppState};

pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    user_repo::ping(&state.db).await.map_err(|e| {
        tracing::warn!(error = %e, "health check: database unreachable");
        AppError::from(e)
    })?;

    Ok(Json(json!({"status": "ok"})))
}
