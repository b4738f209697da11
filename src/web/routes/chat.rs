// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::json;

use crate::services::chat::OpenRouterClient;
use crate::web::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    message: String,
}

/// Chat endpoint proxying to OpenRouter (Llama 3.3 70B)
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    if body.message.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Message is required"})),
        ));
    }

    let Some(api_key) = state.settings.openrouter_api_key.clone() else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "OpenRouter API key not configured"})),
        ));
    };

    let client = OpenRouterClient::new(api_key);
    let reply = client.chat(&body.message).await.map_err(|e| {
        tracing::error!(error = %e, "Chat request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": format!("Internal server error: {}", e)})),
        )
    })?;

    Ok(Json(json!({
        "response": reply.response,
        "model": reply.model
    })))
}
