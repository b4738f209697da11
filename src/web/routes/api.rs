// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::services::{products, webinars};
use crate::web::middleware::auth::RequireStaff;
use crate::web::state::AppState;

/// Product data plus aggregate stats for the dashboard
pub async fn get_products(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let data = products::get_products_with_stats(&state.db_pool)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(
        serde_json::to_value(data).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
    ))
}

/// All webinar registrants (staff only)
pub async fn get_registrants(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let registrants = webinars::get_all_registrants(&state.db_pool)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(json!({ "registrants": registrants })))
}

/// Webinar attendees for the public marketing demo page
pub async fn get_webinar_attendees(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let attendees = webinars::get_all_registrants(&state.db_pool)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(json!({ "attendees": attendees })))
}

/// Multipart photo upload for a registrant (staff only)
pub async fn upload_registrant_photo(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(registrant_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let mut photo: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid multipart payload"})),
        )
    })? {
        if field.name() == Some("photo") {
            let filename = field.file_name().unwrap_or("photo.jpg").to_string();
            let bytes = field.bytes().await.map_err(|_| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "Failed to read uploaded file"})),
                )
            })?;
            photo = Some((bytes.to_vec(), filename));
        }
    }

    let Some((content, filename)) = photo else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "No photo field in upload"})),
        ));
    };

    let photo_url = webinars::upload_photo(
        &state.db_pool,
        &state.settings.upload_dir,
        &registrant_id,
        &content,
        &filename,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Photo upload failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Failed to save file"})),
        )
    })?;

    match photo_url {
        Some(url) => Ok(Json(json!({
            "message": "Photo uploaded successfully!",
            "photo_url": url
        }))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Registrant not found"})),
        )),
    }
}

#[derive(Deserialize)]
pub struct NotesUpdate {
    notes: String,
}

/// Update a registrant's notes (staff only)
pub async fn update_registrant_notes(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(registrant_id): Path<String>,
    Json(body): Json<NotesUpdate>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let updated = webinars::update_notes(&state.db_pool, &registrant_id, &body.notes)
        .await
        .map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Error updating notes"})),
            )
        })?;

    if updated {
        Ok(Json(json!({"message": "Notes updated successfully!"})))
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Registrant not found"})),
        ))
    }
}

/// Remove a registrant's photo (staff only)
pub async fn delete_registrant_photo(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(registrant_id): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let outcome = webinars::delete_photo(
        &state.db_pool,
        &state.settings.upload_dir,
        &registrant_id,
    )
    .await
    .map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Error deleting photo"})),
        )
    })?;

    match outcome {
        webinars::PhotoDelete::Deleted => {
            Ok(Json(json!({"message": "Photo deleted successfully!"})))
        }
        webinars::PhotoDelete::NoPhoto => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "No photo found for this registrant"})),
        )),
        webinars::PhotoDelete::NotFound => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Registrant not found"})),
        )),
    }
}
