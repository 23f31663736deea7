use crate::AppState;
use crate::auth::UserId;
use crate::error::ApiError;
use crate::handlers::parse_id;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{ApiMessage, Character, UpsertCharacterRequest};

pub async fn list_characters(
    State(state): State<AppState>,
) -> Result<Json<Vec<Character>>, ApiError> {
    Ok(Json(state.db.list_characters().await?))
}

pub async fn create_character(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(payload): Json<UpsertCharacterRequest>,
) -> Result<(StatusCode, Json<Character>), ApiError> {
    if let Some(field) = payload.missing_field() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }

    let character = state.db.create_character(&payload, &user_id).await?;
    Ok((StatusCode::CREATED, Json(character)))
}

pub async fn get_character(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Character>, ApiError> {
    let character_id = parse_id(&raw_id, "character")?;
    Ok(Json(state.db.get_character(character_id).await?))
}

pub async fn update_character(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(payload): Json<UpsertCharacterRequest>,
) -> Result<Json<Character>, ApiError> {
    let character_id = parse_id(&raw_id, "character")?;
    if let Some(field) = payload.missing_field() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }

    let character = state.db.update_character(character_id, &payload).await?;
    Ok(Json(character))
}

pub async fn delete_character(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiMessage>, ApiError> {
    let character_id = parse_id(&raw_id, "character")?;
    state.db.delete_character(character_id).await?;
    Ok(Json(ApiMessage::new("Character deleted successfully.")))
}
