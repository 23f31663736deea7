use crate::AppState;
use crate::auth::UserId;
use crate::error::ApiError;
use crate::handlers::parse_id;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use shared::models::{Chat, CreateChatRequest, Role};
use std::collections::HashMap;

pub async fn list_chats(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Chat>>, ApiError> {
    let character_id = params.get("character_id").and_then(|s| s.parse().ok());
    Ok(Json(state.db.list_chats(character_id).await?))
}

pub async fn create_chat(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(payload): Json<CreateChatRequest>,
) -> Result<(StatusCode, Json<Chat>), ApiError> {
    let character = state.db.get_character(payload.character_id).await?;

    let title = payload
        .title
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| format!("Chat with {}", character.name));
    let chat = state.db.create_chat(character.id, &user_id, &title).await?;

    // Seed the thread with the character's opening line.
    let greeting = format!("Hello! I'm {}. {}", character.name, character.description);
    state
        .db
        .append_message(chat.id, Role::Assistant, &greeting)
        .await?;

    Ok((StatusCode::CREATED, Json(chat)))
}

pub async fn get_chat(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Chat>, ApiError> {
    let chat_id = parse_id(&raw_id, "chat")?;
    Ok(Json(state.db.get_chat(chat_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbs::local::LocalDatabase;
    use crate::handlers::create_character;
    use crate::responder::keyword::KeywordResponder;
    use shared::models::{Character, UpsertCharacterRequest};
    use std::sync::Arc;

    fn test_state() -> AppState {
        AppState {
            db: Arc::new(LocalDatabase::in_memory()),
            responder: Arc::new(KeywordResponder),
        }
    }

    async fn seed_character(state: &AppState) -> Character {
        let (_, Json(character)) = create_character(
            State(state.clone()),
            UserId("user_1".to_owned()),
            Json(UpsertCharacterRequest {
                name: "Sherlock".to_owned(),
                description: "A consulting detective.".to_owned(),
                instructions: "Be terse.".to_owned(),
                image_url: None,
            }),
        )
        .await
        .unwrap();
        character
    }

    #[tokio::test]
    async fn create_chat_defaults_the_title_and_seeds_a_greeting() {
        let state = test_state();
        let character = seed_character(&state).await;

        let (status, Json(chat)) = create_chat(
            State(state.clone()),
            UserId("user_1".to_owned()),
            Json(CreateChatRequest {
                character_id: character.id,
                title: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(chat.title, "Chat with Sherlock");
        assert_eq!(chat.character_id, character.id);

        let messages = state.db.list_messages(chat.id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::Assistant);
        assert_eq!(
            messages[0].content,
            "Hello! I'm Sherlock. A consulting detective."
        );
    }

    #[tokio::test]
    async fn create_chat_for_unknown_character_is_not_found() {
        let state = test_state();
        let result = create_chat(
            State(state),
            UserId("user_1".to_owned()),
            Json(CreateChatRequest {
                character_id: 999999,
                title: None,
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_chats_filters_by_character() {
        let state = test_state();
        let character = seed_character(&state).await;
        create_chat(
            State(state.clone()),
            UserId("user_1".to_owned()),
            Json(CreateChatRequest {
                character_id: character.id,
                title: Some("First".to_owned()),
            }),
        )
        .await
        .unwrap();

        let mut params = HashMap::new();
        params.insert("character_id".to_owned(), character.id.to_string());
        let Json(chats) = list_chats(State(state.clone()), Query(params)).await.unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].title, "First");

        let mut params = HashMap::new();
        params.insert("character_id".to_owned(), "999999".to_owned());
        let Json(chats) = list_chats(State(state), Query(params)).await.unwrap();
        assert!(chats.is_empty());
    }
}
