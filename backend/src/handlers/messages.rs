use crate::AppState;
use crate::error::ApiError;
use crate::handlers::parse_id;
use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{ChatMessage, Role, SendMessageRequest, SendMessageResponse};

/// Substituted for the assistant turn when response generation fails; the
/// real error only goes to the server log.
pub const APOLOGY: &str = "Sorry, something went wrong. Please try again.";

pub async fn list_messages(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let chat_id = parse_id(&raw_id, "chat")?;
    state.db.get_chat(chat_id).await?;
    Ok(Json(state.db.list_messages(chat_id).await?))
}

pub async fn send_message(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let chat_id = parse_id(&raw_id, "chat")?;
    if payload.content.is_empty() {
        return Err(ApiError::Validation("content is required".to_owned()));
    }

    let chat = state.db.get_chat(chat_id).await?;
    let character = state.db.get_character(chat.character_id).await?;

    let message = state
        .db
        .append_message(chat.id, Role::User, &payload.content)
        .await?;

    let history = state.db.list_messages(chat.id).await?;
    let text = match state.responder.respond(&character, &history).await {
        Ok(text) => text,
        Err(err) => {
            tracing::error!("response generation failed: {err}");
            APOLOGY.to_owned()
        }
    };

    let reply = state
        .db
        .append_message(chat.id, Role::Assistant, &text)
        .await?;

    Ok(Json(SendMessageResponse { message, reply }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserId;
    use crate::dbs::local::LocalDatabase;
    use crate::handlers::{create_character, create_chat};
    use crate::responder::keyword::KeywordResponder;
    use crate::responder::{Responder, ResponderError};
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use shared::models::{Chat, CreateChatRequest, UpsertCharacterRequest};
    use std::sync::Arc;

    struct FailingResponder;

    #[async_trait]
    impl Responder for FailingResponder {
        async fn respond(
            &self,
            _character: &shared::models::Character,
            _history: &[ChatMessage],
        ) -> Result<String, ResponderError> {
            Err(ResponderError::Backend("backend unreachable".to_owned()))
        }
    }

    fn test_state(responder: Arc<dyn Responder>) -> AppState {
        AppState {
            db: Arc::new(LocalDatabase::in_memory()),
            responder,
        }
    }

    async fn seed_chat(state: &AppState) -> Chat {
        let (_, Json(character)) = create_character(
            State(state.clone()),
            UserId("user_1".to_owned()),
            Json(UpsertCharacterRequest {
                name: "Sherlock".to_owned(),
                description: "A consulting detective.".to_owned(),
                instructions: "Loves deduction.Hates boredom.".to_owned(),
                image_url: None,
            }),
        )
        .await
        .unwrap();

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
        chat
    }

    #[tokio::test]
    async fn send_appends_both_turns_in_order() {
        let state = test_state(Arc::new(KeywordResponder));
        let chat = seed_chat(&state).await;

        let Json(response) = send_message(
            State(state.clone()),
            Path(chat.id.to_string()),
            Json(SendMessageRequest {
                content: "hello".to_owned(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.message.role, Role::User);
        assert_eq!(response.message.content, "hello");
        assert_eq!(response.reply.role, Role::Assistant);
        assert!(response.reply.content.contains("Sherlock"));

        // Greeting, user turn, assistant turn.
        let Json(messages) = list_messages(State(state), Path(chat.id.to_string()))
            .await
            .unwrap();
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
    }

    #[tokio::test]
    async fn generator_failure_substitutes_the_apology() {
        let state = test_state(Arc::new(FailingResponder));
        let chat = seed_chat(&state).await;

        let Json(response) = send_message(
            State(state),
            Path(chat.id.to_string()),
            Json(SendMessageRequest {
                content: "zzz".to_owned(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.reply.content, APOLOGY);
    }

    #[tokio::test]
    async fn empty_content_is_a_validation_error() {
        let state = test_state(Arc::new(KeywordResponder));
        let chat = seed_chat(&state).await;

        let result = send_message(
            State(state),
            Path(chat.id.to_string()),
            Json(SendMessageRequest {
                content: String::new(),
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn unknown_chat_is_not_found() {
        let state = test_state(Arc::new(KeywordResponder));
        let result = send_message(
            State(state.clone()),
            Path("999999".to_owned()),
            Json(SendMessageRequest {
                content: "hello".to_owned(),
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));

        let result = list_messages(State(state), Path("999999".to_owned())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
