use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::models::*;
use std::fmt;

const API_BASE: &str = "/api";

/// Placeholder principal sent as the `x-user-id` header. A real deployment
/// would derive this from a login session.
pub const USER_ID: &str = "local-user";

#[derive(Debug)]
pub enum ApiError {
    Transport(gloo_net::Error),
    /// A non-2xx response; carries the server's `message` body.
    Server(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(err) => write!(f, "network error: {err}"),
            ApiError::Server(message) => f.write_str(message),
        }
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        ApiError::Transport(err)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if response.ok() {
        Ok(response.json().await?)
    } else {
        let message = response
            .json::<ApiMessage>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| format!("request failed with status {}", response.status()));
        Err(ApiError::Server(message))
    }
}

pub async fn fetch_characters() -> Result<Vec<Character>, ApiError> {
    decode(Request::get(&format!("{API_BASE}/characters")).send().await?).await
}

pub async fn get_character(id: i32) -> Result<Character, ApiError> {
    decode(
        Request::get(&format!("{API_BASE}/characters/{id}"))
            .send()
            .await?,
    )
    .await
}

pub async fn create_character(request: UpsertCharacterRequest) -> Result<Character, ApiError> {
    decode(
        Request::post(&format!("{API_BASE}/characters"))
            .header("x-user-id", USER_ID)
            .json(&request)?
            .send()
            .await?,
    )
    .await
}

pub async fn update_character(
    id: i32,
    request: UpsertCharacterRequest,
) -> Result<Character, ApiError> {
    decode(
        Request::put(&format!("{API_BASE}/characters/{id}"))
            .json(&request)?
            .send()
            .await?,
    )
    .await
}

pub async fn delete_character(id: i32) -> Result<ApiMessage, ApiError> {
    decode(
        Request::delete(&format!("{API_BASE}/characters/{id}"))
            .send()
            .await?,
    )
    .await
}

pub async fn fetch_chats(character_id: i32) -> Result<Vec<Chat>, ApiError> {
    decode(
        Request::get(&format!("{API_BASE}/chats?character_id={character_id}"))
            .send()
            .await?,
    )
    .await
}

pub async fn create_chat(character_id: i32) -> Result<Chat, ApiError> {
    decode(
        Request::post(&format!("{API_BASE}/chats"))
            .header("x-user-id", USER_ID)
            .json(&CreateChatRequest {
                character_id,
                title: None,
            })?
            .send()
            .await?,
    )
    .await
}

pub async fn fetch_messages(chat_id: i32) -> Result<Vec<ChatMessage>, ApiError> {
    decode(
        Request::get(&format!("{API_BASE}/chats/{chat_id}/messages"))
            .send()
            .await?,
    )
    .await
}

pub async fn send_message(chat_id: i32, content: String) -> Result<SendMessageResponse, ApiError> {
    decode(
        Request::post(&format!("{API_BASE}/chats/{chat_id}/messages"))
            .json(&SendMessageRequest { content })?
            .send()
            .await?,
    )
    .await
}
