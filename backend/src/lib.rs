pub mod auth;
pub mod dbs;
pub mod error;
pub mod handlers;
pub mod responder;

use crate::dbs::{Database, DatabaseConfig, DbResult};
use crate::handlers::{
    create_character, create_chat, delete_character, get_character, get_chat, list_characters,
    list_chats, list_messages, send_message, update_character,
};
use crate::responder::{Responder, ResponderConfig};
use axum::{
    Router,
    routing::get,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub responder: Arc<dyn Responder>,
}

pub struct BackendConfig {
    pub database: DatabaseConfig,
    pub responder: ResponderConfig,
}

pub async fn init(router: Router<AppState>, config: BackendConfig) -> DbResult<Router<()>> {
    let db = dbs::connect(&config.database).await?;
    let responder = responder::build(&config.responder);
    let state = AppState { db, responder };

    Ok(router
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/characters",
            get(list_characters).post(create_character),
        )
        .route(
            "/api/characters/{id}",
            get(get_character)
                .put(update_character)
                .delete(delete_character),
        )
        .route("/api/chats", get(list_chats).post(create_chat))
        .route("/api/chats/{chat_id}", get(get_chat))
        .route(
            "/api/chats/{chat_id}/messages",
            get(list_messages).post(send_message),
        )
        .layer(CorsLayer::permissive())
        .with_state(state))
}
