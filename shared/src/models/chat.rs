use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted conversation thread between a user and one character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i32,
    pub character_id: i32,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreateChatRequest {
    pub character_id: i32,
    /// Defaults to "Chat with {character name}" when absent.
    #[serde(default)]
    pub title: Option<String>,
}
