use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!("unknown message role: {other}")),
        }
    }
}

/// One turn in a conversation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i32,
    pub chat_id: i32,
    pub content: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// A transient client-side message that has not been persisted yet.
    /// Its id is a placeholder and carries no uniqueness guarantee.
    pub fn local(chat_id: i32, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: 0,
            chat_id,
            content: content.into(),
            role,
            created_at: Utc::now(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SendMessageRequest {
    pub content: String,
}

/// The user turn as persisted plus the generated assistant reply.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SendMessageResponse {
    pub message: ChatMessage,
    pub reply: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_as_lowercase_text() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"assistant\"").unwrap(),
            Role::Assistant
        );
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert!("system".parse::<Role>().is_err());
    }

    #[test]
    fn local_message_has_placeholder_id() {
        let msg = ChatMessage::local(7, Role::User, "hi");
        assert_eq!(msg.id, 0);
        assert_eq!(msg.chat_id, 7);
        assert_eq!(msg.role, Role::User);
    }
}
