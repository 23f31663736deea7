use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Free-form behavioral prompt the chat flow role-plays from.
    pub instructions: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for both create and update; updates are full-field replaces.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UpsertCharacterRequest {
    pub name: String,
    pub description: String,
    pub instructions: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl UpsertCharacterRequest {
    /// Name of the first required field that is missing or empty, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.name.is_empty() {
            Some("name")
        } else if self.description.is_empty() {
            Some("description")
        } else if self.instructions.is_empty() {
            Some("instructions")
        } else {
            None
        }
    }

    /// An omitted or empty image URL is stored as NULL.
    pub fn normalized_image_url(&self) -> Option<String> {
        self.image_url.clone().filter(|url| !url.is_empty())
    }
}
