use crate::dbs::{Database, DbError, DbResult};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::models::{Character, Chat, ChatMessage, Role, UpsertCharacterRequest};
use std::path::PathBuf;
use std::sync::RwLock;

#[derive(Serialize, Deserialize, Default, Clone)]
struct Store {
    character_seq: i32,
    chat_seq: i32,
    message_seq: i32,
    characters: Vec<Character>,
    chats: Vec<Chat>,
    messages: Vec<ChatMessage>,
}

impl Store {
    fn next_character_id(&mut self) -> i32 {
        self.character_seq += 1;
        self.character_seq
    }

    fn next_chat_id(&mut self) -> i32 {
        self.chat_seq += 1;
        self.chat_seq
    }

    fn next_message_id(&mut self) -> i32 {
        self.message_seq += 1;
        self.message_seq
    }
}

/// In-process store, optionally persisted to a JSON file after each write.
/// Backs `--local-db-path` mode and the test suite.
pub struct LocalDatabase {
    path: Option<PathBuf>,
    store: RwLock<Store>,
}

impl LocalDatabase {
    pub fn load(path: Option<PathBuf>) -> Self {
        let store = path
            .as_ref()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self {
            path,
            store: RwLock::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::load(None)
    }

    fn save(&self, store: &Store) {
        if let Some(path) = &self.path
            && let Ok(content) = serde_json::to_string_pretty(store)
        {
            let _ = std::fs::write(path, content);
        }
    }
}

fn character_not_found(character_id: i32) -> DbError {
    DbError::NotFound(format!("Character {character_id} not found"))
}

#[async_trait]
impl Database for LocalDatabase {
    async fn list_characters(&self) -> DbResult<Vec<Character>> {
        let store = self.store.read().unwrap();
        Ok(store.characters.clone())
    }

    async fn get_character(&self, character_id: i32) -> DbResult<Character> {
        let store = self.store.read().unwrap();
        store
            .characters
            .iter()
            .find(|c| c.id == character_id)
            .cloned()
            .ok_or_else(|| character_not_found(character_id))
    }

    async fn create_character(
        &self,
        fields: &UpsertCharacterRequest,
        user_id: &str,
    ) -> DbResult<Character> {
        let mut store = self.store.write().unwrap();
        let now = Utc::now();
        let character = Character {
            id: store.next_character_id(),
            name: fields.name.clone(),
            description: fields.description.clone(),
            instructions: fields.instructions.clone(),
            image_url: fields.normalized_image_url(),
            user_id: user_id.to_owned(),
            created_at: now,
            updated_at: now,
        };
        store.characters.push(character.clone());
        self.save(&store);
        Ok(character)
    }

    async fn update_character(
        &self,
        character_id: i32,
        fields: &UpsertCharacterRequest,
    ) -> DbResult<Character> {
        let mut store = self.store.write().unwrap();
        let character = store
            .characters
            .iter_mut()
            .find(|c| c.id == character_id)
            .ok_or_else(|| character_not_found(character_id))?;

        character.name = fields.name.clone();
        character.description = fields.description.clone();
        character.instructions = fields.instructions.clone();
        character.image_url = fields.normalized_image_url();
        character.updated_at = Utc::now();
        let updated = character.clone();

        self.save(&store);
        Ok(updated)
    }

    async fn delete_character(&self, character_id: i32) -> DbResult<()> {
        let mut store = self.store.write().unwrap();
        if !store.characters.iter().any(|c| c.id == character_id) {
            return Err(character_not_found(character_id));
        }

        let chat_ids: Vec<i32> = store
            .chats
            .iter()
            .filter(|c| c.character_id == character_id)
            .map(|c| c.id)
            .collect();
        store.messages.retain(|m| !chat_ids.contains(&m.chat_id));
        store.chats.retain(|c| c.character_id != character_id);
        store.characters.retain(|c| c.id != character_id);

        self.save(&store);
        Ok(())
    }

    async fn list_chats(&self, character_id: Option<i32>) -> DbResult<Vec<Chat>> {
        let store = self.store.read().unwrap();
        Ok(match character_id {
            Some(cid) => store
                .chats
                .iter()
                .filter(|c| c.character_id == cid)
                .cloned()
                .collect(),
            None => store.chats.clone(),
        })
    }

    async fn get_chat(&self, chat_id: i32) -> DbResult<Chat> {
        let store = self.store.read().unwrap();
        store
            .chats
            .iter()
            .find(|c| c.id == chat_id)
            .cloned()
            .ok_or_else(|| DbError::NotFound(format!("Chat {chat_id} not found")))
    }

    async fn create_chat(&self, character_id: i32, user_id: &str, title: &str) -> DbResult<Chat> {
        let mut store = self.store.write().unwrap();
        let now = Utc::now();
        let chat = Chat {
            id: store.next_chat_id(),
            character_id,
            user_id: user_id.to_owned(),
            title: title.to_owned(),
            created_at: now,
            updated_at: now,
        };
        store.chats.push(chat.clone());
        self.save(&store);
        Ok(chat)
    }

    async fn list_messages(&self, chat_id: i32) -> DbResult<Vec<ChatMessage>> {
        let store = self.store.read().unwrap();
        Ok(store
            .messages
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect())
    }

    async fn append_message(
        &self,
        chat_id: i32,
        role: Role,
        content: &str,
    ) -> DbResult<ChatMessage> {
        let mut store = self.store.write().unwrap();
        let message = ChatMessage {
            id: store.next_message_id(),
            chat_id,
            content: content.to_owned(),
            role,
            created_at: Utc::now(),
        };
        store.messages.push(message.clone());
        self.save(&store);
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str) -> UpsertCharacterRequest {
        UpsertCharacterRequest {
            name: name.to_owned(),
            description: "A test persona".to_owned(),
            instructions: "Stay friendly.".to_owned(),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let db = LocalDatabase::in_memory();
        let first = db.create_character(&fields("A"), "user_1").await.unwrap();
        let second = db.create_character(&fields("B"), "user_1").await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn empty_image_url_is_stored_as_none() {
        let db = LocalDatabase::in_memory();
        let mut request = fields("A");
        request.image_url = Some(String::new());
        let character = db.create_character(&request, "user_1").await.unwrap();
        assert_eq!(character.image_url, None);
    }

    #[tokio::test]
    async fn deleting_a_character_removes_its_chats_and_messages() {
        let db = LocalDatabase::in_memory();
        let character = db.create_character(&fields("A"), "user_1").await.unwrap();
        let chat = db
            .create_chat(character.id, "user_1", "Chat with A")
            .await
            .unwrap();
        db.append_message(chat.id, Role::User, "hi").await.unwrap();

        db.delete_character(character.id).await.unwrap();

        assert!(db.list_chats(None).await.unwrap().is_empty());
        assert!(db.list_messages(chat.id).await.unwrap().is_empty());
        assert!(matches!(
            db.delete_character(character.id).await,
            Err(DbError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn writes_survive_a_reload_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "persona-local-db-{}-{:?}.json",
            std::process::id(),
            std::thread::current().id()
        ));
        let _ = std::fs::remove_file(&path);

        {
            let db = LocalDatabase::load(Some(path.clone()));
            db.create_character(&fields("Persisted"), "user_1")
                .await
                .unwrap();
        }

        let reloaded = LocalDatabase::load(Some(path.clone()));
        let characters = reloaded.list_characters().await.unwrap();
        assert_eq!(characters.len(), 1);
        assert_eq!(characters[0].name, "Persisted");

        let _ = std::fs::remove_file(&path);
    }
}
