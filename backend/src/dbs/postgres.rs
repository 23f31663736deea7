use crate::dbs::{Database, DbError, DbResult};
use async_trait::async_trait;
use chrono::Utc;
use shared::models::{Character, Chat, ChatMessage, Role, UpsertCharacterRequest};
use sqlx::{Pool, Postgres, Row, postgres::PgPoolOptions, postgres::PgRow};

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn new(database_url: &str) -> DbResult<Self> {
        let pool = PgPoolOptions::new().connect(database_url).await?;
        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    async fn init(&self) -> DbResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS characters (
                id SERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                instructions TEXT NOT NULL,
                image_url TEXT,
                user_id TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chats (
                id SERIAL PRIMARY KEY,
                character_id INTEGER NOT NULL REFERENCES characters(id),
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS messages (
                id SERIAL PRIMARY KEY,
                chat_id INTEGER NOT NULL REFERENCES chats(id),
                content TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn character_from_row(row: &PgRow) -> Character {
    Character {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        instructions: row.get("instructions"),
        image_url: row.get("image_url"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn chat_from_row(row: &PgRow) -> Chat {
    Chat {
        id: row.get("id"),
        character_id: row.get("character_id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn message_from_row(row: &PgRow) -> DbResult<ChatMessage> {
    let role: String = row.get("role");
    let role = role.parse::<Role>().map_err(DbError::Internal)?;
    Ok(ChatMessage {
        id: row.get("id"),
        chat_id: row.get("chat_id"),
        content: row.get("content"),
        role,
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl Database for PostgresDatabase {
    async fn list_characters(&self) -> DbResult<Vec<Character>> {
        let rows = sqlx::query(
            "SELECT id, name, description, instructions, image_url, user_id, created_at, updated_at
             FROM characters ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(character_from_row).collect())
    }

    async fn get_character(&self, character_id: i32) -> DbResult<Character> {
        let row = sqlx::query(
            "SELECT id, name, description, instructions, image_url, user_id, created_at, updated_at
             FROM characters WHERE id = $1",
        )
        .bind(character_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(character_from_row(&row)),
            None => Err(DbError::NotFound(format!(
                "Character {character_id} not found"
            ))),
        }
    }

    async fn create_character(
        &self,
        fields: &UpsertCharacterRequest,
        user_id: &str,
    ) -> DbResult<Character> {
        let now = Utc::now();
        let row = sqlx::query(
            "INSERT INTO characters (name, description, instructions, image_url, user_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING id, name, description, instructions, image_url, user_id, created_at, updated_at",
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.instructions)
        .bind(fields.normalized_image_url())
        .bind(user_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(character_from_row(&row))
    }

    async fn update_character(
        &self,
        character_id: i32,
        fields: &UpsertCharacterRequest,
    ) -> DbResult<Character> {
        let row = sqlx::query(
            "UPDATE characters
             SET name = $1, description = $2, instructions = $3, image_url = $4, updated_at = $5
             WHERE id = $6
             RETURNING id, name, description, instructions, image_url, user_id, created_at, updated_at",
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.instructions)
        .bind(fields.normalized_image_url())
        .bind(Utc::now())
        .bind(character_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(character_from_row(&row)),
            None => Err(DbError::NotFound(format!(
                "Character {character_id} not found"
            ))),
        }
    }

    async fn delete_character(&self, character_id: i32) -> DbResult<()> {
        sqlx::query(
            "DELETE FROM messages
             WHERE chat_id IN (SELECT id FROM chats WHERE character_id = $1)",
        )
        .bind(character_id)
        .execute(&self.pool)
        .await?;

        sqlx::query("DELETE FROM chats WHERE character_id = $1")
            .bind(character_id)
            .execute(&self.pool)
            .await?;

        let result = sqlx::query("DELETE FROM characters WHERE id = $1")
            .bind(character_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!(
                "Character {character_id} not found"
            )));
        }
        Ok(())
    }

    async fn list_chats(&self, character_id: Option<i32>) -> DbResult<Vec<Chat>> {
        let rows = if let Some(cid) = character_id {
            sqlx::query(
                "SELECT id, character_id, user_id, title, created_at, updated_at
                 FROM chats WHERE character_id = $1 ORDER BY id",
            )
            .bind(cid)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query(
                "SELECT id, character_id, user_id, title, created_at, updated_at
                 FROM chats ORDER BY id",
            )
            .fetch_all(&self.pool)
            .await?
        };

        Ok(rows.iter().map(chat_from_row).collect())
    }

    async fn get_chat(&self, chat_id: i32) -> DbResult<Chat> {
        let row = sqlx::query(
            "SELECT id, character_id, user_id, title, created_at, updated_at
             FROM chats WHERE id = $1",
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(chat_from_row(&row)),
            None => Err(DbError::NotFound(format!("Chat {chat_id} not found"))),
        }
    }

    async fn create_chat(&self, character_id: i32, user_id: &str, title: &str) -> DbResult<Chat> {
        let now = Utc::now();
        let row = sqlx::query(
            "INSERT INTO chats (character_id, user_id, title, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING id, character_id, user_id, title, created_at, updated_at",
        )
        .bind(character_id)
        .bind(user_id)
        .bind(title)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(chat_from_row(&row))
    }

    async fn list_messages(&self, chat_id: i32) -> DbResult<Vec<ChatMessage>> {
        let rows = sqlx::query(
            "SELECT id, chat_id, content, role, created_at
             FROM messages WHERE chat_id = $1 ORDER BY id",
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(message_from_row).collect()
    }

    async fn append_message(
        &self,
        chat_id: i32,
        role: Role,
        content: &str,
    ) -> DbResult<ChatMessage> {
        let row = sqlx::query(
            "INSERT INTO messages (chat_id, content, role, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, chat_id, content, role, created_at",
        )
        .bind(chat_id)
        .bind(content)
        .bind(role.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        message_from_row(&row)
    }
}
