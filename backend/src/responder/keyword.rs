use crate::responder::{Responder, ResponderError};
use async_trait::async_trait;
use rand::RngExt;
use shared::models::{Character, ChatMessage, Role};

const GREETING_KEYWORDS: &[&str] = &["hello", "hi", "hey"];
const DOING_KEYWORDS: &[&str] = &["what are you doing", "what's up"];
const IDENTITY_KEYWORDS: &[&str] = &["your name", "who are you"];
const THANKS_KEYWORDS: &[&str] = &["thank"];

pub const FALLBACK_PROMPT: &str = "Tell me more!";

/// Placeholder generation policy: ordered substring checks over the latest
/// user message, falling back to a random clause of the character's
/// instructions. Stands in for a real completion backend.
pub struct KeywordResponder;

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

impl KeywordResponder {
    fn reply(&self, character: &Character, latest: &str) -> String {
        let text = latest.to_lowercase();

        if contains_any(&text, GREETING_KEYWORDS) {
            format!("Hello! Nice to meet you. I'm {}.", character.name)
        } else if contains_any(&text, DOING_KEYWORDS) {
            "I'm talking with you. Shall we keep going?".to_owned()
        } else if contains_any(&text, IDENTITY_KEYWORDS) {
            format!("My name is {}. {}", character.name, character.description)
        } else if contains_any(&text, THANKS_KEYWORDS) {
            "You're welcome! Is there anything else I can do for you?".to_owned()
        } else {
            let clauses: Vec<&str> = character.instructions.split('.').collect();
            let index = rand::rng().random_range(0..clauses.len());
            let clause = clauses[index].trim();
            if clause.is_empty() {
                FALLBACK_PROMPT.to_owned()
            } else {
                clause.to_owned()
            }
        }
    }
}

#[async_trait]
impl Responder for KeywordResponder {
    async fn respond(
        &self,
        character: &Character,
        history: &[ChatMessage],
    ) -> Result<String, ResponderError> {
        let latest = history
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or("");
        Ok(self.reply(character, latest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn character(instructions: &str) -> Character {
        Character {
            id: 1,
            name: "Sherlock".to_owned(),
            description: "A consulting detective.".to_owned(),
            instructions: instructions.to_owned(),
            image_url: None,
            user_id: "user_1".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn greeting_references_the_character_name() {
        let reply = KeywordResponder.reply(&character("Be terse."), "Hello there");
        assert!(reply.contains("Sherlock"));
    }

    #[test]
    fn identity_question_includes_the_description() {
        let reply = KeywordResponder.reply(&character("Be terse."), "Who are you exactly?");
        assert!(reply.contains("Sherlock"));
        assert!(reply.contains("A consulting detective."));
    }

    #[test]
    fn thanks_gets_the_fixed_acknowledgment() {
        let reply = KeywordResponder.reply(&character("Be terse."), "Thank you so much");
        assert_eq!(reply, "You're welcome! Is there anything else I can do for you?");
    }

    #[test]
    fn fallback_draws_a_trimmed_instruction_clause() {
        let character = character("Loves coffee.Hates mornings.");
        // No keyword matches, so every draw must be one of the instruction
        // clauses (trimmed) or the generic prompt for the empty tail clause.
        for _ in 0..50 {
            let reply = KeywordResponder.reply(&character, "zzz");
            assert!(
                reply == "Loves coffee" || reply == "Hates mornings" || reply == FALLBACK_PROMPT,
                "unexpected fallback reply: {reply}"
            );
        }
    }

    #[tokio::test]
    async fn responds_to_the_latest_user_turn() {
        let character = character("Be terse.");
        let history = vec![
            ChatMessage::local(1, Role::Assistant, "Hello! I'm Sherlock."),
            ChatMessage::local(1, Role::User, "thanks"),
        ];
        let reply = KeywordResponder
            .respond(&character, &history)
            .await
            .unwrap();
        assert_eq!(reply, "You're welcome! Is there anything else I can do for you?");
    }
}
