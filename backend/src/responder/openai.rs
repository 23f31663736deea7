use crate::responder::{Responder, ResponderError};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestAssistantMessageContent,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use shared::models::{Character, ChatMessage, Role};

const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";

/// Production generation path: forwards the character prompt and the full
/// message history to a chat-completion backend.
pub struct OpenAiResponder {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiResponder {
    pub fn new(api_key: &str, api_base: Option<&str>, model: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base.unwrap_or(DEFAULT_API_BASE));
        Self {
            client: Client::with_config(config),
            model: model.to_owned(),
        }
    }
}

fn system_prompt(character: &Character) -> String {
    format!(
        "You are {name}. {description}\n\n{instructions}\n\nPlease stay in character at all \
         times. Your responses should reflect the personality, knowledge, and mannerisms of \
         {name}.",
        name = character.name,
        description = character.description,
        instructions = character.instructions,
    )
}

fn build_conversation(
    character: &Character,
    history: &[ChatMessage],
) -> Vec<ChatCompletionRequestMessage> {
    let mut conversation = Vec::with_capacity(history.len() + 1);

    if let Ok(msg) = ChatCompletionRequestSystemMessageArgs::default()
        .content(system_prompt(character))
        .build()
    {
        conversation.push(ChatCompletionRequestMessage::System(msg));
    }

    for msg in history {
        let req_msg = match msg.role {
            Role::User => {
                let user_msg = ChatCompletionRequestUserMessageArgs::default()
                    .content(msg.content.clone())
                    .build()
                    .unwrap_or_default();
                ChatCompletionRequestMessage::User(user_msg)
            }
            Role::Assistant => {
                let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                    .content(ChatCompletionRequestAssistantMessageContent::Text(
                        msg.content.clone(),
                    ))
                    .build()
                    .unwrap_or_default();
                ChatCompletionRequestMessage::Assistant(assistant_msg)
            }
        };
        conversation.push(req_msg);
    }

    conversation
}

#[async_trait]
impl Responder for OpenAiResponder {
    async fn respond(
        &self,
        character: &Character,
        history: &[ChatMessage],
    ) -> Result<String, ResponderError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(build_conversation(character, history))
            .build()
            .map_err(|e| ResponderError::Backend(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| ResponderError::Backend(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ResponderError::Backend("completion returned no content".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn conversation_starts_with_the_character_system_prompt() {
        let character = Character {
            id: 1,
            name: "Ada".to_owned(),
            description: "A mathematician.".to_owned(),
            instructions: "Explain with rigor.".to_owned(),
            image_url: None,
            user_id: "user_1".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let history = vec![
            ChatMessage::local(1, Role::Assistant, "Hello! I'm Ada."),
            ChatMessage::local(1, Role::User, "What is an algorithm?"),
        ];

        let conversation = build_conversation(&character, &history);

        assert_eq!(conversation.len(), 3);
        assert!(matches!(
            conversation[0],
            ChatCompletionRequestMessage::System(_)
        ));
        assert!(matches!(
            conversation[1],
            ChatCompletionRequestMessage::Assistant(_)
        ));
        assert!(matches!(
            conversation[2],
            ChatCompletionRequestMessage::User(_)
        ));

        let prompt = system_prompt(&character);
        assert!(prompt.starts_with("You are Ada. A mathematician."));
        assert!(prompt.contains("Explain with rigor."));
    }
}
