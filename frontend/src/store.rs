use shared::models::*;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq, Default)]
pub struct State {
    pub characters: Vec<Character>,
    pub active_character_id: Option<i32>,
    pub active_chat: Option<Chat>,
    /// Append-only for the lifetime of the open chat.
    pub messages: Vec<ChatMessage>,
    pub is_sending: bool,
    pub chat_error: Option<String>,
    pub modal_open: Option<ModalType>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ModalType {
    Create,
    Edit(i32),
}

pub enum Action {
    SetCharacters(Vec<Character>),
    UpsertCharacter(Character),
    RemoveCharacter(i32),
    SelectCharacter(i32),
    SetChat {
        chat: Chat,
        messages: Vec<ChatMessage>,
    },
    SetChatError(String),
    AppendMessage(ChatMessage),
    SetSending(bool),
    OpenModal(ModalType),
    CloseModal,
}

impl Reducible for State {
    type Action = Action;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();

        match action {
            Action::SetCharacters(chars) => {
                next.characters = chars;
            }
            Action::UpsertCharacter(character) => {
                match next.characters.iter_mut().find(|c| c.id == character.id) {
                    Some(existing) => *existing = character,
                    None => next.characters.push(character),
                }
            }
            Action::RemoveCharacter(id) => {
                next.characters.retain(|c| c.id != id);
                if next.active_character_id == Some(id) {
                    next.active_character_id = None;
                    next.active_chat = None;
                    next.messages.clear();
                }
            }
            Action::SelectCharacter(id) => {
                next.active_character_id = Some(id);
                // Chat loading is a side effect in the component triggering this.
                next.active_chat = None;
                next.messages.clear();
                next.chat_error = None;
            }
            Action::SetChat { chat, messages } => {
                next.active_chat = Some(chat);
                next.messages = messages;
                next.chat_error = None;
            }
            Action::SetChatError(message) => {
                next.chat_error = Some(message);
            }
            Action::AppendMessage(msg) => {
                next.messages.push(msg);
            }
            Action::SetSending(is_sending) => {
                next.is_sending = is_sending;
            }
            Action::OpenModal(modal_type) => {
                next.modal_open = Some(modal_type);
            }
            Action::CloseModal => {
                next.modal_open = None;
            }
        }

        next.into()
    }
}

pub type StoreContext = UseReducerHandle<State>;
