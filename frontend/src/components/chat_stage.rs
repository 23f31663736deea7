use crate::api;
use crate::store::{Action, StoreContext};
use shared::models::{ChatMessage, Role};
use web_sys::{Element, HtmlTextAreaElement};
use yew::prelude::*;

/// Shown in place of the assistant turn when sending fails outright.
const APOLOGY: &str = "Sorry, something went wrong. Please try again.";

#[derive(Properties, PartialEq)]
pub struct MessageBubbleProps {
    pub message: ChatMessage,
    pub char_name: String,
}

#[function_component(MessageBubble)]
pub fn message_bubble(props: &MessageBubbleProps) -> Html {
    let is_user = props.message.role == Role::User;
    let name = if is_user {
        "You".to_string()
    } else {
        props.char_name.clone()
    };

    html! {
        <div class={classes!("message", if is_user { "message-user" } else { "message-assistant" })}>
            if !is_user {
                <div class="avatar bot" title={name.clone()}>
                    {name.chars().next().unwrap_or('?')}
                </div>
            }
            <div class="message-content">
                <div class="message-role">{&name}</div>
                <div class="message-text">{&props.message.content}</div>
            </div>
        </div>
    }
}

#[function_component(ChatStage)]
pub fn chat_stage() -> Html {
    let store = use_context::<StoreContext>().expect("Store context not found");
    let input_ref = use_node_ref();
    let container_ref = use_node_ref();

    // Auto-scroll on message change
    {
        let container_ref = container_ref.clone();
        let messages_len = store.messages.len();
        use_effect_with(messages_len, move |_| {
            if let Some(div) = container_ref.cast::<Element>() {
                div.set_scroll_top(div.scroll_height());
            }
            || {}
        });
    }

    let on_send = {
        let store = store.clone();
        let input_ref = input_ref.clone();

        Callback::from(move |_| {
            let Some(input) = input_ref.cast::<HtmlTextAreaElement>() else {
                return;
            };
            let text = input.value().trim().to_string();

            if text.is_empty() || store.is_sending || store.active_chat.is_none() {
                return;
            }

            input.set_value("");

            let chat_id = store.active_chat.as_ref().map(|c| c.id).unwrap_or_default();

            // Optimistic append; the persisted copy replaces nothing, the
            // reply is appended when the round trip finishes.
            store.dispatch(Action::AppendMessage(ChatMessage::local(
                chat_id,
                Role::User,
                text.clone(),
            )));
            store.dispatch(Action::SetSending(true));

            let store = store.clone();
            yew::platform::spawn_local(async move {
                match api::send_message(chat_id, text).await {
                    Ok(response) => {
                        store.dispatch(Action::AppendMessage(response.reply));
                    }
                    Err(err) => {
                        tracing::error!("Failed to send message: {err}");
                        store.dispatch(Action::AppendMessage(ChatMessage::local(
                            chat_id,
                            Role::Assistant,
                            APOLOGY,
                        )));
                    }
                }
                store.dispatch(Action::SetSending(false));
            });
        })
    };

    let on_keydown = {
        let on_send = on_send.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" && !e.shift_key() {
                e.prevent_default();
                on_send.emit(());
            }
        })
    };

    let char_name = store
        .characters
        .iter()
        .find(|c| Some(c.id) == store.active_character_id)
        .map(|c| c.name.clone())
        .unwrap_or("AI".to_string());

    html! {
        <div class="main-stage">
            if store.active_chat.is_some() {
                <div class="chat-header">
                    <div class="chat-title">{&char_name}</div>
                </div>
            }

            <div class={classes!("chat-message-list")} ref={container_ref}>
                if let Some(message) = &store.chat_error {
                    <div class="chat-error">
                        <div>{message}</div>
                        <div>{"Pick another character from the sidebar to continue."}</div>
                    </div>
                } else if store.active_chat.is_none() {
                    <div class="chat-placeholder">
                        <div class="chat-placeholder-icon">{"✨"}</div>
                        <div>{"Select a character to start chatting"}</div>
                    </div>
                } else {
                    { for store.messages.iter().map(|msg| {
                        html! {
                            <MessageBubble
                                message={msg.clone()}
                                char_name={char_name.clone()}
                            />
                        }
                    })}

                    if store.is_sending {
                        <div class="typing-indicator">
                            <span></span>
                            <span></span>
                            <span></span>
                        </div>
                    }
                }
            </div>

            <div class="input-area">
                <div class="input-box">
                    <textarea
                        class="chat-input"
                        ref={input_ref}
                        placeholder={"Type a message..."}
                        disabled={store.is_sending}
                        onkeydown={on_keydown}
                    />
                    <button class="send-btn" onclick={move |_| on_send.emit(())} disabled={store.is_sending}>
                         <svg viewBox="0 0 24 24" width="20" height="20" fill="currentColor"><path d="M2.01 21L23 12 2.01 3 2 10l15 2-15 2z"></path></svg>
                    </button>
                </div>
            </div>
        </div>
    }
}
