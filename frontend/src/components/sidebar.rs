use crate::api;
use crate::store::{Action, ModalType, StoreContext};
use yew::prelude::*;

#[function_component(CharSidebar)]
pub fn char_sidebar() -> Html {
    let store = use_context::<StoreContext>().expect("Store context not found");

    // Load characters on mount
    {
        let store = store.clone();
        use_effect_with((), move |_| {
            yew::platform::spawn_local(async move {
                match api::fetch_characters().await {
                    Ok(chars) => store.dispatch(Action::SetCharacters(chars)),
                    Err(err) => tracing::error!("Failed to fetch characters: {err}"),
                }
            });
            || {}
        });
    }

    let on_select = {
        let store = store.clone();
        Callback::from(move |id: i32| {
            store.dispatch(Action::SelectCharacter(id));

            // Side effect: reuse the character's latest chat or open a new one,
            // then load its persisted history.
            let store = store.clone();
            yew::platform::spawn_local(async move {
                let chat = match api::fetch_chats(id).await {
                    Ok(chats) => match chats.into_iter().last() {
                        Some(chat) => Ok(chat),
                        None => api::create_chat(id).await,
                    },
                    Err(err) => Err(err),
                };

                match chat {
                    Ok(chat) => match api::fetch_messages(chat.id).await {
                        Ok(messages) => store.dispatch(Action::SetChat { chat, messages }),
                        Err(err) => store.dispatch(Action::SetChatError(err.to_string())),
                    },
                    Err(err) => store.dispatch(Action::SetChatError(err.to_string())),
                }
            });
        })
    };

    let open_create = {
        let store = store.clone();
        Callback::from(move |_| store.dispatch(Action::OpenModal(ModalType::Create)))
    };

    let on_edit = {
        let store = store.clone();
        Callback::from(move |id: i32| store.dispatch(Action::OpenModal(ModalType::Edit(id))))
    };

    let on_delete = {
        let store = store.clone();
        Callback::from(move |id: i32| {
            let store = store.clone();
            yew::platform::spawn_local(async move {
                if web_sys::window()
                    .and_then(|w| {
                        w.confirm_with_message(
                            "Delete this character? Its chats will be deleted too.",
                        )
                        .ok()
                    })
                    == Some(true)
                    && api::delete_character(id).await.is_ok()
                {
                    store.dispatch(Action::RemoveCharacter(id));
                }
            });
        })
    };

    html! {
        <div class="sidebar">
            <header>
                <div class="sidebar-header-content">
                    <h1 class="app-title">{"Persona"}</h1>
                </div>
                <div class="sidebar-toolbar">
                    <button class="icon-btn" onclick={open_create} title="Create Character">
                        <svg viewBox="0 0 24 24"><path d="M19 13h-6v6h-2v-6H5v-2h6V5h2v6h6v2z"></path></svg>
                    </button>
                </div>
            </header>

            <div class="section-label">
                {"Characters"}
            </div>

            <div class="char-list">
                if store.characters.is_empty() {
                    <div class="sidebar-empty-state">
                        {"No characters yet. Create one to get started."}
                    </div>
                }
                { for store.characters.iter().map(|char| {
                    let id = char.id;
                    let on_click = on_select.clone();
                    let on_edit_click = on_edit.clone();
                    let on_delete_click = on_delete.clone();
                    let is_active = Some(id) == store.active_character_id;

                    html! {
                        <div class={classes!("char-item", is_active.then_some("active"))} onclick={move |_| on_click.emit(id)}>
                            if let Some(url) = &char.image_url {
                                <img class="avatar" src={url.clone()} alt={char.name.clone()} />
                            } else {
                                <div class="avatar bot">{char.name.chars().next().unwrap_or('?')}</div>
                            }
                            <div class="char-info">
                                <div class="char-name">{&char.name}</div>
                                <div class="char-desc">{&char.description}</div>
                            </div>
                            <button class="edit-btn" onclick={move |e: MouseEvent| { e.stop_propagation(); on_edit_click.emit(id); }} title="Edit character">
                                <svg viewBox="0 0 24 24"><path d="M3 17.25V21h3.75L17.81 9.94l-3.75-3.75L3 17.25zM20.71 7.04c.39-.39.39-1.02 0-1.41l-2.34-2.34c-.39-.39-1.02-.39-1.41 0l-1.83 1.83 3.75 3.75 1.83-1.83z"></path></svg>
                            </button>
                            <button class="delete-btn" onclick={move |e: MouseEvent| { e.stop_propagation(); on_delete_click.emit(id); }} title="Delete character">
                                <svg viewBox="0 0 24 24"><path d="M6 19c0 1.1.9 2 2 2h8c1.1 0 2-.9 2-2V7H6v12zM19 4h-3.5l-1-1h-5l-1 1H5v2h14V4z"></path></svg>
                            </button>
                        </div>
                    }
                })}
            </div>

            <div class="sidebar-footer">
                {"Persona v0.1.0"}
            </div>
        </div>
    }
}
