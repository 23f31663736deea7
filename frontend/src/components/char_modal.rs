use crate::api;
use crate::store::{Action, ModalType, StoreContext};
use shared::models::UpsertCharacterRequest;
use yew::prelude::*;

/// Create/edit form for the four mutable character fields. In edit mode the
/// inputs are prefilled from the loaded character list.
#[function_component(CharModal)]
pub fn char_modal() -> Html {
    let store = use_context::<StoreContext>().expect("Store context not found");

    let editing = match store.modal_open {
        Some(ModalType::Edit(id)) => store.characters.iter().find(|c| c.id == id).cloned(),
        _ => None,
    };
    let editing_id = editing.as_ref().map(|c| c.id);

    let name = use_state(|| editing.as_ref().map(|c| c.name.clone()).unwrap_or_default());
    let desc = use_state(|| {
        editing
            .as_ref()
            .map(|c| c.description.clone())
            .unwrap_or_default()
    });
    let instructions = use_state(|| {
        editing
            .as_ref()
            .map(|c| c.instructions.clone())
            .unwrap_or_default()
    });
    let image_url = use_state(|| {
        editing
            .as_ref()
            .and_then(|c| c.image_url.clone())
            .unwrap_or_default()
    });
    let error = use_state(|| None::<String>);

    let on_save = {
        let store = store.clone();
        let name = name.clone();
        let desc = desc.clone();
        let instructions = instructions.clone();
        let image_url = image_url.clone();
        let error = error.clone();

        Callback::from(move |_| {
            let request = UpsertCharacterRequest {
                name: (*name).clone(),
                description: (*desc).clone(),
                instructions: (*instructions).clone(),
                image_url: Some((*image_url).clone()).filter(|url| !url.is_empty()),
            };

            let store = store.clone();
            let error = error.clone();
            yew::platform::spawn_local(async move {
                let result = match editing_id {
                    Some(id) => api::update_character(id, request).await,
                    None => api::create_character(request).await,
                };

                match result {
                    Ok(character) => {
                        store.dispatch(Action::UpsertCharacter(character));
                        store.dispatch(Action::CloseModal);
                    }
                    // Show the server's message (e.g. "name is required") inline.
                    Err(err) => error.set(Some(err.to_string())),
                }
            });
        })
    };

    let on_close = {
        let store = store.clone();
        Callback::from(move |_| store.dispatch(Action::CloseModal))
    };

    let on_cancel = {
        let store = store.clone();
        Callback::from(move |_| store.dispatch(Action::CloseModal))
    };

    let title = if editing_id.is_some() {
        "Edit Character"
    } else {
        "Create New Character"
    };

    html! {
        <div class="modal-overlay" onclick={on_close}>
            <div class="modal-content" onclick={|e: MouseEvent| e.stop_propagation()}>
                <div class="modal-header">
                    <h2 class="modal-title">{title}</h2>
                    <button class="close-btn" onclick={on_cancel.clone()}>{"×"}</button>
                </div>

                <div class="modal-body">
                    if let Some(message) = &*error {
                        <div class="form-error">{message}</div>
                    }

                    <div class="form-group">
                        <label class="form-label">{"Name"}</label>
                        <input class="form-input" type="text" placeholder="e.g. Sherlock Holmes" value={(*name).clone()} oninput={{
                            let name = name.clone();
                            Callback::from(move |e: InputEvent| {
                                let i: web_sys::HtmlInputElement = e.target_unchecked_into();
                                name.set(i.value());
                            })
                        }} />
                    </div>

                    <div class="form-group">
                        <label class="form-label">{"Description"}</label>
                        <textarea class="form-textarea" rows="3" placeholder="A brief description of the character" value={(*desc).clone()} oninput={{
                            let desc = desc.clone();
                            Callback::from(move |e: InputEvent| {
                                let i: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
                                desc.set(i.value());
                            })
                        }} />
                    </div>

                    <div class="form-group">
                        <label class="form-label">{"Instructions"}</label>
                        <textarea class="form-textarea" rows="5" placeholder="Instructions for how the character should behave" value={(*instructions).clone()} oninput={{
                            let instructions = instructions.clone();
                            Callback::from(move |e: InputEvent| {
                                let i: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
                                instructions.set(i.value());
                            })
                        }} />
                    </div>

                    <div class="form-group">
                        <label class="form-label">{"Image URL (optional)"}</label>
                        <input class="form-input" type="url" placeholder="https://example.com/avatar.png" value={(*image_url).clone()} oninput={{
                            let image_url = image_url.clone();
                            Callback::from(move |e: InputEvent| {
                                let i: web_sys::HtmlInputElement = e.target_unchecked_into();
                                image_url.set(i.value());
                            })
                        }} />
                    </div>

                    <div class="form-actions">
                        <button class="btn btn-secondary" onclick={on_cancel}>{"Cancel"}</button>
                        <button class="btn btn-primary" onclick={on_save}>
                            {if editing_id.is_some() { "Save Changes" } else { "Create Character" }}
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}
