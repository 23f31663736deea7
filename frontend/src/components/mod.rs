pub mod char_modal;
pub mod chat_stage;
pub mod sidebar;
