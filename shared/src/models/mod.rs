pub mod api;
pub mod character;
pub mod chat;
pub mod message;

pub use api::*;
pub use character::*;
pub use chat::*;
pub use message::*;
