use crate::error::ApiError;

pub mod characters;
pub mod chats;
pub mod messages;

pub use characters::*;
pub use chats::*;
pub use messages::*;

/// Ids arrive as raw path segments so that a non-numeric id is a 400 before
/// any storage access.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i32, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::Validation(format!("invalid {what} id: {raw}")))
}
