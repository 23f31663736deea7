use crate::error::ApiError;
use axum::{extract::FromRequestParts, http::request::Parts};

pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated principal, taken from the `x-user-id` header. Operations
/// that stamp ownership require it; a missing or empty header is rejected
/// with 401 before the handler body runs.
pub struct UserId(pub String);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| UserId(value.to_owned()))
            .ok_or(ApiError::Authentication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<UserId, ApiError> {
        let (mut parts, _) = request.into_parts();
        UserId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn header_value_becomes_the_principal() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "user_42")
            .body(())
            .unwrap();
        let UserId(user_id) = extract(request).await.unwrap();
        assert_eq!(user_id, "user_42");
    }

    #[tokio::test]
    async fn missing_header_is_an_authentication_error() {
        let request = Request::builder().body(()).unwrap();
        assert!(matches!(
            extract(request).await,
            Err(ApiError::Authentication)
        ));
    }

    #[tokio::test]
    async fn empty_header_is_an_authentication_error() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "")
            .body(())
            .unwrap();
        assert!(matches!(
            extract(request).await,
            Err(ApiError::Authentication)
        ));
    }
}
