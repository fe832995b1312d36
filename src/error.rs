use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy shared by every handler. Each variant carries its HTTP
/// mapping so status codes are decided in exactly one place.
///
/// 401 message policy: a missing or non-Bearer `Authorization` header is
/// `Unauthorized`; every failure after the header stage (bad signature,
/// expired token, unknown subject) is `Invalid token`. Sub-causes are
/// logged, never surfaced.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::DuplicateEmail => {
                (StatusCode::BAD_REQUEST, "Email already registered".into())
            }
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".into()),
            ApiError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token".into()),
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".into())
            }
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

/// `Json<T>` that reports deserialization failures through the taxonomy
/// (400 with a single message) instead of axum's default rejection.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_message(res: Response) -> (StatusCode, String) {
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, value["message"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn validation_maps_to_400_with_message() {
        let (status, message) =
            body_message(ApiError::Validation("Password too short".into()).into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Password too short");
    }

    #[tokio::test]
    async fn duplicate_email_maps_to_400() {
        let (status, message) = body_message(ApiError::DuplicateEmail.into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Email already registered");
    }

    #[tokio::test]
    async fn auth_rejections_map_to_401() {
        let (status, message) = body_message(ApiError::Unauthorized.into_response()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Unauthorized");

        let (status, message) = body_message(ApiError::InvalidToken.into_response()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid token");
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let (status, message) = body_message(ApiError::NotFound("Book").into_response()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Book not found");
    }

    #[tokio::test]
    async fn internal_hides_detail_from_the_client() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused to db at 10.0.0.3"));
        let (status, message) = body_message(err.into_response()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal server error");
    }
}
