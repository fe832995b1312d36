use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::state::AppState;

/// The authorization gate for every catalog route. Checks run strictly in
/// order and the first failure terminates the request:
///
/// 1. `Authorization: Bearer <token>` header present → else 401 `Unauthorized`
/// 2. token signature and expiry valid → else 401 `Invalid token`
/// 3. token subject exists in the store → else 401 `Invalid token`
///
/// Steps 2 and 3 share one client-visible message so a valid-looking token
/// cannot be used to probe which user ids exist; logs tell them apart.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                warn!("no authorization header");
                ApiError::Unauthorized
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("authorization header is not a bearer credential");
            ApiError::Unauthorized
        })?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            ApiError::InvalidToken
        })?;

        let user = User::find_by_id(&state.db, claims.sub)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| {
                warn!(user_id = %claims.sub, "token subject not found");
                ApiError::InvalidToken
            })?;

        Ok(CurrentUser(user))
    }
}
