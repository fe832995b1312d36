use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::{Role, User};
use crate::error::ApiError;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Request body for `POST /signup`. The typed shape plus `validate` replaces
/// schema validation: an unknown role is already rejected at deserialization.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("Name is required".into()));
        }
        if !EMAIL_RE.is_match(&self.email) {
            return Err(ApiError::Validation("Invalid email".into()));
        }
        if self.password.len() < 6 {
            return Err(ApiError::Validation(
                "Password must be at least 6 characters".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !EMAIL_RE.is_match(&self.email) {
            return Err(ApiError::Validation("Invalid email".into()));
        }
        Ok(())
    }
}

/// Outward view of a user; deliberately has no hash field at all.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Response for `POST /login`.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: None,
        }
    }

    #[test]
    fn valid_signup_passes() {
        assert!(request("Ada", "ada@example.com", "secret1").validate().is_ok());
    }

    #[test]
    fn empty_name_rejected() {
        let err = request("  ", "ada@example.com", "secret1")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("Name"));
    }

    #[test]
    fn malformed_email_rejected() {
        for email in ["not-an-email", "a@b", "a b@c.com", ""] {
            assert!(request("Ada", email, "secret1").validate().is_err());
        }
    }

    #[test]
    fn short_password_rejected() {
        let err = request("Ada", "ada@example.com", "abc").validate().unwrap_err();
        assert!(err.to_string().contains("Password"));
    }

    #[test]
    fn unknown_role_fails_deserialization() {
        let payload = serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "secret1",
            "role": "root"
        });
        assert!(serde_json::from_value::<SignupRequest>(payload).is_err());
    }

    #[test]
    fn user_response_has_no_hash_field() {
        let response = UserResponse {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: Role::User,
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("ada@example.com"));
        assert!(!json.contains("password"));
    }
}
