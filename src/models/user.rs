// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// Account created on first Google sign-in
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Insert payload for a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

/// Body of POST /auth/google
#[derive(Debug, Deserialize, Validate)]
pub struct GoogleAuthRequest {
    /// Google ID token obtained by the frontend
    #[validate(length(min = 1, message = "token is required"))]
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> User {
        User {
            user_id: 1,
            first_name: "Somchai".to_string(),
            last_name: "Jaidee".to_string(),
            email: "somchai@campus.test".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_roles() {
        assert!(user(ROLE_ADMIN).is_admin());
        assert!(!user(ROLE_USER).is_admin());
    }

    #[test]
    fn test_full_name() {
        assert_eq!(user(ROLE_USER).full_name(), "Somchai Jaidee");

        let mut single = user(ROLE_USER);
        single.last_name = String::new();
        assert_eq!(single.full_name(), "Somchai");
    }

    #[test]
    fn test_empty_token_rejected() {
        let req = GoogleAuthRequest {
            token: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
