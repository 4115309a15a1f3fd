// src/db/user_repository.rs
// DOCUMENTATION: User database operations
// PURPOSE: Lookup, lazy creation and admin promotion of users

use crate::errors::RestroomError;
use crate::models::{NewUser, User, ROLE_ADMIN};
use sqlx::PgPool;

pub struct UserRepository;

impl UserRepository {
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, RestroomError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = lower($1)")
            .bind(email.trim())
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to look up user by email: {}", e);
                RestroomError::DatabaseError(format!("Fetch user failed: {}", e))
            })
    }

    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<User>, RestroomError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch user {}: {}", id, e);
                RestroomError::DatabaseError(format!("Fetch user failed: {}", e))
            })
    }

    /// Every user; the details view resolves review authors from this
    pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, RestroomError> {
        sqlx::query_as::<_, User>("SELECT * FROM users")
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch users: {}", e);
                RestroomError::DatabaseError(format!("Fetch users failed: {}", e))
            })
    }

    /// Insert a user, or return the existing row when another request
    /// created the same email first
    pub async fn create(pool: &PgPool, new_user: &NewUser) -> Result<User, RestroomError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING *
            "#,
        )
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.email)
        .bind(&new_user.role)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create user: {}", e);
            RestroomError::DatabaseError(format!("Create user failed: {}", e))
        })
    }

    /// Give the admin role to existing users with one of these emails
    pub async fn promote_admins(pool: &PgPool, emails: &[String]) -> Result<u64, RestroomError> {
        if emails.is_empty() {
            return Ok(0);
        }

        let lowered: Vec<String> = emails.iter().map(|e| e.to_lowercase()).collect();

        let result = sqlx::query(
            "UPDATE users SET role = $1 WHERE lower(email) = ANY($2) AND role <> $1",
        )
        .bind(ROLE_ADMIN)
        .bind(&lowered)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to promote admin users: {}", e);
            RestroomError::DatabaseError(format!("Promote admins failed: {}", e))
        })?;

        Ok(result.rows_affected())
    }
}
