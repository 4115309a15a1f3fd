// src/services/auth_service.rs
// DOCUMENTATION: Sign-in and admin checks
// PURPOSE: Map Google identities to users; gate moderation endpoints on role

use crate::config::Config;
use crate::db::UserRepository;
use crate::errors::RestroomError;
use crate::models::{NewUser, User, ROLE_ADMIN, ROLE_USER};
use crate::services::{GoogleIdentityClient, GoogleTokenInfo};
use sqlx::PgPool;

pub struct AuthService;

impl AuthService {
    /// Verify a Google token and return the matching user, creating it on
    /// first sign-in
    pub async fn sign_in_with_google(
        pool: &PgPool,
        config: &Config,
        identity: &GoogleIdentityClient,
        token: &str,
    ) -> Result<User, RestroomError> {
        let info = identity.verify_token(token).await?;

        if let Some(user) = UserRepository::find_by_email(pool, &info.email).await? {
            log::info!("User {} signed in", user.user_id);
            return Ok(user);
        }

        let user = UserRepository::create(pool, &Self::new_user(config, &info)).await?;
        log::info!("Created user {} with role {}", user.user_id, user.role);
        Ok(user)
    }

    fn new_user(config: &Config, info: &GoogleTokenInfo) -> NewUser {
        NewUser {
            first_name: info.given_name.clone(),
            last_name: info.family_name.clone(),
            email: info.email.trim().to_string(),
            role: if config.is_admin_email(&info.email) {
                ROLE_ADMIN.to_string()
            } else {
                ROLE_USER.to_string()
            },
        }
    }

    /// Resolve the caller's email to an admin user
    /// DOCUMENTATION: The email comes from the X-User-Email header or the
    /// `email` query parameter. A missing email is rejected without a
    /// database lookup; unknown users and non-admins are rejected alike.
    pub async fn require_admin(pool: &PgPool, email: Option<&str>) -> Result<User, RestroomError> {
        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                log::warn!("Admin request without email");
                RestroomError::Unauthorized
            })?;

        match UserRepository::find_by_email(pool, email).await? {
            Some(user) if user.is_admin() => Ok(user),
            _ => {
                log::warn!("Admin request from non-admin email");
                Err(RestroomError::Unauthorized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::db::lazy_test_pool;

    fn token_info(email: &str) -> GoogleTokenInfo {
        GoogleTokenInfo {
            email: email.to_string(),
            given_name: "Nok".to_string(),
            family_name: "Chaiyo".to_string(),
            aud: None,
        }
    }

    #[test]
    fn test_new_user_roles() {
        let config = Config::for_tests();

        let student = AuthService::new_user(&config, &token_info("nok@campus.test"));
        assert_eq!(student.role, ROLE_USER);
        assert_eq!(student.first_name, "Nok");
        assert_eq!(student.last_name, "Chaiyo");

        let admin = AuthService::new_user(&config, &token_info("admin@campus.test"));
        assert_eq!(admin.role, ROLE_ADMIN);
    }

    #[actix_web::test]
    async fn test_missing_email_rejected_without_database() {
        let pool = lazy_test_pool(&Config::for_tests());

        assert!(matches!(
            AuthService::require_admin(&pool, None).await,
            Err(RestroomError::Unauthorized)
        ));
        assert!(matches!(
            AuthService::require_admin(&pool, Some("   ")).await,
            Err(RestroomError::Unauthorized)
        ));
    }
}
