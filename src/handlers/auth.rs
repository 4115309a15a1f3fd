// src/handlers/auth.rs
// DOCUMENTATION: Sign-in handler
// PURPOSE: Exchange a Google ID token for the matching user record

use crate::config::Config;
use crate::errors::RestroomError;
use crate::models::{AuthResponse, GoogleAuthRequest};
use crate::services::{AuthService, GoogleIdentityClient};
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// POST /auth/google
/// Verify the token with Google and return the user, created on first sign-in
pub async fn google_sign_in(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    identity: web::Data<GoogleIdentityClient>,
    req: web::Json<GoogleAuthRequest>,
) -> Result<impl Responder, RestroomError> {
    if let Err(e) = req.validate() {
        return Err(RestroomError::ValidationError(e.to_string()));
    }

    let user = AuthService::sign_in_with_google(
        pool.get_ref(),
        config.get_ref(),
        identity.get_ref(),
        &req.token,
    )
    .await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "User authenticated".to_string(),
        user,
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").route("/google", web::post().to(google_sign_in)));
}
