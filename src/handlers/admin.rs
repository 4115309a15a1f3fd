// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for moderation and photo migration
// PURPOSE: Review listing/deletion and hosted-to-inline photo migration

use crate::config::Config;
use crate::errors::RestroomError;
use crate::services::{AuthService, FileHostClient, PhotoService, ReviewService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::PgPool;

/// Query string accepted by admin routes
#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    /// Caller email when the X-User-Email header is absent
    pub email: Option<String>,
    /// Batch size for migration; kept as text so bad values fall back to the default
    pub limit: Option<String>,
    /// Resume migration after this photo id
    pub after_id: Option<String>,
}

/// (limit, after_id) of a migration call; unparsable values are ignored
fn migration_params(query_string: &str) -> (Option<i64>, Option<i32>) {
    match web::Query::<AdminQuery>::from_query(query_string) {
        Ok(q) => {
            let q = q.into_inner();
            (
                q.limit.and_then(|l| l.trim().parse::<i64>().ok()),
                q.after_id.and_then(|a| a.trim().parse::<i32>().ok()),
            )
        }
        Err(_) => (None, None),
    }
}

/// Identity of the caller: X-User-Email header, else `?email=`
fn admin_email(req: &HttpRequest) -> Option<String> {
    let header = req
        .headers()
        .get("X-User-Email")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    header.or_else(|| {
        web::Query::<AdminQuery>::from_query(req.query_string())
            .ok()
            .and_then(|q| q.into_inner().email)
    })
}

async fn verify_admin(pool: &PgPool, req: &HttpRequest) -> Result<(), RestroomError> {
    let email = admin_email(req);
    let admin = AuthService::require_admin(pool, email.as_deref()).await?;
    log::info!("Admin request {} {} by {}", req.method(), req.path(), admin.email);
    Ok(())
}

/// GET /admin/reviews
/// All reviews, newest first, with reviewer name and first photo
pub async fn list_reviews(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<impl Responder, RestroomError> {
    verify_admin(pool.get_ref(), &req).await?;

    let reviews = ReviewService::list_for_admin(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/// DELETE /admin/reviews/{id}
/// Remove a review and its photos
pub async fn delete_review(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<impl Responder, RestroomError> {
    verify_admin(pool.get_ref(), &req).await?;

    let review_id = path
        .trim()
        .parse::<i32>()
        .map_err(|_| RestroomError::InvalidInput("Invalid review ID".to_string()))?;

    let response = ReviewService::delete_review(pool.get_ref(), review_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /admin/migratePhotos
/// Number of hosted photos still to migrate
pub async fn migration_preview(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<impl Responder, RestroomError> {
    verify_admin(pool.get_ref(), &req).await?;

    let preview = PhotoService::migration_preview(pool.get_ref(), config.get_ref()).await?;
    Ok(HttpResponse::Ok().json(preview))
}

/// GET /admin/migratePhotos/start?limit=N&after_id=M
/// Migrate one batch of hosted photos to inline storage; `after_id` skips
/// photos that failed in an earlier call
pub async fn migrate_photos(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    file_host: web::Data<FileHostClient>,
    req: HttpRequest,
) -> Result<impl Responder, RestroomError> {
    verify_admin(pool.get_ref(), &req).await?;

    let (requested, after_id) = migration_params(req.query_string());

    let stats = PhotoService::migrate_batch(
        pool.get_ref(),
        config.get_ref(),
        file_host.get_ref(),
        requested,
        after_id,
    )
    .await?;

    Ok(HttpResponse::Ok().json(stats))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/reviews", web::get().to(list_reviews))
            .route("/reviews/{id}", web::delete().to(delete_review))
            .route("/migratePhotos", web::get().to(migration_preview))
            .route("/migratePhotos/start", web::get().to(migrate_photos)),
    );
}
