// src/handlers/restrooms.rs
// DOCUMENTATION: HTTP handlers for restroom reads
// PURPOSE: Plain listing and the nested details document

use crate::errors::RestroomError;
use crate::services::RestroomService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;

/// GET /restrooms
pub async fn list_restrooms(pool: web::Data<PgPool>) -> Result<impl Responder, RestroomError> {
    let restrooms = RestroomService::list_restrooms(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(restrooms))
}

/// GET /restrooms/details
/// Every restroom with photos, reviews, review photos and authors
pub async fn restroom_details(pool: web::Data<PgPool>) -> Result<impl Responder, RestroomError> {
    let details = RestroomService::restroom_details(pool.get_ref()).await?;
    log::info!("Served details for {} restrooms", details.len());
    Ok(HttpResponse::Ok().json(details))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/restrooms")
            .route("", web::get().to(list_restrooms))
            .route("/details", web::get().to(restroom_details)),
    );
}
