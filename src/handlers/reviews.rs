// src/handlers/reviews.rs
// DOCUMENTATION: HTTP handlers for review submission
// PURPOSE: Multipart and base64 JSON variants of the same operation

use crate::config::Config;
use crate::errors::RestroomError;
use crate::models::{Base64ReviewRequest, ReviewFields};
use crate::services::{FileHostClient, PhotoInput, ReviewService};
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use futures_util::TryStreamExt;
use sqlx::PgPool;

/// Read the text fields and the optional `photo` file of a review form
async fn read_review_form(
    payload: &mut Multipart,
    limit: usize,
) -> Result<(ReviewFields, Option<Vec<u8>>), RestroomError> {
    let mut fields = ReviewFields::default();
    let mut photo = None;
    let mut total = 0usize;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| RestroomError::InvalidInput(format!("Malformed form data: {}", e)))?
    {
        let name = field
            .content_disposition()
            .get_name()
            .unwrap_or_default()
            .to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| RestroomError::InvalidInput(format!("Malformed form data: {}", e)))?
        {
            total += chunk.len();
            if total > limit {
                return Err(RestroomError::InvalidInput("Request body too large".to_string()));
            }
            data.extend_from_slice(&chunk);
        }

        let text = || String::from_utf8_lossy(&data).into_owned();
        match name.as_str() {
            "restroom_id" => fields.restroom_id = text(),
            "user_id" => fields.user_id = text(),
            "rating" => fields.rating = text(),
            "comment" => fields.comment = text(),
            "photo" if !data.is_empty() => photo = Some(data),
            _ => {}
        }
    }

    Ok((fields, photo))
}

/// POST /review
/// Multipart form: restroom_id, user_id, rating, comment, optional photo file
pub async fn create_review(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    file_host: web::Data<FileHostClient>,
    mut payload: Multipart,
) -> Result<impl Responder, RestroomError> {
    let (fields, photo) = read_review_form(&mut payload, config.max_body_bytes).await?;

    log::debug!(
        "Review form for restroom {:?}, photo attached: {}",
        fields.restroom_id,
        photo.is_some()
    );

    let response = ReviewService::submit_review(
        pool.get_ref(),
        config.get_ref(),
        file_host.get_ref(),
        &fields,
        photo.map(PhotoInput::Upload),
    )
    .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// POST /review/base64
/// JSON body with the photo as a base64 string or data URL
pub async fn create_review_base64(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    file_host: web::Data<FileHostClient>,
    req: web::Json<Base64ReviewRequest>,
) -> Result<impl Responder, RestroomError> {
    let req = req.into_inner();
    let photo = req
        .photo_base64
        .clone()
        .filter(|p| !p.trim().is_empty())
        .map(PhotoInput::Base64);

    let response = ReviewService::submit_review(
        pool.get_ref(),
        config.get_ref(),
        file_host.get_ref(),
        &req.fields(),
        photo,
    )
    .await?;

    Ok(HttpResponse::Ok().json(response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/review")
            .route("", web::post().to(create_review))
            .route("/base64", web::post().to(create_review_base64)),
    );
}
