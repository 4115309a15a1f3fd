// src/services/review_service.rs
// DOCUMENTATION: Business logic for reviews
// PURPOSE: Review submission with optional photo, admin listing and deletion

use crate::config::Config;
use crate::db::{PhotoRepository, RestroomRepository, ReviewRepository, UserRepository};
use crate::errors::RestroomError;
use crate::models::{
    AdminReviewResponse, DeleteReviewResponse, NewReview, PhotoOwner, Restroom, Review,
    ReviewFields, ReviewSubmissionResponse, User, REVIEW_DATE_FORMAT,
};
use crate::services::{AttachError, FileHostClient, PhotoInput, PhotoService};
use chrono::{Local, NaiveDate};
use sqlx::PgPool;

/// Outcome of the photo step of a submission
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PhotoOutcome {
    pub photo_url: String,
    pub error: Option<AttachError>,
}

pub struct ReviewService;

impl ReviewService {
    /// Submit a review, then attach its photo
    /// DOCUMENTATION: Fields are coerced before anything is written, so a
    /// bad request never creates a row. The review is inserted first to get
    /// its id; a photo failure afterwards keeps the review and is reported
    /// in `error_image` / `error_db`.
    pub async fn submit_review(
        pool: &PgPool,
        config: &Config,
        file_host: &FileHostClient,
        fields: &ReviewFields,
        photo: Option<PhotoInput>,
    ) -> Result<ReviewSubmissionResponse, RestroomError> {
        let input = fields.parse()?;
        let today = Local::now().date_naive();

        let review = ReviewRepository::create_review(
            pool,
            &NewReview {
                restroom_id: input.restroom_id,
                user_id: input.user_id,
                rating: input.rating,
                comment: input.comment,
                review_date: today,
            },
        )
        .await?;

        log::info!(
            "Review {} saved for restroom {}",
            review.review_id,
            review.restroom_id
        );

        let outcome = match photo {
            Some(input) => {
                match PhotoService::attach(
                    pool,
                    config,
                    file_host,
                    PhotoOwner::Review(review.review_id),
                    input,
                )
                .await
                {
                    Ok(photo) => PhotoOutcome {
                        photo_url: photo.source.to_uri(),
                        error: None,
                    },
                    Err(e) => PhotoOutcome {
                        photo_url: String::new(),
                        error: Some(e),
                    },
                }
            }
            None => PhotoOutcome::default(),
        };

        let restroom = RestroomRepository::get_by_id(pool, review.restroom_id)
            .await
            .unwrap_or_else(|e| {
                log::warn!("Restroom lookup for review {} failed: {}", review.review_id, e);
                None
            });
        let user = UserRepository::get_by_id(pool, review.user_id)
            .await
            .unwrap_or_else(|e| {
                log::warn!("User lookup for review {} failed: {}", review.review_id, e);
                None
            });

        Ok(Self::submission_response(
            &review,
            restroom.as_ref(),
            user.as_ref(),
            outcome,
        ))
    }

    /// Compose the submission response; missing restroom or user rows leave
    /// their fields empty
    pub fn submission_response(
        review: &Review,
        restroom: Option<&Restroom>,
        user: Option<&User>,
        outcome: PhotoOutcome,
    ) -> ReviewSubmissionResponse {
        let (error_image, error_db) = match outcome.error {
            Some(AttachError::Image(e)) => (Some(e), None),
            Some(AttachError::Database(e)) => (None, Some(e)),
            None => (None, None),
        };

        let message = if error_image.is_some() || error_db.is_some() {
            "Review added successfully, but image saving failed"
        } else {
            "Review added successfully!"
        };

        ReviewSubmissionResponse {
            message: message.to_string(),
            review_id: review.review_id,
            restroom_id: review.restroom_id,
            user_id: review.user_id,
            rating: review.rating,
            comment: review.comment.clone(),
            name: restroom.map(|r| r.building_name.clone()).unwrap_or_default(),
            username: user.map(User::full_name).unwrap_or_default(),
            photo_url: outcome.photo_url,
            review_date: format_date(review.review_date),
            error_image,
            error_db,
        }
    }

    /// All reviews for moderation, newest first, with their first photo
    pub async fn list_for_admin(pool: &PgPool) -> Result<Vec<AdminReviewResponse>, RestroomError> {
        let rows = ReviewRepository::list_for_admin(pool).await?;
        let mut reviews = Vec::with_capacity(rows.len());

        for row in rows {
            let photo_url = match PhotoRepository::get_photos_by_review(pool, row.review_id).await {
                Ok(photos) => photos.first().map(|p| p.source.to_uri()),
                Err(e) => {
                    log::warn!("Photos for review {} unavailable: {}", row.review_id, e);
                    None
                }
            };
            reviews.push(row.into_response(photo_url));
        }

        Ok(reviews)
    }

    /// Delete a review and its photos
    /// DOCUMENTATION: Photos go first; a failure there is logged and the
    /// review is still deleted. A failure deleting the review is returned.
    pub async fn delete_review(pool: &PgPool, review_id: i32) -> Result<DeleteReviewResponse, RestroomError> {
        if ReviewRepository::get_by_id(pool, review_id).await?.is_none() {
            return Err(RestroomError::NotFound(format!("review {}", review_id)));
        }

        match PhotoRepository::delete_photos_by_review(pool, review_id).await {
            Ok(count) => log::info!("Deleted {} photos of review {}", count, review_id),
            Err(e) => log::warn!("Could not delete photos of review {}: {}", review_id, e),
        }

        if ReviewRepository::delete_review(pool, review_id).await? == 0 {
            return Err(RestroomError::NotFound(format!("review {}", review_id)));
        }

        log::info!("Review {} deleted by admin", review_id);

        Ok(DeleteReviewResponse {
            message: "Review deleted".to_string(),
            review_id,
        })
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(REVIEW_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::db::scratch_schema_pool;
    use crate::db::ensure_schema;
    use crate::models::ROLE_USER;

    fn review() -> Review {
        Review {
            review_id: 12,
            restroom_id: 1,
            user_id: 1,
            rating: 4.5,
            comment: "clean".to_string(),
            review_date: NaiveDate::from_ymd_opt(2024, 11, 2).unwrap(),
        }
    }

    fn restroom() -> Restroom {
        Restroom {
            restroom_id: 1,
            building_name: "Central Library".to_string(),
            floor: 2,
            is_men: true,
            is_women: true,
            is_accessible: false,
            is_bum_gun: true,
            is_toilet_paper: true,
            is_free: true,
            latitude: "13.8476".to_string(),
            longitude: "100.5696".to_string(),
            faculty_name: None,
            opening_hours_monday: Some("08:00-20:00".to_string()),
            opening_hours_tuesday: None,
            opening_hours_wednesday: None,
            opening_hours_thursday: None,
            opening_hours_friday: None,
            opening_hours_saturday: None,
            opening_hours_sunday: None,
        }
    }

    fn user() -> User {
        User {
            user_id: 1,
            first_name: "Ploy".to_string(),
            last_name: "Rattana".to_string(),
            email: "ploy@campus.test".to_string(),
            role: ROLE_USER.to_string(),
        }
    }

    #[test]
    fn test_response_without_photo() {
        let response = ReviewService::submission_response(
            &review(),
            Some(&restroom()),
            Some(&user()),
            PhotoOutcome::default(),
        );

        assert_eq!(response.message, "Review added successfully!");
        assert_eq!(response.review_id, 12);
        assert_eq!(response.rating, 4.5);
        assert_eq!(response.photo_url, "");
        assert_eq!(response.name, "Central Library");
        assert_eq!(response.username, "Ploy Rattana");
        assert_eq!(response.review_date, "2024-11-02");

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("error_image").is_none());
        assert!(json.get("error_db").is_none());
    }

    #[test]
    fn test_response_tolerates_missing_rows() {
        let response =
            ReviewService::submission_response(&review(), None, None, PhotoOutcome::default());

        assert_eq!(response.name, "");
        assert_eq!(response.username, "");
    }

    #[test]
    fn test_response_reports_photo_failures() {
        let image_failed = ReviewService::submission_response(
            &review(),
            None,
            None,
            PhotoOutcome {
                photo_url: String::new(),
                error: Some(AttachError::Image("invalid base64 payload".into())),
            },
        );
        assert_eq!(
            image_failed.message,
            "Review added successfully, but image saving failed"
        );
        assert_eq!(image_failed.error_image.as_deref(), Some("invalid base64 payload"));
        assert!(image_failed.error_db.is_none());

        let db_failed = ReviewService::submission_response(
            &review(),
            None,
            None,
            PhotoOutcome {
                photo_url: String::new(),
                error: Some(AttachError::Database("A database error occurred".into())),
            },
        );
        assert!(db_failed.error_image.is_none());
        assert!(db_failed.error_db.is_some());
    }

    async fn review_count(pool: &PgPool) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews")
            .fetch_one(pool)
            .await
            .unwrap();
        count
    }

    fn submitted(rating: &str) -> ReviewFields {
        ReviewFields {
            restroom_id: "1".to_string(),
            user_id: "1".to_string(),
            rating: rating.to_string(),
            comment: "clean".to_string(),
        }
    }

    #[actix_web::test]
    #[ignore = "needs DATABASE_URL"]
    async fn test_submission_stores_one_review_dated_today() {
        let Some(pool) = scratch_schema_pool().await else {
            return;
        };
        ensure_schema(&pool).await.unwrap();
        let config = Config::for_tests();
        let file_host = FileHostClient::new(&config).unwrap();

        let response =
            ReviewService::submit_review(&pool, &config, &file_host, &submitted("4.5"), None)
                .await
                .unwrap();

        assert_eq!(response.message, "Review added successfully!");
        assert_eq!(response.rating, 4.5);
        assert_eq!(response.photo_url, "");
        assert_eq!(response.review_date, format_date(Local::now().date_naive()));
        assert_eq!(review_count(&pool).await, 1);

        let stored = ReviewRepository::get_by_id(&pool, response.review_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.review_date, Local::now().date_naive());
    }

    #[actix_web::test]
    #[ignore = "needs DATABASE_URL"]
    async fn test_invalid_rating_stores_nothing() {
        let Some(pool) = scratch_schema_pool().await else {
            return;
        };
        ensure_schema(&pool).await.unwrap();
        let config = Config::for_tests();
        let file_host = FileHostClient::new(&config).unwrap();

        let result =
            ReviewService::submit_review(&pool, &config, &file_host, &submitted("great"), None)
                .await;

        assert!(matches!(result, Err(RestroomError::InvalidInput(_))));
        assert_eq!(review_count(&pool).await, 0);
    }

    #[actix_web::test]
    #[ignore = "needs DATABASE_URL"]
    async fn test_delete_twice_is_not_found() {
        let Some(pool) = scratch_schema_pool().await else {
            return;
        };
        ensure_schema(&pool).await.unwrap();
        let config = Config::for_tests();
        let file_host = FileHostClient::new(&config).unwrap();

        let response =
            ReviewService::submit_review(&pool, &config, &file_host, &submitted("3"), None)
                .await
                .unwrap();

        let deleted = ReviewService::delete_review(&pool, response.review_id)
            .await
            .unwrap();
        assert_eq!(deleted.review_id, response.review_id);
        assert_eq!(review_count(&pool).await, 0);

        assert!(matches!(
            ReviewService::delete_review(&pool, response.review_id).await,
            Err(RestroomError::NotFound(_))
        ));
    }
}
