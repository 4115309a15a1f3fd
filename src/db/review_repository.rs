// src/db/review_repository.rs
// DOCUMENTATION: Review database operations
// PURPOSE: Create, list and delete restroom reviews

use crate::errors::RestroomError;
use crate::models::{AdminReviewRow, NewReview, Review};
use sqlx::PgPool;

pub struct ReviewRepository;

impl ReviewRepository {
    /// Create a new review
    /// DOCUMENTATION: Returns the stored row so the caller has the new review_id
    pub async fn create_review(pool: &PgPool, req: &NewReview) -> Result<Review, RestroomError> {
        sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (restroom_id, user_id, rating, comment, review_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(req.restroom_id)
        .bind(req.user_id)
        .bind(req.rating)
        .bind(&req.comment)
        .bind(req.review_date)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create review: {}", e);
            RestroomError::DatabaseError(format!("Create review failed: {}", e))
        })
    }

    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<Review>, RestroomError> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE review_id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch review {}: {}", id, e);
                RestroomError::DatabaseError(format!("Fetch review failed: {}", e))
            })
    }

    /// Every review, grouped later by restroom
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Review>, RestroomError> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews ORDER BY review_id")
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch reviews: {}", e);
                RestroomError::DatabaseError(format!("Fetch reviews failed: {}", e))
            })
    }

    /// Reviews joined with author and restroom, newest first
    /// DOCUMENTATION: Reviews whose user or restroom row is missing are left
    /// out by the inner joins
    pub async fn list_for_admin(pool: &PgPool) -> Result<Vec<AdminReviewRow>, RestroomError> {
        sqlx::query_as::<_, AdminReviewRow>(
            r#"
            SELECT r.review_id, r.restroom_id, r.user_id, r.rating, r.comment, r.review_date,
                   u.first_name, u.last_name, u.email,
                   rs.building_name, rs.floor
            FROM reviews r
            JOIN users u ON r.user_id = u.user_id
            JOIN restrooms rs ON r.restroom_id = rs.restroom_id
            ORDER BY r.review_date DESC, r.review_id DESC
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch reviews for admin: {}", e);
            RestroomError::DatabaseError(format!("Fetch admin reviews failed: {}", e))
        })
    }

    /// Delete one review; returns the number of rows removed
    pub async fn delete_review(pool: &PgPool, id: i32) -> Result<u64, RestroomError> {
        let result = sqlx::query("DELETE FROM reviews WHERE review_id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to delete review {}: {}", id, e);
                RestroomError::DatabaseError(format!("Delete review failed: {}", e))
            })?;

        Ok(result.rows_affected())
    }
}
