// src/db/restroom_repository.rs
// DOCUMENTATION: Restroom database operations
// PURPOSE: Read access to the restrooms table

use crate::errors::RestroomError;
use crate::models::Restroom;
use sqlx::PgPool;

pub struct RestroomRepository;

impl RestroomRepository {
    /// All restrooms in id order
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Restroom>, RestroomError> {
        sqlx::query_as::<_, Restroom>("SELECT * FROM restrooms ORDER BY restroom_id")
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch restrooms: {}", e);
                RestroomError::DatabaseError(format!("Fetch restrooms failed: {}", e))
            })
    }

    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<Restroom>, RestroomError> {
        sqlx::query_as::<_, Restroom>("SELECT * FROM restrooms WHERE restroom_id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch restroom {}: {}", id, e);
                RestroomError::DatabaseError(format!("Fetch restroom failed: {}", e))
            })
    }
}
