// src/db/photo_repository.rs
// DOCUMENTATION: Photo database operations
// PURPOSE: Store, list, migrate and delete review and restroom photos

use crate::errors::RestroomError;
use crate::models::{Photo, PhotoOwner, PhotoSource};
use sqlx::{FromRow, PgPool};

/// Internal struct for mapping photo rows to Photo
/// DOCUMENTATION: The kind column decides which payload columns are read
#[derive(Debug, FromRow)]
struct PhotoRow {
    photo_id: i32,
    kind: Option<String>,
    mime_type: Option<String>,
    data: Option<Vec<u8>>,
    url: Option<String>,
    photo_restroom: Option<i32>,
    photo_review: Option<i32>,
}

impl PhotoRow {
    fn into_photo(self) -> Result<Photo, String> {
        let owner = PhotoOwner::from_columns(self.photo_restroom, self.photo_review)
            .ok_or_else(|| format!("photo {} does not have exactly one owner", self.photo_id))?;

        let source = match (self.kind.as_deref(), self.mime_type, self.data, self.url) {
            (Some(PhotoSource::INLINE), Some(mime), Some(bytes), _) => {
                PhotoSource::Inline { mime, bytes }
            }
            (Some(PhotoSource::HOSTED), _, _, Some(url)) => PhotoSource::Hosted { url },
            _ => return Err(format!("photo {} has no usable payload", self.photo_id)),
        };

        Ok(Photo {
            photo_id: self.photo_id,
            source,
            owner,
        })
    }
}

const PHOTO_COLUMNS: &str =
    "photo_id, kind, mime_type, data, url, photo_restroom, photo_review";

/// Malformed rows are skipped with a warning instead of failing the read
fn rows_to_photos(rows: Vec<PhotoRow>) -> Vec<Photo> {
    rows.into_iter()
        .filter_map(|row| match row.into_photo() {
            Ok(photo) => Some(photo),
            Err(e) => {
                log::warn!("Skipping photo: {}", e);
                None
            }
        })
        .collect()
}

/// LIKE patterns matching any of the given URL prefixes
pub fn like_prefix_patterns(prefixes: &[String]) -> Vec<String> {
    prefixes
        .iter()
        .map(|prefix| {
            let escaped = prefix
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("{}%", escaped)
        })
        .collect()
}

pub struct PhotoRepository;

impl PhotoRepository {
    /// Create a new photo for exactly one owner
    pub async fn create_photo(
        pool: &PgPool,
        owner: PhotoOwner,
        source: &PhotoSource,
    ) -> Result<Photo, RestroomError> {
        let (photo_restroom, photo_review) = owner.columns();
        let (mime_type, data, url) = match source {
            PhotoSource::Inline { mime, bytes } => (Some(mime.as_str()), Some(bytes.as_slice()), None),
            PhotoSource::Hosted { url } => (None, None, Some(url.as_str())),
        };

        let (photo_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO photos (kind, mime_type, data, url, photo_restroom, photo_review)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING photo_id
            "#,
        )
        .bind(source.kind())
        .bind(mime_type)
        .bind(data)
        .bind(url)
        .bind(photo_restroom)
        .bind(photo_review)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create photo: {}", e);
            RestroomError::DatabaseError(format!("Create photo failed: {}", e))
        })?;

        Ok(Photo {
            photo_id,
            source: source.clone(),
            owner,
        })
    }

    /// Every photo; the details view groups them by owner
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Photo>, RestroomError> {
        let rows = sqlx::query_as::<_, PhotoRow>(&format!(
            "SELECT {} FROM photos ORDER BY photo_id",
            PHOTO_COLUMNS
        ))
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch photos: {}", e);
            RestroomError::DatabaseError(format!("Fetch photos failed: {}", e))
        })?;

        Ok(rows_to_photos(rows))
    }

    /// Get photos for a review, oldest first
    pub async fn get_photos_by_review(
        pool: &PgPool,
        review_id: i32,
    ) -> Result<Vec<Photo>, RestroomError> {
        let rows = sqlx::query_as::<_, PhotoRow>(&format!(
            "SELECT {} FROM photos WHERE photo_review = $1 ORDER BY photo_id",
            PHOTO_COLUMNS
        ))
        .bind(review_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch photos for review {}: {}", review_id, e);
            RestroomError::DatabaseError(format!("Fetch photos failed: {}", e))
        })?;

        Ok(rows_to_photos(rows))
    }

    /// Delete all photos attached to a review
    pub async fn delete_photos_by_review(
        pool: &PgPool,
        review_id: i32,
    ) -> Result<u64, RestroomError> {
        let result = sqlx::query("DELETE FROM photos WHERE photo_review = $1")
            .bind(review_id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to delete photos for review {}: {}", review_id, e);
                RestroomError::DatabaseError(format!("Delete photos failed: {}", e))
            })?;

        Ok(result.rows_affected())
    }

    /// Number of hosted photos whose link starts with one of the prefixes
    pub async fn count_hosted(pool: &PgPool, prefixes: &[String]) -> Result<i64, RestroomError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM photos WHERE kind = 'hosted' AND url LIKE ANY($1)",
        )
        .bind(like_prefix_patterns(prefixes))
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to count hosted photos: {}", e);
            RestroomError::DatabaseError(format!("Count photos failed: {}", e))
        })?;

        Ok(count)
    }

    /// Next page of hosted photos eligible for migration, by id after `after_id`
    pub async fn list_hosted(
        pool: &PgPool,
        prefixes: &[String],
        after_id: i32,
        limit: i64,
    ) -> Result<Vec<Photo>, RestroomError> {
        let rows = sqlx::query_as::<_, PhotoRow>(&format!(
            "SELECT {} FROM photos WHERE kind = 'hosted' AND url LIKE ANY($1) AND photo_id > $2 ORDER BY photo_id LIMIT $3",
            PHOTO_COLUMNS
        ))
        .bind(like_prefix_patterns(prefixes))
        .bind(after_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch hosted photos: {}", e);
            RestroomError::DatabaseError(format!("Fetch photos failed: {}", e))
        })?;

        Ok(rows_to_photos(rows))
    }

    /// Replace a hosted link with inline image bytes
    pub async fn replace_with_inline(
        pool: &PgPool,
        photo_id: i32,
        mime: &str,
        bytes: &[u8],
    ) -> Result<(), RestroomError> {
        sqlx::query(
            r#"
            UPDATE photos
            SET kind = 'inline', mime_type = $2, data = $3, url = NULL
            WHERE photo_id = $1
            "#,
        )
        .bind(photo_id)
        .bind(mime)
        .bind(bytes)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to update photo {}: {}", photo_id, e);
            RestroomError::DatabaseError(format!("Update photo failed: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> PhotoRow {
        PhotoRow {
            photo_id: 11,
            kind: Some("inline".to_string()),
            mime_type: Some("image/png".to_string()),
            data: Some(vec![0x89, 0x50]),
            url: None,
            photo_restroom: None,
            photo_review: Some(3),
        }
    }

    #[test]
    fn test_inline_row() {
        let photo = row().into_photo().unwrap();
        assert_eq!(photo.owner, PhotoOwner::Review(3));
        assert_eq!(
            photo.source,
            PhotoSource::Inline {
                mime: "image/png".to_string(),
                bytes: vec![0x89, 0x50]
            }
        );
    }

    #[test]
    fn test_hosted_row() {
        let mut hosted = row();
        hosted.kind = Some("hosted".to_string());
        hosted.url = Some("https://drive.google.com/uc?id=1".to_string());
        let photo = hosted.into_photo().unwrap();

        assert_eq!(photo.source.kind(), "hosted");
    }

    #[test]
    fn test_rows_with_two_owners_are_rejected() {
        let mut bad = row();
        bad.photo_restroom = Some(1);
        assert!(bad.into_photo().is_err());

        let mut missing = row();
        missing.data = None;
        assert!(missing.into_photo().is_err());

        let mut untyped = row();
        untyped.kind = None;
        assert_eq!(rows_to_photos(vec![row(), untyped]).len(), 1);
    }

    #[test]
    fn test_like_prefix_patterns_escape_wildcards() {
        let patterns = like_prefix_patterns(&[
            "https://drive.google.com".to_string(),
            "https://cdn.example/100%_raw".to_string(),
        ]);

        assert_eq!(patterns[0], "https://drive.google.com%");
        assert_eq!(patterns[1], "https://cdn.example/100\\%\\_raw%");
    }
}
