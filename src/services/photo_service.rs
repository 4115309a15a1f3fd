// src/services/photo_service.rs
// DOCUMENTATION: Photo ingestion and hosted-photo migration
// PURPOSE: Turn inbound image payloads into stored photos; move hosted
// photos into the database in bounded batches

use crate::config::{Config, PhotoStorage};
use crate::db::PhotoRepository;
use crate::errors::RestroomError;
use crate::models::{MigrationPreview, MigrationStats, Photo, PhotoOwner, PhotoSource};
use crate::services::media::{decode_image_payload, image_from_upload, validate_download, DecodedImage};
use crate::services::FileHostClient;
use governor::{Quota, RateLimiter};
use sqlx::PgPool;
use std::time::Duration;

/// Upper bound for one migration call
pub const MAX_MIGRATION_BATCH: i64 = 100;

/// Image as received by one of the review endpoints
#[derive(Debug, Clone)]
pub enum PhotoInput {
    /// `photo_base64` of the JSON endpoint
    Base64(String),
    /// `photo` file of the multipart endpoint
    Upload(Vec<u8>),
}

/// Why a photo could not be attached after its review was saved
#[derive(Debug, Clone, PartialEq)]
pub enum AttachError {
    /// Payload could not be decoded or uploaded
    Image(String),
    /// Photo row could not be written
    Database(String),
}

pub struct PhotoService;

impl PhotoService {
    pub fn decode(input: PhotoInput) -> Result<DecodedImage, RestroomError> {
        match input {
            PhotoInput::Base64(payload) => decode_image_payload(&payload),
            PhotoInput::Upload(bytes) => image_from_upload(bytes),
        }
    }

    /// Where a decoded image will be persisted
    /// DOCUMENTATION: Inline keeps the bytes; hosted uploads them first
    pub async fn to_source(
        storage: PhotoStorage,
        file_host: &FileHostClient,
        image: DecodedImage,
    ) -> Result<PhotoSource, RestroomError> {
        match storage {
            PhotoStorage::Inline => Ok(PhotoSource::Inline {
                mime: image.mime,
                bytes: image.bytes,
            }),
            PhotoStorage::Hosted => {
                let url = file_host.upload(&image.bytes, &image.mime).await?;
                Ok(PhotoSource::Hosted { url })
            }
        }
    }

    /// Decode, store and link a photo to its owner
    /// DOCUMENTATION: The owner row must already exist. Nothing is rolled back
    /// on failure; the caller reports the error next to the saved owner.
    pub async fn attach(
        pool: &PgPool,
        config: &Config,
        file_host: &FileHostClient,
        owner: PhotoOwner,
        input: PhotoInput,
    ) -> Result<Photo, AttachError> {
        let image = Self::decode(input).map_err(|e| {
            log::warn!("Photo for {:?} rejected: {}", owner, e);
            AttachError::Image(e.public_message())
        })?;

        let source = Self::to_source(config.photo_storage, file_host, image)
            .await
            .map_err(|e| {
                log::warn!("Photo for {:?} could not be stored: {}", owner, e);
                AttachError::Image(e.public_message())
            })?;

        let photo = PhotoRepository::create_photo(pool, owner, &source)
            .await
            .map_err(|e| AttachError::Database(e.public_message()))?;

        log::info!("Photo {} saved for {:?}", photo.photo_id, owner);
        Ok(photo)
    }

    /// Page size for one migration call
    pub fn batch_limit(requested: Option<i64>, default: i64) -> i64 {
        match requested {
            Some(limit) if limit > 0 => limit.min(MAX_MIGRATION_BATCH),
            _ => default.clamp(1, MAX_MIGRATION_BATCH),
        }
    }

    /// Count hosted photos still waiting for migration
    pub async fn migration_preview(
        pool: &PgPool,
        config: &Config,
    ) -> Result<MigrationPreview, RestroomError> {
        let count = PhotoRepository::count_hosted(pool, &config.hosted_url_prefixes).await?;

        log::info!("{} hosted photos waiting for migration", count);

        Ok(MigrationPreview {
            message: if count == 0 {
                "No hosted photos to migrate".to_string()
            } else {
                "Hosted photos found".to_string()
            },
            count,
            note: "Migration is slow; call /admin/migratePhotos/start to process one batch"
                .to_string(),
        })
    }

    /// Migrate one page of hosted photos to inline storage
    /// DOCUMENTATION: Downloads each photo, rejects payloads under 100 bytes
    /// or not sniffed as images, and rewrites the row as inline. Failures are
    /// counted and listed; nothing is retried within the call. Downloads are
    /// paced by `MIGRATION_PAUSE_MS`. Only photos with an id above `after_id`
    /// are considered.
    pub async fn migrate_batch(
        pool: &PgPool,
        config: &Config,
        file_host: &FileHostClient,
        requested_limit: Option<i64>,
        after_id: Option<i32>,
    ) -> Result<MigrationStats, RestroomError> {
        let limit = Self::batch_limit(requested_limit, config.migration_default_limit);
        let photos = PhotoRepository::list_hosted(
            pool,
            &config.hosted_url_prefixes,
            after_id.unwrap_or(0),
            limit,
        )
        .await?;
        let mut stats = MigrationStats::new(photos.len());

        if photos.is_empty() {
            return Ok(stats);
        }

        log::info!("Migrating {} hosted photos", photos.len());

        let pacing = Quota::with_period(Duration::from_millis(config.migration_pause_ms))
            .map(RateLimiter::direct);

        for (idx, photo) in photos.iter().enumerate() {
            let url = match &photo.source {
                PhotoSource::Hosted { url } => url,
                PhotoSource::Inline { .. } => continue,
            };

            if let Some(limiter) = &pacing {
                limiter.until_ready().await;
            }

            log::debug!(
                "Migrating photo {}/{} (id {})",
                idx + 1,
                photos.len(),
                photo.photo_id
            );

            let bytes = match file_host.download(url).await {
                Ok(bytes) => bytes,
                Err(reason) => {
                    log::warn!("Photo {}: {}", photo.photo_id, reason);
                    stats.record_error(photo.photo_id, reason);
                    continue;
                }
            };

            let mime = match validate_download(&bytes) {
                Ok(mime) => mime,
                Err(reason) => {
                    log::warn!("Photo {}: {}", photo.photo_id, reason);
                    stats.record_error(photo.photo_id, reason);
                    continue;
                }
            };

            match PhotoRepository::replace_with_inline(pool, photo.photo_id, mime, &bytes).await {
                Ok(()) => {
                    log::info!("Photo {} migrated ({} bytes, {})", photo.photo_id, bytes.len(), mime);
                    stats.record_success();
                }
                Err(e) => stats.record_error(photo.photo_id, e.public_message()),
            }
        }

        stats.finish(photos.last().map(|p| p.photo_id));

        log::info!(
            "Migration batch done: {} migrated, {} failed",
            stats.success_count,
            stats.error_count
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::media::tests::png_bytes;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    #[test]
    fn test_batch_limit() {
        assert_eq!(PhotoService::batch_limit(None, 10), 10);
        assert_eq!(PhotoService::batch_limit(Some(25), 10), 25);
        assert_eq!(PhotoService::batch_limit(Some(0), 10), 10);
        assert_eq!(PhotoService::batch_limit(Some(-3), 10), 10);
        assert_eq!(PhotoService::batch_limit(Some(5000), 10), MAX_MIGRATION_BATCH);
    }

    #[test]
    fn test_decode_inputs() {
        let bytes = png_bytes(64);

        let from_json = PhotoService::decode(PhotoInput::Base64(STANDARD.encode(&bytes))).unwrap();
        let from_upload = PhotoService::decode(PhotoInput::Upload(bytes.clone())).unwrap();

        assert_eq!(from_json, from_upload);
        assert!(PhotoService::decode(PhotoInput::Upload(b"plain text".to_vec())).is_err());
    }

    #[tokio::test]
    async fn test_inline_storage_keeps_bytes() {
        let config = Config::for_tests();
        let file_host = FileHostClient::new(&config).unwrap();
        let image = DecodedImage {
            mime: "image/png".to_string(),
            bytes: png_bytes(40),
        };

        let source = PhotoService::to_source(PhotoStorage::Inline, &file_host, image.clone())
            .await
            .unwrap();

        assert_eq!(
            source,
            PhotoSource::Inline {
                mime: image.mime,
                bytes: image.bytes
            }
        );
    }

    #[tokio::test]
    async fn test_hosted_storage_upload_failure_is_reported() {
        let config = Config::for_tests();
        let file_host = FileHostClient::new(&config).unwrap();
        let image = DecodedImage {
            mime: "image/png".to_string(),
            bytes: png_bytes(40),
        };

        let result = PhotoService::to_source(PhotoStorage::Hosted, &file_host, image).await;
        assert!(matches!(result, Err(RestroomError::ExternalApiError(_))));
    }
}
