// src/models/photo.rs

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

/// Where the image bytes of a photo live
/// DOCUMENTATION: Persisted with an explicit `kind` column ("inline" or
/// "hosted"); turned into a URI only when sent to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoSource {
    /// Image bytes stored in the database
    Inline { mime: String, bytes: Vec<u8> },
    /// Image kept on the file host, only its public link is stored
    Hosted { url: String },
}

impl PhotoSource {
    pub const INLINE: &'static str = "inline";
    pub const HOSTED: &'static str = "hosted";

    pub fn kind(&self) -> &'static str {
        match self {
            PhotoSource::Inline { .. } => Self::INLINE,
            PhotoSource::Hosted { .. } => Self::HOSTED,
        }
    }

    /// Data URL for inline photos, the stored link for hosted ones
    pub fn to_uri(&self) -> String {
        match self {
            PhotoSource::Inline { mime, bytes } => {
                format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
            }
            PhotoSource::Hosted { url } => url.clone(),
        }
    }
}

/// The single row a photo belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoOwner {
    Restroom(i32),
    Review(i32),
}

impl PhotoOwner {
    /// (photo_restroom, photo_review) column values
    pub fn columns(&self) -> (Option<i32>, Option<i32>) {
        match *self {
            PhotoOwner::Restroom(id) => (Some(id), None),
            PhotoOwner::Review(id) => (None, Some(id)),
        }
    }

    /// Rebuild the owner from the two nullable columns; None unless exactly one is set
    pub fn from_columns(restroom: Option<i32>, review: Option<i32>) -> Option<Self> {
        match (restroom, review) {
            (Some(id), None) => Some(PhotoOwner::Restroom(id)),
            (None, Some(id)) => Some(PhotoOwner::Review(id)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub photo_id: i32,
    pub source: PhotoSource,
    pub owner: PhotoOwner,
}

/// Photo DTO for API responses
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PhotoResponse {
    pub photo_id: i32,
    pub kind: &'static str,
    /// Data URL or hosted link, usable directly as an image source; the
    /// frontend reads it as `base64`
    #[serde(rename = "base64")]
    pub url: String,
    pub photo_restroom: Option<i32>,
    pub photo_review: Option<i32>,
}

impl Photo {
    pub fn to_response(&self) -> PhotoResponse {
        let (photo_restroom, photo_review) = self.owner.columns();
        PhotoResponse {
            photo_id: self.photo_id,
            kind: self.source.kind(),
            url: self.source.to_uri(),
            photo_restroom,
            photo_review,
        }
    }
}

/// Body of GET /admin/migratePhotos
#[derive(Debug, Serialize)]
pub struct MigrationPreview {
    pub message: String,
    pub count: i64,
    pub note: String,
}

/// Result of one migration batch
/// DOCUMENTATION: Each call handles one page; callers repeat until `total` is 0
#[derive(Debug, Clone, Serialize)]
pub struct MigrationStats {
    pub message: String,
    pub total: usize,
    pub success_count: u32,
    pub error_count: u32,
    /// "ID <photo_id>: <reason>" per failed photo
    pub errors: Vec<String>,
    /// Highest photo id looked at; pass it back as `after_id` to move past
    /// photos that failed
    pub next_after_id: Option<i32>,
    pub remaining_info: String,
}

impl MigrationStats {
    pub fn new(total: usize) -> Self {
        Self {
            message: if total == 0 {
                "No hosted photos left to migrate".to_string()
            } else {
                "Photo migration batch finished".to_string()
            },
            total,
            success_count: 0,
            error_count: 0,
            errors: Vec::new(),
            next_after_id: None,
            remaining_info: "Call this endpoint again to migrate the next batch".to_string(),
        }
    }

    /// Record the last photo of the batch
    pub fn finish(&mut self, last_photo_id: Option<i32>) {
        self.next_after_id = last_photo_id;
        if let (Some(id), true) = (last_photo_id, self.error_count > 0) {
            self.remaining_info = format!(
                "Failed photos stay hosted; call again with after_id={} to skip them",
                id
            );
        }
    }

    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_error(&mut self, photo_id: i32, reason: impl std::fmt::Display) {
        self.error_count += 1;
        self.errors.push(format!("ID {}: {}", photo_id, reason));
    }
}
