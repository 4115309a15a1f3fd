// src/models/review.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::errors::RestroomError;

/// Date format used in every response
pub const REVIEW_DATE_FORMAT: &str = "%Y-%m-%d";

/// Restroom review
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Review {
    pub review_id: i32,
    pub restroom_id: i32,
    pub user_id: i32,
    pub rating: f64,
    pub comment: String,
    pub review_date: NaiveDate,
}

/// Insert payload for a new review
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub restroom_id: i32,
    pub user_id: i32,
    pub rating: f64,
    pub comment: String,
    pub review_date: NaiveDate,
}

/// A JSON field that may arrive as a number or as a numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(serde_json::Number),
    Text(String),
}

impl Default for LooseNumber {
    fn default() -> Self {
        LooseNumber::Text(String::new())
    }
}

impl LooseNumber {
    fn as_text(&self) -> String {
        match self {
            LooseNumber::Number(n) => n.to_string(),
            LooseNumber::Text(s) => s.trim().to_string(),
        }
    }
}

/// Body of POST /review/base64
#[derive(Debug, Clone, Deserialize)]
pub struct Base64ReviewRequest {
    #[serde(default)]
    pub restroom_id: LooseNumber,
    #[serde(default)]
    pub user_id: LooseNumber,
    #[serde(default)]
    pub rating: LooseNumber,
    #[serde(default)]
    pub comment: String,
    /// Base64 image, with or without a `data:<mime>;base64,` prefix
    #[serde(default)]
    pub photo_base64: Option<String>,
}

impl Base64ReviewRequest {
    pub fn fields(&self) -> ReviewFields {
        ReviewFields {
            restroom_id: self.restroom_id.as_text(),
            user_id: self.user_id.as_text(),
            rating: self.rating.as_text(),
            comment: self.comment.clone(),
        }
    }
}

/// Raw review fields as received from a form or JSON body
#[derive(Debug, Clone, Default)]
pub struct ReviewFields {
    pub restroom_id: String,
    pub user_id: String,
    pub rating: String,
    pub comment: String,
}

/// Review fields after coercion
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ReviewInput {
    #[validate(range(min = 1, message = "Invalid restroom ID"))]
    pub restroom_id: i32,
    #[validate(range(min = 1, message = "Invalid user ID"))]
    pub user_id: i32,
    pub rating: f64,
    pub comment: String,
}

impl ReviewFields {
    /// Coerce and validate; any failure is a bad request
    pub fn parse(&self) -> Result<ReviewInput, RestroomError> {
        let restroom_id = self
            .restroom_id
            .trim()
            .parse::<i32>()
            .map_err(|_| RestroomError::InvalidInput("Invalid restroom ID".to_string()))?;

        let user_id = self
            .user_id
            .trim()
            .parse::<i32>()
            .map_err(|_| RestroomError::InvalidInput("Invalid user ID".to_string()))?;

        let rating = self
            .rating
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite())
            .ok_or_else(|| RestroomError::InvalidInput("Invalid rating".to_string()))?;

        let input = ReviewInput {
            restroom_id,
            user_id,
            rating,
            comment: self.comment.clone(),
        };

        input
            .validate()
            .map_err(|e| RestroomError::ValidationError(e.to_string()))?;

        Ok(input)
    }
}

/// Response of both review submission endpoints
/// DOCUMENTATION: `error_image` is set when the photo could not be decoded
/// or uploaded, `error_db` when the photo row could not be written. The
/// review itself is saved in both cases.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSubmissionResponse {
    pub message: String,
    pub review_id: i32,
    pub restroom_id: i32,
    pub user_id: i32,
    pub rating: f64,
    pub comment: String,
    /// Building name of the reviewed restroom
    pub name: String,
    /// Full name of the reviewer
    pub username: String,
    pub photo_url: String,
    pub review_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_db: Option<String>,
}

/// Review as shown inside GET /restrooms/details
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewDetail {
    pub review_id: i32,
    pub restroom_id: i32,
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub rating: f64,
    pub comment: String,
    pub review_date: String,
}

/// Row of the admin review listing query
#[derive(Debug, Clone, FromRow)]
pub struct AdminReviewRow {
    pub review_id: i32,
    pub restroom_id: i32,
    pub user_id: i32,
    pub rating: f64,
    pub comment: String,
    pub review_date: NaiveDate,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub building_name: String,
    pub floor: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminReviewResponse {
    pub review_id: i32,
    pub restroom_id: i32,
    pub user_id: i32,
    pub rating: f64,
    pub comment: String,
    pub review_date: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub building_name: String,
    pub floor: i32,
    /// First photo attached to the review
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl AdminReviewRow {
    pub fn into_response(self, photo_url: Option<String>) -> AdminReviewResponse {
        AdminReviewResponse {
            review_id: self.review_id,
            restroom_id: self.restroom_id,
            user_id: self.user_id,
            rating: self.rating,
            comment: self.comment,
            review_date: self.review_date.format(REVIEW_DATE_FORMAT).to_string(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            building_name: self.building_name,
            floor: self.floor,
            photo_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteReviewResponse {
    pub message: String,
    pub review_id: i32,
}
