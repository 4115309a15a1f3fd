// src/models/restroom.rs
// DOCUMENTATION: Restroom records and the nested details document
// PURPOSE: Maps the restrooms table and shapes GET /restrooms/details

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{PhotoResponse, ReviewDetail};

/// A restroom as stored in the restrooms table
/// DOCUMENTATION: Created by the seed binary, read-only through the API.
/// Coordinates are kept as text exactly as surveyed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Restroom {
    pub restroom_id: i32,
    pub building_name: String,
    pub floor: i32,

    /// Men's room available
    pub is_men: bool,
    /// Women's room available
    pub is_women: bool,
    /// Wheelchair accessible stall
    pub is_accessible: bool,
    /// Bidet sprayer installed
    pub is_bum_gun: bool,
    pub is_toilet_paper: bool,
    /// No fee to enter
    pub is_free: bool,

    pub latitude: String,
    pub longitude: String,
    pub faculty_name: Option<String>,

    pub opening_hours_monday: Option<String>,
    pub opening_hours_tuesday: Option<String>,
    pub opening_hours_wednesday: Option<String>,
    pub opening_hours_thursday: Option<String>,
    pub opening_hours_friday: Option<String>,
    pub opening_hours_saturday: Option<String>,
    pub opening_hours_sunday: Option<String>,
}

/// One review inside the details document, with its photos
#[derive(Debug, Clone, Serialize)]
pub struct ReviewWithPhotos {
    pub review: ReviewDetail,
    pub photos: Vec<PhotoResponse>,
}

/// One entry of GET /restrooms/details
#[derive(Debug, Clone, Serialize)]
pub struct RestroomDetails {
    pub restroom: Restroom,
    pub restroom_photos: Vec<PhotoResponse>,
    pub reviews: Vec<ReviewWithPhotos>,
}
