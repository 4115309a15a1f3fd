// src/services/restroom_service.rs
// DOCUMENTATION: Business logic for restrooms
// PURPOSE: Restroom listing and the nested details read path

use crate::db::{PhotoRepository, RestroomRepository, ReviewRepository, UserRepository};
use crate::errors::RestroomError;
use crate::models::{
    Photo, PhotoOwner, Restroom, RestroomDetails, Review, ReviewDetail, ReviewWithPhotos, User,
};
use crate::services::review_service::format_date;
use sqlx::PgPool;
use std::collections::HashMap;

/// Author names used when a review's user row is missing
pub const UNKNOWN_FIRST_NAME: &str = "Unknown";
pub const UNKNOWN_LAST_NAME: &str = "User";

pub struct RestroomService;

impl RestroomService {
    pub async fn list_restrooms(pool: &PgPool) -> Result<Vec<Restroom>, RestroomError> {
        RestroomRepository::list_all(pool).await
    }

    /// Every restroom with its photos, reviews, review photos and authors
    /// DOCUMENTATION: Reads each table once and nests in memory. No paging,
    /// filtering or sorting beyond id order.
    pub async fn restroom_details(pool: &PgPool) -> Result<Vec<RestroomDetails>, RestroomError> {
        let restrooms = RestroomRepository::list_all(pool).await?;
        let reviews = ReviewRepository::list_all(pool).await?;
        let photos = PhotoRepository::list_all(pool).await?;
        let users = UserRepository::list_all(pool).await?;

        log::debug!(
            "Assembling details for {} restrooms, {} reviews, {} photos",
            restrooms.len(),
            reviews.len(),
            photos.len()
        );

        Ok(Self::assemble_details(restrooms, reviews, photos, users))
    }

    /// Nest reviews and photos under their restrooms
    pub fn assemble_details(
        restrooms: Vec<Restroom>,
        reviews: Vec<Review>,
        photos: Vec<Photo>,
        users: Vec<User>,
    ) -> Vec<RestroomDetails> {
        let mut restroom_photos: HashMap<i32, Vec<Photo>> = HashMap::new();
        let mut review_photos: HashMap<i32, Vec<Photo>> = HashMap::new();
        for photo in photos {
            match photo.owner {
                PhotoOwner::Restroom(id) => restroom_photos.entry(id).or_default().push(photo),
                PhotoOwner::Review(id) => review_photos.entry(id).or_default().push(photo),
            }
        }

        let mut reviews_by_restroom: HashMap<i32, Vec<Review>> = HashMap::new();
        for review in reviews {
            reviews_by_restroom
                .entry(review.restroom_id)
                .or_default()
                .push(review);
        }

        let users: HashMap<i32, User> = users.into_iter().map(|u| (u.user_id, u)).collect();

        restrooms
            .into_iter()
            .map(|restroom| {
                let reviews = reviews_by_restroom
                    .remove(&restroom.restroom_id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|review| {
                        let photos = review_photos
                            .remove(&review.review_id)
                            .unwrap_or_default()
                            .iter()
                            .map(Photo::to_response)
                            .collect();
                        ReviewWithPhotos {
                            review: Self::review_detail(&review, users.get(&review.user_id)),
                            photos,
                        }
                    })
                    .collect();

                RestroomDetails {
                    restroom_photos: restroom_photos
                        .remove(&restroom.restroom_id)
                        .unwrap_or_default()
                        .iter()
                        .map(Photo::to_response)
                        .collect(),
                    restroom,
                    reviews,
                }
            })
            .collect()
    }

    fn review_detail(review: &Review, author: Option<&User>) -> ReviewDetail {
        let (first_name, last_name) = match author {
            Some(user) => (user.first_name.clone(), user.last_name.clone()),
            None => {
                log::warn!(
                    "User {} of review {} not found",
                    review.user_id,
                    review.review_id
                );
                (
                    UNKNOWN_FIRST_NAME.to_string(),
                    UNKNOWN_LAST_NAME.to_string(),
                )
            }
        };

        ReviewDetail {
            review_id: review.review_id,
            restroom_id: review.restroom_id,
            user_id: review.user_id,
            first_name,
            last_name,
            rating: review.rating,
            comment: review.comment.clone(),
            review_date: format_date(review.review_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PhotoSource, ROLE_USER};
    use crate::services::media::decode_image_payload;
    use crate::services::media::tests::png_bytes;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use chrono::NaiveDate;

    fn restroom(id: i32, name: &str) -> Restroom {
        Restroom {
            restroom_id: id,
            building_name: name.to_string(),
            floor: 1,
            is_men: true,
            is_women: false,
            is_accessible: true,
            is_bum_gun: false,
            is_toilet_paper: true,
            is_free: true,
            latitude: "13.84".to_string(),
            longitude: "100.57".to_string(),
            faculty_name: Some("Engineering".to_string()),
            opening_hours_monday: None,
            opening_hours_tuesday: None,
            opening_hours_wednesday: None,
            opening_hours_thursday: None,
            opening_hours_friday: None,
            opening_hours_saturday: None,
            opening_hours_sunday: None,
        }
    }

    fn review(id: i32, restroom_id: i32, user_id: i32) -> Review {
        Review {
            review_id: id,
            restroom_id,
            user_id,
            rating: 4.0,
            comment: format!("review {}", id),
            review_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        }
    }

    fn hosted(id: i32, owner: PhotoOwner) -> Photo {
        Photo {
            photo_id: id,
            source: PhotoSource::Hosted {
                url: format!("https://drive.google.com/uc?id={}", id),
            },
            owner,
        }
    }

    fn user(id: i32) -> User {
        User {
            user_id: id,
            first_name: "Arthit".to_string(),
            last_name: "Wong".to_string(),
            email: format!("user{}@campus.test", id),
            role: ROLE_USER.to_string(),
        }
    }

    #[test]
    fn test_nesting() {
        let details = RestroomService::assemble_details(
            vec![restroom(1, "Library"), restroom(2, "Gym")],
            vec![review(10, 1, 7), review(11, 1, 7), review(12, 2, 7)],
            vec![
                hosted(100, PhotoOwner::Restroom(1)),
                hosted(101, PhotoOwner::Review(11)),
                hosted(102, PhotoOwner::Review(11)),
            ],
            vec![user(7)],
        );

        assert_eq!(details.len(), 2);
        assert_eq!(details[0].restroom.building_name, "Library");
        assert_eq!(details[0].restroom_photos.len(), 1);
        assert_eq!(details[0].reviews.len(), 2);
        assert!(details[0].reviews[0].photos.is_empty());
        assert_eq!(details[0].reviews[1].photos.len(), 2);
        assert_eq!(details[0].reviews[1].review.first_name, "Arthit");
        assert_eq!(details[0].reviews[1].review.review_date, "2025-01-15");

        assert!(details[1].restroom_photos.is_empty());
        assert_eq!(details[1].reviews.len(), 1);
    }

    #[test]
    fn test_missing_author_uses_placeholder() {
        let details = RestroomService::assemble_details(
            vec![restroom(1, "Library")],
            vec![review(10, 1, 99)],
            Vec::new(),
            Vec::new(),
        );

        let detail = &details[0].reviews[0].review;
        assert_eq!(detail.first_name, UNKNOWN_FIRST_NAME);
        assert_eq!(detail.last_name, UNKNOWN_LAST_NAME);
    }

    #[test]
    fn test_reviews_of_unknown_restrooms_are_dropped() {
        let details = RestroomService::assemble_details(
            vec![restroom(1, "Library")],
            vec![review(10, 5, 1)],
            Vec::new(),
            vec![user(1)],
        );

        assert!(details[0].reviews.is_empty());
    }

    #[test]
    fn test_inline_photo_round_trip() {
        let original = png_bytes(256);
        let submitted = format!("data:image/png;base64,{}", STANDARD.encode(&original));
        let decoded = decode_image_payload(&submitted).unwrap();

        let details = RestroomService::assemble_details(
            vec![restroom(1, "Library")],
            vec![review(10, 1, 1)],
            vec![Photo {
                photo_id: 1,
                source: PhotoSource::Inline {
                    mime: decoded.mime,
                    bytes: decoded.bytes,
                },
                owner: PhotoOwner::Review(10),
            }],
            vec![user(1)],
        );

        let url = &details[0].reviews[0].photos[0].url;
        let payload = url.strip_prefix("data:image/png;base64,").unwrap();
        assert_eq!(STANDARD.decode(payload).unwrap(), original);
    }
}
