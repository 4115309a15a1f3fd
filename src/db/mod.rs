// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod photo_repository;
pub mod restroom_repository;
pub mod review_repository;
pub mod schema;
pub mod user_repository;

pub use photo_repository::*;
pub use restroom_repository::*;
pub use review_repository::*;
pub use schema::*;
pub use user_repository::*;
