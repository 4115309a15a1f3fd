// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod auth_service;
pub mod file_host_client;
pub mod google_identity_client;
pub mod media;
pub mod photo_service;
pub mod restroom_service;
pub mod review_service;

pub use auth_service::*;
pub use file_host_client::*;
pub use google_identity_client::*;
pub use photo_service::*;
pub use restroom_service::*;
pub use review_service::*;
