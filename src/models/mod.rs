// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod photo;
pub mod restroom;
pub mod review;
pub mod user;

pub use photo::*;
pub use restroom::*;
pub use review::*;
pub use user::*;
