// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod admin;
pub mod auth;
pub mod health;
pub mod restrooms;
pub mod reviews;

pub use admin::config as admin_config;
pub use auth::config as auth_config;
pub use health::config as health_config;
pub use restrooms::config as restrooms_config;
pub use reviews::config as reviews_config;

use crate::errors::RestroomError;
use actix_web::web;

/// JSON extractor settings shared by every route
/// Malformed or oversized bodies answer with the usual error envelope
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| RestroomError::InvalidInput(err.to_string()).into())
}

#[cfg(test)]
pub mod test_support {
    use super::json_config;
    use crate::config::db::lazy_test_pool;
    use crate::config::Config;
    use crate::services::{FileHostClient, GoogleIdentityClient};
    use actix_web::web;

    /// Application state for handler tests; the pool never connects
    pub fn test_data(cfg: &mut web::ServiceConfig) {
        let config = Config::for_tests();
        cfg.app_data(web::Data::new(lazy_test_pool(&config)))
            .app_data(web::Data::new(GoogleIdentityClient::new(
                config.google_tokeninfo_url.clone(),
                None,
            )))
            .app_data(web::Data::new(
                FileHostClient::new(&config).expect("file host client builds"),
            ))
            .app_data(json_config(config.max_body_bytes))
            .app_data(web::Data::new(config));
    }
}
