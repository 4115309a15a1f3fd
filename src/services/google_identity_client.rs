// src/services/google_identity_client.rs
// DOCUMENTATION: Google ID token verification client
// PURPOSE: Resolve the email and name behind a token issued to the frontend

use crate::errors::RestroomError;
use reqwest::Client;
use serde::Deserialize;

/// Google token introspection client
/// DOCUMENTATION: One GET per sign-in against the tokeninfo endpoint. No
/// session is created; the frontend keeps the Google token.
pub struct GoogleIdentityClient {
    /// HTTP client for making requests
    client: Client,
    /// Introspection endpoint
    tokeninfo_url: String,
    /// Expected audience, if configured
    client_id: Option<String>,
}

/// Claims returned by the tokeninfo endpoint
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GoogleTokenInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub family_name: String,
    /// OAuth client the token was issued to
    pub aud: Option<String>,
}

impl GoogleIdentityClient {
    pub fn new(tokeninfo_url: String, client_id: Option<String>) -> Self {
        Self {
            client: Client::new(),
            tokeninfo_url,
            client_id,
        }
    }

    /// Verify a Google ID token
    /// DOCUMENTATION: Transport failures and non-success statuses mean the
    /// token could not be verified and map to Unauthorized. A success body
    /// that cannot be parsed is an upstream failure.
    pub async fn verify_token(&self, token: &str) -> Result<GoogleTokenInfo, RestroomError> {
        log::debug!("Verifying Google ID token");

        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", token)])
            .send()
            .await
            .map_err(|e| {
                log::warn!("Google tokeninfo request failed: {}", e);
                RestroomError::Unauthorized
            })?;

        if !response.status().is_success() {
            log::warn!("Google tokeninfo rejected token: {}", response.status());
            return Err(RestroomError::Unauthorized);
        }

        let info: GoogleTokenInfo = response.json().await.map_err(|e| {
            log::error!("Failed to parse Google tokeninfo response: {}", e);
            RestroomError::ExternalApiError(format!("Parse error: {}", e))
        })?;

        self.check_claims(&info)?;
        Ok(info)
    }

    fn check_claims(&self, info: &GoogleTokenInfo) -> Result<(), RestroomError> {
        if info.email.trim().is_empty() {
            log::warn!("Google token has no email claim");
            return Err(RestroomError::Unauthorized);
        }

        if let Some(expected) = &self.client_id {
            if info.aud.as_deref() != Some(expected.as_str()) {
                log::warn!("Google token issued for another client: {:?}", info.aud);
                return Err(RestroomError::Unauthorized);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(email: &str, aud: Option<&str>) -> GoogleTokenInfo {
        GoogleTokenInfo {
            email: email.to_string(),
            given_name: "Malee".to_string(),
            family_name: "Suksan".to_string(),
            aud: aud.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_tokeninfo_body() {
        let body = r#"{
            "iss": "https://accounts.google.com",
            "aud": "client-1",
            "email": "malee@campus.test",
            "email_verified": "true",
            "given_name": "Malee",
            "family_name": "Suksan"
        }"#;
        let parsed: GoogleTokenInfo = serde_json::from_str(body).unwrap();

        assert_eq!(parsed, info("malee@campus.test", Some("client-1")));
    }

    #[test]
    fn test_audience_checked_when_configured() {
        let client = GoogleIdentityClient::new("http://unused".into(), Some("client-1".into()));

        assert!(client.check_claims(&info("a@b.c", Some("client-1"))).is_ok());
        assert!(matches!(
            client.check_claims(&info("a@b.c", Some("other"))),
            Err(RestroomError::Unauthorized)
        ));
        assert!(matches!(
            client.check_claims(&info("", Some("client-1"))),
            Err(RestroomError::Unauthorized)
        ));
    }

    #[test]
    fn test_audience_ignored_without_client_id() {
        let client = GoogleIdentityClient::new("http://unused".into(), None);
        assert!(client.check_claims(&info("a@b.c", None)).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unauthorized() {
        let client = GoogleIdentityClient::new("http://127.0.0.1:9/tokeninfo".into(), None);
        let result = client.verify_token("token").await;

        assert!(matches!(result, Err(RestroomError::Unauthorized)));
    }
}
