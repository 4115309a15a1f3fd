// src/services/file_host_client.rs
// DOCUMENTATION: Third-party file host client
// PURPOSE: Upload photos to the hosted folder and download hosted photos

use crate::config::Config;
use crate::errors::RestroomError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// File host API client
/// DOCUMENTATION: Uploads use the Drive v3 `multipart/related` format: a
/// JSON metadata part followed by the media part. The destination folder is
/// expected to be publicly readable.
pub struct FileHostClient {
    /// Client for uploads
    client: Client,
    /// Client with a fixed timeout for downloads
    download_client: Client,
    upload_url: String,
    access_token: String,
    folder_id: String,
    public_url_prefix: String,
}

#[derive(Debug, Serialize)]
struct UploadMetadata<'a> {
    name: String,
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parents: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
}

fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/x-icon" => "ico",
        _ => "jpg",
    }
}

impl FileHostClient {
    pub fn new(config: &Config) -> Result<Self, RestroomError> {
        let download_client = Client::builder()
            .timeout(Duration::from_secs(config.download_timeout_secs))
            .build()
            .map_err(|e| RestroomError::ExternalApiError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client: Client::new(),
            download_client,
            upload_url: config.file_host_upload_url.clone(),
            access_token: config.file_host_access_token.clone(),
            folder_id: config.file_host_folder_id.clone(),
            public_url_prefix: config.file_host_public_url_prefix.clone(),
        })
    }

    /// Build a `multipart/related` body; returns (boundary, body)
    fn related_body(&self, bytes: &[u8], mime: &str) -> Result<(String, Vec<u8>), RestroomError> {
        let boundary = format!("restroom-photo-{}", Uuid::new_v4().simple());

        let metadata = UploadMetadata {
            name: format!("review_{}.{}", Uuid::new_v4(), extension_for(mime)),
            mime_type: mime,
            parents: if self.folder_id.is_empty() {
                Vec::new()
            } else {
                vec![self.folder_id.as_str()]
            },
        };
        let metadata_json = serde_json::to_vec(&metadata)
            .map_err(|e| RestroomError::PhotoError(format!("metadata encoding: {}", e)))?;

        let mut body = Vec::with_capacity(bytes.len() + metadata_json.len() + 256);
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
        body.extend_from_slice(&metadata_json);
        body.extend_from_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        Ok((boundary, body))
    }

    /// Upload image bytes and return the public link
    pub async fn upload(&self, bytes: &[u8], mime: &str) -> Result<String, RestroomError> {
        let (boundary, body) = self.related_body(bytes, mime)?;

        log::debug!("Uploading {} bytes ({}) to file host", bytes.len(), mime);

        let response = self
            .client
            .post(&self.upload_url)
            .bearer_auth(&self.access_token)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| {
                log::error!("File host upload request failed: {}", e);
                RestroomError::ExternalApiError(format!("Upload failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("File host upload error {}: {}", status, body);
            return Err(RestroomError::ExternalApiError(format!(
                "Upload error {}",
                status
            )));
        }

        let uploaded: UploadResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse file host response: {}", e);
            RestroomError::ExternalApiError(format!("Parse error: {}", e))
        })?;

        let url = format!("{}{}", self.public_url_prefix, uploaded.id);
        log::info!("Uploaded photo to file host: {}", url);
        Ok(url)
    }

    /// Download a hosted photo; the error string is reported per photo
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, String> {
        let response = self
            .download_client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("download failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("download failed: HTTP {}", response.status().as_u16()));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| format!("reading download failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_folder(folder: &str) -> FileHostClient {
        let mut config = Config::for_tests();
        config.file_host_folder_id = folder.to_string();
        FileHostClient::new(&config).unwrap()
    }

    #[test]
    fn test_related_body_layout() {
        let client = client_with_folder("folder-42");
        let (boundary, body) = client.related_body(b"IMAGEBYTES", "image/png").unwrap();
        let text = String::from_utf8_lossy(&body);

        assert!(text.starts_with(&format!("--{}\r\n", boundary)));
        assert!(text.contains("\"parents\":[\"folder-42\"]"));
        assert!(text.contains("\"mimeType\":\"image/png\""));
        assert!(text.contains(".png\""));
        assert!(text.contains("Content-Type: image/png\r\n\r\nIMAGEBYTES\r\n"));
        assert!(text.ends_with(&format!("\r\n--{}--\r\n", boundary)));
    }

    #[test]
    fn test_related_body_without_folder() {
        let client = client_with_folder("");
        let (_, body) = client.related_body(b"x", "image/jpeg").unwrap();
        let text = String::from_utf8_lossy(&body);

        assert!(!text.contains("parents"));
        assert!(text.contains(".jpg\""));
    }

    #[tokio::test]
    async fn test_download_unreachable_host_reports_error() {
        let client = client_with_folder("");
        let result = client.download("http://127.0.0.1:9/photo.jpg").await;

        assert!(result.unwrap_err().starts_with("download failed"));
    }
}
