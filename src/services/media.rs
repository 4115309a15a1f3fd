// src/services/media.rs
// DOCUMENTATION: Image payload helpers
// PURPOSE: Decode inbound base64/data URL payloads and sniff image types

use crate::errors::RestroomError;
use base64::{
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
    Engine as _,
};

/// Assumed type for bare base64 payloads whose bytes are not recognised
pub const FALLBACK_IMAGE_MIME: &str = "image/jpeg";

/// Downloaded photos smaller than this are treated as broken
pub const MIN_IMAGE_BYTES: usize = 100;

/// Raw image bytes and their MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Signature table: (prefix, mime)
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"\x89PNG\r\n\x1A\n", "image/png"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"BM", "image/bmp"),
    (b"\x00\x00\x01\x00", "image/x-icon"),
    (b"\x00\x00\x02\x00", "image/x-icon"),
];

/// Detect an image MIME type from magic bytes
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() >= 14 && &bytes[0..4] == b"RIFF" && &bytes[8..14] == b"WEBPVP" {
        return Some("image/webp");
    }

    SIGNATURES
        .iter()
        .find(|(magic, _)| bytes.starts_with(magic))
        .map(|(_, mime)| *mime)
}

/// Content type of arbitrary bytes, images only are named precisely
pub fn detect_content_type(bytes: &[u8]) -> &'static str {
    if let Some(mime) = sniff_image_mime(bytes) {
        return mime;
    }
    if std::str::from_utf8(bytes).is_ok() {
        "text/plain; charset=utf-8"
    } else {
        "application/octet-stream"
    }
}

fn decode_base64(payload: &str) -> Result<Vec<u8>, RestroomError> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    STANDARD
        .decode(&compact)
        .or_else(|_| STANDARD_NO_PAD.decode(&compact))
        .map_err(|e| RestroomError::PhotoError(format!("invalid base64 payload: {}", e)))
}

/// Decode a `photo_base64` value
/// DOCUMENTATION: Accepts either a bare base64 string or a
/// `data:<mime>;base64,<payload>` URL. The MIME type comes from the prefix
/// when present, otherwise from the decoded bytes, otherwise image/jpeg.
pub fn decode_image_payload(input: &str) -> Result<DecodedImage, RestroomError> {
    let input = input.trim();

    let (declared_mime, payload) = match input.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest.split_once(',').ok_or_else(|| {
                RestroomError::PhotoError("data URL has no payload".to_string())
            })?;
            let mime = header.strip_suffix(";base64").ok_or_else(|| {
                RestroomError::PhotoError("only base64 data URLs are supported".to_string())
            })?;
            (Some(mime.trim().to_ascii_lowercase()), payload)
        }
        None => (None, input),
    };

    let bytes = decode_base64(payload)?;
    if bytes.is_empty() {
        return Err(RestroomError::PhotoError("image payload is empty".to_string()));
    }

    let mime = match declared_mime {
        Some(mime) if mime.starts_with("image/") => mime,
        Some(mime) => {
            return Err(RestroomError::PhotoError(format!(
                "unsupported content type: {}",
                mime
            )))
        }
        None => sniff_image_mime(&bytes)
            .unwrap_or(FALLBACK_IMAGE_MIME)
            .to_string(),
    };

    Ok(DecodedImage { mime, bytes })
}

/// Accept an uploaded file if its bytes look like an image
pub fn image_from_upload(bytes: Vec<u8>) -> Result<DecodedImage, RestroomError> {
    if bytes.is_empty() {
        return Err(RestroomError::PhotoError("uploaded file is empty".to_string()));
    }

    match sniff_image_mime(&bytes) {
        Some(mime) => Ok(DecodedImage {
            mime: mime.to_string(),
            bytes,
        }),
        None => Err(RestroomError::PhotoError(format!(
            "uploaded file is not an image (detected {})",
            detect_content_type(&bytes)
        ))),
    }
}

/// Check a downloaded photo before it replaces a hosted link
pub fn validate_download(bytes: &[u8]) -> Result<&'static str, String> {
    let content_type = detect_content_type(bytes);

    if bytes.len() < MIN_IMAGE_BYTES || !content_type.starts_with("image/") {
        return Err(format!(
            "invalid image or too small ({} bytes, {})",
            bytes.len(),
            content_type
        ));
    }

    Ok(content_type)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Smallest valid-looking PNG header padded to `len` bytes
    pub(crate) fn png_bytes(len: usize) -> Vec<u8> {
        let mut bytes = b"\x89PNG\r\n\x1A\n".to_vec();
        bytes.resize(len.max(8), 0x42);
        bytes
    }

    #[test]
    fn test_sniff_signatures() {
        assert_eq!(sniff_image_mime(&png_bytes(16)), Some("image/png"));
        assert_eq!(sniff_image_mime(b"\xFF\xD8\xFF\xE0rest"), Some("image/jpeg"));
        assert_eq!(sniff_image_mime(b"GIF89a...."), Some("image/gif"));
        assert_eq!(sniff_image_mime(b"RIFF\x00\x00\x00\x00WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_image_mime(b"<html></html>"), None);
        assert_eq!(detect_content_type(b"<html></html>"), "text/plain; charset=utf-8");
        assert_eq!(detect_content_type(&[0xC3, 0x28]), "application/octet-stream");
    }

    #[test]
    fn test_bare_base64_is_sniffed() {
        let bytes = png_bytes(32);
        let decoded = decode_image_payload(&STANDARD.encode(&bytes)).unwrap();

        assert_eq!(decoded.mime, "image/png");
        assert_eq!(decoded.bytes, bytes);
    }

    #[test]
    fn test_bare_unknown_base64_defaults_to_jpeg() {
        let decoded = decode_image_payload(&STANDARD.encode(b"not magic at all")).unwrap();
        assert_eq!(decoded.mime, FALLBACK_IMAGE_MIME);
    }

    #[test]
    fn test_data_url_keeps_declared_type_and_bytes() {
        let bytes = vec![1u8, 2, 3, 250, 251, 252];
        let url = format!("data:image/webp;base64,{}", STANDARD.encode(&bytes));
        let decoded = decode_image_payload(&url).unwrap();

        assert_eq!(decoded.mime, "image/webp");
        assert_eq!(decoded.bytes, bytes);
    }

    #[test]
    fn test_whitespace_and_missing_padding_tolerated() {
        let decoded = decode_image_payload("AQID\nBA").unwrap();
        assert_eq!(decoded.bytes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_bad_payloads_rejected() {
        assert!(decode_image_payload("data:image/png,plain").is_err());
        assert!(decode_image_payload("data:image/png;base64").is_err());
        assert!(decode_image_payload("data:text/html;base64,PGI+").is_err());
        assert!(decode_image_payload("!!!not base64!!!").is_err());
        assert!(decode_image_payload("").is_err());
    }

    #[test]
    fn test_upload_must_be_image() {
        assert_eq!(image_from_upload(png_bytes(20)).unwrap().mime, "image/png");
        assert!(image_from_upload(b"hello".to_vec()).is_err());
        assert!(image_from_upload(Vec::new()).is_err());
    }

    #[test]
    fn test_validate_download_boundaries() {
        assert!(validate_download(&png_bytes(99)).is_err());
        assert_eq!(validate_download(&png_bytes(100)), Ok("image/png"));

        let html = vec![b'a'; 500];
        assert!(validate_download(&html).is_err());
    }
}
