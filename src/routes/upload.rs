/**
 * Upload Routes
 * Image intake for project covers, article images, and profile photos
 */
use axum::{extract::Multipart, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::ApiError;

const UPLOAD_DIR: &str = "uploads";
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024; // 5MB
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
    pub size: usize,
    pub mime_type: String,
}

fn validate_image_magic_bytes(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() < 4 {
        return None;
    }
    match bytes {
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        // GIF: 47 49 46 38
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        // WebP: 52 49 46 46 ... 57 45 42 50
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        _ => None,
    }
}

fn get_extension_from_mime(mime: &str) -> &str {
    match mime {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

/// POST /api/upload - Store one image and return its public URL (auth required).
/// The first multipart field wins; the stored name is generated server-side
/// so client filenames never reach the filesystem.
pub async fn upload_image(
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let upload_path = PathBuf::from(UPLOAD_DIR);
    tokio::fs::create_dir_all(&upload_path)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to create upload directory: {}", e)))?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart data: {}", e)))?
        .ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;

    // The client extension is only used as a first filter; content decides.
    let original_name = field.file_name().unwrap_or("unknown").to_string();
    let original_ext = original_name
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_lowercase();

    if !ALLOWED_EXTENSIONS.contains(&original_ext.as_str()) {
        return Err(ApiError::BadRequest(
            "Unsupported file type. Allowed: JPEG, PNG, WebP, GIF.".to_string(),
        ));
    }

    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {}", e)))?;

    if bytes.len() > MAX_FILE_SIZE {
        return Err(ApiError::BadRequest(
            "File too large. Maximum size is 5MB.".to_string(),
        ));
    }

    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Empty file".to_string()));
    }

    let mime_type = validate_image_magic_bytes(&bytes).ok_or_else(|| {
        ApiError::BadRequest("File content does not match an allowed image type.".to_string())
    })?;

    let ext = get_extension_from_mime(mime_type);
    let filename = format!("{}.{}", Uuid::new_v4(), ext);
    let file_path = upload_path.join(&filename);

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to save file: {}", e)))?;

    let url = format!("/uploads/{}", filename);
    tracing::info!("Image uploaded: {} ({} bytes)", filename, bytes.len());

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            url,
            filename,
            size: bytes.len(),
            mime_type: mime_type.to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;

    #[test]
    fn test_magic_bytes_detection() {
        assert_eq!(
            validate_image_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some("image/jpeg")
        );
        assert_eq!(
            validate_image_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            Some("image/png")
        );
        assert_eq!(
            validate_image_magic_bytes(&[0x47, 0x49, 0x46, 0x38, 0x39, 0x61]),
            Some("image/gif")
        );
        assert_eq!(
            validate_image_magic_bytes(&[
                0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50
            ]),
            Some("image/webp")
        );
    }

    #[test]
    fn test_magic_bytes_rejects_non_images() {
        assert_eq!(validate_image_magic_bytes(b"plain text file"), None);
        assert_eq!(validate_image_magic_bytes(&[0xFF, 0xD8]), None);
        assert_eq!(validate_image_magic_bytes(&[]), None);
        // RIFF container that is not WebP (e.g. WAV)
        assert_eq!(
            validate_image_magic_bytes(&[
                0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x41, 0x56, 0x45
            ]),
            None
        );
    }

    #[test]
    fn test_extension_from_mime() {
        assert_eq!(get_extension_from_mime("image/jpeg"), "jpg");
        assert_eq!(get_extension_from_mime("image/webp"), "webp");
        assert_eq!(get_extension_from_mime("application/pdf"), "bin");
    }

    #[tokio::test]
    async fn test_upload_requires_token() {
        let app = Router::new()
            .route("/api/upload", post(upload_image))
            .layer(axum::middleware::from_fn(crate::routes::auth::require_admin));
        let req = Request::post("/api/upload").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
