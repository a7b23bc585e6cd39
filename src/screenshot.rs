//! Progress screenshots posted by the home page.
//!
//! Not hardened: the mime type is ignored, the bytes are not checked to be an
//! image, there is no size limit, and two uploads within the same second
//! overwrite each other.

use crate::errors::AppError;
use base64::{engine::general_purpose::STANDARD as B64, Engine};
use chrono::{DateTime, Local};
use std::{env, path::Path, path::PathBuf};
use tokio::fs;

pub fn resolve_screenshot_dir() -> PathBuf {
    if let Ok(path) = env::var("APP_SCREENSHOT_DIR") {
        return PathBuf::from(path);
    }

    PathBuf::from("media/screenshots")
}

/// Splits `data:<mime>;base64,<payload>` and decodes the payload.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, AppError> {
    let (_, payload) = data_url
        .split_once(',')
        .ok_or_else(|| AppError::bad_request("image must be a data URL"))?;
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(AppError::bad_request("image data is empty"));
    }

    B64.decode(payload)
        .map_err(|err| AppError::bad_request(format!("image is not valid base64: {err}")))
}

pub fn screenshot_filename(now: DateTime<Local>) -> String {
    format!("progress_{}.png", now.format("%Y%m%d_%H%M%S"))
}

/// Writes the bytes into `dir` (created if needed) and returns the file name.
pub async fn save_screenshot(
    dir: &Path,
    bytes: &[u8],
    now: DateTime<Local>,
) -> Result<String, AppError> {
    fs::create_dir_all(dir).await?;
    let filename = screenshot_filename(now);
    fs::write(dir.join(&filename), bytes).await?;
    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::TimeZone;

    #[test]
    fn decodes_payload_after_comma() {
        let bytes = decode_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn missing_comma_is_client_error() {
        let err = decode_data_url("data:image/png;base64").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn bad_base64_is_client_error() {
        let err = decode_data_url("data:image/png;base64,@@not base64@@").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn empty_payload_is_client_error() {
        let err = decode_data_url("data:image/png;base64,").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn filename_uses_local_timestamp() {
        let now = Local.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(screenshot_filename(now), "progress_20260304_050607.png");
    }

    #[tokio::test]
    async fn save_creates_directory_and_writes_bytes() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("shots");
        let now = Local.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();

        let name = save_screenshot(&dir, b"png-bytes", now).await.unwrap();
        assert_eq!(name, "progress_20260304_050607.png");
        assert_eq!(std::fs::read(dir.join(&name)).unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn same_second_overwrites() {
        let root = tempfile::tempdir().unwrap();
        let now = Local.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();

        let first = save_screenshot(root.path(), b"first", now).await.unwrap();
        let second = save_screenshot(root.path(), b"second", now).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(std::fs::read(root.path().join(&first)).unwrap(), b"second");
    }
}
