use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::multipart;
use serde::Serialize;

use super::err::AppError;

/// 4 MiB cap on student photos.
pub const MAX_IMAGE_BYTES: u64 = 4 * 1024 * 1024;

/// What the webview renders after an upload settles: a usable url, or an
/// inline message. Invalid files never raise, they only set `error`.
#[derive(Debug, Serialize)]
pub struct UploadOutcome {
    pub url: Option<String>,
    pub error: Option<String>,
}

impl UploadOutcome {
    pub fn url(url: String) -> Self {
        Self {
            url: Some(url),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            url: None,
            error: Some(message.into()),
        }
    }
}

/// Declared media type of a picked file, derived from its extension.
pub fn media_type_of(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("txt") => "text/plain",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Shared by the picker and drag-and-drop paths; runs before any
/// acquisition attempt.
pub fn validate(media_type: &str, size: u64) -> Result<(), AppError> {
    if !media_type.starts_with("image/") {
        return Err(AppError::InvalidImage(
            "Please upload an image file".to_string(),
        ));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(AppError::InvalidImage(
            "File size must be less than 4MB".to_string(),
        ));
    }
    Ok(())
}

/// The injected acquisition backend. `Local` mimics the original demo's
/// ephemeral blob url; `Hosted` posts to an upload service and hands back
/// a durable url. Picking one is a configuration concern.
pub enum Acquirer {
    Local { uploads_dir: PathBuf },
    Hosted { http: reqwest::Client, endpoint: String },
}

impl Acquirer {
    /// Turn a locally selected file into a usable photo url.
    /// Single attempt, validation first.
    pub async fn acquire(&self, file: &Path) -> Result<String, AppError> {
        let metadata = tokio::fs::metadata(file).await?;
        validate(media_type_of(file), metadata.len())?;

        match self {
            Acquirer::Local { uploads_dir } => acquire_local(uploads_dir, file).await,
            Acquirer::Hosted { http, endpoint } => acquire_hosted(http, endpoint, file).await,
        }
    }
}

async fn acquire_local(uploads_dir: &Path, file: &Path) -> Result<String, AppError> {
    tokio::fs::create_dir_all(uploads_dir).await?;
    let file_name = file
        .file_name()
        .ok_or_else(|| AppError::InvalidImage("Please upload an image file".to_string()))?;

    // unique prefix so re-uploading the same file never collides
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let target = uploads_dir.join(format!("{}-{}", stamp, file_name.to_string_lossy()));
    tokio::fs::copy(file, &target).await?;

    log::info!("stored photo at {}", target.display());
    Ok(format!("file://{}", target.to_string_lossy()))
}

async fn acquire_hosted(
    http: &reqwest::Client,
    endpoint: &str,
    file: &Path,
) -> Result<String, AppError> {
    let bytes = tokio::fs::read(file).await?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());

    let part = multipart::Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(media_type_of(file))?;
    let form = multipart::Form::new().part("file", part);

    let response = http.post(endpoint).multipart(form).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Status {
            op: "upload image",
            status: status.as_u16(),
        });
    }

    let body: serde_json::Value = response.json().await?;
    body.get("url")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::UploadResponse("missing url field".to_string()))
}
