use std::env;

use super::err::AppError;

/// Base url of the mock record store used when nothing is configured.
pub const DEFAULT_STORE_URL: &str = "https://67dd033ce00db03c4069c5ee.mockapi.io/api/v1";

/// Which acquisition backend turns a picked file into a photo url.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadBackend {
    /// copy into the app data dir and hand back a file:// url
    Local,
    /// post to a hosted upload service and hand back a durable url
    Hosted,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_base_url: String,
    pub upload_backend: UploadBackend,
    pub upload_endpoint: Option<String>,
}

impl AppConfig {
    /// Read configuration from the environment. `.env` is loaded in main
    /// before this runs.
    pub fn from_env() -> Result<Self, AppError> {
        Self::build(
            env::var("STORE_BASE_URL").ok(),
            env::var("UPLOAD_BACKEND").ok(),
            env::var("UPLOAD_ENDPOINT").ok(),
        )
    }

    fn build(
        store_base_url: Option<String>,
        upload_backend: Option<String>,
        upload_endpoint: Option<String>,
    ) -> Result<Self, AppError> {
        let store_base_url = store_base_url.unwrap_or_else(|| DEFAULT_STORE_URL.to_string());

        let upload_backend = match upload_backend.as_deref() {
            None | Some("local") => UploadBackend::Local,
            Some("hosted") => UploadBackend::Hosted,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "unknown UPLOAD_BACKEND: {other}"
                )))
            }
        };

        if upload_backend == UploadBackend::Hosted && upload_endpoint.is_none() {
            return Err(AppError::Config(
                "UPLOAD_ENDPOINT is required when UPLOAD_BACKEND=hosted".to_string(),
            ));
        }

        Ok(Self {
            store_base_url,
            upload_backend,
            upload_endpoint,
        })
    }
}
