/// Application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// transport-level failure talking to the record store
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// the store answered with a non-2xx status
    #[error("{op} failed with status {status}")]
    Status { op: &'static str, status: u16 },
    /// reading the selected file failed
    #[error("failed to read file: {0}")]
    FileRead(#[from] std::io::Error),
    /// the selected file cannot be used as a student photo
    #[error("{0}")]
    InvalidImage(String),
    /// a required form field is empty
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// the upload service answered with an unusable body
    #[error("unexpected upload response: {0}")]
    UploadResponse(String),
    /// bad or incomplete environment configuration
    #[error("configuration error: {0}")]
    Config(String),
}
