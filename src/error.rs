use thiserror::Error;

#[derive(Error, Debug)]
pub enum YtsrtError {
    #[error("Malformed caption XML: {0}")]
    MalformedInput(String),

    #[error("No captions found for language code: {0}")]
    CaptionNotFound(String),

    #[error("No caption tracks available for video: {0}")]
    NoCaptionTracks(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, YtsrtError>;
