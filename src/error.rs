use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThaliError {
    #[error(transparent)]
    Common(#[from] thali_id_common::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("folder not found: {0}")]
    FolderNotFound(String),

    #[error("failed to load image: {0}")]
    ImageLoad(String),

    #[error("label source error: {0}")]
    LabelSource(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no images found: {0}")]
    NoImagesFound(String),
}

pub type Result<T> = std::result::Result<T, ThaliError>;
