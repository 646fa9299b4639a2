use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid report data: {0}")]
    InvalidInput(String),
    #[error("page geometry error: {0}")]
    Geometry(String),
    #[error("failed to rasterize chart '{title}': {reason}")]
    Chart { title: String, reason: String },
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
