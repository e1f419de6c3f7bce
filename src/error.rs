use thiserror::Error;

#[derive(Error, Debug)]
pub enum PixcryptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("Shape error: {0}")]
    Shape(String),

    #[error("Dimension mismatch on {axis} axis: expected {expected}, got {actual}")]
    DimensionMismatch {
        axis: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Multiply factor {0} is not invertible modulo 256 (must be odd)")]
    NonInvertibleTransform(u16),

    #[error("Invalid permutation: {0}")]
    InvalidPermutation(String),

    #[error("Invalid pixel buffer: {0}")]
    InvalidBuffer(String),

    #[error("Invalid pipeline: {0}")]
    InvalidPipeline(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

pub type Result<T> = std::result::Result<T, PixcryptError>;
