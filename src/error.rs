use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by a detection run
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("failed to load model {}: {reason}", path.display())]
    ModelLoad { path: PathBuf, reason: String },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("failed to write annotated image {}: {reason}", path.display())]
    ImageWrite { path: PathBuf, reason: String },
}

impl DetectError {
    pub fn model_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ModelLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn inference(reason: impl ToString) -> Self {
        Self::Inference(reason.to_string())
    }

    pub fn image_write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ImageWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type DetectResult<T> = Result<T, DetectError>;
