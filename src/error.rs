use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures of the HPI pipeline.
///
/// The first failing stage aborts the pipeline and its message is reported
/// unchanged to the caller.
#[derive(Debug, Error)]
pub enum HpiError {
    /// The input is not a decodable raster image, or it has zero area.
    #[error("{0}")]
    Decode(String),
    /// The heat-map could not be encoded or written.
    #[error("{0}")]
    Render(String),
    /// An injected plant classifier rejected the image.
    #[error("the uploaded image does not appear to be a plant")]
    NotAPlant,
}

/// Transport-level tag for an `HpiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    DecodeError,
    RenderError,
    NotAPlant,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::DecodeError => "DecodeError",
            ErrorKind::RenderError => "RenderError",
            ErrorKind::NotAPlant   => "NotAPlant",
        }
    }
}

impl HpiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HpiError::Decode(_) => ErrorKind::DecodeError,
            HpiError::Render(_) => ErrorKind::RenderError,
            HpiError::NotAPlant => ErrorKind::NotAPlant,
        }
    }
}

/// Non-fatal conditions noticed while computing the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HpiWarning {
    /// Every pixel has the same intensity, so `max == min` and the
    /// zero-divisor policy decided the index.
    DegenerateInput { value: u8 },
}

impl std::fmt::Display for HpiWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HpiWarning::DegenerateInput { value } => {
                write!(f, "image has uniform intensity {}; index is undefined", value)
            }
        }
    }
}
