use thiserror::Error;

use crate::chat_card::segment::SegmentKind;
use crate::config::ConfigError;

/// Errors raised while assembling or rendering cards.
#[derive(Debug, Error)]
pub enum CardError {
    /// A tagged input carried a tag outside the accepted set.
    #[error(
        "invalid input type: expected one of [{}], got [{}]",
        .allowed.join(", "),
        .actual.join(", ")
    )]
    InvalidInputType {
        allowed: Vec<&'static str>,
        actual: Vec<String>,
    },
    #[error("invalid {tag} segment at index {index}: {source}")]
    InvalidSegment {
        tag: SegmentKind,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid url in {field}: {url:?} is not an absolute http(s) url")]
    InvalidUrl { field: &'static str, url: String },
    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
