use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::segment::{Segment, SegmentKind};
use super::types::Card;
use crate::errors::CardError;

/// Thread a message is posted into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub name: String,
}

/// Outgoing chat message: optional text plus the cards produced by a pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cards: Vec<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_text: Option<String>,
}

impl ChatMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn thread(mut self, name: impl Into<String>) -> Self {
        self.thread = Some(Thread { name: name.into() });
        self
    }

    pub fn fallback_text(mut self, text: impl Into<String>) -> Self {
        self.fallback_text = Some(text.into());
        self
    }

    pub fn cards<I>(mut self, cards: I) -> Self
    where
        I: IntoIterator<Item = Card>,
    {
        self.cards.extend(cards);
        self
    }

    /// Collect the cards of a finished pipeline. Only `Card` segments are
    /// accepted; anything else rejects the batch.
    pub fn from_segments<I>(segments: I) -> Result<Self, CardError>
    where
        I: IntoIterator<Item = Segment>,
    {
        let mut cards = Vec::new();
        let mut rejected = Vec::new();
        for segment in segments {
            match segment {
                Segment::Card(card) => cards.push(card),
                other => rejected.push(other.kind().as_str().to_string()),
            }
        }
        if !rejected.is_empty() {
            tracing::warn!(rejected = ?rejected, "message accepts card segments only");
            return Err(CardError::InvalidInputType {
                allowed: vec![SegmentKind::Card.as_str()],
                actual: rejected,
            });
        }
        Ok(Self::new().cards(cards))
    }

    pub fn from_segment_values(values: &[Value]) -> Result<Self, CardError> {
        Self::from_segments(Segment::from_values(values, &[SegmentKind::Card])?)
    }
}
