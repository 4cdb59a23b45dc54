use serde_json::Value;

use crate::chat_card::message::ChatMessage;
use crate::chat_card::types::Card;
use crate::errors::CardError;

/// Renders cards and messages into the webhook JSON body.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookRenderer;

impl WebhookRenderer {
    pub fn card(card: &Card) -> Result<Value, CardError> {
        Ok(serde_json::to_value(card)?)
    }

    pub fn cards(cards: &[Card]) -> Result<Value, CardError> {
        Ok(serde_json::to_value(cards)?)
    }

    pub fn message(message: &ChatMessage) -> Result<Value, CardError> {
        Ok(serde_json::to_value(message)?)
    }

    /// Serialized request body, ready for an HTTP POST.
    pub fn message_bytes(message: &ChatMessage) -> Result<Vec<u8>, CardError> {
        Ok(serde_json::to_vec(message)?)
    }
}
