//! Chat card builder.
//!
//! Assembles cards (header, card actions, sections, widgets) from a pipeline of
//! tagged segments and renders them two ways: the webhook JSON body and the
//! object graph of the hosted chat client library. Both renderers read the
//! same card model, so the two outputs always describe the same card.

use serde_json::Value;

pub mod chat_card;
pub mod config;
pub mod errors;

pub use chat_card::{
    ActionParameter, Button, Card, CardAction, CardBuilder, CardHeader, ChatMessage, FormAction,
    Icon, Image, ImageButton, ImageStyle, KeyValue, OnClick, OpenLink, SdkRenderer, Section,
    Segment, SegmentKind, TextButton, TextParagraph, Thread, WebhookRenderer, Widget,
    coalesce_buttons, sdk,
};
pub use config::{CARDKIT_CONFIG_SCHEMA_VERSION, CardKitConfig, ConfigError};
pub use errors::CardError;

/// CardKit runs the builder pipeline under one configuration.
#[derive(Clone, Debug, Default)]
pub struct CardKit {
    config: CardKitConfig,
}

impl CardKit {
    pub fn new(config: CardKitConfig) -> Result<Self, CardError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn from_env() -> Self {
        Self {
            config: CardKitConfig::from_env(),
        }
    }

    pub fn config(&self) -> &CardKitConfig {
        &self.config
    }

    pub fn builder(&self) -> CardBuilder {
        CardBuilder::with_config(self.config.clone())
    }

    /// Build the cards for `header` and tagged JSON `segments`, then wrap them
    /// in a message.
    pub fn build_message(
        &self,
        header: CardHeader,
        segments: &[Value],
        text: Option<&str>,
    ) -> Result<ChatMessage, CardError> {
        let cards = self.builder().header(header).segment_values(segments)?.build()?;
        let message = ChatMessage::from_segments(cards.into_iter().map(Segment::from))?;
        Ok(match text {
            Some(text) => message.text(text),
            None => message,
        })
    }

    pub fn render_webhook(&self, message: &ChatMessage) -> Result<Value, CardError> {
        WebhookRenderer::message(message)
    }

    pub fn render_sdk(&self, message: &ChatMessage) -> sdk::Message {
        SdkRenderer::message(message)
    }
}
