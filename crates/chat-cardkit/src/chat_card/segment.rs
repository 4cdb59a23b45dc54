//! Tagged pipeline units and their classification.
//!
//! Sibling builders produce `Segment`s; dynamic callers hand in JSON objects of
//! the form `{"type": "<Tag>", "value": <webhook-shaped unit>}`. A batch of
//! JSON segments is checked in full before anything is decoded, so a bad tag
//! anywhere rejects the whole batch.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::types::{Button, Card, CardAction, Image, KeyValue, Section, TextParagraph, Widget};
use crate::errors::CardError;

/// Type tag carried by every segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    Card,
    Section,
    CardAction,
    TextParagraph,
    Button,
    Image,
    KeyValue,
}

impl SegmentKind {
    pub const ALL: [SegmentKind; 7] = [
        SegmentKind::Card,
        SegmentKind::Section,
        SegmentKind::CardAction,
        SegmentKind::TextParagraph,
        SegmentKind::Button,
        SegmentKind::Image,
        SegmentKind::KeyValue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SegmentKind::Card => "Card",
            SegmentKind::Section => "Section",
            SegmentKind::CardAction => "CardAction",
            SegmentKind::TextParagraph => "TextParagraph",
            SegmentKind::Button => "Button",
            SegmentKind::Image => "Image",
            SegmentKind::KeyValue => "KeyValue",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    pub fn is_widget(self) -> bool {
        matches!(
            self,
            SegmentKind::TextParagraph
                | SegmentKind::Button
                | SegmentKind::Image
                | SegmentKind::KeyValue
        )
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit fed to the card builder.
#[derive(Clone, Debug, PartialEq)]
pub enum Segment {
    Card(Card),
    Section(Section),
    CardAction(CardAction),
    Widget(Widget),
}

impl Segment {
    pub fn kind(&self) -> SegmentKind {
        match self {
            Segment::Card(_) => SegmentKind::Card,
            Segment::Section(_) => SegmentKind::Section,
            Segment::CardAction(_) => SegmentKind::CardAction,
            Segment::Widget(Widget::TextParagraph(_)) => SegmentKind::TextParagraph,
            Segment::Widget(Widget::Buttons(_)) => SegmentKind::Button,
            Segment::Widget(Widget::Image(_)) => SegmentKind::Image,
            Segment::Widget(Widget::KeyValue(_)) => SegmentKind::KeyValue,
        }
    }

    /// Decode one tagged JSON segment, accepting any kind.
    pub fn from_value(value: &Value) -> Result<Self, CardError> {
        let mut segments = Self::from_values(std::slice::from_ref(value), &SegmentKind::ALL)?;
        Ok(segments.remove(0))
    }

    /// Decode a batch of tagged JSON segments restricted to `allowed` kinds.
    ///
    /// Tags are checked for the whole batch first; every offending tag is
    /// reported in one error.
    pub fn from_values(values: &[Value], allowed: &[SegmentKind]) -> Result<Vec<Self>, CardError> {
        let mut kinds = Vec::with_capacity(values.len());
        let mut rejected = Vec::new();
        for value in values {
            match tag_of(value) {
                Ok(kind) if allowed.contains(&kind) => kinds.push(kind),
                Ok(kind) => rejected.push(kind.as_str().to_string()),
                Err(actual) => rejected.push(actual),
            }
        }
        if !rejected.is_empty() {
            tracing::warn!(rejected = ?rejected, "rejecting segments with unexpected type tags");
            return Err(CardError::InvalidInputType {
                allowed: allowed.iter().map(|kind| kind.as_str()).collect(),
                actual: rejected,
            });
        }

        values
            .iter()
            .zip(kinds)
            .enumerate()
            .map(|(index, (value, kind))| {
                let payload = value.get("value").cloned().unwrap_or(Value::Null);
                decode(kind, payload).map_err(|source| CardError::InvalidSegment {
                    tag: kind,
                    index,
                    source,
                })
            })
            .collect()
    }

    /// Tagged JSON form, the inverse of [`Segment::from_value`].
    pub fn to_value(&self) -> Result<Value, CardError> {
        let payload = match self {
            Segment::Card(card) => serde_json::to_value(card)?,
            Segment::Section(section) => serde_json::to_value(section)?,
            Segment::CardAction(action) => serde_json::to_value(action)?,
            Segment::Widget(Widget::TextParagraph(text)) => serde_json::to_value(text)?,
            Segment::Widget(Widget::Buttons(buttons)) => match buttons.as_slice() {
                [single] => serde_json::to_value(single)?,
                _ => serde_json::to_value(buttons)?,
            },
            Segment::Widget(Widget::Image(image)) => serde_json::to_value(image)?,
            Segment::Widget(Widget::KeyValue(kv)) => serde_json::to_value(kv)?,
        };
        Ok(serde_json::json!({ "type": self.kind().as_str(), "value": payload }))
    }
}

/// Tag of a JSON segment, or a description of what was found instead.
fn tag_of(value: &Value) -> Result<SegmentKind, String> {
    match value.get("type") {
        Some(Value::String(tag)) => SegmentKind::parse(tag).ok_or_else(|| tag.clone()),
        Some(other) => Err(format!("non-string type tag {other}")),
        None => Err(json_type_name(value).to_string()),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "untagged object",
    }
}

/// A loose button is either one button or an already grouped list.
#[derive(Deserialize)]
#[serde(untagged)]
enum ButtonPayload {
    One(Button),
    Many(Vec<Button>),
}

fn decode(kind: SegmentKind, payload: Value) -> Result<Segment, serde_json::Error> {
    Ok(match kind {
        SegmentKind::Card => Segment::Card(serde_json::from_value(payload)?),
        SegmentKind::Section => Segment::Section(serde_json::from_value(payload)?),
        SegmentKind::CardAction => Segment::CardAction(serde_json::from_value(payload)?),
        SegmentKind::TextParagraph => {
            Segment::Widget(Widget::TextParagraph(serde_json::from_value::<TextParagraph>(
                payload,
            )?))
        }
        SegmentKind::Button => {
            let buttons = match serde_json::from_value::<ButtonPayload>(payload)? {
                ButtonPayload::One(button) => vec![button],
                ButtonPayload::Many(buttons) if buttons.is_empty() => {
                    return Err(serde::de::Error::custom(
                        "button segment must carry at least one button",
                    ));
                }
                ButtonPayload::Many(buttons) => buttons,
            };
            Segment::Widget(Widget::Buttons(buttons))
        }
        SegmentKind::Image => {
            Segment::Widget(Widget::Image(serde_json::from_value::<Image>(payload)?))
        }
        SegmentKind::KeyValue => {
            Segment::Widget(Widget::KeyValue(serde_json::from_value::<KeyValue>(payload)?))
        }
    })
}

impl From<Card> for Segment {
    fn from(card: Card) -> Self {
        Segment::Card(card)
    }
}

impl From<Section> for Segment {
    fn from(section: Section) -> Self {
        Segment::Section(section)
    }
}

impl From<CardAction> for Segment {
    fn from(action: CardAction) -> Self {
        Segment::CardAction(action)
    }
}

impl From<Widget> for Segment {
    fn from(widget: Widget) -> Self {
        Segment::Widget(widget)
    }
}

impl From<Button> for Segment {
    fn from(button: Button) -> Self {
        Segment::Widget(Widget::button(button))
    }
}

impl From<TextParagraph> for Segment {
    fn from(text: TextParagraph) -> Self {
        Segment::Widget(Widget::TextParagraph(text))
    }
}

impl From<Image> for Segment {
    fn from(image: Image) -> Self {
        Segment::Widget(Widget::Image(image))
    }
}

impl From<KeyValue> for Segment {
    fn from(kv: KeyValue) -> Self {
        Segment::Widget(Widget::KeyValue(kv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat_card::types::OnClick;
    use serde_json::json;

    #[test]
    fn classifies_every_widget_kind() {
        let values = vec![
            json!({"type": "TextParagraph", "value": {"text": "hi"}}),
            json!({"type": "Button", "value": {"textButton": {"text": "Go", "onClick": {"openLink": {"url": "https://go.test"}}}}}),
            json!({"type": "Image", "value": {"imageUrl": "https://i.test/a.png"}}),
            json!({"type": "KeyValue", "value": {"content": "v"}}),
        ];
        let segments = Segment::from_values(&values, &SegmentKind::ALL).expect("segments");
        let kinds: Vec<_> = segments.iter().map(Segment::kind).collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::TextParagraph,
                SegmentKind::Button,
                SegmentKind::Image,
                SegmentKind::KeyValue
            ]
        );
        assert!(kinds.iter().all(|kind| kind.is_widget()));
    }

    #[test]
    fn unknown_tag_lists_allowed_and_actual() {
        let values = vec![
            json!({"type": "TextParagraph", "value": {"text": "ok"}}),
            json!({"type": "Carousel", "value": {}}),
            json!("plain string"),
        ];
        let err = Segment::from_values(&values, &SegmentKind::ALL).unwrap_err();
        match &err {
            CardError::InvalidInputType { allowed, actual } => {
                assert_eq!(allowed.len(), 7);
                assert_eq!(actual, &vec!["Carousel".to_string(), "string".to_string()]);
            }
            other => panic!("unexpected error {other}"),
        }
        let message = err.to_string();
        assert!(message.contains("Card, Section, CardAction"));
        assert!(message.contains("got [Carousel, string]"));
    }

    #[test]
    fn known_tag_outside_allowed_set_is_rejected() {
        let values = vec![json!({"type": "Section", "value": {"widgets": []}})];
        let err = Segment::from_values(&values, &[SegmentKind::CardAction]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid input type: expected one of [CardAction], got [Section]"
        );
    }

    #[test]
    fn malformed_payload_reports_index() {
        let values = vec![
            json!({"type": "TextParagraph", "value": {"text": "ok"}}),
            json!({"type": "KeyValue", "value": {"topLabel": "missing content"}}),
        ];
        match Segment::from_values(&values, &SegmentKind::ALL).unwrap_err() {
            CardError::InvalidSegment { tag, index, .. } => {
                assert_eq!(tag, SegmentKind::KeyValue);
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn empty_button_array_is_rejected() {
        let values = vec![
            json!({"type": "Button", "value": []}),
            json!({"type": "TextParagraph", "value": {"text": "t"}}),
        ];
        let err = Segment::from_values(&values, &SegmentKind::ALL).unwrap_err();
        match &err {
            CardError::InvalidSegment { tag, index, .. } => {
                assert_eq!(*tag, SegmentKind::Button);
                assert_eq!(*index, 0);
            }
            other => panic!("unexpected error {other}"),
        }
        assert!(err.to_string().contains("at least one button"));
    }

    #[test]
    fn tagged_json_round_trips() {
        let segment = Segment::from(Button::text("Open", OnClick::open_link("https://o.test")));
        let value = segment.to_value().expect("value");
        assert_eq!(value["type"], "Button");
        assert_eq!(Segment::from_value(&value).expect("segment"), segment);
    }
}
