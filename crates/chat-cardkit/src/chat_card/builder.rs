use serde_json::Value;
use tracing::debug;

use super::segment::{Segment, SegmentKind};
use super::types::{Card, CardAction, CardHeader, ImageStyle, Section, Widget};
use crate::config::CardKitConfig;
use crate::errors::CardError;

/// Accumulates a card from header fields, card actions and pipeline segments.
///
/// Cards arriving as segments pass through untouched; loose widgets are held
/// back and wrapped into one header-less section by [`CardBuilder::build`].
#[derive(Clone, Debug, Default)]
pub struct CardBuilder {
    config: CardKitConfig,
    card: Card,
    passthrough: Vec<Card>,
    loose_widgets: Vec<Widget>,
}

impl CardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CardKitConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.card.name = Some(name.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.card.header_mut().title = Some(title.into());
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.card.header_mut().subtitle = Some(subtitle.into());
        self
    }

    pub fn image_style(mut self, style: ImageStyle) -> Self {
        self.card.header_mut().image_style = Some(style);
        self
    }

    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.card.header_mut().image_url = Some(url.into());
        self
    }

    /// Merge the fields present in `header`; absent fields leave the card untouched.
    pub fn header(mut self, header: CardHeader) -> Self {
        if !header.is_empty() {
            self.card.header_mut().merge(header);
        }
        self
    }

    pub fn card_actions<I>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = CardAction>,
    {
        self.card.card_actions.extend(actions);
        self
    }

    /// Tagged JSON card actions. Any element not tagged `CardAction` rejects
    /// the whole batch before an action is applied.
    pub fn card_action_values(self, values: &[Value]) -> Result<Self, CardError> {
        let segments = Segment::from_values(values, &[SegmentKind::CardAction])?;
        Ok(self.segments(segments))
    }

    pub fn segment(mut self, segment: impl Into<Segment>) -> Self {
        let segment = segment.into();
        debug!(kind = %segment.kind(), "classifying segment");
        match segment {
            Segment::Card(card) => self.passthrough.push(card),
            Segment::Section(section) => self.card.sections.push(section),
            Segment::CardAction(action) => self.card.card_actions.push(action),
            Segment::Widget(widget) => self.loose_widgets.push(widget),
        }
        self
    }

    pub fn segments<I>(self, segments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Segment>,
    {
        segments
            .into_iter()
            .fold(self, |builder, segment| builder.segment(segment))
    }

    /// Tagged JSON segments of any kind, validated in full before any is applied.
    pub fn segment_values(self, values: &[Value]) -> Result<Self, CardError> {
        let segments = Segment::from_values(values, &SegmentKind::ALL)?;
        Ok(self.segments(segments))
    }

    /// Finish the card.
    ///
    /// Returns the pass-through cards in arrival order followed by the built
    /// card. The built card is always present unless `drop_empty_card` is set,
    /// it is empty, and at least one card passed through.
    pub fn build(self) -> Result<Vec<Card>, CardError> {
        let CardBuilder {
            config,
            mut card,
            passthrough,
            loose_widgets,
        } = self;

        let widgets_in = loose_widgets.len();
        let widgets = coalesce_buttons(loose_widgets);
        let widgets_out = widgets.len();
        if !widgets.is_empty() {
            card.sections.push(Section::new(widgets));
        }

        if config.check_urls {
            check_urls(&card)?;
        }

        debug!(
            widgets_in,
            widgets_out,
            sections = card.sections.len(),
            card_actions = card.card_actions.len(),
            passthrough = passthrough.len(),
            "card finalized"
        );

        let mut cards = passthrough;
        let drop_card = config.drop_empty_card && card.is_empty() && !cards.is_empty();
        if !drop_card {
            cards.push(card);
        }
        Ok(cards)
    }
}

/// Merge each button group into a button group directly before it.
///
/// Adjacency is judged against the last output widget, so any run of
/// consecutive button widgets collapses into one group. Groups without
/// buttons are dropped.
pub fn coalesce_buttons(widgets: Vec<Widget>) -> Vec<Widget> {
    let mut stack: Vec<Widget> = Vec::with_capacity(widgets.len());
    for widget in widgets {
        match widget {
            Widget::Buttons(incoming) if incoming.is_empty() => {}
            Widget::Buttons(incoming) => match stack.last_mut() {
                Some(Widget::Buttons(group)) => group.extend(incoming),
                _ => stack.push(Widget::Buttons(incoming)),
            },
            other => stack.push(other),
        }
    }
    stack
}

fn check_urls(card: &Card) -> Result<(), CardError> {
    for (field, url) in card.urls() {
        let absolute = ["http://", "https://"]
            .iter()
            .any(|scheme| url.len() > scheme.len() && url.starts_with(scheme));
        if !absolute {
            return Err(CardError::InvalidUrl {
                field,
                url: url.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat_card::types::{Button, KeyValue, OnClick};
    use serde_json::json;

    fn button(label: &str) -> Widget {
        Widget::button(Button::text(label, OnClick::open_link(format!("https://{label}.test"))))
    }

    fn labels(widget: &Widget) -> Vec<String> {
        match widget {
            Widget::Buttons(buttons) => buttons
                .iter()
                .map(|b| match b {
                    Button::TextButton(t) => t.text.clone(),
                    Button::ImageButton(_) => "<image>".to_string(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn coalesces_adjacent_buttons_only() {
        let out = coalesce_buttons(vec![
            button("a"),
            button("b"),
            Widget::text_paragraph("between"),
            button("c"),
        ]);
        assert_eq!(out.len(), 3);
        assert_eq!(labels(&out[0]), vec!["a", "b"]);
        assert_eq!(out[1], Widget::text_paragraph("between"));
        assert_eq!(labels(&out[2]), vec!["c"]);
    }

    #[test]
    fn long_button_run_becomes_one_group() {
        let out = coalesce_buttons(vec![button("a"), button("b"), button("c"), button("d")]);
        assert_eq!(out.len(), 1);
        assert_eq!(labels(&out[0]), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn non_button_widgets_are_untouched() {
        let widgets = vec![
            Widget::text_paragraph("one"),
            Widget::key_value(KeyValue::new("two")),
            Widget::text_paragraph("three"),
        ];
        assert_eq!(coalesce_buttons(widgets.clone()), widgets);
    }

    #[test]
    fn no_loose_widgets_means_no_section() {
        let cards = CardBuilder::new().title("Empty").build().expect("build");
        assert_eq!(cards.len(), 1);
        assert!(cards[0].sections.is_empty());
    }

    #[test]
    fn header_is_created_lazily() {
        let cards = CardBuilder::new()
            .segment(Widget::text_paragraph("body"))
            .build()
            .expect("build");
        assert!(cards[0].header.is_none());
        let cards = CardBuilder::new()
            .image_style(ImageStyle::Image)
            .build()
            .expect("build");
        let header = cards[0].header.as_ref().expect("header");
        assert_eq!(header.image_style, Some(ImageStyle::Image));
        assert!(header.title.is_none());
    }

    #[test]
    fn empty_header_merge_does_not_create_header() {
        let cards = CardBuilder::new()
            .header(CardHeader::default())
            .build()
            .expect("build");
        assert!(cards[0].header.is_none());
    }

    #[test]
    fn card_action_batch_applies_nothing_when_one_tag_is_wrong() {
        let valid = json!({"type": "CardAction", "value": {"actionLabel": "ok", "onClick": {"openLink": {"url": "https://ok.test"}}}});
        let values = vec![
            valid.clone(),
            json!({"type": "TextParagraph", "value": {"text": "wrong"}}),
        ];
        let builder = CardBuilder::new().title("Actions");
        let before = builder.clone();
        match builder.card_action_values(&values).unwrap_err() {
            CardError::InvalidInputType { allowed, actual } => {
                assert_eq!(allowed, vec!["CardAction"]);
                assert_eq!(actual, vec!["TextParagraph".to_string()]);
            }
            other => panic!("unexpected error {other}"),
        }

        let untouched = before.clone().build().expect("build");
        assert!(untouched[0].card_actions.is_empty());

        let applied = before
            .card_action_values(&[valid])
            .expect("valid batch")
            .build()
            .expect("build");
        assert_eq!(applied[0].card_actions.len(), 1);
    }

    #[test]
    fn empty_built_card_is_kept_after_passthrough() {
        let upstream = Card {
            name: Some("upstream".into()),
            ..Card::default()
        };
        let cards = CardBuilder::new()
            .segment(upstream.clone())
            .build()
            .expect("build");
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0], upstream);
        assert!(cards[1].is_empty());
    }

    #[test]
    fn drop_empty_card_only_applies_with_passthrough() {
        let config = CardKitConfig {
            drop_empty_card: true,
            ..CardKitConfig::default()
        };
        let upstream = Card {
            name: Some("upstream".into()),
            ..Card::default()
        };
        let cards = CardBuilder::with_config(config.clone())
            .segment(upstream.clone())
            .build()
            .expect("build");
        assert_eq!(cards, vec![upstream.clone()]);

        let cards = CardBuilder::with_config(config.clone())
            .build()
            .expect("build");
        assert_eq!(cards.len(), 1);

        let cards = CardBuilder::with_config(config)
            .title("Kept")
            .segment(upstream)
            .build()
            .expect("build");
        assert_eq!(cards.len(), 2);
    }

    #[test]
    fn empty_button_groups_are_dropped() {
        let out = coalesce_buttons(vec![
            Widget::Buttons(Vec::new()),
            Widget::text_paragraph("t"),
            Widget::Buttons(Vec::new()),
            button("a"),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], Widget::text_paragraph("t"));
        assert_eq!(labels(&out[1]), vec!["a"]);

        let cards = CardBuilder::new()
            .segment(Widget::Buttons(Vec::new()))
            .build()
            .expect("build");
        assert!(cards[0].sections.is_empty());
    }

    #[test]
    fn url_check_rejects_relative_urls() {
        let config = CardKitConfig {
            check_urls: true,
            ..CardKitConfig::default()
        };
        let err = CardBuilder::with_config(config.clone())
            .image_url("/static/logo.png")
            .build()
            .unwrap_err();
        match err {
            CardError::InvalidUrl { field, url } => {
                assert_eq!(field, "header.imageUrl");
                assert_eq!(url, "/static/logo.png");
            }
            other => panic!("unexpected error {other}"),
        }

        CardBuilder::with_config(config)
            .image_url("https://cdn.test/logo.png")
            .build()
            .expect("absolute url accepted");
    }
}
