use crate::chat_card::message::ChatMessage;
use crate::chat_card::sdk;
use crate::chat_card::types::{
    Button, Card, CardAction, CardHeader, Image, KeyValue, OnClick, Section, Widget,
};

/// Converts the card model into the client library's object graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct SdkRenderer;

impl SdkRenderer {
    pub fn card(card: &Card) -> sdk::Card {
        sdk::Card {
            name: card.name.clone(),
            header: card.header.as_ref().map(header),
            card_actions: non_empty(card.card_actions.iter().map(card_action).collect()),
            sections: non_empty(card.sections.iter().map(section).collect()),
        }
    }

    pub fn cards(cards: &[Card]) -> Vec<sdk::Card> {
        cards.iter().map(Self::card).collect()
    }

    pub fn message(message: &ChatMessage) -> sdk::Message {
        sdk::Message {
            text: message.text.clone(),
            cards: non_empty(Self::cards(&message.cards)),
            thread: message.thread.as_ref().map(|thread| sdk::Thread {
                name: Some(thread.name.clone()),
            }),
            fallback_text: message.fallback_text.clone(),
        }
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() { None } else { Some(items) }
}

fn header(header: &CardHeader) -> sdk::CardHeader {
    sdk::CardHeader {
        title: header.title.clone(),
        subtitle: header.subtitle.clone(),
        image_style: header.image_style.map(|style| style.as_str().to_string()),
        image_url: header.image_url.clone(),
    }
}

fn card_action(action: &CardAction) -> sdk::CardAction {
    sdk::CardAction {
        action_label: Some(action.action_label.clone()),
        on_click: Some(on_click(&action.on_click)),
    }
}

fn section(section: &Section) -> sdk::Section {
    sdk::Section {
        header: section.header.clone(),
        widgets: Some(section.widgets.iter().map(widget).collect()),
    }
}

fn widget(widget: &Widget) -> sdk::WidgetMarkup {
    match widget {
        Widget::TextParagraph(text) => sdk::WidgetMarkup {
            text_paragraph: Some(sdk::TextParagraph {
                text: Some(text.text.clone()),
            }),
            ..sdk::WidgetMarkup::default()
        },
        Widget::Image(img) => sdk::WidgetMarkup {
            image: Some(image(img)),
            ..sdk::WidgetMarkup::default()
        },
        Widget::KeyValue(kv) => sdk::WidgetMarkup {
            key_value: Some(key_value(kv)),
            ..sdk::WidgetMarkup::default()
        },
        Widget::Buttons(buttons) => sdk::WidgetMarkup {
            buttons: Some(buttons.iter().map(button).collect()),
            ..sdk::WidgetMarkup::default()
        },
    }
}

fn image(image: &Image) -> sdk::Image {
    sdk::Image {
        image_url: Some(image.image_url.clone()),
        on_click: image.on_click.as_ref().map(on_click),
        aspect_ratio: image.aspect_ratio,
    }
}

fn key_value(kv: &KeyValue) -> sdk::KeyValue {
    sdk::KeyValue {
        top_label: kv.top_label.clone(),
        content: Some(kv.content.clone()),
        content_multiline: kv.content_multiline,
        bottom_label: kv.bottom_label.clone(),
        on_click: kv.on_click.as_ref().map(on_click),
        icon: kv.icon.map(|icon| icon.as_str().to_string()),
        icon_url: kv.icon_url.clone(),
        button: kv.button.as_ref().map(button),
    }
}

fn button(button: &Button) -> sdk::Button {
    match button {
        Button::TextButton(text) => sdk::Button {
            text_button: Some(sdk::TextButton {
                text: Some(text.text.clone()),
                on_click: Some(on_click(&text.on_click)),
            }),
            image_button: None,
        },
        Button::ImageButton(image) => sdk::Button {
            text_button: None,
            image_button: Some(sdk::ImageButton {
                icon: image.icon.map(|icon| icon.as_str().to_string()),
                icon_url: image.icon_url.clone(),
                name: image.name.clone(),
                on_click: Some(on_click(&image.on_click)),
            }),
        },
    }
}

fn on_click(on_click: &OnClick) -> sdk::OnClick {
    match on_click {
        OnClick::Action(action) => sdk::OnClick {
            action: Some(sdk::FormAction {
                action_method_name: Some(action.action_method_name.clone()),
                parameters: non_empty(
                    action
                        .parameters
                        .iter()
                        .map(|param| sdk::ActionParameter {
                            key: Some(param.key.clone()),
                            value: Some(param.value.clone()),
                        })
                        .collect(),
                ),
            }),
            open_link: None,
        },
        OnClick::OpenLink(link) => sdk::OnClick {
            action: None,
            open_link: Some(sdk::OpenLink {
                url: Some(link.url.clone()),
            }),
        },
    }
}
