use serde::{Deserialize, Serialize};

/// How the header image is framed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageStyle {
    Image,
    Avatar,
}

impl ImageStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageStyle::Image => "IMAGE",
            ImageStyle::Avatar => "AVATAR",
        }
    }

    /// Parse an image style (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "image" => Some(Self::Image),
            "avatar" => Some(Self::Avatar),
            _ => None,
        }
    }
}

/// Built-in icons understood by the chat service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Icon {
    Airplane,
    Bookmark,
    Bus,
    Car,
    Clock,
    ConfirmationNumberIcon,
    Dollar,
    Description,
    Email,
    EventPerformer,
    EventSeat,
    FlightArrival,
    FlightDeparture,
    Hotel,
    HotelRoomType,
    Invite,
    MapPin,
    Membership,
    MultiplePeople,
    Offer,
    Person,
    Phone,
    RestaurantIcon,
    ShoppingCart,
    Star,
    Store,
    Ticket,
    Train,
    VideoCamera,
    VideoPlay,
}

impl Icon {
    pub fn as_str(self) -> &'static str {
        match self {
            Icon::Airplane => "AIRPLANE",
            Icon::Bookmark => "BOOKMARK",
            Icon::Bus => "BUS",
            Icon::Car => "CAR",
            Icon::Clock => "CLOCK",
            Icon::ConfirmationNumberIcon => "CONFIRMATION_NUMBER_ICON",
            Icon::Dollar => "DOLLAR",
            Icon::Description => "DESCRIPTION",
            Icon::Email => "EMAIL",
            Icon::EventPerformer => "EVENT_PERFORMER",
            Icon::EventSeat => "EVENT_SEAT",
            Icon::FlightArrival => "FLIGHT_ARRIVAL",
            Icon::FlightDeparture => "FLIGHT_DEPARTURE",
            Icon::Hotel => "HOTEL",
            Icon::HotelRoomType => "HOTEL_ROOM_TYPE",
            Icon::Invite => "INVITE",
            Icon::MapPin => "MAP_PIN",
            Icon::Membership => "MEMBERSHIP",
            Icon::MultiplePeople => "MULTIPLE_PEOPLE",
            Icon::Offer => "OFFER",
            Icon::Person => "PERSON",
            Icon::Phone => "PHONE",
            Icon::RestaurantIcon => "RESTAURANT_ICON",
            Icon::ShoppingCart => "SHOPPING_CART",
            Icon::Star => "STAR",
            Icon::Store => "STORE",
            Icon::Ticket => "TICKET",
            Icon::Train => "TRAIN",
            Icon::VideoCamera => "VIDEO_CAMERA",
            Icon::VideoPlay => "VIDEO_PLAY",
        }
    }
}

/// Card header. Every field is optional and set independently.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_style: Option<ImageStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CardHeader {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subtitle.is_none()
            && self.image_style.is_none()
            && self.image_url.is_none()
    }

    /// Copy every field present in `other` over this header.
    pub fn merge(&mut self, other: CardHeader) {
        if let Some(title) = other.title {
            self.title = Some(title);
        }
        if let Some(subtitle) = other.subtitle {
            self.subtitle = Some(subtitle);
        }
        if let Some(style) = other.image_style {
            self.image_style = Some(style);
        }
        if let Some(url) = other.image_url {
            self.image_url = Some(url);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParameter {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormAction {
    pub action_method_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ActionParameter>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenLink {
    pub url: String,
}

/// What happens when a clickable element is pressed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnClick {
    Action(FormAction),
    OpenLink(OpenLink),
}

impl OnClick {
    pub fn open_link(url: impl Into<String>) -> Self {
        OnClick::OpenLink(OpenLink { url: url.into() })
    }

    /// Invoke a bot action with the given `(key, value)` parameters.
    pub fn action<I, K, V>(method: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        OnClick::Action(FormAction {
            action_method_name: method.into(),
            parameters: parameters
                .into_iter()
                .map(|(key, value)| ActionParameter {
                    key: key.into(),
                    value: value.into(),
                })
                .collect(),
        })
    }
}

/// A card-level action shown in the card's overflow menu.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAction {
    pub action_label: String,
    pub on_click: OnClick,
}

impl CardAction {
    pub fn new(label: impl Into<String>, on_click: OnClick) -> Self {
        Self {
            action_label: label.into(),
            on_click,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextButton {
    pub text: String,
    pub on_click: OnClick,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageButton {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub on_click: OnClick,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Button {
    TextButton(TextButton),
    ImageButton(ImageButton),
}

impl Button {
    pub fn text(text: impl Into<String>, on_click: OnClick) -> Self {
        Button::TextButton(TextButton {
            text: text.into(),
            on_click,
        })
    }

    pub fn icon(icon: Icon, on_click: OnClick) -> Self {
        Button::ImageButton(ImageButton {
            icon: Some(icon),
            icon_url: None,
            name: None,
            on_click,
        })
    }

    pub fn icon_url(url: impl Into<String>, on_click: OnClick) -> Self {
        Button::ImageButton(ImageButton {
            icon: None,
            icon_url: Some(url.into()),
            name: None,
            on_click,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextParagraph {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_click: Option<OnClick>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
}

impl Image {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            on_click: None,
            aspect_ratio: None,
        }
    }

    pub fn on_click(mut self, on_click: OnClick) -> Self {
        self.on_click = Some(on_click);
        self
    }

    pub fn aspect_ratio(mut self, ratio: f64) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_label: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_multiline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_click: Option<OnClick>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<Button>,
}

impl KeyValue {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn top_label(mut self, label: impl Into<String>) -> Self {
        self.top_label = Some(label.into());
        self
    }

    pub fn bottom_label(mut self, label: impl Into<String>) -> Self {
        self.bottom_label = Some(label.into());
        self
    }

    pub fn multiline(mut self, multiline: bool) -> Self {
        self.content_multiline = Some(multiline);
        self
    }

    pub fn on_click(mut self, on_click: OnClick) -> Self {
        self.on_click = Some(on_click);
        self
    }

    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn icon_url(mut self, url: impl Into<String>) -> Self {
        self.icon_url = Some(url.into());
        self
    }

    pub fn button(mut self, button: Button) -> Self {
        self.button = Some(button);
        self
    }
}

/// A single visual unit inside a section.
///
/// A `Buttons` widget is a button group; loose buttons arrive as groups of one
/// and adjacent groups are merged when a card is finalized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Widget {
    TextParagraph(TextParagraph),
    Image(Image),
    KeyValue(KeyValue),
    Buttons(Vec<Button>),
}

impl Widget {
    pub fn text_paragraph(text: impl Into<String>) -> Self {
        Widget::TextParagraph(TextParagraph { text: text.into() })
    }

    pub fn button(button: Button) -> Self {
        Widget::Buttons(vec![button])
    }

    pub fn image(image: Image) -> Self {
        Widget::Image(image)
    }

    pub fn key_value(key_value: KeyValue) -> Self {
        Widget::KeyValue(key_value)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

impl Section {
    pub fn new(widgets: Vec<Widget>) -> Self {
        Self {
            header: None,
            widgets,
        }
    }

    pub fn with_header(header: impl Into<String>, widgets: Vec<Widget>) -> Self {
        Self {
            header: Some(header.into()),
            widgets,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<CardHeader>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub card_actions: Vec<CardAction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
}

impl Card {
    pub fn is_empty(&self) -> bool {
        self.header.as_ref().is_none_or(CardHeader::is_empty)
            && self.card_actions.is_empty()
            && self.sections.is_empty()
    }

    /// Header, created on first use.
    pub fn header_mut(&mut self) -> &mut CardHeader {
        self.header.get_or_insert_with(CardHeader::default)
    }

    /// Every URL carried by the card, paired with the field it lives in.
    pub fn urls(&self) -> Vec<(&'static str, &str)> {
        let mut urls = Vec::new();
        if let Some(url) = self.header.as_ref().and_then(|h| h.image_url.as_deref()) {
            urls.push(("header.imageUrl", url));
        }
        for action in &self.card_actions {
            on_click_urls(&action.on_click, &mut urls);
        }
        for section in &self.sections {
            for widget in &section.widgets {
                widget_urls(widget, &mut urls);
            }
        }
        urls
    }
}

fn widget_urls<'a>(widget: &'a Widget, urls: &mut Vec<(&'static str, &'a str)>) {
    match widget {
        Widget::TextParagraph(_) => {}
        Widget::Image(image) => {
            urls.push(("image.imageUrl", &image.image_url));
            if let Some(on_click) = &image.on_click {
                on_click_urls(on_click, urls);
            }
        }
        Widget::KeyValue(kv) => {
            if let Some(url) = &kv.icon_url {
                urls.push(("keyValue.iconUrl", url));
            }
            if let Some(on_click) = &kv.on_click {
                on_click_urls(on_click, urls);
            }
            if let Some(button) = &kv.button {
                button_urls(button, urls);
            }
        }
        Widget::Buttons(buttons) => {
            for button in buttons {
                button_urls(button, urls);
            }
        }
    }
}

fn button_urls<'a>(button: &'a Button, urls: &mut Vec<(&'static str, &'a str)>) {
    match button {
        Button::TextButton(text) => on_click_urls(&text.on_click, urls),
        Button::ImageButton(image) => {
            if let Some(url) = &image.icon_url {
                urls.push(("imageButton.iconUrl", url));
            }
            on_click_urls(&image.on_click, urls);
        }
    }
}

fn on_click_urls<'a>(on_click: &'a OnClick, urls: &mut Vec<(&'static str, &'a str)>) {
    if let OnClick::OpenLink(link) = on_click {
        urls.push(("openLink.url", &link.url));
    }
}
