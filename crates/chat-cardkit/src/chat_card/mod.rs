pub mod builder;
pub mod message;
pub mod renderers;
pub mod sdk;
pub mod segment;
pub mod types;

pub use builder::{CardBuilder, coalesce_buttons};
pub use message::{ChatMessage, Thread};
pub use renderers::{SdkRenderer, WebhookRenderer};
pub use segment::{Segment, SegmentKind};
pub use types::{
    ActionParameter,
    Button,
    Card,
    CardAction,
    CardHeader,
    FormAction,
    Icon,
    Image,
    ImageButton,
    ImageStyle,
    KeyValue,
    OnClick,
    OpenLink,
    Section,
    TextButton,
    TextParagraph,
    Widget,
};
