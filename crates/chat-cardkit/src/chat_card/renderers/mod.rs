pub mod sdk;
pub mod webhook;

pub use sdk::SdkRenderer;
pub use webhook::WebhookRenderer;
