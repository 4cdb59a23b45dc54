use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

pub const CARDKIT_CONFIG_SCHEMA_VERSION: u32 = 1;

const ENV_DROP_EMPTY_CARD: &str = "CHAT_CARDKIT_DROP_EMPTY_CARD";
const ENV_CHECK_URLS: &str = "CHAT_CARDKIT_CHECK_URLS";

fn default_schema_version() -> u32 {
    CARDKIT_CONFIG_SCHEMA_VERSION
}

/// Builder options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CardKitConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Leave the builder's own card out of the output when it is empty and
    /// other cards were passed through the pipeline.
    #[serde(default)]
    pub drop_empty_card: bool,
    /// Require absolute http(s) URLs for images, icons and links.
    #[serde(default)]
    pub check_urls: bool,
}

impl Default for CardKitConfig {
    fn default() -> Self {
        Self {
            schema_version: CARDKIT_CONFIG_SCHEMA_VERSION,
            drop_empty_card: false,
            check_urls: false,
        }
    }
}

impl CardKitConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema_version != CARDKIT_CONFIG_SCHEMA_VERSION {
            return Err(ConfigError::UnsupportedSchemaVersion {
                expected: CARDKIT_CONFIG_SCHEMA_VERSION,
                got: self.schema_version,
            });
        }
        Ok(())
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_slice(bytes).map_err(ConfigError::Parse)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `CHAT_CARDKIT_DROP_EMPTY_CARD` and
    /// `CHAT_CARDKIT_CHECK_URLS`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(flag) = env_flag(&lookup, ENV_DROP_EMPTY_CARD) {
            self.drop_empty_card = flag;
        }
        if let Some(flag) = env_flag(&lookup, ENV_CHECK_URLS) {
            self.check_urls = flag;
        }
        self
    }
}

fn env_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    let raw = lookup(key)?;
    let flag = parse_flag(&raw);
    if flag.is_none() {
        tracing::warn!(key, value = %raw, "ignoring unrecognized boolean in environment");
    }
    flag
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported schema version: expected {expected}, got {got}")]
    UnsupportedSchemaVersion { expected: u32, got: u32 },
    #[error("invalid config: {0}")]
    Parse(#[source] serde_json::Error),
}
