use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chat_cardkit::{CardHeader, CardKit, CardKitConfig, ImageStyle};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chat-cardkit")]
#[command(about = "Build chat card messages from a JSON segment pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read tagged segments (file or stdin) and print the message payload.
    Build {
        #[arg(long, value_name = "SEGMENTS_JSON")]
        input: Option<PathBuf>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        subtitle: Option<String>,
        #[arg(long, value_parser = parse_image_style)]
        image_style: Option<ImageStyle>,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        text: Option<String>,
        #[arg(long, value_name = "THREAD_NAME")]
        thread: Option<String>,
        #[arg(long, value_name = "CONFIG_JSON")]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Webhook)]
        format: Format,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Webhook,
    Sdk,
}

fn parse_image_style(value: &str) -> Result<ImageStyle, String> {
    ImageStyle::parse(value).ok_or_else(|| format!("expected image or avatar, got {value}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Build {
            input,
            title,
            subtitle,
            image_style,
            image_url,
            text,
            thread,
            config,
            format,
        } => {
            let kit = match config {
                Some(path) => CardKit::new(load_config(&path)?).context("invalid config")?,
                None => CardKit::from_env(),
            };
            let segments = read_segments(input.as_deref())?;
            let header = CardHeader {
                title,
                subtitle,
                image_style,
                image_url,
            };
            let mut message = kit
                .build_message(header, &segments, text.as_deref())
                .context("failed to build cards")?;
            if let Some(thread) = thread {
                message = message.thread(thread);
            }
            let output = match format {
                Format::Webhook => kit.render_webhook(&message)?,
                Format::Sdk => serde_json::to_value(kit.render_sdk(&message))?,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<CardKitConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    CardKitConfig::from_json_slice(&bytes).with_context(|| format!("parse config {}", path.display()))
}

fn read_segments(path: Option<&Path>) -> Result<Vec<Value>> {
    let raw = match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("read segments {}", path.display()))?
        }
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str::<Value>(&raw).context("segments must be JSON")? {
        Value::Array(values) => Ok(values),
        other => Err(anyhow!(
            "segments must be a JSON array of tagged segments, got {}",
            kind_of(&other)
        )),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
