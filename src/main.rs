use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ward_chat::config::{BACKEND_URL_VAR, ConfigError, GREETING_DELAY_VAR, GREETING_TEXT_VAR, WidgetConfig};
use ward_chat::render::render_panel;
use ward_chat::transport::{HttpTransport, Transport, TransportError};
use ward_chat::widget::ChatWidget;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("terminal io failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "ward-chat", about = "Hospital assistant chat widget for the terminal")]
struct Cli {
    /// Backend chat endpoint; overrides `CHAT_BACKEND_URL`.
    #[arg(long)]
    backend_url: Option<String>,

    /// Delay before the greeting appears; overrides `CHAT_GREETING_DELAY_MS`.
    #[arg(long)]
    greeting_delay_ms: Option<u64>,

    #[arg(long)]
    greeting_text: Option<String>,

    /// Start with the panel open.
    #[arg(long, default_value_t = false)]
    open: bool,
}

impl Cli {
    fn override_for(&self, key: &str) -> Option<String> {
        match key {
            BACKEND_URL_VAR => self.backend_url.clone(),
            GREETING_DELAY_VAR => self.greeting_delay_ms.map(|ms| ms.to_string()),
            GREETING_TEXT_VAR => self.greeting_text.clone(),
            _ => None,
        }
    }
}

/// One line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Open,
    Close,
    Toggle,
    Quit,
    Say(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "/open" => Self::Open,
            "/close" => Self::Close,
            "/toggle" => Self::Toggle,
            "/quit" | "/exit" => Self::Quit,
            _ => Self::Say(line.to_owned()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ward_chat=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = WidgetConfig::from_lookup(|key| cli.override_for(key).or_else(|| std::env::var(key).ok()))?;
    info!(backend = %config.backend_url, "ward-chat starting");

    let widget = Arc::new(ChatWidget::connect(&config)?);
    if cli.open {
        widget.open().await;
    }
    run(widget).await
}

async fn run(widget: Arc<ChatWidget<HttpTransport>>) -> Result<(), CliError> {
    let mut updates = widget.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    draw(&widget).await;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                draw(&widget).await;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Input::parse(&line) {
                    Input::Quit => break,
                    Input::Open => widget.open().await,
                    Input::Close => widget.close().await,
                    Input::Toggle => widget.toggle().await,
                    Input::Say(text) => {
                        say(&widget, text).await;
                    }
                }
            }
        }
    }

    widget.close().await;
    info!("ward-chat exiting");
    Ok(())
}

/// Send a typed line as one turn. The text is taken and checked against the
/// in-flight gate in a single reducer step, so a line typed while a reply is
/// pending is dropped rather than replacing the pending one.
async fn say<T: Transport + 'static>(widget: &Arc<ChatWidget<T>>, text: String) -> Option<JoinHandle<()>> {
    let state = widget.snapshot().await;
    if !state.is_open() {
        println!("(panel closed; type /open to chat)");
        return None;
    }
    // Input is disabled while a reply is pending.
    if state.is_loading() {
        return None;
    }

    let widget = Arc::clone(widget);
    Some(tokio::spawn(async move { widget.submit(text).await }))
}

async fn draw(widget: &ChatWidget<HttpTransport>) {
    let state = widget.snapshot().await;
    println!();
    for line in render_panel(&state) {
        println!("{line}");
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
