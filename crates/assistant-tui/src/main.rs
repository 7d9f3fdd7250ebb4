use std::sync::Arc;

use anyhow::{Context, Result};
use assistant_core::view::{MessageLog, ScrollTracker, SendToggle, TextBuffer};
use assistant_core::{ChatClient, ChatController, Config, UiHandles};
use clap::{Parser, Subcommand};

mod app;
mod handler;
mod logging;
mod tui;
mod ui;
mod widgets;

use app::{App, ServerStatus};
use tui::{AppEvent, EventHandler};

#[derive(Parser)]
#[command(name = "assistant")]
#[command(about = "Chat with a virtual assistant endpoint from the terminal")]
struct Cli {
    /// Base URL of the chat server (overrides ASSISTANT_SERVER_URL and the config file)
    #[arg(long, global = true)]
    server_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat window (default)
    Chat,
    /// Send one message and print the exchange
    Ask {
        /// Your message
        message: String,
    },
    /// Check whether the chat server is up
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_else(|err| {
        eprintln!("Ignoring unreadable config: {err}");
        Config::new()
    });

    let server_url = config.resolve_server_url(cli.server_url.as_deref());
    let client = ChatClient::with_path(&server_url, config.chat_path());

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(&config, client).await,
        Commands::Ask { message } => {
            logging::init_stderr(config.log_filter.as_deref());
            ask_once(client, &message).await
        }
        Commands::Health => {
            logging::init_stderr(config.log_filter.as_deref());
            check_health(&client).await
        }
    }
}

async fn run_chat(config: &Config, client: ChatClient) -> Result<()> {
    let log_path = logging::init_file(config.log_filter.as_deref())?;
    tracing::info!(server = client.base_url(), log = %log_path.display(), "starting chat window");

    let mut app = App::new(Arc::new(client.clone()), client.base_url());
    app.controller.greet(config.greetings());

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let tx = events.sender();

    // Health check runs in the background so the window opens immediately
    let health_tx = events.sender();
    tokio::spawn(async move {
        let status = match client.health().await {
            Ok(health) if health.is_healthy() => ServerStatus::Healthy,
            Ok(health) => {
                tracing::warn!(status = %health.status, "chat server reports unhealthy");
                ServerStatus::Unreachable
            }
            Err(err) => {
                tracing::warn!(error = %err, "chat server health check failed");
                ServerStatus::Unreachable
            }
        };
        let _ = health_tx.send(AppEvent::Health(status));
    });

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;
            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event, &tx),
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    tracing::info!(entries = app.controller.transcript().len(), "chat window closed");
    result
}

async fn ask_once(client: ChatClient, message: &str) -> Result<()> {
    let handles = UiHandles {
        input: TextBuffer::new(),
        send: SendToggle::default(),
        list: MessageLog::default(),
        scroll: ScrollTracker::default(),
    };
    let mut controller = ChatController::new(handles, Arc::new(client));

    controller.handles_mut().input.set(message);
    controller.submit().await;

    if controller.transcript().is_empty() {
        println!("Nothing to send.");
        return Ok(());
    }

    for entry in controller.transcript().entries() {
        println!("{}: {}", entry.role.label(), entry.content);
    }

    Ok(())
}

async fn check_health(client: &ChatClient) -> Result<()> {
    let status = client
        .health()
        .await
        .with_context(|| format!("{} is unreachable", client.base_url()))?;

    println!("{} is {}", client.base_url(), status.status);
    Ok(())
}
