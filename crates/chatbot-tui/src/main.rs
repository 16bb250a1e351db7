use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Result;
use chatbot_core::{ChatClient, ChatSession, Config};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "chatbot")]
#[command(version, about = "Terminal chat client for an HTTP chat service")]
struct Cli {
    /// Chat service endpoint (overrides CHATBOT_ENDPOINT and the config file)
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive chat (default)
    Chat,
    /// Send one message and print the reply
    Send {
        /// Message text
        message: String,
    },
    /// Show or change saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the endpoint that would be used and where it came from
    Show,
    /// Save the chat service endpoint
    SetEndpoint {
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load().unwrap_or_else(|err| {
        warn!(error = %err, "could not read config, using defaults");
        Config::new()
    });
    let endpoint = config.resolve_endpoint(cli.endpoint.as_deref());

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(ChatClient::new(&endpoint)).await?,
        Commands::Send { message } => send_once(ChatClient::new(&endpoint), &message).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("endpoint: {}", endpoint);
                println!("config:   {}", Config::config_path()?.display());
                println!("log:      {}", Config::log_path()?.display());
            }
            ConfigAction::SetEndpoint { url } => {
                Config::save_endpoint(&url)?;
                println!("Saved endpoint {}", url);
            }
        },
    }

    Ok(())
}

async fn run_chat(client: ChatClient) -> Result<()> {
    info!(endpoint = %client.endpoint(), "starting chat");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let mut app = App::new(client, events.sender());

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
    }
    Ok(())
}

async fn send_once(client: ChatClient, message: &str) {
    let mut session = ChatSession::new();
    session.input = message.to_string();

    if let Some(entry) = session.submit_and_wait(&client).await {
        if let Some(reply) = session.transcript().get(entry) {
            println!("{}", reply.content);
        }
    }
}

/// Log to a file: the terminal belongs to the UI.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let Ok(log_path) = Config::log_path() else {
        return;
    };
    if let Some(parent) = log_path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("chatbot=debug,chatbot_core=debug,info")
        } else {
            EnvFilter::new("chatbot=info,chatbot_core=info,warn")
        }
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}
