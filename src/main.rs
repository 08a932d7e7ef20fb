//! Palaver CLI
//!
//! Terminal chat client over the Palaver core: joins rooms and subrooms,
//! sends messages and files, and prints chat activity as it arrives.
//!
//! Commands at the prompt:
//! - `/rooms` — list the room directory
//! - `/join <room> [subroom]` — navigate (reconnects the session)
//! - `/describe` — show the current room's description
//! - `/upload <path>` — upload a file and share it in the current room
//! - `/quit` — exit
//!
//! Anything else is sent as a chat message to the current room.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use palaver::config::Config;
use palaver::render::TerminalRenderer;
use palaver::rooms::{RoomDirectory, RoomNavigator};
use palaver::session::{SessionConfig, SessionController, SessionHandle};
use palaver::transport::WsConnector;
use palaver::upload::UploadClient;

#[derive(Parser)]
#[command(name = "palaver")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal client for Palaver chat rooms")]
struct Cli {
    /// Path to a config file (default: standard locations, then env)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Chat server host, overriding the config
    #[arg(long)]
    host: Option<String>,

    /// Path to the room directory JSON document
    #[arg(short, long, default_value = "rooms.json")]
    rooms: PathBuf,

    /// Room to join on startup
    #[arg(long)]
    join: Option<String>,

    /// Subroom to join on startup (requires --join)
    #[arg(long, requires = "join")]
    subroom: Option<String>,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", palaver::config::generate_default_config());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }

    init_logging(&config);
    tracing::info!("Palaver v{}", env!("CARGO_PKG_VERSION"));

    let raw = std::fs::read_to_string(&cli.rooms)
        .with_context(|| format!("reading room directory {:?}", cli.rooms))?;
    let directory = RoomDirectory::from_json(&raw)?;
    tracing::info!(
        categories = directory.categories.len(),
        "room directory loaded"
    );

    let (session, session_task) = SessionController::spawn(
        Arc::new(WsConnector),
        TerminalRenderer,
        SessionConfig {
            host: config.server.host.clone(),
            tls: config.server.tls,
            reconnect_delay: config.session.reconnect_delay(),
        },
    );

    let uploader = UploadClient::new(
        config.server.http_base(),
        config.server.csrf_token.clone(),
    );

    let mut navigator = RoomNavigator::new(
        directory,
        session.clone(),
        config.session.typing_idle(),
    );

    if let Some(room) = &cli.join {
        match &cli.subroom {
            Some(subroom) => navigator.select_subroom(room, subroom),
            None => navigator.select_room(room),
        };
    }

    run_prompt(&mut navigator, &uploader).await?;

    session.shutdown();
    session_task.await?;
    Ok(())
}

async fn run_prompt(
    navigator: &mut RoomNavigator<SessionHandle>,
    uploader: &UploadClient,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('/') {
            let mut parts = command.split_whitespace();
            match parts.next() {
                Some("quit") | Some("q") => break,
                Some("rooms") => list_rooms(navigator),
                Some("join") => {
                    let room = parts.next();
                    let subroom = parts.next();
                    match (room, subroom) {
                        (Some(room), Some(subroom)) => {
                            navigator.select_subroom(room, subroom);
                        }
                        (Some(room), None) => {
                            navigator.select_room(room);
                        }
                        _ => println!("usage: /join <room> [subroom]"),
                    }
                }
                Some("describe") => match navigator.current_description() {
                    Some(description) => println!("{}", description),
                    None => println!("(no description)"),
                },
                Some("upload") => match parts.next() {
                    Some(path) => upload_and_share(navigator, uploader, path).await,
                    None => println!("usage: /upload <path>"),
                },
                Some(other) => println!("unknown command: /{}", other),
                None => {}
            }
            continue;
        }

        navigator.push_input(&line);
        if !navigator.send_message() {
            println!("(join a room first: /join <room>)");
        }
    }

    Ok(())
}

fn list_rooms(navigator: &RoomNavigator<SessionHandle>) {
    for category in &navigator.directory().categories {
        println!("{}", category.name);
        for room in &category.rooms {
            println!("  {} ({} members)", room.id, room.member_count);
            for subroom in &room.subrooms {
                println!("    #{}", subroom.id);
            }
        }
    }
}

async fn upload_and_share(
    navigator: &mut RoomNavigator<SessionHandle>,
    uploader: &UploadClient,
    path: &str,
) {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            println!("failed to read {}: {}", path, e);
            return;
        }
    };
    let name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string());

    // Upload failure is a notification, never retried
    match uploader.upload(&name, bytes).await {
        Ok(descriptor) => {
            if navigator.send_file_message(descriptor) {
                println!("uploaded {}", name);
            } else {
                println!("(join a room first: /join <room>)");
            }
        }
        Err(e) => println!("failed to upload {}: {}", name, e),
    }
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("palaver={}", config.logging.level)),
    );

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
