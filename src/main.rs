#![forbid(unsafe_code)]

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use resonate_cast_receiver::constants;
use resonate_cast_receiver::display::Display;
use resonate_cast_receiver::engine::EngineSession;
use resonate_cast_receiver::ipc;
use resonate_cast_receiver::launch::QueryParams;
use resonate_cast_receiver::storage::{JsonFileStore, KeyValueStore, MemoryStore};
use resonate_cast_receiver::Bootstrap;

/// Cast receiver: connects this device to a Resonate playback server
#[derive(Parser, Debug)]
#[command(name = "resonate-cast-receiver", version, about)]
struct Cli {
    /// Launch URL or query string, e.g. "?server=http://host:8095&player_id=kitchen"
    #[arg(long, value_name = "URL")]
    launch: Option<String>,

    /// Server base URL override (persisted for later runs)
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Player id override (persisted for later runs)
    #[arg(long, value_name = "ID")]
    player_id: Option<String>,

    /// Playback engine socket (default: $XDG_RUNTIME_DIR/resonate/engine.sock)
    #[arg(long, value_name = "PATH")]
    engine_socket: Option<PathBuf>,

    /// Local store file (default: <config dir>/resonate-cast-receiver/storage.json)
    #[arg(long, value_name = "PATH", conflicts_with = "no_persist")]
    storage: Option<PathBuf>,

    /// Keep server URL and player id in memory only for this run
    #[arg(long)]
    no_persist: bool,

    /// Also print the sync/format debug line
    #[arg(long)]
    show_debug: bool,
}

impl Cli {
    /// Launch query with explicit flags layered on top
    fn launch_params(&self) -> QueryParams {
        let mut params = self
            .launch
            .as_deref()
            .map(QueryParams::parse)
            .unwrap_or_default();
        if let Some(server) = &self.server {
            params.insert(constants::launch::SERVER, server.clone());
        }
        if let Some(player_id) = &self.player_id {
            params.insert(constants::launch::PLAYER_ID, player_id.clone());
        }
        params
    }
}

fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    // Logs go to stderr, display lines to stdout
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    let cli = Cli::parse();

    // One logical thread of control, like the browser page it replaces
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    info!("Initializing cast receiver");

    let params = cli.launch_params();
    let mut store: Box<dyn KeyValueStore> = if cli.no_persist {
        info!("Persistence disabled, using in-memory store");
        Box::new(MemoryStore::new())
    } else {
        let store_path = cli.storage.clone().unwrap_or_else(JsonFileStore::default_path);
        Box::new(
            JsonFileStore::open(&store_path).with_context(|| {
                format!("Failed to open local store at {}", store_path.display())
            })?,
        )
    };

    let socket_path = match cli.engine_socket.clone() {
        Some(path) => path,
        None => ipc::default_socket_path()?,
    };

    let mut display = Display::new().with_status(|text| println!("[status] {text}"));
    if cli.show_debug {
        display = display.with_debug(|text| println!("[debug] {text}"));
    }

    let receiver = Bootstrap::new(&params, store.as_mut(), display)
        .start(|config, subscriber| EngineSession::new(config, subscriber, socket_path))
        .await;

    if let Some(err) = receiver.failure() {
        return Err(anyhow!("{err}"));
    }

    info!(
        player_id = receiver.player_id().unwrap_or_default(),
        base_url = receiver.base_url().unwrap_or_default(),
        "Receiver running, press Ctrl+C to exit"
    );
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;
    info!("Shutting down");
    Ok(())
}
