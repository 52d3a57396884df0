//! memhook binary: JSON-lines command loop over stdin/stdout.
//!
//! One command per input line, one reply per output line. Change
//! notifications from running monitors are interleaved on stdout as
//! `memory_value_changed` events.

use anyhow::Result;
use memhook::config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config_path: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);
    let config = config::load_or_default(config_path.as_deref());

    run(config).await
}

#[cfg(windows)]
async fn run(config: memhook::EngineConfig) -> Result<()> {
    use memhook::hooks::MEMORY_VALUE_CHANGED;
    use memhook::os::{SystemApi, WindowsSystem};
    use memhook::{Command, HookService, VERSION};
    use std::io::Write;
    use std::sync::Arc;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tracing::{info, warn};

    info!(version = VERSION, "memhook starting");

    let system = Arc::new(WindowsSystem::new());
    if !system.is_elevated() {
        // A successful relaunch exits this process inside elevate()
        if let Err(e) = system.elevate() {
            warn!(error = %e, "continuing without elevation");
        }
    }

    let (service, mut events) = HookService::new(system, config);
    let service = Arc::new(service);

    let forwarder = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let line = serde_json::json!({
                "event": MEMORY_VALUE_CHANGED,
                "hook_id": event.hook_id,
                "value": event.value,
            });
            println!("{}", line);
            let _ = std::io::stdout().flush();
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<Command>(&line) {
            Ok(command) => service.handle(command).await,
            Err(e) => memhook::CommandResponse::failure(format!("invalid command: {}", e)),
        };
        println!("{}", serde_json::to_string(&reply)?);
    }

    info!("stdin closed, shutting down");
    service.detach_all().await;
    drop(service);
    forwarder.abort();
    Ok(())
}

#[cfg(not(windows))]
async fn run(_config: memhook::EngineConfig) -> Result<()> {
    anyhow::bail!("memhook attaches through Windows process APIs and only runs on Windows");
}
