// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! vital - live cycling telemetry
//!
//! Counts wheel rotations from a GPIO line and serves speed, distance,
//! moving time and calories over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use vital::sensors::{open_source, PulsePump};
use vital::{Config, Engine, HttpServer, VERSION};

/// vital - live cycling telemetry from a wheel rotation sensor
#[derive(Parser, Debug)]
#[command(name = "vital")]
#[command(version = VERSION)]
#[command(about = "Live cycling telemetry from a wheel rotation sensor")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,

    /// Demo mode with a simulated wheel
    #[arg(long)]
    demo: bool,

    /// HTTP port
    #[arg(short, long)]
    port: Option<u16>,

    /// GPIO chip name or path
    #[arg(long)]
    chip: Option<String>,

    /// GPIO line offset
    #[arg(long)]
    line: Option<u32>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load or create configuration
    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)?;

    // Override with command line args
    if args.demo {
        config.sensor.demo_mode = true;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(chip) = args.chip.clone() {
        config.sensor.chip = chip;
    }
    if let Some(line) = args.line {
        config.sensor.line = line;
    }

    // Initialize logging
    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        config.log_level.parse().unwrap_or(Level::INFO)
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(args.debug)
        .with_line_number(args.debug)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("vital v{}", VERSION);
    info!("Configuration loaded from {:?}", config_path);
    info!("Demo mode: {}", config.sensor.demo_mode);

    config.validate().context("invalid configuration")?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(config))
}

async fn run(config: Config) -> Result<()> {
    let config = Arc::new(config);
    let engine = Arc::new(Engine::new(config.clone()));
    info!(
        "Wheel {} m, rider {} kg, idle after {} s",
        config.rider.circumference_metres,
        config.rider.body_weight_kilograms,
        config.rider.idle_timeout_seconds
    );

    // No pulse source, no server
    let source = open_source(&config).context("gpio")?;
    let pump = PulsePump::connect(source, engine.clone())
        .await
        .context("gpio")?;

    let server = HttpServer::bind(config.server.socket_addr(), engine.clone())
        .await
        .with_context(|| format!("failed to bind {}", config.server.socket_addr()))?;

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let pump_task = tokio::spawn(pump.run(shutdown_tx.subscribe()));
    let server_task = tokio::spawn(server.serve(shutdown_tx.subscribe()));

    info!("vital is running! 🚴");
    info!("   Press Ctrl+C to shutdown");

    shutdown_signal().await?;
    info!("Shutdown signal received, cleaning up...");
    let _ = shutdown_tx.send(());

    match pump_task.await {
        Ok(Ok(report)) => info!("Processed {} edge events", report.events),
        Ok(Err(e)) => warn!("Pulse source ended with error: {}", e),
        Err(e) => error!("Pulse pump task failed: {}", e),
    }
    match server_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("server exit: {}", e),
        Err(e) => error!("HTTP server task failed: {}", e),
    }

    info!("vital shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}
