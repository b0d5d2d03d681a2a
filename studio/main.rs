/// Health Plant Index Studio
///
/// A browser front end for the HPI pipeline: upload a plant photo, get its
/// score, health status, and jet heat-map.  Served by a synchronous
/// tiny_http server; no JavaScript frameworks required.
///
/// Run with:
///   cargo run --bin studio --release
/// Then open http://127.0.0.1:5000
///
/// Endpoints:
///   GET  /                         upload page
///   POST /                         score an upload (HTML)
///   POST /api/hpi[?inline=1&values=1]  score an upload (JSON)
///   GET  /spectral_images/{name}   stored heat-maps

mod state;
mod render;
mod routes;
mod handlers;
mod util;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;
use tiny_http::Server;

use state::{StudioConfig, StudioState};

#[derive(Parser, Debug)]
#[command(author, version, about = "Web studio for the Health Plant Index")]
struct Args {
    /// Studio configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind, e.g. 127.0.0.1:5000
    #[arg(long)]
    addr: Option<String>,

    /// Directory for saved uploads
    #[arg(long)]
    upload_dir: Option<PathBuf>,

    /// Directory for rendered heat-maps
    #[arg(long)]
    spectral_dir: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<StudioConfig> {
    let mut config = match &args.config {
        Some(path) => StudioConfig::load_json(&path.to_string_lossy())
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => StudioConfig::default(),
    };
    if let Some(addr) = &args.addr {
        config.addr = addr.clone();
    }
    if let Some(dir) = &args.upload_dir {
        config.upload_dir = dir.clone();
    }
    if let Some(dir) = &args.spectral_dir {
        config.spectral_dir = dir.clone();
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args  = Args::parse();
    let state = StudioState::new(load_config(&args)?);
    state.ensure_dirs().context("Failed to create upload/heat-map directories")?;

    let addr   = state.config.addr.clone();
    let server = Server::http(&addr).map_err(|e| anyhow!("Failed to bind HTTP server on {}: {}", addr, e))?;

    println!("╔══════════════════════════════════════════════╗");
    println!("║          Health Plant Index Studio           ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  Open in your browser:                       ║");
    println!("║  http://{:<37}║", addr);
    println!("╚══════════════════════════════════════════════╝");
    info!(
        "uploads -> {}, heat-maps -> {}",
        state.config.upload_dir.display(),
        state.config.spectral_dir.display()
    );

    let shared_state = Arc::new(state);

    // Each request is dispatched on its own thread; the state is read-only,
    // and heat-map names are derived from the upload file name.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
    Ok(())
}
