use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use torchctl_rs::{app, config, link::Endpoint};

/// Control a Minecraft Torch lamp over its WebSocket.
#[derive(Parser, Debug)]
#[command(name = "torchctl", version)]
struct Args {
    /// Config file (defaults to ./config.yaml if present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Torch host name or address.
    #[arg(long, env = "TORCH_HOST")]
    host: Option<String>,
    /// WebSocket port, 81 unless the config says otherwise.
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config_root = match &args.config {
        Some(path) => config::read_config_yaml(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => config::read_config_or_default("./config.yaml").context("reading ./config.yaml")?,
    };

    let host = match args.host.clone().or_else(|| config_root.device.host.clone()) {
        Some(host) => host,
        None => bail!("no torch host given (use --host, TORCH_HOST or device.host in the config)"),
    };
    let port = args.port.unwrap_or(config_root.device.port);

    app::serve(config_root, Endpoint::new(host, port))?;

    Ok(())
}
