use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use sinusoidal::{config, server, Catalog, ServerConfig};
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(name = "sinusoidal")]
#[command(about = "Serves synthetic sine wave series over a small JSON API")]
#[command(version)]
struct Args {
    /// Address to listen on
    #[arg(short, long, env = "SINUSOIDAL_LISTEN", default_value = "127.0.0.1:7766")]
    listen: SocketAddr,

    /// Most samples a single series request may generate
    #[arg(long, env = "SINUSOIDAL_MAX_POINTS", default_value_t = config::DEFAULT_MAX_POINTS)]
    max_points: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let catalog = Catalog::predefined().context("invalid predefined catalog")?;
    info!("starting with {} predefined series", catalog.len());

    server::run_server(
        catalog,
        ServerConfig {
            listen_addr: args.listen,
            max_points: args.max_points,
        },
    )
    .await
}
