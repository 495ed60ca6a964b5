use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use crate::shared::DEFAULT_DECKS_PATH;

#[derive(Debug, Parser)]
#[command(name = "gem-exchange-server")]
#[command(about = "Authoritative server for a two-player gem-trading card game")]
pub struct Args {
    /// Address to listen on
    pub ip: IpAddr,

    /// Port to listen on
    pub port: u16,

    /// Deck catalog (JSON, keyed by tier)
    #[arg(long, default_value = DEFAULT_DECKS_PATH)]
    pub decks: PathBuf,

    /// Seed for deck shuffles; omit for a random deal
    #[arg(long)]
    pub seed: Option<u64>,

    /// Tracing filter, overrides RUST_LOG
    #[arg(long)]
    pub log_filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub decks_path: PathBuf,
    pub seed: Option<u64>,
    pub log_filter: Option<String>,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            bind: SocketAddr::new(args.ip, args.port),
            decks_path: args.decks,
            seed: args.seed,
            log_filter: args.log_filter,
        }
    }
}
