//! Runs the HTTP server.
//!
//! Host and port come from `config.json` unless overridden on the command
//! line.

use crate::{
    api::{self, AppState},
    db::db::Db,
    libs::{config::Config, messages::Message},
    msg_info,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind, overrides the configured host
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overrides the configured port
    #[arg(short, long)]
    port: Option<u16>,
}

pub async fn cmd(args: ServeArgs) -> Result<()> {
    let config = Config::read()?;
    let mut server = config.server_config();
    if let Some(host) = args.host {
        server.host = host;
    }
    if let Some(port) = args.port {
        server.port = port;
    }

    let address = server.address();
    msg_info!(Message::ServerStarting(address.clone()));

    let state = AppState::new(Db::new()?.into_shared()).with_config(config);
    api::serve(state, &address).await
}
