//! Command-line interface.
//!
//! Each subcommand lives in its own module exposing an `Args` struct and a
//! `cmd` function; [`Cli::menu`] parses the arguments and dispatches.

pub mod export;
pub mod import;
pub mod init;
pub mod serve;
pub mod user;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Run the HTTP export/import server")]
    Serve(serve::ServeArgs),
    #[command(about = "Export a user's data to a file")]
    Export(export::ExportArgs),
    #[command(about = "Import an export bundle for a user", arg_required_else_help = true)]
    Import(import::ImportArgs),
    #[command(about = "Manage users and API tokens", subcommand)]
    User(user::UserCommand),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Serve(args) => serve::cmd(args).await,
            Commands::Export(args) => export::cmd(args),
            Commands::Import(args) => import::cmd(args),
            Commands::User(command) => user::cmd(command),
        }
    }
}
