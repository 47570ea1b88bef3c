//! ChatDesk - terminal front end
//!
//! Renders the session list and conversation from synchronizer snapshots and
//! turns typed lines into synchronizer operations.

mod command;
mod shell;
mod view;

use std::path::PathBuf;

use anyhow::Result;
use chatdesk_core::{ChatDesk, Config};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "chatdesk", version, about = "Chat with the support bot from your terminal")]
struct Args {
    /// Backend base URL (or the full `/api/chat` endpoint)
    #[arg(long)]
    api_url: Option<String>,

    /// Directory for the local settings database
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    chatdesk_core::init_logging(&args.log);

    let mut config = Config::from_env()?;
    if let Some(url) = args.api_url.as_deref() {
        config = config.with_api_url(url)?;
    }
    if let Some(dir) = args.data_dir {
        config = config.with_data_dir(dir);
    }

    tracing::info!(
        api = %config.api_base,
        database = %config.database_path.display(),
        "Starting ChatDesk"
    );

    let desk = ChatDesk::new(config)?;
    desk.initialize().await;

    let synchronizer = desk.synchronizer().clone();
    view::render(&synchronizer.snapshot());
    println!("{}", view::HELP);

    shell::run(synchronizer).await
}
