//! Command line for kerbside: serve the collections API or look up one address.

use std::io::{self, Write as _};
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kerbside_server::{ConnectionArgs, build_service, serve};

#[derive(Debug, Parser)]
#[command(name = "kerbside", version, about = "Find bin collection days for an address")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve `GET /collections?address=...` over HTTP.
    Serve {
        /// Socket address to listen on.
        #[arg(long, env = "KERBSIDE_BIND", default_value = "0.0.0.0:8080")]
        bind: SocketAddr,
    },
    /// Print the council and upcoming collections for one address.
    Lookup {
        /// Street address, e.g. "21 Chancellors Walk, Clayton".
        address: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so lookup output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let service = Arc::new(build_service(&cli.connection)?);

    match cli.command {
        Command::Serve { bind } => serve(bind, service).await,
        Command::Lookup { address } => {
            let report = service.collections_for(address.trim()).await?;

            let mut stdout = io::stdout().lock();
            writeln!(stdout, "Council: {}", report.council)?;
            if report.collections.is_empty() {
                writeln!(stdout, "No upcoming collections published for this address.")?;
            }
            for event in &report.collections {
                let icon = event.icon.as_deref().unwrap_or("-");
                writeln!(
                    stdout,
                    "{}  {:<24} {icon}",
                    event.date.format("%a %d/%m/%Y"),
                    event.label
                )?;
            }
            Ok(())
        }
    }
}
