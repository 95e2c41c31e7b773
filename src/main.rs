use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dossier::{config, context, db, server};

#[derive(Parser)]
#[command(name = "dossier", version, about = "Project-scoped context store for AI coding agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (stdio transport)
    Serve,
    /// Start the REST API server
    Http,
    /// Rebuild the tag index from stored contexts
    Reindex,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::DossierConfig::load()?;

    // Initialize tracing with the configured log level.
    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => {
            server::serve_stdio(config).await?;
        }
        Command::Http => {
            server::serve_http(config).await?;
        }
        Command::Reindex => {
            let mut conn = db::open_database(config.resolved_db_path())?;
            let memberships = context::tags::rebuild_tag_index(&mut conn)?;
            println!("tag index rebuilt: {memberships} memberships");
        }
    }

    Ok(())
}
