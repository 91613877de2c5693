//! matscout entry point

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use matscout::{run_server, Config, MatscoutServer, TransportType};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

/// matscout: natural-language search over crystalline materials
#[derive(Parser, Debug)]
#[command(name = "matscout")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search materials with a natural language query
    Search {
        /// What to look for, e.g. "iron and oxygen" or "Fe2O3"
        query: String,
        /// Property to include (repeatable), e.g. -p band_gap -p density
        #[arg(short = 'p', long = "property")]
        properties: Vec<String>,
        /// Maximum number of results
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,
        /// Search the built-in sample dataset instead of the live database
        #[arg(long)]
        demo: bool,
        /// Materials Project API key (defaults to $MP_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
    },
    /// List properties that can be requested
    Properties,
    /// Check whether an API key is accepted
    CheckKey {
        /// Materials Project API key (defaults to $MP_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Run as MCP server (default behavior)
    Serve {
        /// Transport type (stdio or http). If not specified, uses config file value.
        #[arg(short, long)]
        transport: Option<String>,
        /// HTTP port (when using http transport). If not specified, uses config file value.
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable JSON logging format
        #[arg(long)]
        json_logs: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let is_serve = matches!(args.command, Some(Command::Serve { .. }) | None);

    if !is_serve {
        // Minimal logging for CLI commands
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match args.command {
        Some(Command::Search {
            query,
            properties,
            limit,
            demo,
            api_key,
        }) => {
            let search = cli::SearchArgs {
                query,
                properties,
                limit,
                demo,
                api_key,
            };
            cli::run_search(load_config(&args.config)?, search, args.json).await
        }
        Some(Command::Properties) => cli::run_properties(load_config(&args.config)?, args.json).await,
        Some(Command::CheckKey { api_key }) => {
            cli::run_check_key(load_config(&args.config)?, api_key, args.json).await
        }
        Some(Command::Serve {
            transport,
            port,
            json_logs,
        }) => run_mcp_server(&args.config, transport, port, json_logs).await,
        None => run_mcp_server(&args.config, None, None, false).await,
    }
}

fn load_config(path: &Option<String>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(shellexpand::tilde(path).into_owned())?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Run the MCP server.
async fn run_mcp_server(
    config_path: &Option<String>,
    transport: Option<String>,
    port: Option<u16>,
    json_logs: bool,
) -> anyhow::Result<ExitCode> {
    // Logs go to stderr: stdout carries the stdio transport.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Starting matscout MCP server v{}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config(config_path)?;

    // Override transport from CLI args only if explicitly provided
    if let Some(ref t) = transport {
        config.server.transport = t.parse::<TransportType>()?;
    }
    if let Some(p) = port {
        config.server.http_port = p;
    }

    tracing::info!(
        transport = ?config.server.transport,
        base_url = %config.retrieval.base_url,
        demo_dataset = ?config.demo.dataset_path,
        "Configuration loaded"
    );

    let transport = config.server.transport;
    let port = config.server.http_port;
    let server = MatscoutServer::new(config)?;
    run_server(server, transport, port).await?;

    Ok(ExitCode::SUCCESS)
}
