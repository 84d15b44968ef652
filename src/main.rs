//! rpc-facade command line tool.
//!
//! Loads a clients file and talks to the configured services through the
//! same retrying clients applications embed.
//!
//! ```text
//! clients.toml
//!     → config loader (validate every table, collect issues)
//!     → ServiceClient (host pool + health tracker + retry engine)
//!     → ping / hosts output on stdout
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use rpc_facade::config::{load_config, ClientsConfig, ServiceKind};
use rpc_facade::observability::logging;
use rpc_facade::{ErrorCode, ServiceClient};

#[derive(Parser)]
#[command(name = "rpc-facade")]
#[command(about = "Probe the services behind the RPC client facades", long_about = None)]
struct Cli {
    /// Clients configuration file (TOML).
    #[arg(short, long, default_value = "clients.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ping a service and print the result code
    Ping {
        /// catalog_gateway, catalog_storage, event_bus, mail or notification
        service: String,
    },
    /// Print the host pool of a service and the health of each endpoint
    Hosts {
        service: String,

        /// Ping once before printing so the health flags reflect reality
        #[arg(long)]
        probe: bool,
    },
    /// List the services configured in the file
    Services,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            logging::init(None);
            tracing::error!(path = %cli.config.display(), error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    logging::init(Some(&config.observability.log_level));

    match cli.command {
        Commands::Ping { service } => {
            let Some(client) = build_client(&config, &service) else {
                return ExitCode::FAILURE;
            };
            let code = client.ping().await;
            println!("{}", code);
            if code == ErrorCode::Success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::Hosts { service, probe } => {
            let Some(client) = build_client(&config, &service) else {
                return ExitCode::FAILURE;
            };
            if probe {
                let _ = client.ping().await;
            }

            println!("service: {} ({})", client.service(), client.policy());
            for (endpoint, alive) in client.health() {
                println!("  {:<32} {}", endpoint.key(), if alive { "alive" } else { "dead" });
            }
            if let Some(failure) = client.last_failure() {
                println!("last failure: {}", failure);
            }
            ExitCode::SUCCESS
        }
        Commands::Services => {
            for kind in ServiceKind::ALL {
                let state = if config.service(kind).is_some() { "configured" } else { "-" };
                println!("{:<16} {}", kind.name(), state);
            }
            ExitCode::SUCCESS
        }
    }
}

fn build_client(config: &ClientsConfig, service: &str) -> Option<ServiceClient> {
    let Some(kind) = ServiceKind::parse(service) else {
        tracing::error!(service, "Unknown service");
        return None;
    };

    let settings = match kind {
        ServiceKind::EventBus => config.require_event_bus().map(|settings| settings.client),
        _ => config.require(kind),
    };

    match settings {
        Ok(settings) => Some(ServiceClient::new(kind.name(), settings)),
        Err(e) => {
            tracing::error!(service = kind.name(), error = %e, "Service is not usable");
            None
        }
    }
}
