use clap::{Parser, Subcommand};
use tracing::info;

use legalyze_server::{build_router, startup};

#[derive(Parser)]
#[command(name = "legalyze-server", version, about = "Legal document analysis server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve {
        /// Bind address, overrides HOST
        #[arg(long)]
        host: Option<String>,
        /// Listen port, overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the effective configuration with secrets redacted
    Config,
}

fn load_config() -> legalyze_core::Config {
    legalyze_core::config::load_dotenv();
    legalyze_core::Config::from_env()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut config = load_config();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve { host: None, port: None }) {
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config.redacted_summary())?);
            Ok(())
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
    }
}

async fn serve(config: legalyze_core::Config) -> anyhow::Result<()> {
    config.log_summary();

    let state = startup::build_app_state(&config).await?;
    let app = build_router(state, &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);
    info!("API docs at http://{}/docs", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
