mod config;

use clap::{Parser, Subcommand};
use config::ParleyConfig;
use parley_agent::{ModelGateway, TurnPipeline};
use parley_gateway::GatewayServer;
use parley_session::StreamRegistry;
use parley_skills::SkillRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "parley.toml";

#[derive(Parser)]
#[command(name = "parley", about = "Parley: tool-calling chat with streamed answers")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Inspect tools
    Tools {
        #[command(subcommand)]
        action: ToolsAction,
    },
}

#[derive(Subcommand)]
enum ToolsAction {
    /// List the tools offered to the model
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ParleyConfig::load(path, true)?,
        None => ParleyConfig::load(&PathBuf::from(DEFAULT_CONFIG), false)?,
    };
    config.apply_env(|key| std::env::var(key).ok())?;

    let mut registry = SkillRegistry::new();
    parley_builtins::register_builtins(&mut registry);

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);

            info!(count = registry.skill_count(), "Built-in tools registered");
            info!(
                provider = ?config.model.provider,
                model = %config.model.model_id,
                base_url = %config.model.base_url(),
                "Model configured"
            );

            let streams = StreamRegistry::new();
            let pipeline = Arc::new(TurnPipeline::new(
                ModelGateway::new(config.model),
                Arc::new(registry),
                streams,
                config.pipeline,
            ));
            let app = GatewayServer::build(pipeline, config.stream);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!(addr = %addr, "Parley listening");
            axum::serve(listener, app).await?;
        }
        Commands::Tools { action } => match action {
            ToolsAction::List => {
                let tools = registry.list_descriptors();
                println!("Registered tools:");
                for tool in &tools {
                    println!("  {}: {}", tool.name, tool.description);
                }
                println!("\nTotal: {} tool(s)", tools.len());
            }
        },
    }

    Ok(())
}
