use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use nutrition_ai_agent::api;
use nutrition_ai_agent::commands::{CommandHandler, Flow};
use nutrition_ai_agent::config::AppConfig;
use nutrition_ai_agent::food::api::UsdaClient;
use nutrition_ai_agent::food::NutritionAdvisor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Serve the HTTP API instead of the interactive prompt
    #[arg(long)]
    api: bool,

    #[arg(long)]
    port: Option<u16>,

    #[arg(long)]
    log_level: Option<String>,

    #[arg(long)]
    usda_api_key: Option<String>,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    colored::control::set_override(true);

    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    if let Some(key) = &args.usda_api_key {
        config.food = config.food.with_api_key(key.clone());
    }

    init_tracing(&config.log_level);
    tracing::info!(
        usda_key_configured = config.food.has_api_key(),
        base_url = %config.food.base_url,
        "configuration loaded"
    );
    if !config.food.has_api_key() {
        tracing::warn!("USDA_API_KEY is not set; search and lookup are unavailable");
    }

    let page_size = config.food.page_size;
    let client = UsdaClient::new(config.food.clone());
    let advisor = NutritionAdvisor::new(Arc::new(client)).with_page_size(page_size);

    if args.api {
        run_api_server(advisor, config.port).await
    } else {
        run_cli_mode(advisor).await
    }
}

async fn run_api_server(advisor: NutritionAdvisor, port: u16) -> Result<()> {
    let app = api::create_api(advisor);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await.context("API server stopped")?;
    Ok(())
}

async fn run_cli_mode(advisor: NutritionAdvisor) -> Result<()> {
    let mut command_handler = CommandHandler::new(advisor);

    // Show initial help menu
    command_handler.handle_command("help").await?;

    let mut rl = Editor::<(), DefaultHistory>::new()?;

    loop {
        match rl.readline("🥕 ") {
            Ok(line) => {
                let input = line.trim();
                let _ = rl.add_history_entry(input);

                match command_handler.handle_command(input).await {
                    Ok(Flow::Exit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
