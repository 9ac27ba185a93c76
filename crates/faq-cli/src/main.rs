//! FAQ CLI - Command-line interface and MCP server for the FAQ knowledge base.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use faq_client::FaqClient;
use faq_core::{EndpointConfig, FaqConfig, FaqError, FaqSource, HealthStatus};
use faq_mcp::{format, FaqMcpServer};
use faq_query::{SearchEngine, MAX_RESULTS};

/// FAQ - Expose a FAQ knowledge base to AI assistants
#[derive(Parser)]
#[command(name = "faq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/faq-mcp/config.toml or ./faq-mcp.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API key (overrides FAQ_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server on stdin/stdout (default)
    Serve,

    /// Search every FAQ
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short = 'k', long, default_value = "10")]
        limit: usize,
    },

    /// List FAQs
    List {
        /// Include each FAQ's questions
        #[arg(short, long)]
        questions: bool,
    },

    /// Show one FAQ
    Get {
        /// FAQ number
        faq_number: String,
    },

    /// Check connectivity and credentials
    Health,

    /// Show rate-limit status after a listing request
    Rate,
}

/// Clamp a requested result count to what a search can return.
fn result_limit(requested: usize) -> usize {
    requested.clamp(1, MAX_RESULTS)
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries the MCP stream, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn load_config(cli: &Cli) -> faq_core::Result<FaqConfig> {
    let mut config = match &cli.config {
        Some(path) => FaqConfig::load(path)?,
        None => FaqConfig::load_default()?,
    };
    config.apply_env()?;
    if let Some(key) = &cli.api_key {
        config.api.api_key = Some(key.clone());
    }
    Ok(config)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e.guidance());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> faq_core::Result<()> {
    let config = load_config(&cli)?;
    let endpoint = EndpointConfig::from_config(&config.api)?;
    let client = Arc::new(FaqClient::new(endpoint)?);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(client, config).await,
        Commands::Search { query, limit } => {
            let engine = SearchEngine::new(client);
            let results = engine.search(&query).await?;
            println!(
                "{}",
                format::search_results(query.trim(), &results, result_limit(limit))
            );
            Ok(())
        }
        Commands::List { questions } => {
            let faqs = if questions {
                client.list_faqs_with_questions().await?
            } else {
                client.list_faqs().await?
            };
            println!("{}", format::faq_list(&faqs));
            Ok(())
        }
        Commands::Get { faq_number } => {
            let content = client.get_faq(&faq_number).await?;
            println!("{}", format::faq(&content));
            Ok(())
        }
        Commands::Health => {
            let status = client.health_check().await;
            println!("FAQ service: {}", status);
            if status.is_ok() {
                Ok(())
            } else {
                Err(FaqError::internal(format!("health check failed: {}", status)))
            }
        }
        Commands::Rate => {
            client.list_faqs().await?;
            println!("{}", format::rate_status(&client.rate_status()));
            Ok(())
        }
    }
}

async fn serve(client: Arc<FaqClient>, config: FaqConfig) -> faq_core::Result<()> {
    // Diagnostic only; the server starts regardless of the outcome.
    let checker = client.clone();
    tokio::spawn(async move {
        match checker.health_check().await {
            HealthStatus::Ok => info!("FAQ service reachable"),
            HealthStatus::ConnectionError => {
                warn!("FAQ service unreachable; check your network connection")
            }
            HealthStatus::AuthError => warn!("FAQ service rejected the API key"),
            HealthStatus::Error(message) => warn!("FAQ service health check failed: {}", message),
        }
    });

    let server = FaqMcpServer::new(client, config.server);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    faq_mcp::serve(&server, stdin, tokio::io::stdout()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli::parse_from(["faq"]);
        assert!(cli.command.is_none());

        let cli = Cli::parse_from(["faq", "search", "reset password", "-k", "3"]);
        match cli.command {
            Some(Commands::Search { query, limit }) => {
                assert_eq!(query, "reset password");
                assert_eq!(limit, 3);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_result_limit_is_clamped() {
        assert_eq!(result_limit(0), 1);
        assert_eq!(result_limit(3), 3);
        assert_eq!(result_limit(50), MAX_RESULTS);
    }
}
