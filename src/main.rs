use std::io::Read;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use igor_bot::application::errors::ConfigError;
use igor_bot::application::services::CommandService;
use igor_bot::domain::entities::Request;
use igor_bot::infrastructure::config::{Config, ConfigSource, Settings, DEFAULT_CONFIG};
use igor_bot::infrastructure::http::HttpFetcher;
use igor_bot::plugins::{self, PluginRegistry};

#[derive(Parser)]
#[command(name = "igor")]
#[command(about = "A Slack slash command bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path, ignored when IGOR_CONFIG is set
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle a single slash command event and print the JSON response
    Run {
        /// Gateway event JSON, or the raw form body; `-` reads stdin
        #[arg(default_value = "-")]
        event: String,
    },
    /// Ask Igor something directly, skipping token validation
    Ask {
        /// What you would type after the slash command
        text: Vec<String>,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

/// Body of an API gateway proxy event
#[derive(Debug, Deserialize)]
struct GatewayEvent {
    #[serde(default)]
    body: String,
}

fn main() {
    // Logs go to stderr, stdout carries the response
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { event } => read_event(&event).and_then(|body| {
            let request = parse_event(&body);
            respond(&cli.config, request, false)
        }),
        Commands::Ask { text } => respond(&cli.config, Request::from_text(text.join(" ")), true),
        Commands::Version => {
            println!("igor v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => {
            init_config();
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn read_event(event: &str) -> Result<String, ConfigError> {
    if event != "-" {
        return Ok(event.to_string());
    }
    let mut body = String::new();
    std::io::stdin().read_to_string(&mut body)?;
    Ok(body)
}

/// Accept a gateway event wrapping the form body, or the form body itself
fn parse_event(raw: &str) -> Request {
    let raw = raw.trim();
    match serde_json::from_str::<GatewayEvent>(raw) {
        Ok(event) => Request::from_query(&event.body),
        Err(_) => Request::from_query(raw),
    }
}

fn respond(config_path: &str, request: Request, trusted: bool) -> Result<(), ConfigError> {
    let config = Config::load_env_or(config_path)?;
    let settings = Settings::from_config(config)?;
    let fetcher = HttpFetcher::new(settings.worker_timeout())
        .map_err(|e| ConfigError::Parse(format!("HTTP client: {}", e)))?;

    let registry = PluginRegistry::build(
        plugins::available(&settings, Arc::new(fetcher)),
        settings.config.allow_list(),
        settings.config.deny_list(),
    );
    tracing::info!("Igor ready with {} plugins", registry.len());

    let service = CommandService::new(settings.config.token.clone(), Arc::new(registry));
    let request = if trusted {
        request.with_token(settings.config.token.clone())
    } else {
        request
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let response = runtime.block_on(service.handle(&request));
    let json = serde_json::to_string(&response)
        .map_err(|e| ConfigError::Parse(format!("Failed to encode response: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn init_config() {
    println!("{}", DEFAULT_CONFIG);
    println!("# Save this to config.yaml and adjust as needed.");
}
