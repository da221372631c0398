use anyhow::{anyhow, Result};
use clap::Parser;
use std::{fmt::Debug, path::PathBuf};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use p6_mcp_server::config;
use p6_mcp_server::server::{run_server, RequestsLoggingLevel};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
#[clap(version, about = "MCP discovery bridge for the Primavera P6 REST API")]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Base URL of the P6 REST API, e.g. https://p6.example.com/p6ws/restapi
    #[clap(long, env = "P6_BASE_URL")]
    pub p6_base_url: Option<String>,

    /// Public URL advertised in the discovery documents.
    /// Derived from the request Host header when not set.
    #[clap(long, env = "BASE_URL")]
    pub public_base_url: Option<String>,

    /// Timeout in seconds for each P6 request.
    #[clap(long, default_value_t = 10)]
    pub upstream_timeout_sec: u64,

    /// The maximum age of the discovery documents in client caches, in seconds.
    #[clap(long, default_value_t = 3600)]
    pub discovery_cache_age_sec: usize,

    /// Value of the Access-Control-Allow-Origin header.
    #[clap(long, default_value = "*")]
    pub cors_origin: String,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,
}

impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            port: args.port,
            p6_base_url: args.p6_base_url.clone(),
            public_base_url: args.public_base_url.clone(),
            upstream_timeout_sec: args.upstream_timeout_sec,
            discovery_cache_age_sec: args.discovery_cache_age_sec,
            cors_origin: args.cors_origin.clone(),
            logging_level: args.logging_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // TOML overrides CLI
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  port: {}", app_config.port);
    info!("  P6 base URL: {:?}", app_config.upstream.base_url());
    info!("  public base URL: {:?}", app_config.public_base_url);
    info!("  upstream timeout: {}s", app_config.upstream_timeout_sec);

    run_server(app_config.server_config()).await
}
