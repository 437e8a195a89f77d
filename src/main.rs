mod cli;

use streamcat::{config, server};
use streamcat_db::migrations;
use streamcat_db::pool::{get_conn, init_pool};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config::validate_config(&config)?;

    tracing::info!("Starting Streamcat server");

    let db_path = config::database_path(&config);
    tracing::info!("Opening catalog database at {}", db_path);
    let db_pool = init_pool(&db_path, config.database.pool_size)?;

    server::start_server(config, db_pool).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "streamcat=trace,streamcat_db=debug,streamcat_common=debug,tower_http=debug".to_string()
        } else {
            "streamcat=debug,streamcat_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Migrate => migrate(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("streamcat {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn migrate(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let db_path = config::database_path(&config);

    // init_pool applies anything pending.
    let pool = init_pool(&db_path, 1)?;
    let conn = get_conn(&pool)?;
    let version = migrations::current_version(&conn)?;

    println!("✓ Catalog database at {} is at schema version {}", db_path, version);
    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!(
                "  Database: {} (pool size {})",
                config.database.path, config.database.pool_size
            );
            println!(
                "  Streaming: {} byte reads, Cache-Control {:?}",
                config.streaming.read_buffer_bytes, config.streaming.cache_control
            );
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Database: {}", config.database.path);
        }
    }

    Ok(())
}
