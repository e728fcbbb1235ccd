mod cli;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use memoria_core::config::Config;
use memoria_store::DocumentStore;
use serde::Deserialize;
use serde_json::Value;

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = Config::load_or_default(config_path);

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting memoria server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    memoria_server::start(config).await?;
    Ok(())
}

/// One document of an import file. Files are arrays of these, applied in
/// order, so items land in the store in the order they are listed.
#[derive(Debug, Deserialize)]
struct ImportEntry {
    path: String,
    data: Value,
}

fn parse_import(contents: &str) -> Result<Vec<ImportEntry>> {
    serde_json::from_str(contents)
        .context("import file must be a JSON array of {\"path\", \"data\"} entries")
}

async fn import_documents(file: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let documents = parse_import(&contents)?;

    let store = memoria_server::open_store(&config)?;
    for entry in &documents {
        store
            .put(&entry.path, entry.data.clone())
            .await
            .with_context(|| format!("failed to import {}", entry.path))?;
        tracing::debug!("Imported {}", entry.path);
    }

    println!(
        "Imported {} documents into {}",
        documents.len(),
        config.server.db_path.display()
    );
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let contents = std::fs::read_to_string(p)
                .with_context(|| format!("failed to read {}", p.display()))?;
            Config::from_json(&contents)?
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    let warnings = config.validate();
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Database: {}", config.server.db_path.display());
    println!("  Auth enabled: {}", config.auth.enabled);
    println!("  Auth tokens: {}", config.auth.tokens.len());
    if warnings.is_empty() {
        println!("✓ Configuration is valid");
        Ok(())
    } else {
        for warning in &warnings {
            println!("✗ {warning}");
        }
        bail!("configuration has {} problem(s)", warnings.len())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise the verbose flag picks the defaults.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "memoria=trace,memoria_server=trace,memoria_store=debug,memoria_core=debug,tower_http=debug".to_string()
        } else {
            "memoria=debug,memoria_server=debug,memoria_store=info,tower_http=info".to_string()
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
        Commands::Import { file } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(import_documents(&file, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("memoria {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
