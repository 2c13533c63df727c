//! Developer tasks for the storefront suite.
//!
//! ```bash
//! # Serve the storefront twin until Ctrl-C
//! cargo run -p xtask -- twin --port 8080
//!
//! # Register an account on the configured site and save it
//! PASSWORD=Secret123! cargo run -p xtask -- register --output target/testData.json
//!
//! # Show how to install the browsers the suite drives
//! cargo run -p xtask -- install-browsers
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use webshop_pages::{BrowserKind, Config, CredentialStore, Session, register_account};
use webshop_twin::TwinServer;

/// Credential file written by `register` when neither flag nor env names one
const DEFAULT_CREDENTIALS_FILE: &str = "target/testData.json";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Demo Web Shop suite tasks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the storefront twin until interrupted
    Twin {
        /// Interface to listen on
        #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
        host: IpAddr,

        /// Port to listen on (0 picks a free one)
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },
    /// Register a fresh account and write its credential file
    Register {
        /// Where to write the record; defaults to WEBSHOP_CREDENTIALS_FILE
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the command that installs the driven browsers
    InstallBrowsers {
        /// Only this browser (chromium, firefox or webkit)
        #[arg(short, long)]
        browser: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match Cli::parse().command {
        Command::Twin { host, port } => serve_twin(SocketAddr::new(host, port)).await,
        Command::Register { output } => register(output).await,
        Command::InstallBrowsers { browser } => install_browsers(browser.as_deref()),
    }
}

async fn serve_twin(addr: SocketAddr) -> Result<()> {
    let server = TwinServer::bind(addr)
        .await
        .with_context(|| format!("failed to bind storefront twin on {addr}"))?;
    println!("Storefront twin at {}", server.url());
    println!("Run the suite against it with WEBSHOP_LIVE=1 WEBSHOP_BASE_URL={}", server.url());

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    info!("shutting down");
    server.shutdown();
    Ok(())
}

async fn register(output: Option<PathBuf>) -> Result<()> {
    let config = Config::from_env().context("failed to read configuration")?;
    let path = output
        .or_else(|| config.credentials_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_FILE));

    let session = Session::start(&config)
        .await
        .context("failed to start browser session")?;
    let registered = register_account(&session).await;
    session.close().await.context("failed to close session")?;
    let credentials = registered.context("registration failed")?;

    CredentialStore::new(&path)
        .save(&credentials)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Registered {} -> {}", credentials.email, path.display());
    Ok(())
}

fn install_browsers(browser: Option<&str>) -> Result<()> {
    let version = playwright_rs::PLAYWRIGHT_VERSION;
    match browser {
        Some(name) => {
            let kind: BrowserKind = name.parse().context("unknown browser")?;
            println!("npx playwright@{version} install {}", kind.as_str());
        }
        None => println!("npx playwright@{version} install chromium firefox webkit"),
    }
    Ok(())
}
