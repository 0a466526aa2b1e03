use std::net::{IpAddr, SocketAddr};
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;
use referral::{AppState, Classifier, Corpus, PipelineConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, env = "REFERRAL_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "REFERRAL_PORT", default_value_t = 5000)]
    port: u16,

    /// Iteration cap for fitting the classifier
    #[arg(long, default_value_t = 1000)]
    max_iter: usize,
}

/// Accepts bare IPv4 or IPv6 hosts, e.g. `0.0.0.0` or `::1`.
fn bind_addr(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let ip: IpAddr = host
        .parse()
        .with_context(|| format!("Invalid bind host {}", host))?;
    Ok(SocketAddr::new(ip, port))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!("=== Starting referral classifier ===");

    let start_time = Instant::now();
    let corpus = Corpus::builtin();
    let classifier = Classifier::builder()
        .with_config(PipelineConfig::default().with_max_iter(args.max_iter))
        .with_corpus(&corpus)?
        .build()
        .context("Failed to fit classifier")?;

    let details = classifier.info();
    info!(
        "Classifier ready in {:.2?}: {} classes, {} terms, {} examples",
        start_time.elapsed(),
        details.num_classes,
        details.vocabulary_size,
        details.num_examples
    );

    let addr = bind_addr(&args.host, args.port)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    referral::serve(listener, AppState::new(classifier), shutdown_signal())
        .await
        .context("Server error")?;

    info!("=== Server stopped ===");
    Ok(())
}
