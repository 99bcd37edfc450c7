//! Sentiment pipeline server binary

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use sentiment_pipeline::server::{self, AppState};
use sentiment_pipeline::{Classifier, Config, MemoryStore, PanasClassifier, Pipeline};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_PROCS: usize = 4;

#[derive(Parser, Debug)]
#[command(name = "sentiment-pipeline")]
#[command(about = "Community sentiment analysis over a partitioned pipeline", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "sentiment.toml")]
    config: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Listen port, overriding the configured address's port
    #[arg(long)]
    port: Option<u16>,

    /// Partitions per pipeline stage
    #[arg(long)]
    partitions: Option<usize>,

    /// Slots per partition
    #[arg(long)]
    partition_buffer: Option<usize>,

    /// Number of runtime worker threads
    #[arg(short = 'p', long, default_value_t = DEFAULT_MAX_PROCS)]
    max_procs: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(args.max_procs.max(1))
        .enable_all()
        .build()?;

    runtime.block_on(run(args))
}

/// Load the config file (or defaults) and apply command-line overrides.
///
/// Returns whether a file was read.
fn load_config(args: &Args) -> anyhow::Result<(Config, bool)> {
    let from_file = args.config.exists();
    let mut config = if from_file {
        Config::load(&args.config)?
    } else {
        Config::default()
    };

    if let Some(port) = args.port {
        config.server.set_port(port)?;
    }
    if let Some(partitions) = args.partitions {
        config.pipeline.partitions = partitions;
    }
    if let Some(buffer) = args.partition_buffer {
        config.pipeline.partition_buffer = buffer;
    }

    config.validate()?;
    Ok((config, from_file))
}

/// RUST_LOG wins, then --verbose, then the configured level
fn init_logging(verbose: bool, level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { level }));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(args: Args) -> anyhow::Result<()> {
    let (config, from_file) = load_config(&args)?;
    init_logging(args.verbose, &config.logging.level);

    info!("Starting sentiment-pipeline v{}", sentiment_pipeline::VERSION);
    if !from_file {
        info!("No config file found at {:?}, using default configuration", args.config);
    }

    let classifier: Arc<dyn Classifier> = Arc::new(PanasClassifier::new());
    let store = Arc::new(MemoryStore::new(classifier.clone()));
    let pipeline = Arc::new(Pipeline::new(&config.pipeline, store, classifier)?);
    pipeline.start()?;

    let listener = tokio::net::TcpListener::bind(config.server.socket_addr()?).await?;
    info!("Starting server on {}", listener.local_addr()?);

    server::serve(listener, AppState::new(pipeline.clone()), async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutting down...");
    })
    .await?;

    pipeline.stop().await;
    info!("Shutdown complete");
    Ok(())
}
