use anyhow::Context;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::time::Instant;
use text_classifier::model_manager::{DEFAULT_MODEL_PATH, MODEL_PATH_ENV};
use text_classifier::{Bootstrap, ModelManager, RuntimeConfig, Server};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding model.joblib and vectorizer.joblib
    #[arg(long, env = MODEL_PATH_ENV, default_value = DEFAULT_MODEL_PATH)]
    model_path: PathBuf,

    /// Address to bind the HTTP server to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the HTTP server to
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    port: u16,

    /// HTTP worker threads (0 = one per physical core)
    #[arg(long, env = "WORKERS", default_value_t = 0)]
    workers: usize,

    /// Delete any saved model and retrain before serving
    #[arg(short, long)]
    fresh: bool,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    text_classifier::init_logger();
    let args = Args::parse();

    info!("=== Starting Text Classifier Service ===");

    let manager = ModelManager::new(&args.model_path);
    if args.fresh {
        info!("Fresh model requested - removing any saved artifacts...");
        manager.remove_saved()?;
    }

    let start_time = Instant::now();
    let plan = manager.plan();
    let classifier = tokio::task::spawn_blocking(move || manager.execute(plan))
        .await
        .context("bootstrap task panicked")?
        .with_context(|| {
            let dir = &args.model_path;
            match plan {
                Bootstrap::TrainFresh => format!("failed to train and save model in {:?}", dir),
                Bootstrap::LoadExisting => format!("failed to load model from {:?}", dir),
            }
        })?;
    info!(
        "=== Classifier ready via {:?} (took {:.2?}) ===",
        plan,
        start_time.elapsed()
    );

    let config = RuntimeConfig {
        host: args.host,
        port: args.port,
        workers: args.workers,
    };
    Server::run(classifier, config).await.context("HTTP server failed")?;
    Ok(())
}
