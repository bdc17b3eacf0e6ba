use std::net::SocketAddr;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use veracity::{build_router, AppConfig, AppState, ArtifactLoader, InferencePipeline, PipelineError};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the statement form over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, env = "VERACITY_BIND", default_value = "127.0.0.1:8501")]
        bind: SocketAddr,
    },
    /// Classify a single statement and print the result
    Predict {
        /// The statement to classify
        statement: String,
    },
}

fn build_pipeline(config: &AppConfig, loader: &ArtifactLoader) -> Result<InferencePipeline> {
    let start_time = Instant::now();
    let artifacts = loader.load()?;
    let pipeline = InferencePipeline::builder()
        .with_artifacts(&artifacts)
        .with_preprocessing(config.preprocessing)
        .build()?;
    info!("=== Artifacts loaded (took {:.2?}) ===", start_time.elapsed());
    Ok(pipeline)
}

async fn serve(config: &AppConfig, bind: SocketAddr) -> Result<()> {
    let loader = config.artifact_loader();
    let state = match build_pipeline(config, &loader) {
        Ok(pipeline) => {
            info!("Preprocessing mode: {}", config.preprocessing.as_str());
            AppState::ready(pipeline)
        }
        Err(e) => {
            error!("Failed to load artifacts: {:#}", e);
            error!("Serving the error page only; no statements will be classified");
            AppState::unavailable()
        }
    };

    if !state.is_ready() {
        warn!("Health endpoint will report unavailable");
    }

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("Listening on http://{}", bind);

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

fn predict(config: &AppConfig, statement: &str) -> Result<()> {
    let pipeline = build_pipeline(config, &config.artifact_loader())
        .context("Model files not found or failed to load")?;

    match pipeline.predict(statement) {
        Ok(prediction) => {
            println!("Label: {}", prediction.label);
            println!("Confidence: {}%", prediction.confidence_display());
            Ok(())
        }
        Err(PipelineError::EmptyInput) => bail!("Please enter a statement."),
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    veracity::init_logger();
    let args = Args::parse();

    info!("Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Serve { bind } => serve(&args.config, bind).await,
        Command::Predict { statement } => predict(&args.config, &statement),
    }
}
