//! RGB Pipeline - Main Entry Point

use pipeline::{init_logging, spawn_stdin_control, Pipeline, PipelineConfig, QUEUE_SLOTS};
use std::path::PathBuf;
use std::sync::Arc;
use text_sink::SerializedSink;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os("RGB_PIPELINE_CONFIG"))
        .map(PathBuf::from);

    let config = PipelineConfig::load(config_path.as_deref())?;
    init_logging(config.log_level()?)?;

    info!("=== RGB Pipeline v{} ===", env!("CARGO_PKG_VERSION"));
    info!(?config, "Configuration loaded");

    let pipeline = Pipeline::<QUEUE_SLOTS>::new(&config, Arc::new(SerializedSink::stdout()));

    if config.stdin_control {
        spawn_stdin_control(Arc::clone(pipeline.context().slowdown()))?;
        info!("Reading slowdown commands from stdin (+, -, or a number)");
    }

    let report = pipeline
        .run(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!(
        ticks = report.ticks,
        produced = report.produced,
        ticks_per_attempt = report.ticks_per_attempt,
        "Shutdown complete"
    );
    Ok(())
}
