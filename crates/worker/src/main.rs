use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seqjobs_core::scripts::ScriptRegistry;
use seqjobs_slurm::SlurmClient;
use seqjobs_worker::{run_manifest, Manifest, WorkerConfig, WorkerError};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seqjobs_worker=info,seqjobs_pipeline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "Pipeline pass failed");
            ExitCode::FAILURE
        }
    }
}

/// One pass over the manifest. Returns `false` if any stage aborted.
async fn run() -> Result<bool, WorkerError> {
    // --- Configuration ---
    let config = WorkerConfig::from_env()?;
    tracing::info!(
        manifest = %config.manifest.display(),
        scripts = %config.scripts.display(),
        submit = %config.commands.submit.join(" "),
        "Loaded worker configuration",
    );

    let manifest = Manifest::load(&config.manifest)?;
    let scripts = Arc::new(ScriptRegistry::load(&config.scripts)?);
    tracing::info!(stages = manifest.stages.len(), "Loaded pipeline manifest");

    // --- Stages ---
    let scheduler = SlurmClient::new(config.commands);
    let results = run_manifest(manifest, scripts, scheduler).await;

    let aborted = results.iter().filter(|r| r.result.is_err()).count();
    tracing::info!(
        stages = results.len(),
        aborted,
        "Pipeline pass complete",
    );
    Ok(aborted == 0)
}
