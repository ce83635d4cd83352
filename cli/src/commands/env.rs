//! `env`: switching the environment override.

use anyhow::Result;
use navflow_shared::EnvMode;

use super::{show, App};

/// Persist the override and restart the pipeline from the descriptor. The
/// previous resolution is never reused.
pub async fn run(app: &mut App, mode: EnvMode) -> Result<String> {
    app.prefs_mut().set_env_override(mode)?;
    tracing::info!(mode = %mode, "environment override changed, reloading");

    let page = show::run(app, None).await?;
    Ok(format!("environment override: {mode}\n{page}"))
}
