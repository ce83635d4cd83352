//! `resolve`: the environment decision alone.

use anyhow::{Context, Result};
use navflow_shared::{pipeline, resolver::ResolutionBasis};
use serde::Serialize;

use super::App;

#[derive(Serialize)]
struct ResolveOutput {
    environment: String,
    basis: &'static str,
    reachable: Option<bool>,
    configured_mode: String,
    probe_urls: Vec<String>,
    probe_timeout_ms: u64,
}

/// Resolve the environment without fetching any link document.
pub async fn run(app: &App, json: bool) -> Result<String> {
    let resolved = pipeline::load(&app.source)
        .await?
        .resolve(app.prefs.env_override(), &app.prober)
        .await;

    let (basis, reachable) = match resolved.resolution.basis {
        ResolutionBasis::Override => ("override", None),
        ResolutionBasis::Configured => ("configured", None),
        ResolutionBasis::Probed {
            reachable,
        } => ("probe", Some(reachable)),
    };
    let output = ResolveOutput {
        environment: resolved.resolution.environment.to_string(),
        basis,
        reachable,
        configured_mode: resolved.config.mode.to_string(),
        probe_urls: resolved.config.probe_urls.clone(),
        probe_timeout_ms: resolved.config.probe_timeout.as_millis() as u64,
    };

    if json {
        let mut encoded =
            serde_json::to_string_pretty(&output).context("failed to encode resolution")?;
        encoded.push('\n');
        return Ok(encoded);
    }
    Ok(format!("{} ({})\n", output.environment, output.basis))
}
