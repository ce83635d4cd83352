//! Deciding the effective environment for a session.

use crate::{
    model::{EnvMode, Environment, EnvironmentConfig},
    probe::ReachabilityProbe,
};

/// Why the session ended up in its environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionBasis {
    /// The persisted user override.
    Override,
    /// `mode` in the environment descriptor.
    Configured,
    /// The reachability probe.
    Probed {
        /// Whether any candidate answered.
        reachable: bool,
    },
}

/// Outcome of environment resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Effective environment.
    pub environment: Environment,
    /// Which rule decided it.
    pub basis: ResolutionBasis,
}

/// Resolve with the first matching rule: a non-`Auto` override, then a
/// non-`Auto` configured mode, then the probe over `config.probe_urls`.
///
/// The prober is only called in the last case.
pub async fn resolve<P>(
    user_override: Option<EnvMode>,
    config: &EnvironmentConfig,
    prober: &P,
) -> Resolution
where
    P: ReachabilityProbe + ?Sized,
{
    let resolution = if let Some(environment) = user_override.and_then(EnvMode::forced) {
        Resolution {
            environment,
            basis: ResolutionBasis::Override,
        }
    } else if let Some(environment) = config.mode.forced() {
        Resolution {
            environment,
            basis: ResolutionBasis::Configured,
        }
    } else {
        let reachable = prober.probe(&config.probe_urls, config.probe_timeout).await;
        Resolution {
            environment: if reachable { Environment::Intranet } else { Environment::Internet },
            basis: ResolutionBasis::Probed {
                reachable,
            },
        }
    };

    tracing::info!(
        environment = %resolution.environment,
        basis = ?resolution.basis,
        "environment resolved"
    );
    resolution
}

/// [`resolve`] without the basis.
pub async fn resolve_environment<P>(
    user_override: Option<EnvMode>,
    config: &EnvironmentConfig,
    prober: &P,
) -> Environment
where
    P: ReachabilityProbe + ?Sized,
{
    resolve(user_override, config, prober).await.environment
}
