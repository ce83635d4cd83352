//! The load → resolve → aggregate → overlay session pipeline.
//!
//! Each stage consumes the previous stage's value and returns a new one;
//! nothing is shared or mutated between stages. Changing the environment
//! override invalidates the whole chain, so callers restart from
//! [`load`] (or [`run_session`]) rather than patching a finished
//! [`Session`].

use crate::{
    aggregate::merge_groups,
    error::ConfigFetchError,
    favorites::{build_favorites_group, FavoritesSet},
    loader::{load_environment_config, load_link_documents, ConfigSource},
    model::{EnvMode, Environment, EnvironmentConfig, LinkGroup, LinkItem},
    probe::ReachabilityProbe,
    resolver::{resolve, Resolution},
    status::StatusMessage,
};

/// Stage 1: environment descriptor loaded.
#[derive(Debug, Clone)]
pub struct Loaded {
    /// Normalized descriptor.
    pub config: EnvironmentConfig,
}

/// Stage 2: effective environment decided.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Normalized descriptor.
    pub config: EnvironmentConfig,
    /// Resolution outcome.
    pub resolution: Resolution,
}

/// Stage 3: link documents merged.
#[derive(Debug, Clone)]
pub struct Aggregated {
    /// Normalized descriptor.
    pub config: EnvironmentConfig,
    /// Resolution outcome.
    pub resolution: Resolution,
    /// Merged groups in first-appearance order.
    pub groups: Vec<LinkGroup>,
}

/// Load the environment descriptor.
pub async fn load<S>(source: &S) -> Result<Loaded, ConfigFetchError>
where
    S: ConfigSource + ?Sized,
{
    Ok(Loaded {
        config: load_environment_config(source).await?,
    })
}

impl Loaded {
    /// Decide the environment; probes only when nothing pins it.
    pub async fn resolve<P>(self, user_override: Option<EnvMode>, prober: &P) -> Resolved
    where
        P: ReachabilityProbe + ?Sized,
    {
        let resolution = resolve(user_override, &self.config, prober).await;
        Resolved {
            config: self.config,
            resolution,
        }
    }
}

impl Resolved {
    /// Fetch both link documents concurrently and merge them.
    pub async fn aggregate<S>(self, source: &S) -> Result<Aggregated, ConfigFetchError>
    where
        S: ConfigSource + ?Sized,
    {
        let (common, context) =
            load_link_documents(source, self.resolution.environment).await?;
        let groups = merge_groups(&common.groups, &context.groups);
        Ok(Aggregated {
            config: self.config,
            resolution: self.resolution,
            groups,
        })
    }
}

impl Aggregated {
    /// Synthesize the favorites group.
    pub fn overlay(self, favorites: &FavoritesSet) -> Session {
        let favorites_group = build_favorites_group(&self.groups, favorites);
        Session {
            config: self.config,
            resolution: self.resolution,
            groups: self.groups,
            favorites_group,
        }
    }
}

/// Run every stage. Any document failure aborts before a session exists.
pub async fn run_session<S, P>(
    source: &S,
    prober: &P,
    user_override: Option<EnvMode>,
    favorites: &FavoritesSet,
) -> Result<Session, ConfigFetchError>
where
    S: ConfigSource + ?Sized,
    P: ReachabilityProbe + ?Sized,
{
    tracing::info!(source = %source.describe(), "loading navigation session");
    let session = load(source)
        .await?
        .resolve(user_override, prober)
        .await
        .aggregate(source)
        .await?
        .overlay(favorites);
    tracing::info!(
        environment = %session.environment(),
        groups = session.groups.len(),
        favorites = session.favorites_group.as_ref().map_or(0, |group| group.links.len()),
        "navigation session ready"
    );
    Ok(session)
}

/// Final pipeline value handed to the presentation layer.
#[derive(Debug, Clone)]
pub struct Session {
    config: EnvironmentConfig,
    resolution: Resolution,
    groups: Vec<LinkGroup>,
    favorites_group: Option<LinkGroup>,
}

impl Session {
    /// Normalized descriptor the session was built from.
    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// How the environment was decided.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Effective environment.
    pub fn environment(&self) -> Environment {
        self.resolution.environment
    }

    /// Merged groups, without the favorites group.
    pub fn groups(&self) -> &[LinkGroup] {
        &self.groups
    }

    /// Synthesized favorites group, if any favorite matched.
    pub fn favorites_group(&self) -> Option<&LinkGroup> {
        self.favorites_group.as_ref()
    }

    /// Groups in display order: favorites first, then merge order.
    pub fn display_groups(&self) -> Vec<&LinkGroup> {
        self.favorites_group
            .iter()
            .chain(self.groups.iter())
            .collect()
    }

    /// Rebuild only the favorites overlay from an authoritative set. No
    /// document is fetched and the environment is kept.
    pub fn with_favorites(self, favorites: &FavoritesSet) -> Self {
        Aggregated {
            config: self.config,
            resolution: self.resolution,
            groups: self.groups,
        }
        .overlay(favorites)
    }

    /// First merged link carrying identity `key`.
    pub fn find_link(&self, key: &str) -> Option<&LinkItem> {
        self.groups
            .iter()
            .flat_map(|group| &group.links)
            .find(|link| link.identity_key() == key)
    }

    /// Success status line for this session.
    pub fn status(&self) -> StatusMessage {
        StatusMessage::Loaded {
            environment: self.environment(),
        }
    }
}
