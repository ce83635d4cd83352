//! Fetching the environment descriptor, link documents and locale
//! dictionaries from a site root.

use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    error::ConfigFetchError,
    i18n::{Dictionary, Locale},
    model::{Environment, EnvironmentConfig, EnvironmentDescriptor, LinkDocument},
};

/// Environment descriptor location.
pub const ENV_RESOURCE: &str = "config/env.json";
/// Context-independent link document location.
pub const COMMON_LINKS_RESOURCE: &str = "config/links.common.json";

/// Somewhere site documents can be read from.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Human-readable origin, for logs.
    fn describe(&self) -> String;

    /// Raw body of `resource` (a site-relative path such as
    /// `config/env.json`).
    async fn fetch(&self, resource: &str) -> Result<Vec<u8>, ConfigFetchError>;
}

/// Site published over HTTP(S). Every fetch bypasses caches.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base: Url,
    client: reqwest::Client,
}

impl HttpSource {
    /// Build a source rooted at `base` with its own client.
    pub fn new(base: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base = Url::parse(base).with_context(|| format!("invalid site url: {base}"))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build site http client")?;
        Ok(Self::with_client(base, client))
    }

    /// Build a source around an existing client.
    pub fn with_client(mut base: Url, client: reqwest::Client) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            base,
            client,
        }
    }

    /// Whether documents are served from a secure (https) origin.
    pub fn is_secure(&self) -> bool {
        self.base.scheme() == "https"
    }

    /// Root every resource is resolved against.
    pub fn base(&self) -> &Url {
        &self.base
    }
}

#[async_trait]
impl ConfigSource for HttpSource {
    fn describe(&self) -> String {
        self.base.to_string()
    }

    async fn fetch(&self, resource: &str) -> Result<Vec<u8>, ConfigFetchError> {
        let mut url = self.base.join(resource).map_err(|err| ConfigFetchError::InvalidLocation {
            resource: resource.to_string(),
            detail: err.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("_ts", &Utc::now().timestamp_millis().to_string());

        let response = self
            .client
            .get(url)
            .header("Cache-Control", "no-cache, no-store, max-age=0")
            .header("Pragma", "no-cache")
            .send()
            .await
            .map_err(|err| ConfigFetchError::Transport {
                resource: resource.to_string(),
                detail: err.to_string(),
            })?;

        let status = response.status();
        tracing::debug!(resource, status = status.as_u16(), "site document response");
        if !status.is_success() {
            return Err(ConfigFetchError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| ConfigFetchError::Transport {
                resource: resource.to_string(),
                detail: err.to_string(),
            })?;
        Ok(body.to_vec())
    }
}

/// Site checked out on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Serve documents from below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    fn resolve(&self, resource: &str) -> Result<PathBuf, ConfigFetchError> {
        let relative = Path::new(resource);
        let escapes = relative
            .components()
            .any(|part| !matches!(part, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ConfigFetchError::InvalidLocation {
                resource: resource.to_string(),
                detail: "path leaves the site root".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ConfigSource for DirSource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    async fn fetch(&self, resource: &str) -> Result<Vec<u8>, ConfigFetchError> {
        let path = self.resolve(resource)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(ConfigFetchError::Missing {
                resource: resource.to_string(),
            }),
            Err(err) => Err(ConfigFetchError::Transport {
                resource: resource.to_string(),
                detail: err.to_string(),
            }),
        }
    }
}

/// Which link document to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScope {
    /// Shared by every environment.
    Common,
    /// Overlay for one environment.
    Context(Environment),
}

impl LinkScope {
    /// Site-relative location of the document.
    pub fn resource(self) -> String {
        match self {
            Self::Common => COMMON_LINKS_RESOURCE.to_string(),
            Self::Context(environment) => environment.links_resource(),
        }
    }
}

async fn fetch_json<S, T>(source: &S, resource: &str) -> Result<T, ConfigFetchError>
where
    S: ConfigSource + ?Sized,
    T: DeserializeOwned,
{
    let body = source.fetch(resource).await?;
    serde_json::from_slice(&body).map_err(|err| ConfigFetchError::Parse {
        resource: resource.to_string(),
        detail: err.to_string(),
    })
}

/// Load and normalize `config/env.json`. A `null` body means all defaults.
pub async fn load_environment_config<S>(source: &S) -> Result<EnvironmentConfig, ConfigFetchError>
where
    S: ConfigSource + ?Sized,
{
    let descriptor: Option<EnvironmentDescriptor> = fetch_json(source, ENV_RESOURCE).await?;
    let config = EnvironmentConfig::from(descriptor.unwrap_or_default());
    tracing::info!(
        mode = %config.mode,
        probe_candidates = config.probe_urls.len(),
        probe_timeout_ms = config.probe_timeout.as_millis() as u64,
        "environment config loaded"
    );
    Ok(config)
}

/// Load one link document. A `null` body is an empty document.
pub async fn load_link_document<S>(
    source: &S,
    scope: LinkScope,
) -> Result<LinkDocument, ConfigFetchError>
where
    S: ConfigSource + ?Sized,
{
    let resource = scope.resource();
    let document: Option<LinkDocument> = fetch_json(source, &resource).await?;
    let document = document.unwrap_or_default();
    tracing::debug!(resource = %resource, groups = document.groups.len(), "link document loaded");
    Ok(document)
}

/// Fetch the common and context documents concurrently. Either failure fails
/// the pair; no partial result is returned.
pub async fn load_link_documents<S>(
    source: &S,
    environment: Environment,
) -> Result<(LinkDocument, LinkDocument), ConfigFetchError>
where
    S: ConfigSource + ?Sized,
{
    tokio::try_join!(
        load_link_document(source, LinkScope::Common),
        load_link_document(source, LinkScope::Context(environment)),
    )
}

/// Load `i18n/{locale}.json`. Any failure yields an empty dictionary.
pub async fn load_dictionary<S>(source: &S, locale: Locale) -> Dictionary
where
    S: ConfigSource + ?Sized,
{
    let resource = locale.dictionary_resource();
    match fetch_json::<S, Dictionary>(source, &resource).await {
        Ok(dictionary) => {
            tracing::debug!(locale = %locale, entries = dictionary.len(), "locale dictionary loaded");
            dictionary
        },
        Err(err) => {
            tracing::warn!("locale dictionary unavailable, using raw keys: {err}");
            Dictionary::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write(root: &Path, resource: &str, body: &str) {
        let path = root.join(resource);
        fs::create_dir_all(path.parent().expect("resource parent")).expect("create dirs");
        fs::write(path, body).expect("write resource");
    }

    #[tokio::test]
    async fn dir_source_loads_descriptor_and_documents() {
        let dir = TempDir::new().expect("temp dir");
        write(dir.path(), ENV_RESOURCE, r#"{"mode":"internet"}"#);
        write(dir.path(), COMMON_LINKS_RESOURCE, r#"{"groups":[{"title":"常用"}]}"#);
        write(dir.path(), "config/links.internet.json", "null");
        let source = DirSource::new(dir.path());

        let config = load_environment_config(&source)
            .await
            .expect("load env");
        assert_eq!(config.mode, crate::model::EnvMode::Internet);

        let (common, context) = load_link_documents(&source, Environment::Internet)
            .await
            .expect("load documents");
        assert_eq!(common.groups.len(), 1);
        assert!(context.groups.is_empty());
    }

    #[tokio::test]
    async fn null_fields_do_not_fail_the_load() {
        let dir = TempDir::new().expect("temp dir");
        write(
            dir.path(),
            COMMON_LINKS_RESOURCE,
            r#"{"groups":[{"title":null,"title_en":null,"links":[{"name":"白板","url":null,"tags":null}]}]}"#,
        );
        write(dir.path(), "config/links.intranet.json", r#"{"groups":null}"#);
        let source = DirSource::new(dir.path());

        let (common, context) = load_link_documents(&source, Environment::Intranet)
            .await
            .expect("null fields read as empty");
        assert!(context.groups.is_empty());
        let merged = crate::aggregate::merge_groups(&common.groups, &context.groups);
        assert_eq!(merged[0].title, crate::aggregate::UNNAMED_GROUP_TITLE);
        assert_eq!(merged[0].links[0].identity_key(), "白板");
    }

    #[tokio::test]
    async fn missing_context_document_fails_the_pair() {
        let dir = TempDir::new().expect("temp dir");
        write(dir.path(), COMMON_LINKS_RESOURCE, r#"{"groups":[]}"#);
        let source = DirSource::new(dir.path());

        let err = load_link_documents(&source, Environment::Intranet)
            .await
            .expect_err("context document is missing");
        assert_eq!(err.resource(), "config/links.intranet.json");
        assert!(matches!(err, ConfigFetchError::Missing { .. }));
    }

    #[tokio::test]
    async fn malformed_descriptor_is_a_parse_error() {
        let dir = TempDir::new().expect("temp dir");
        write(dir.path(), ENV_RESOURCE, "{ mode: intranet");
        let source = DirSource::new(dir.path());

        let err = load_environment_config(&source)
            .await
            .expect_err("descriptor is not json");
        assert!(matches!(err, ConfigFetchError::Parse { .. }));
        assert!(err.to_string().starts_with("config/env.json"));
    }

    #[tokio::test]
    async fn dir_source_rejects_parent_traversal() {
        let dir = TempDir::new().expect("temp dir");
        let source = DirSource::new(dir.path());
        let err = source
            .fetch("../secrets.json")
            .await
            .expect_err("traversal rejected");
        assert!(matches!(err, ConfigFetchError::InvalidLocation { .. }));
    }

    #[tokio::test]
    async fn absent_dictionary_is_empty() {
        let dir = TempDir::new().expect("temp dir");
        let source = DirSource::new(dir.path());
        let dictionary = load_dictionary(&source, Locale::EnUs).await;
        assert_eq!(dictionary.t("siteTitle"), "siteTitle");
    }

    #[test]
    fn http_source_base_gets_trailing_slash() {
        let base = Url::parse("https://nav.example.com/portal").expect("url");
        let source = HttpSource::with_client(base, reqwest::Client::new());
        assert_eq!(source.base().as_str(), "https://nav.example.com/portal/");
        assert!(source.is_secure());
    }
}
