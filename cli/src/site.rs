//! Picking a document source from the configured site root.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use navflow_shared::{
    loader::{ConfigSource, DirSource, HttpSource},
    ConfigFetchError,
};

/// A site served over HTTP(S) or read from disk.
#[derive(Debug, Clone)]
pub enum SiteSource {
    /// `http://` or `https://` root.
    Http(HttpSource),
    /// Local directory.
    Dir(DirSource),
}

impl SiteSource {
    /// Interpret `root` as a URL when it has an http(s) scheme, otherwise as
    /// a directory.
    pub fn open(root: &str, timeout: Duration) -> Result<Self> {
        let lowered = root.trim().to_ascii_lowercase();
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            Ok(Self::Http(HttpSource::new(root.trim(), timeout)?))
        } else {
            Ok(Self::Dir(DirSource::new(root)))
        }
    }

    /// Whether the site origin is secure, which enables https probe
    /// variants.
    pub fn is_secure(&self) -> bool {
        match self {
            Self::Http(source) => source.is_secure(),
            Self::Dir(_) => false,
        }
    }
}

#[async_trait]
impl ConfigSource for SiteSource {
    fn describe(&self) -> String {
        match self {
            Self::Http(source) => source.describe(),
            Self::Dir(source) => source.describe(),
        }
    }

    async fn fetch(&self, resource: &str) -> Result<Vec<u8>, ConfigFetchError> {
        match self {
            Self::Http(source) => source.fetch(resource).await,
            Self::Dir(source) => source.fetch(resource).await,
        }
    }
}
