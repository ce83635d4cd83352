//! Documents and values that flow through the navigation pipeline.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Deserializer, Serialize};

/// Probe timeout applied when the descriptor omits one or gives a
/// non-positive value.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 1500;

/// Default link target when a document leaves it empty.
pub const DEFAULT_LINK_TARGET: &str = "_blank";

/// Configured (or user-forced) environment mode.
///
/// Also used as the persisted user override, where `Auto` means "no
/// override".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EnvMode {
    /// Decide by probing.
    #[default]
    Auto,
    /// Force the restricted network context.
    Intranet,
    /// Force the general network context.
    Internet,
}

impl EnvMode {
    /// Stable lower-case name, as written to storage and documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Intranet => "intranet",
            Self::Internet => "internet",
        }
    }

    /// Parse a mode the way the descriptor is read: trimmed, case-insensitive,
    /// with anything unrecognised meaning `Auto`.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    /// The environment this mode pins, if it pins one.
    pub fn forced(self) -> Option<Environment> {
        match self {
            Self::Auto => None,
            Self::Intranet => Some(Environment::Intranet),
            Self::Internet => Some(Environment::Internet),
        }
    }
}

impl FromStr for EnvMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "intranet" => Ok(Self::Intranet),
            "internet" => Ok(Self::Internet),
            other => Err(format!("unknown environment mode: {other}")),
        }
    }
}

impl fmt::Display for EnvMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The effective network context for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// Restricted network reachable.
    Intranet,
    /// General network only.
    Internet,
}

impl Environment {
    /// Lower-case context name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intranet => "intranet",
            Self::Internet => "internet",
        }
    }

    /// Location of the context-specific link document.
    pub fn links_resource(self) -> String {
        format!("config/links.{}.json", self.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `config/env.json` exactly as published.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentDescriptor {
    /// `auto`, `intranet` or `internet`.
    #[serde(default)]
    pub mode: Option<String>,
    /// Legacy single probe endpoint.
    #[serde(default)]
    pub probe_url: Option<String>,
    /// Ordered probe endpoints.
    #[serde(default)]
    pub probe_urls: Option<Vec<String>>,
    /// Per-candidate probe timeout in milliseconds.
    #[serde(default)]
    pub probe_timeout_ms: Option<f64>,
}

/// Normalized environment configuration, immutable for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentConfig {
    /// Configured mode.
    pub mode: EnvMode,
    /// Candidates probed in order when `mode` is `Auto`.
    pub probe_urls: Vec<String>,
    /// Bound applied to each candidate.
    pub probe_timeout: Duration,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            mode: EnvMode::Auto,
            probe_urls: Vec::new(),
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
        }
    }
}

impl From<EnvironmentDescriptor> for EnvironmentConfig {
    fn from(raw: EnvironmentDescriptor) -> Self {
        let mode = raw
            .mode
            .as_deref()
            .map(EnvMode::parse_lenient)
            .unwrap_or_default();

        // The plural list wins; a lone `probeUrl` is the older spelling.
        let candidates = match raw.probe_urls {
            Some(urls) => urls,
            None => raw.probe_url.into_iter().collect(),
        };
        let probe_urls = candidates
            .into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();

        let timeout_ms = raw
            .probe_timeout_ms
            .filter(|ms| ms.is_finite() && *ms >= 1.0)
            .map(|ms| ms.round() as u64)
            .unwrap_or(DEFAULT_PROBE_TIMEOUT_MS);

        Self {
            mode,
            probe_urls,
            probe_timeout: Duration::from_millis(timeout_ms),
        }
    }
}

/// A primary/secondary locale string pair. Either slot may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalePair<'a> {
    /// Primary-locale (zh-CN) text.
    pub primary: &'a str,
    /// Secondary-locale (en-US) text.
    pub secondary: &'a str,
}

impl<'a> LocalePair<'a> {
    /// Pair two slots.
    pub fn new(primary: &'a str, secondary: &'a str) -> Self {
        Self {
            primary,
            secondary,
        }
    }

    /// True when neither slot carries text.
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }
}

/// `{ "groups": [...] }`, the shape of both link documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkDocument {
    /// Groups in document order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub groups: Vec<LinkGroup>,
}

/// A titled section of links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkGroup {
    /// Primary-locale title; also the merge key.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Secondary-locale title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title_en: String,
    /// Links in arrival order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Vec<LinkItem>,
}

impl LinkGroup {
    /// Localizable title.
    pub fn title_pair(&self) -> LocalePair<'_> {
        LocalePair::new(&self.title, &self.title_en)
    }
}

/// Tags are published either as one string or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tags {
    /// Free-form tag string.
    One(String),
    /// Tag list.
    Many(Vec<String>),
}

impl Default for Tags {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl Tags {
    /// Tags joined with single spaces.
    pub fn joined(&self) -> String {
        match self {
            Self::One(tag) => tag.clone(),
            Self::Many(tags) => tags.join(" "),
        }
    }
}

/// One navigable entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkItem {
    /// Primary-locale name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Secondary-locale name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name_en: String,
    /// Primary-locale description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub desc: String,
    /// Secondary-locale description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub desc_en: String,
    /// Destination.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    /// Browsing-context target.
    #[serde(default = "default_target", deserialize_with = "null_as_default")]
    pub target: String,
    /// Optional icon URL.
    #[serde(default)]
    pub icon: Option<String>,
    /// Search tags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Tags,
}

fn default_target() -> String {
    DEFAULT_LINK_TARGET.to_string()
}

/// Read an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Default for LinkItem {
    fn default() -> Self {
        Self {
            name: String::new(),
            name_en: String::new(),
            desc: String::new(),
            desc_en: String::new(),
            url: String::new(),
            target: default_target(),
            icon: None,
            tags: Tags::default(),
        }
    }
}

impl LinkItem {
    /// Stable key used to track the link across rebuilds.
    ///
    /// The trimmed url, else the trimmed primary name, else the trimmed
    /// secondary name. A link with none of these yields `""`, and all such
    /// links share that key.
    pub fn identity_key(&self) -> &str {
        [&self.url, &self.name, &self.name_en]
            .into_iter()
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }

    /// Localizable name.
    pub fn name_pair(&self) -> LocalePair<'_> {
        LocalePair::new(&self.name, &self.name_en)
    }

    /// Localizable description.
    pub fn desc_pair(&self) -> LocalePair<'_> {
        LocalePair::new(&self.desc, &self.desc_en)
    }

    /// Target with the `_blank` default applied to empty values.
    pub fn open_target(&self) -> &str {
        let target = self.target.trim();
        if target.is_empty() {
            DEFAULT_LINK_TARGET
        } else {
            target
        }
    }

    /// Lower-cased haystack used by substring filters.
    pub fn search_text(&self) -> String {
        let tags = self.tags.joined();
        [
            self.name.as_str(),
            self.name_en.as_str(),
            self.desc.as_str(),
            self.desc_en.as_str(),
            tags.as_str(),
        ]
        .into_iter()
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_probe_url_becomes_one_element_list() {
        let raw: EnvironmentDescriptor =
            serde_json::from_str(r#"{"mode":"AUTO","probeUrl":"http://intra/ping.png"}"#)
                .expect("parse descriptor");
        let config = EnvironmentConfig::from(raw);
        assert_eq!(config.mode, EnvMode::Auto);
        assert_eq!(config.probe_urls, vec!["http://intra/ping.png".to_string()]);
        assert_eq!(config.probe_timeout, Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS));
    }

    #[test]
    fn plural_probe_urls_win_over_singular() {
        let raw: EnvironmentDescriptor = serde_json::from_str(
            r#"{"mode":"Intranet","probeUrl":"http://old","probeUrls":["http://a"," ","http://b"],"probeTimeoutMs":800}"#,
        )
        .expect("parse descriptor");
        let config = EnvironmentConfig::from(raw);
        assert_eq!(config.mode, EnvMode::Intranet);
        assert_eq!(config.probe_urls, vec!["http://a".to_string(), "http://b".to_string()]);
        assert_eq!(config.probe_timeout, Duration::from_millis(800));
    }

    #[test]
    fn unknown_mode_and_bad_timeout_fall_back() {
        let raw: EnvironmentDescriptor =
            serde_json::from_str(r#"{"mode":"extranet","probeTimeoutMs":0}"#)
                .expect("parse descriptor");
        let config = EnvironmentConfig::from(raw);
        assert_eq!(config.mode, EnvMode::Auto);
        assert!(config.probe_urls.is_empty());
        assert_eq!(config.probe_timeout, Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS));
    }

    #[test]
    fn identity_key_prefers_url_then_names() {
        let mut link = LinkItem {
            url: "  https://a.example/ ".to_string(),
            name: "A".to_string(),
            ..LinkItem::default()
        };
        assert_eq!(link.identity_key(), "https://a.example/");

        link.url.clear();
        assert_eq!(link.identity_key(), "A");

        link.name = "   ".to_string();
        link.name_en = " Alpha ".to_string();
        assert_eq!(link.identity_key(), "Alpha");

        link.name_en.clear();
        assert_eq!(link.identity_key(), "");
    }

    #[test]
    fn link_fields_default_when_absent() {
        let link: LinkItem =
            serde_json::from_str(r#"{"name":"Wiki","tags":"docs team"}"#).expect("parse link");
        assert_eq!(link.target, DEFAULT_LINK_TARGET);
        assert_eq!(link.icon, None);
        assert_eq!(link.tags, Tags::One("docs team".to_string()));
        assert!(link.desc_pair().is_empty());

        let blank_target = LinkItem {
            target: String::new(),
            ..LinkItem::default()
        };
        assert_eq!(blank_target.open_target(), "_blank");
    }

    #[test]
    fn null_fields_read_as_empty() {
        let document: LinkDocument = serde_json::from_str(
            r#"{"groups":[
                {"title":null,"title_en":null,"links":[
                    {"name":null,"name_en":"Wiki","desc":null,"desc_en":null,
                     "url":null,"target":null,"icon":null,"tags":null}
                ]},
                {"title":"工具","links":null}
            ]}"#,
        )
        .expect("parse document");
        assert_eq!(document.groups.len(), 2);
        assert!(document.groups[0].title.is_empty());
        let link = &document.groups[0].links[0];
        assert_eq!(link.identity_key(), "Wiki");
        assert_eq!(link.open_target(), DEFAULT_LINK_TARGET);
        assert_eq!(link.tags, Tags::default());
        assert!(document.groups[1].links.is_empty());

        let empty: LinkDocument = serde_json::from_str(r#"{"groups":null}"#).expect("parse");
        assert!(empty.groups.is_empty());
    }

    #[test]
    fn search_text_covers_names_descriptions_and_tags() {
        let link = LinkItem {
            name: "内网维基".to_string(),
            name_en: "Wiki".to_string(),
            desc_en: "Team Docs".to_string(),
            tags: Tags::Many(vec!["KB".to_string(), "notes".to_string()]),
            ..LinkItem::default()
        };
        assert_eq!(link.search_text(), "内网维基 wiki team docs kb notes");
    }
}
