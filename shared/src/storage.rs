//! Client-local persisted state: a small key→string store and typed
//! preference accessors on top of it.
//!
//! Reads never fail. A missing or malformed value is replaced by its default
//! and logged; only writes can return errors.

use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};

use crate::{
    favorites::FavoritesSet,
    i18n::Locale,
    model::{EnvMode, LinkItem},
};

/// Storage key of the theme mode.
pub const THEME_KEY: &str = "theme";
/// Storage key of the selected locale.
pub const LOCALE_KEY: &str = "nav_lang";
/// Storage key of the display density.
pub const DENSITY_KEY: &str = "nav_density";
/// Storage key of the environment override.
pub const ENV_OVERRIDE_KEY: &str = "nav_env_override";
/// Storage key of the favorites set.
pub const FAVORITES_KEY: &str = "nav_favorites";

/// Minimal persistent key→string store.
pub trait KeyValueStore {
    /// Stored value, if any.
    fn get(&self, key: &str) -> Option<String>;
    /// Store `value` and persist before returning.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    /// Remove `key` and persist before returning.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Volatile store, for tests and one-shot sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object of string values on disk.
///
/// Every mutation rewrites the file through a temporary sibling and a
/// rename.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open `path`. An absent file is an empty store; an unreadable or
    /// malformed one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!("state file {} is malformed, starting empty: {err}", path.display());
                    BTreeMap::new()
                },
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                tracing::warn!("state file {} is unreadable, starting empty: {err}", path.display());
                BTreeMap::new()
            },
        };
        Self {
            path,
            entries,
        }
    }

    /// File backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create state dir {}", parent.display()))?;
        }
        let encoded =
            serde_json::to_string_pretty(&self.entries).context("failed to encode state")?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, encoded)
            .with_context(|| format!("failed to write temp state {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "failed to move temp state {} -> {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

/// Light or dark presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Default.
    #[default]
    Light,
    /// Dark.
    Dark,
}

impl Theme {
    /// Stored name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card density.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Density {
    /// Name and description.
    #[default]
    Standard,
    /// Name only.
    Compact,
}

impl Density {
    /// Stored name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Compact => "compact",
        }
    }

    /// The other density.
    pub fn toggled(self) -> Self {
        match self {
            Self::Standard => Self::Compact,
            Self::Compact => Self::Standard,
        }
    }
}

impl FromStr for Density {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "standard" => Ok(Self::Standard),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown density: {other}")),
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed view over a [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct Preferences<S> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    /// Wrap `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
        }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_parsed<T: FromStr + Default>(&self, key: &str) -> T
    where
        T::Err: fmt::Display,
    {
        let Some(raw) = self.store.get(key) else {
            return T::default();
        };
        raw.parse().unwrap_or_else(|err| {
            tracing::warn!(key, "ignoring stored value: {err}");
            T::default()
        })
    }

    /// Stored theme, `Light` when absent.
    pub fn theme(&self) -> Theme {
        self.read_parsed(THEME_KEY)
    }

    /// Persist `theme`.
    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, theme.as_str())
    }

    /// Switch to the other theme and persist it.
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let next = self.theme().toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    /// Stored density, `Standard` when absent.
    pub fn density(&self) -> Density {
        self.read_parsed(DENSITY_KEY)
    }

    /// Switch to the other density and persist it.
    pub fn toggle_density(&mut self) -> Result<Density> {
        let next = self.density().toggled();
        self.store.set(DENSITY_KEY, next.as_str())?;
        Ok(next)
    }

    /// Stored locale, else the locale implied by `system_tag`, else zh-CN.
    pub fn locale(&self, system_tag: Option<&str>) -> Locale {
        self.store
            .get(LOCALE_KEY)
            .as_deref()
            .or(system_tag)
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(Locale::from_tag)
            .unwrap_or_default()
    }

    /// Persist `locale`.
    pub fn set_locale(&mut self, locale: Locale) -> Result<()> {
        self.store.set(LOCALE_KEY, locale.code())
    }

    /// Advance to the next supported locale and persist it.
    pub fn cycle_locale(&mut self, system_tag: Option<&str>) -> Result<Locale> {
        let next = self.locale(system_tag).next();
        self.set_locale(next)?;
        Ok(next)
    }

    /// Persisted override, `None` when absent or unrecognised.
    pub fn env_override(&self) -> Option<EnvMode> {
        let raw = self.store.get(ENV_OVERRIDE_KEY)?;
        match raw.parse() {
            Ok(mode) => Some(mode),
            Err(err) => {
                tracing::warn!(key = ENV_OVERRIDE_KEY, "ignoring stored value: {err}");
                None
            },
        }
    }

    /// Persist the override. `Auto` is stored as-is and means "no override".
    pub fn set_env_override(&mut self, mode: EnvMode) -> Result<()> {
        self.store.set(ENV_OVERRIDE_KEY, mode.as_str())
    }

    /// Persisted favorites; empty when absent or malformed.
    pub fn favorites(&self) -> FavoritesSet {
        let Some(raw) = self.store.get(FAVORITES_KEY) else {
            return FavoritesSet::default();
        };
        FavoritesSet::from_json(&raw).unwrap_or_else(|err| {
            tracing::warn!(key = FAVORITES_KEY, "ignoring malformed favorites: {err}");
            FavoritesSet::default()
        })
    }

    /// Flip favorite membership of `key` and persist immediately. Returns the
    /// new membership.
    pub fn toggle_favorite_key(&mut self, key: &str) -> Result<bool> {
        let mut favorites = self.favorites();
        let favorited = favorites.toggle(key);
        if favorites.is_empty() {
            // An empty set is stored as no entry at all.
            self.store.remove(FAVORITES_KEY)?;
        } else {
            let encoded = favorites.to_json().context("failed to encode favorites")?;
            self.store.set(FAVORITES_KEY, &encoded)?;
        }
        tracing::info!(key, favorited, "favorite toggled");
        Ok(favorited)
    }

    /// [`Preferences::toggle_favorite_key`] for `link`'s identity key.
    ///
    /// The caller rebuilds the favorites group afterwards.
    pub fn toggle_favorite(&mut self, link: &LinkItem) -> Result<bool> {
        self.toggle_favorite_key(link.identity_key())
    }
}
