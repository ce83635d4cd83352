//! User-selected favorites and the synthesized favorites group.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{LinkGroup, LinkItem};

/// Primary-locale title of the synthesized group.
pub const FAVORITES_TITLE: &str = "收藏";
/// Secondary-locale title of the synthesized group.
pub const FAVORITES_TITLE_EN: &str = "Favorites";

/// Persisted set of link identity keys.
///
/// Keys are kept sorted, so the serialized form depends only on membership.
/// Keys that no longer match any link are kept and simply never match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesSet {
    keys: BTreeSet<String>,
}

impl FavoritesSet {
    /// Decode the persisted JSON array of keys.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Encode as a JSON array of keys.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Whether `key` is a favorite.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Whether `link` is a favorite.
    pub fn contains_link(&self, link: &LinkItem) -> bool {
        self.contains(link.identity_key())
    }

    /// Flip membership of `key`; returns the new membership.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.keys.remove(key) {
            false
        } else {
            self.keys.insert(key.to_string());
            true
        }
    }

    /// Keys in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when nothing is favorited.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Into<String>> FromIterator<K> for FavoritesSet {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Collect favorited links across `groups` into one group.
///
/// Groups and links are scanned in order; a key seen twice keeps only its
/// first link. `None` when nothing matches, so no empty section is shown.
pub fn build_favorites_group(groups: &[LinkGroup], favorites: &FavoritesSet) -> Option<LinkGroup> {
    if favorites.is_empty() {
        return None;
    }

    let mut included = HashSet::new();
    let mut links = Vec::new();
    for link in groups.iter().flat_map(|group| &group.links) {
        let key = link.identity_key();
        if favorites.contains(key) && included.insert(key) {
            links.push(link.clone());
        }
    }

    if links.is_empty() {
        return None;
    }
    Some(LinkGroup {
        title: FAVORITES_TITLE.to_string(),
        title_en: FAVORITES_TITLE_EN.to_string(),
        links,
    })
}
