//! Locale selection, string-pair picking and key→string dictionaries.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::model::LocalePair;

/// Supported display locales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    /// Simplified Chinese, the primary slot of every locale pair.
    #[default]
    ZhCn,
    /// English, the secondary slot.
    EnUs,
}

impl Locale {
    /// Order a locale toggle cycles through.
    pub const SUPPORTED: [Locale; 2] = [Locale::ZhCn, Locale::EnUs];

    /// BCP-47 code, also the dictionary file stem.
    pub fn code(self) -> &'static str {
        match self {
            Self::ZhCn => "zh-CN",
            Self::EnUs => "en-US",
        }
    }

    /// Map an arbitrary language tag: anything starting with `zh` is
    /// Chinese, everything else English.
    pub fn from_tag(tag: &str) -> Self {
        if tag.trim().to_ascii_lowercase().starts_with("zh") {
            Self::ZhCn
        } else {
            Self::EnUs
        }
    }

    /// Next locale in [`Locale::SUPPORTED`], wrapping around.
    pub fn next(self) -> Self {
        let index = Self::SUPPORTED
            .iter()
            .position(|locale| *locale == self)
            .unwrap_or(0);
        Self::SUPPORTED[(index + 1) % Self::SUPPORTED.len()]
    }

    /// Site-relative location of this locale's dictionary.
    pub fn dictionary_resource(self) -> String {
        format!("i18n/{}.json", self.code())
    }

    /// Choose the text for this locale, falling back to the other slot.
    /// Empty only when both slots are empty.
    pub fn pick<'a>(self, primary: &'a str, secondary: &'a str) -> &'a str {
        let (preferred, fallback) = match self {
            Self::ZhCn => (primary, secondary),
            Self::EnUs => (secondary, primary),
        };
        if preferred.is_empty() {
            fallback
        } else {
            preferred
        }
    }

    /// [`Locale::pick`] over a [`LocalePair`].
    pub fn pick_pair<'a>(self, pair: LocalePair<'a>) -> &'a str {
        self.pick(pair.primary, pair.secondary)
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SUPPORTED
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unsupported locale: {s}"))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Flat key→string UI dictionary for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary(HashMap<String, String>);

impl Dictionary {
    /// Translation for `key`, or the key itself when missing or empty.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
            .unwrap_or(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing was loaded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_follows_locale_with_fallback() {
        assert_eq!(Locale::ZhCn.pick("维基", "Wiki"), "维基");
        assert_eq!(Locale::ZhCn.pick("", "Wiki"), "Wiki");
        assert_eq!(Locale::EnUs.pick("维基", "Wiki"), "Wiki");
        assert_eq!(Locale::EnUs.pick("维基", ""), "维基");
        assert_eq!(Locale::EnUs.pick("", ""), "");
        assert_eq!(Locale::ZhCn.pick("", ""), "");
    }

    #[test]
    fn tags_map_onto_supported_locales() {
        assert_eq!(Locale::from_tag("zh_TW.UTF-8"), Locale::ZhCn);
        assert_eq!(Locale::from_tag("ZH"), Locale::ZhCn);
        assert_eq!(Locale::from_tag("en_GB.UTF-8"), Locale::EnUs);
        assert_eq!(Locale::from_tag("fr"), Locale::EnUs);
        assert_eq!("en-us".parse::<Locale>(), Ok(Locale::EnUs));
        assert!("fr-FR".parse::<Locale>().is_err());
    }

    #[test]
    fn next_cycles_round_robin() {
        let mut locale = Locale::ZhCn;
        let mut seen = Vec::new();
        for _ in 0..Locale::SUPPORTED.len() * 2 {
            seen.push(locale);
            locale = locale.next();
        }
        assert_eq!(seen, vec![Locale::ZhCn, Locale::EnUs, Locale::ZhCn, Locale::EnUs]);
    }

    #[test]
    fn dictionary_falls_back_to_key() {
        let dictionary: Dictionary = [("loaded", "已加载"), ("empty", "")].into_iter().collect();
        assert_eq!(dictionary.t("loaded"), "已加载");
        assert_eq!(dictionary.t("empty"), "empty");
        assert_eq!(dictionary.t("missing"), "missing");
    }
}
