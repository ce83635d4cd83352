//! The single status line shown after a load.

use crate::{error::ConfigFetchError, i18n::Dictionary, model::Environment};

/// Outcome summary for the status area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    /// Everything loaded.
    Loaded {
        /// Environment the session resolved to.
        environment: Environment,
    },
    /// A required document failed; nothing is rendered.
    Failed {
        /// Error text naming the resource.
        detail: String,
    },
}

impl StatusMessage {
    /// Status for a fatal load error.
    pub fn failed(err: &ConfigFetchError) -> Self {
        Self::Failed {
            detail: err.to_string(),
        }
    }

    /// Whether this should be styled as an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Localized text.
    pub fn render(&self, dictionary: &Dictionary) -> String {
        match self {
            Self::Loaded {
                environment,
            } => format!(
                "{}（{}：{}）",
                dictionary.t("loaded"),
                dictionary.t("environment"),
                environment
            ),
            Self::Failed {
                detail,
            } => format!("{}：{}", dictionary.t("errorLoading"), detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_with_dictionary_or_raw_keys() {
        let dictionary: Dictionary =
            [("loaded", "Loaded"), ("environment", "Environment")].into_iter().collect();
        let loaded = StatusMessage::Loaded {
            environment: Environment::Intranet,
        };
        assert_eq!(loaded.render(&dictionary), "Loaded（Environment：intranet）");
        assert!(!loaded.is_error());

        let failed = StatusMessage::failed(&ConfigFetchError::Status {
            resource: "config/env.json".to_string(),
            status: 404,
        });
        assert!(failed.is_error());
        assert_eq!(failed.render(&dictionary), "errorLoading：config/env.json (404)");
    }
}
