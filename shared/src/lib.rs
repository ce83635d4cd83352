//! NavFlow core: decides whether the client sits on the intranet or the
//! internet, merges the common and environment-specific link documents, and
//! overlays the user's favorites.
//!
//! The presentation layer consumes a [`pipeline::Session`] together with
//! [`i18n::Locale::pick`] and calls back into [`storage::Preferences`] when
//! the user toggles a favorite.

pub mod aggregate;
pub mod error;
pub mod favorites;
pub mod i18n;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod probe;
pub mod resolver;
pub mod settle;
pub mod status;
pub mod storage;

pub use error::ConfigFetchError;
pub use i18n::{Dictionary, Locale};
pub use model::{EnvMode, Environment, EnvironmentConfig, LinkDocument, LinkGroup, LinkItem};
pub use pipeline::{run_session, Session};
