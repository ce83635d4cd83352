//! Fatal load failures.

use thiserror::Error;

/// A required document could not be fetched or decoded.
///
/// Every variant names the resource so the status line can say which
/// document broke the load.
#[derive(Debug, Error)]
pub enum ConfigFetchError {
    /// The request never produced a response.
    #[error("{resource} (network error: {detail})")]
    Transport {
        /// Resource identifier.
        resource: String,
        /// Transport error text.
        detail: String,
    },
    /// The response status was not a success.
    #[error("{resource} ({status})")]
    Status {
        /// Resource identifier.
        resource: String,
        /// HTTP status code.
        status: u16,
    },
    /// The body is not the expected JSON structure.
    #[error("{resource} (parse error: {detail})")]
    Parse {
        /// Resource identifier.
        resource: String,
        /// Decoder error text.
        detail: String,
    },
    /// A directory-backed source has no such file.
    #[error("{resource} (not found)")]
    Missing {
        /// Resource identifier.
        resource: String,
    },
    /// The resource path cannot be turned into a location.
    #[error("{resource} (invalid location: {detail})")]
    InvalidLocation {
        /// Resource identifier.
        resource: String,
        /// Why the location was rejected.
        detail: String,
    },
}

impl ConfigFetchError {
    /// The resource that failed.
    pub fn resource(&self) -> &str {
        match self {
            Self::Transport {
                resource, ..
            }
            | Self::Status {
                resource, ..
            }
            | Self::Parse {
                resource, ..
            }
            | Self::Missing {
                resource,
            }
            | Self::InvalidLocation {
                resource, ..
            } => resource,
        }
    }
}
