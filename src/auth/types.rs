//! Auth configuration types
//!
//! These types represent the runtime auth configuration after template
//! interpolation has been applied.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Location for API key placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Place in HTTP header
    #[default]
    Header,
    /// Place in query parameter
    Query,
}

/// Authentication configuration (after template interpolation)
#[derive(Clone, Default, PartialEq)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// API Key authentication (header or query)
    ApiKey {
        /// Where to place the API key
        location: Location,
        /// Header name (for header location)
        header_name: Option<String>,
        /// Query parameter name (for query location)
        query_param: Option<String>,
        /// Prefix to add before the value (e.g., "Token ")
        prefix: Option<String>,
        /// The API key value
        value: String,
    },

    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },

    /// Custom headers
    CustomHeaders {
        /// Headers to add to each request
        headers: HashMap<String, String>,
    },
}

impl AuthConfig {
    /// Short name of the auth scheme, safe to log
    pub fn kind(&self) -> &'static str {
        match self {
            AuthConfig::None => "none",
            AuthConfig::ApiKey { .. } => "api_key",
            AuthConfig::Basic { .. } => "basic",
            AuthConfig::Bearer { .. } => "bearer",
            AuthConfig::CustomHeaders { .. } => "headers",
        }
    }
}

// Credentials never reach logs
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthConfig::None => f.write_str("None"),
            AuthConfig::ApiKey {
                location,
                header_name,
                query_param,
                ..
            } => f
                .debug_struct("ApiKey")
                .field("location", location)
                .field("header_name", header_name)
                .field("query_param", query_param)
                .finish_non_exhaustive(),
            AuthConfig::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            AuthConfig::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
            AuthConfig::CustomHeaders { headers } => {
                let mut names: Vec<_> = headers.keys().collect();
                names.sort();
                f.debug_struct("CustomHeaders")
                    .field("headers", &names)
                    .finish()
            }
        }
    }
}

#[cfg(test)]
mod type_tests {
    use super::*;

    #[test]
    fn test_auth_config_default() {
        let config = AuthConfig::default();
        assert!(matches!(config, AuthConfig::None));
        assert_eq!(config.kind(), "none");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AuthConfig::Bearer {
            token: "super-secret".to_string(),
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert_eq!(config.kind(), "bearer");

        let config = AuthConfig::Basic {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }
}
