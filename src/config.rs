//! Runtime configuration
//!
//! Turns a loaded [`ApiDefinition`] plus the user configuration (credentials,
//! account ids, ...) into the settings the HTTP client and executor run with.
//! Auth values, header values and the base URL may contain `{{ config.key }}`
//! templates, rendered here once.

use crate::auth::{AuthConfig, Location};
use crate::engine::ExecutorConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RateLimit, RetryPolicy};
use crate::loader::{ApiDefinition, AuthDefinition};
use crate::template::{self, TemplateContext};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Everything needed to run operations of one API
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// HTTP client settings
    pub http: HttpClientConfig,
    /// Resolved credentials
    pub auth: AuthConfig,
    /// Executor settings
    pub executor: ExecutorConfig,
}

impl RuntimeConfig {
    /// Build the runtime configuration of a definition
    pub fn from_definition(def: &ApiDefinition, user_config: &Value) -> Result<Self> {
        let context = TemplateContext::with_config(user_config.clone());

        Ok(Self {
            http: build_http_config(def, &context)?,
            auth: build_auth_config(def.auth.as_ref(), &context)?,
            executor: ExecutorConfig::new()
                .with_page_size(def.execution.page_size)
                .with_max_pages(def.execution.max_pages)
                .with_error_mode(def.execution.on_error)
                .with_collection_key(&def.execution.collection_key),
        })
    }

    /// Point the client at a different base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.http.base_url = Some(base_url.into());
        self
    }

    /// Build the authenticated HTTP client
    pub fn build_client(&self) -> Result<HttpClient> {
        HttpClient::with_auth(self.http.clone(), self.auth.clone())
    }
}

/// Load the user configuration
///
/// Inline JSON takes precedence over a file; without either the
/// configuration is an empty object.
pub fn load_user_config(path: Option<&Path>, inline: Option<&str>) -> Result<Value> {
    if let Some(json_str) = inline {
        return parse_user_config(json_str);
    }

    if let Some(path) = path {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {e}")))?;
        return parse_user_config(&content);
    }

    Ok(json!({}))
}

fn parse_user_config(content: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
    if !value.is_object() {
        return Err(Error::config("Config must be a JSON object"));
    }
    Ok(value)
}

/// Build HTTP client config with rendered base URL and headers
fn build_http_config(def: &ApiDefinition, context: &TemplateContext) -> Result<HttpClientConfig> {
    let base_url = template::render(&def.base_url, context)?;
    url::Url::parse(&base_url)?;
    let retry = RetryPolicy {
        max_retries: def.http.max_retries,
        backoff: def.http.backoff,
        initial_backoff: Duration::from_millis(def.http.initial_backoff_ms),
        ..RetryPolicy::default()
    };

    let mut builder = HttpClientConfig::builder()
        .base_url(base_url)
        .timeout(Duration::from_secs(def.http.timeout_secs))
        .retry(retry)
        .rate_limit(def.http.rate_limit_rps.map(RateLimit::per_second));

    if let Some(ua) = &def.http.user_agent {
        builder = builder.user_agent(ua);
    }

    for (key, value) in &def.headers {
        builder = builder.header(key, template::render(value, context)?);
    }

    Ok(builder.build())
}

/// Convert an auth definition (from YAML) to a runtime auth config
fn build_auth_config(auth: Option<&AuthDefinition>, context: &TemplateContext) -> Result<AuthConfig> {
    let Some(auth_def) = auth else {
        return Ok(AuthConfig::None);
    };

    match auth_def {
        AuthDefinition::None => Ok(AuthConfig::None),

        AuthDefinition::ApiKey {
            key,
            value,
            location,
            prefix,
        } => {
            let location = match location.as_str() {
                "header" => Location::Header,
                "query" => Location::Query,
                other => {
                    return Err(Error::invalid_value(
                        "auth.location",
                        format!("expected 'header' or 'query', got '{other}'"),
                    ))
                }
            };
            Ok(AuthConfig::ApiKey {
                location,
                header_name: Some(key.clone()),
                query_param: Some(key.clone()),
                prefix: prefix.clone(),
                value: template::render(value, context)?,
            })
        }

        AuthDefinition::Bearer { token } => Ok(AuthConfig::Bearer {
            token: template::render(token, context)?,
        }),

        AuthDefinition::Basic { username, password } => Ok(AuthConfig::Basic {
            username: template::render(username, context)?,
            password: template::render(password, context)?,
        }),

        AuthDefinition::Headers { headers } => {
            let headers = headers
                .iter()
                .map(|(k, v)| Ok((k.clone(), template::render(v, context)?)))
                .collect::<Result<_>>()?;
            Ok(AuthConfig::CustomHeaders { headers })
        }
    }
}
