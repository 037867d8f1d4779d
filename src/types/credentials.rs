//! Platform credentials and device server address

use serde::Deserialize;
use crate::DEFAULT_SERVER_URL;
use crate::types::MonitorError;

/// Credentials document as written by the operator; every field optional so a
/// missing one can be named in the error
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCredentials {
    pub reddit_client_id: Option<String>,
    pub reddit_secret: Option<String>,
    pub reddit_user_agent: Option<String>,
    pub buttplug_server_url: Option<String>,
}

/// Validated credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    pub server_url: String,
}

impl Credentials {
    /// Validate a raw document, failing on the first missing required field
    pub fn from_raw(raw: RawCredentials) -> Result<Self, MonitorError> {
        fn required(value: Option<String>, name: &str) -> Result<String, MonitorError> {
            match value {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(MonitorError::Config(format!("missing required field '{}'", name))),
            }
        }

        Ok(Self {
            client_id: required(raw.reddit_client_id, "reddit_client_id")?,
            client_secret: required(raw.reddit_secret, "reddit_secret")?,
            user_agent: required(raw.reddit_user_agent, "reddit_user_agent")?,
            server_url: raw
                .buttplug_server_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
        })
    }
}
