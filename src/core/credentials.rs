//! Loading the credentials document

use std::path::Path;
use crate::types::{Credentials, RawCredentials, MonitorError, MonitorResult};

/// Read and validate the credentials file
///
/// Every failure here is a `Config` error: the monitor cannot start without
/// platform credentials.
pub fn load_credentials(path: impl AsRef<Path>) -> MonitorResult<Credentials> {
    let path = path.as_ref();

    let json = std::fs::read_to_string(path).map_err(|e| {
        MonitorError::Config(format!("cannot read {} ({}); please create it", path.display(), e))
    })?;

    let raw: RawCredentials = serde_json::from_str(&json)
        .map_err(|e| MonitorError::Config(format!("{} is not valid JSON: {}", path.display(), e)))?;

    Credentials::from_raw(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_credentials(dir.path().join("config.json")).unwrap_err();
        assert!(matches!(err, MonitorError::Config(_)));
    }

    #[test]
    fn test_load_full_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "reddit_client_id": "id",
                "reddit_secret": "secret",
                "reddit_user_agent": "upvibe test",
                "buttplug_server_url": "ws://10.0.0.2:12345"
            }"#,
        )
        .unwrap();

        let creds = load_credentials(&path).unwrap();
        assert_eq!(creds.client_id, "id");
        assert_eq!(creds.server_url, "ws://10.0.0.2:12345");
    }

    #[test]
    fn test_garbage_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "reddit_client_id = 1").unwrap();
        assert!(load_credentials(&path).unwrap_err().is_fatal());
    }
}
