//! Error taxonomy for the monitor
//!
//! Fatal errors stop the process (or the loop) with cleanup; everything else is
//! logged and the loop carries on with the next comment or cycle.

use thiserror::Error;

/// Every failure the monitor can report
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Missing or invalid configuration (credentials, overrides)
    #[error("configuration error: {0}")]
    Config(String),

    /// Device-control session could not be established
    #[error("could not connect to device server: {0}")]
    Connection(String),

    /// No device or actuator to talk to
    #[error("no usable device: {0}")]
    DeviceUnavailable(String),

    /// Content platform unreachable or returned garbage
    #[error("failed to fetch from content platform: {0}")]
    SourceFetch(String),

    /// Device session dropped while monitoring
    #[error("device session lost: {0}")]
    SessionLost(String),

    /// Anything else that went wrong inside a monitoring cycle
    #[error("monitoring cycle failed: {0}")]
    Loop(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MonitorError {
    /// Does this error end monitoring?
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MonitorError::Config(_) | MonitorError::Connection(_) | MonitorError::SessionLost(_)
        )
    }

    /// Short code for logging
    pub fn code(&self) -> &'static str {
        match self {
            MonitorError::Config(_) => "CONFIG",
            MonitorError::Connection(_) => "CONNECTION",
            MonitorError::DeviceUnavailable(_) => "DEVICE_UNAVAILABLE",
            MonitorError::SourceFetch(_) => "SOURCE_FETCH",
            MonitorError::SessionLost(_) => "SESSION_LOST",
            MonitorError::Loop(_) => "LOOP",
            MonitorError::Io(_) => "IO",
            MonitorError::Json(_) => "JSON",
        }
    }

    /// Fold unexpected IO/JSON failures inside a cycle into `Loop`
    pub fn into_cycle_error(self) -> Self {
        match self {
            MonitorError::Io(e) => MonitorError::Loop(format!("IO error: {}", e)),
            MonitorError::Json(e) => MonitorError::Loop(format!("JSON error: {}", e)),
            other => other,
        }
    }
}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        MonitorError::SourceFetch(err.to_string())
    }
}

/// Result alias used throughout the crate
pub type MonitorResult<T> = Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(MonitorError::Config("x".into()).is_fatal());
        assert!(MonitorError::Connection("x".into()).is_fatal());
        assert!(MonitorError::SessionLost("x".into()).is_fatal());

        assert!(!MonitorError::DeviceUnavailable("x".into()).is_fatal());
        assert!(!MonitorError::SourceFetch("x".into()).is_fatal());
        assert!(!MonitorError::Loop("x".into()).is_fatal());
    }

    #[test]
    fn test_display_includes_detail() {
        let err = MonitorError::Config("missing reddit_secret".into());
        assert_eq!(err.to_string(), "configuration error: missing reddit_secret");
        assert_eq!(err.code(), "CONFIG");
    }

    #[test]
    fn test_cycle_error_folding() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = MonitorError::from(io).into_cycle_error();
        assert_eq!(err.code(), "LOOP");
        assert!(err.to_string().contains("pipe closed"));
        assert!(!err.is_fatal());

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(MonitorError::from(json).into_cycle_error(), MonitorError::Loop(_)));

        let fetch = MonitorError::SourceFetch("HTTP 503".into()).into_cycle_error();
        assert!(matches!(fetch, MonitorError::SourceFetch(_)));
    }
}
