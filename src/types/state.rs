//! Monitor state definitions

use serde::{Deserialize, Serialize};

/// States of the monitoring loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonitorState {
    /// Opening the device-control session
    Connecting,
    /// Looking for devices
    Scanning,
    /// Idle between cycles
    Monitoring,
    /// Pulling new comments from the platform
    Fetching,
    /// Looking for keyword triggers
    Classifying,
    /// Running a pulse
    Actuating,
    /// Closing the device session
    ShuttingDown,
    /// Stopped on request
    ShutdownClean,
    /// Stopped by a fatal error
    ShutdownFailed,
}

impl MonitorState {
    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            MonitorState::Connecting | MonitorState::Scanning => "\x1b[90m", // Gray
            MonitorState::Monitoring | MonitorState::Fetching => "\x1b[36m", // Cyan
            MonitorState::Classifying | MonitorState::Actuating => "\x1b[33m", // Yellow
            MonitorState::ShuttingDown => "\x1b[90m",
            MonitorState::ShutdownClean => "\x1b[32m", // Green
            MonitorState::ShutdownFailed => "\x1b[31m", // Red
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }
}

impl std::fmt::Display for MonitorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MonitorState::Connecting => "CONNECTING",
            MonitorState::Scanning => "SCANNING",
            MonitorState::Monitoring => "MONITORING",
            MonitorState::Fetching => "FETCHING",
            MonitorState::Classifying => "CLASSIFYING",
            MonitorState::Actuating => "ACTUATING",
            MonitorState::ShuttingDown => "SHUTTING_DOWN",
            MonitorState::ShutdownClean => "SHUTDOWN_CLEAN",
            MonitorState::ShutdownFailed => "SHUTDOWN_FAILED",
        };
        write!(f, "{}", name)
    }
}
