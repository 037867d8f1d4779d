//! upvibe: turn the engagement of one discussion thread into device pulses
//!
//! Pipeline: settings → MonitorLoop → (EngagementSource → IntensityEngine → ActuationSink)

pub mod core;
pub mod types;

// =============================================================================
// DEFAULT SETTINGS [C] - used when neither overrides nor cache supply a value
// =============================================================================

/// Placeholder thread identifier
pub const DEFAULT_THREAD_ID: &str = "gxvdih";

/// Intensity emitted for a thread with (almost) no score
pub const DEFAULT_MIN_INTENSITY: f64 = 0.2;

/// Score at which intensity reaches 1.0
pub const DEFAULT_MAX_SCORE: u32 = 100;

/// Starter set of keyword triggers (lowercase)
pub const DEFAULT_KEYWORDS: [&str; 5] = ["knot", "puppy", "gock", "stupid", "choke"];

/// Boost applied when a keyword is found in a comment
pub const DEFAULT_MULTIPLIER: f64 = 1.5;

// =============================================================================
// TIMING [C]
// =============================================================================

/// Delay between two monitoring cycles (milliseconds)
pub const POLL_INTERVAL_MS: u64 = 1000;

/// Device discovery window at startup (milliseconds)
pub const SCAN_WINDOW_MS: u64 = 1000;

/// How long a pulse holds its level before returning to zero (seconds)
pub const PULSE_HOLD_SECS: f64 = 2.0;

// =============================================================================
// FILES & ENDPOINTS
// =============================================================================

/// Settings cache written after every resolution
pub const SETTINGS_CACHE_FILE: &str = "settings_cache.json";

/// Credentials document
pub const CREDENTIALS_FILE: &str = "config.json";

/// Device-control server used when the credentials omit one
pub const DEFAULT_SERVER_URL: &str = "ws://localhost:12345";

/// Name announced to the device-control server
pub const CLIENT_NAME: &str = "upvibe";

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
