//! Core modules for upvibe

pub mod settings;
pub mod credentials;
pub mod intensity;
pub mod keywords;
pub mod source;
pub mod reddit;
pub mod sink;
pub mod buttplug_sink;
pub mod monitor;

pub use settings::{resolve, SettingsCache, SettingsResolver};
pub use credentials::load_credentials;
pub use intensity::IntensityEngine;
pub use keywords::{KeywordClassifier, Classification};
pub use source::EngagementSource;
pub use reddit::{RedditSource, ThreadSnapshot, parse_thread};
pub use sink::{ActuationSink, pulse};
pub use buttplug_sink::ButtplugSink;
pub use monitor::{MonitorLoop, MonitorTiming};
