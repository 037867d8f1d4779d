//! Core types for upvibe

mod state;
mod error;
mod settings;
mod comment;
mod device;
mod credentials;
mod output;

pub use state::MonitorState;
pub use error::{MonitorError, MonitorResult};
pub use settings::{EffectiveSettings, PartialSettings};
pub use comment::{Comment, SeenComments, PREVIEW_CHARS};
pub use device::{DeviceHandle, ActuatorHandle};
pub use credentials::{Credentials, RawCredentials};
pub use output::{PulseOutcome, CommentDecision, CycleReport, MonitorReport};
