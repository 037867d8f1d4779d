//! Outcomes and reports produced by the monitor

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::types::MonitorState;

/// Result of one pulse request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PulseOutcome {
    /// Level was applied, held, and released
    Delivered { device: String, level: f64 },
    /// No device connected
    NoDevice,
    /// First device exposes no actuator
    NoActuator { device: String },
}

impl PulseOutcome {
    /// Did a device actually receive the level?
    pub fn is_delivered(&self) -> bool {
        matches!(self, PulseOutcome::Delivered { .. })
    }
}

/// Decision taken for one new comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentDecision {
    pub comment_id: String,
    /// Keyword that triggered the boost, if any
    pub keyword: Option<String>,
    pub boost: f64,
    /// Score after substituting 1 for non-positive values
    pub score: i64,
    pub intensity: f64,
    pub outcome: PulseOutcome,
}

/// What one monitoring cycle did
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub decisions: Vec<CommentDecision>,
    /// Non-fatal per-comment errors, rendered
    pub errors: Vec<String>,
}

impl CycleReport {
    /// Number of new comments handled in the cycle
    pub fn comment_count(&self) -> usize {
        self.decisions.len() + self.errors.len()
    }
}

/// Summary of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub final_state: MonitorState,
    pub comments_processed: u64,
    pub pulses_delivered: u64,
    /// Pulses skipped for lack of a device or actuator
    pub pulses_skipped: u64,
    /// Non-fatal errors swallowed by the loop
    pub cycle_errors: u64,
    /// Error that ended the run, if any
    pub fatal_error: Option<String>,
}

impl MonitorReport {
    /// Did the run end without a fatal error?
    pub fn is_clean(&self) -> bool {
        self.final_state == MonitorState::ShutdownClean
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let color = self.final_state.color_code();
        let reset = MonitorState::color_reset();

        format!(
            "{}state={} | comments={} | pulses={} | skipped={} | errors={} | ran {:.1}s{}",
            color,
            self.final_state,
            self.comments_processed,
            self.pulses_delivered,
            self.pulses_skipped,
            self.cycle_errors,
            self.elapsed_secs(),
            reset
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "state={} | comments={} | pulses={} | skipped={} | errors={}",
            self.final_state,
            self.comments_processed,
            self.pulses_delivered,
            self.pulses_skipped,
            self.cycle_errors
        )
    }

    fn elapsed_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}
