//! Monitor loop: the state machine tying source, engine and sink together
//!
//! State transitions:
//! - CONNECTING → SCANNING: device session opened (failure → SHUTDOWN_FAILED)
//! - SCANNING → MONITORING: discovery window elapsed
//! - MONITORING → FETCHING → CLASSIFYING → ACTUATING → MONITORING: one cycle
//! - any → SHUTTING_DOWN: stop signal or fatal error
//! - SHUTTING_DOWN → SHUTDOWN_CLEAN | SHUTDOWN_FAILED

use std::future::Future;
use std::time::Duration;
use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::core::{pulse, ActuationSink, EngagementSource, IntensityEngine, KeywordClassifier};
use crate::types::{
    Comment, CommentDecision, CycleReport, EffectiveSettings, MonitorError, MonitorReport,
    MonitorResult, MonitorState, PulseOutcome, SeenComments,
};
use crate::{POLL_INTERVAL_MS, SCAN_WINDOW_MS, PULSE_HOLD_SECS};

/// Timers used by the loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorTiming {
    /// Pause between cycles
    pub poll_interval: Duration,
    /// Device discovery window
    pub scan_window: Duration,
    /// How long a pulse holds its level
    pub pulse_hold: Duration,
}

impl Default for MonitorTiming {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            scan_window: Duration::from_millis(SCAN_WINDOW_MS),
            pulse_hold: Duration::from_secs_f64(PULSE_HOLD_SECS),
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    comments: u64,
    delivered: u64,
    skipped: u64,
    errors: u64,
}

/// Orchestrates polling, classification and actuation for one thread
pub struct MonitorLoop<S, A> {
    settings: EffectiveSettings,
    server_url: String,
    source: S,
    sink: A,
    engine: IntensityEngine,
    classifier: KeywordClassifier,
    timing: MonitorTiming,
    /// Only mutated by this loop
    seen: SeenComments,
    state: MonitorState,
    counters: Counters,
}

impl<S: EngagementSource, A: ActuationSink> MonitorLoop<S, A> {
    /// Create new loop with default timing
    pub fn new(settings: EffectiveSettings, server_url: impl Into<String>, source: S, sink: A) -> Self {
        Self {
            engine: IntensityEngine::from_settings(&settings),
            classifier: KeywordClassifier::from_settings(&settings),
            settings,
            server_url: server_url.into(),
            source,
            sink,
            timing: MonitorTiming::default(),
            seen: SeenComments::new(),
            state: MonitorState::Connecting,
            counters: Counters::default(),
        }
    }

    /// Override the timers
    pub fn with_timing(mut self, timing: MonitorTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Run until `shutdown` resolves or a fatal error occurs
    ///
    /// The device session is always stopped and closed before returning.
    pub async fn run<F>(&mut self, shutdown: F) -> MonitorReport
    where
        F: Future<Output = ()>,
    {
        let started_at = Utc::now();
        tokio::pin!(shutdown);

        let outcome = tokio::select! {
            result = self.drive() => result,
            _ = &mut shutdown => {
                info!("Stop requested.");
                Ok(())
            }
        };

        self.shutdown().await;

        let fatal_error = match outcome {
            Ok(()) => {
                self.transition(MonitorState::ShutdownClean);
                None
            }
            Err(e) => {
                error!("Monitor stopped: {}", e);
                self.transition(MonitorState::ShutdownFailed);
                Some(e.to_string())
            }
        };

        MonitorReport {
            started_at,
            finished_at: Utc::now(),
            final_state: self.state,
            comments_processed: self.counters.comments,
            pulses_delivered: self.counters.delivered,
            pulses_skipped: self.counters.skipped,
            cycle_errors: self.counters.errors,
            fatal_error,
        }
    }

    /// Connect, scan, then cycle forever; returns only on a fatal error
    async fn drive(&mut self) -> MonitorResult<()> {
        self.transition(MonitorState::Connecting);
        self.sink.connect(&self.server_url).await.map_err(|e| match e {
            MonitorError::Connection(_) => e,
            other => MonitorError::Connection(other.to_string()),
        })?;
        info!("Connected to device server at {}", self.server_url);

        self.transition(MonitorState::Scanning);
        if let Err(e) = self.sink.discover(self.timing.scan_window).await {
            if e.is_fatal() {
                return Err(e);
            }
            warn!("Device scan failed: {}", e);
        }
        match self.sink.devices().len() {
            0 => warn!("No devices found; pulses will be skipped until one connects."),
            n => info!("Found {} device(s)", n),
        }

        self.announce().await;
        self.transition(MonitorState::Monitoring);

        loop {
            match self.run_cycle().await {
                Ok(report) => debug!("Cycle handled {} new comment(s)", report.comment_count()),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    self.counters.errors += 1;
                    warn!("Cycle failed [{}]: {}", e.code(), e);
                    self.ensure_session()?;
                }
            }
            self.transition(MonitorState::Monitoring);
            tokio::time::sleep(self.timing.poll_interval).await;
        }
    }

    /// One fetch/classify/actuate pass over the new comments
    pub async fn run_cycle(&mut self) -> MonitorResult<CycleReport> {
        self.transition(MonitorState::Fetching);
        let fetched = self
            .source
            .fetch_new_comments(&self.settings.thread_id, &self.seen)
            .await
            .map_err(MonitorError::into_cycle_error)?;

        // Mark the whole batch before acting on any of it
        let fresh: Vec<Comment> = fetched
            .into_iter()
            .filter(|c| self.seen.insert(&c.id))
            .collect();

        let mut report = CycleReport::default();
        for comment in fresh {
            self.counters.comments += 1;
            match self.handle_comment(&comment).await.map_err(MonitorError::into_cycle_error) {
                Ok(decision) => report.decisions.push(decision),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    self.counters.errors += 1;
                    warn!("Skipping comment {} [{}]: {}", comment.id, e.code(), e);
                    self.ensure_session()?;
                    report.errors.push(e.to_string());
                }
            }
        }
        Ok(report)
    }

    async fn handle_comment(&mut self, comment: &Comment) -> MonitorResult<CommentDecision> {
        info!("New comment by {}: {}", comment.author_display(), comment.preview());

        self.transition(MonitorState::Classifying);
        let classification = self.classifier.classify(&comment.body);
        if let Some(keyword) = &classification.keyword {
            info!("Keyword '{}' detected → boosting intensity {:.2}x", keyword, classification.boost);
        }

        self.transition(MonitorState::Actuating);
        let raw_score = self.source.fetch_score(&self.settings.thread_id).await?;
        let score = IntensityEngine::effective_score(raw_score);
        let intensity = self.engine.intensity(score, classification.boost);
        info!("Post score: {} → intensity: {:.2}", score, intensity);

        let outcome = pulse(&self.sink, intensity, self.timing.pulse_hold).await?;
        match outcome {
            PulseOutcome::Delivered { .. } => self.counters.delivered += 1,
            PulseOutcome::NoDevice | PulseOutcome::NoActuator { .. } => self.counters.skipped += 1,
        }

        Ok(CommentDecision {
            comment_id: comment.id.clone(),
            keyword: classification.keyword,
            boost: classification.boost,
            score,
            intensity,
            outcome,
        })
    }

    /// Escalate to a fatal error once the device session is gone
    fn ensure_session(&self) -> MonitorResult<()> {
        if self.sink.is_connected() {
            Ok(())
        } else {
            Err(MonitorError::SessionLost("device server closed the connection".to_string()))
        }
    }

    async fn announce(&self) {
        let title = match self.source.thread_title(&self.settings.thread_id).await {
            Ok(title) => title,
            Err(e) => {
                warn!("Could not fetch thread title: {}", e);
                self.settings.thread_id.clone()
            }
        };
        info!("Monitoring post: {}", title);
        info!("Max upvotes: {} → intensity 1.0", self.settings.max_score);
        info!("Min intensity: {}", self.settings.min_intensity);
        info!("Keyword triggers: {:?}", self.settings.keywords);
        info!("Keyword multiplier: {}", self.settings.multiplier);
    }

    /// Zero the devices and close the session; errors are only logged
    async fn shutdown(&mut self) {
        self.transition(MonitorState::ShuttingDown);

        if self.sink.is_connected() {
            if let Err(e) = self.sink.stop_all().await {
                warn!("Could not stop devices: {}", e);
            }
        }
        if let Err(e) = self.sink.disconnect().await {
            warn!("Disconnect failed: {}", e);
        }
        info!("Monitor shut down.");
    }

    fn transition(&mut self, next: MonitorState) {
        if next == self.state {
            return;
        }
        let per_cycle = |s: MonitorState| {
            matches!(s, MonitorState::Fetching | MonitorState::Classifying | MonitorState::Actuating)
        };
        if per_cycle(next) || per_cycle(self.state) {
            debug!("{} → {}", self.state, next);
        } else {
            info!("{} → {}", self.state, next);
        }
        self.state = next;
    }

    /// Current state
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Comment ids processed so far
    pub fn seen(&self) -> &SeenComments {
        &self.seen
    }

    /// Settings in effect
    pub fn settings(&self) -> &EffectiveSettings {
        &self.settings
    }

    /// Engagement source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Actuation sink
    pub fn sink(&self) -> &A {
        &self.sink
    }
}
