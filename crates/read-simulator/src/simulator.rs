//! The read loop.

use crate::api::ReadApi;
use crate::classify::{classify, ResponseClassification};
use crate::error::{ReaderError, ReaderResult};
use crate::payload_builder::PayloadBuilder;
use crate::read_fsm::{ReadMachine, ReadMachineInput, ReadMachineState};
use push_notifier::{Notifier, PushMethod};
use rand::rngs::StdRng;
use rand::SeedableRng;
use session_renewal::{SessionRenewer, SessionStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Reading-time credit per confirmed read, in minutes.
pub const MINUTES_PER_READ: f64 = 0.5;

/// Seconds the first attempt reports as already read.
const INITIAL_ELAPSED_SECS: i64 = 30;

/// Message pushed when the session cannot be renewed.
pub const SESSION_FATAL_MESSAGE: &str =
    "Unable to obtain a new session key, or the captured curl configuration is invalid; stopping.";

/// Loop settings.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Number of confirmed reads to accumulate.
    pub target_count: u32,
    /// Pause after each confirmed read.
    pub pace: Duration,
    /// Delivery method for run notifications. `None` skips the completion
    /// push; a fatal error is still reported to the notifier.
    pub push_method: Option<PushMethod>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            target_count: 40,
            pace: Duration::from_secs(30),
            push_method: None,
        }
    }
}

/// Iteration bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopState {
    /// 1-based attempt number; only advances on a confirmed read.
    /// Wider than the target so `target + 1` always fits.
    pub index: u64,
    /// Unix seconds of the last confirmed read.
    pub last_success: i64,
    /// Fixed target count.
    pub target: u64,
}

impl LoopState {
    pub fn new(target: u32, now: i64) -> Self {
        Self {
            index: 1,
            last_success: now - INITIAL_ELAPSED_SECS,
            target: u64::from(target),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.index > self.target
    }

    pub fn record_success(&mut self, attempted_at: i64) {
        self.index += 1;
        self.last_success = attempted_at;
    }

    /// Confirmed reads so far.
    pub fn successes(&self) -> u64 {
        self.index - 1
    }

    pub fn credited_minutes(&self) -> f64 {
        self.successes() as f64 * MINUTES_PER_READ
    }
}

/// Outcome of a session recovery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    Continue,
    Fatal(String),
}

/// Totals for a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub successes: u64,
    pub minutes: f64,
    pub repairs: u32,
    pub refreshes: u32,
}

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Drives signed read submissions until the target is reached.
pub struct ReadSimulator {
    api: Arc<dyn ReadApi>,
    renewer: Arc<dyn SessionRenewer>,
    notifier: Arc<dyn Notifier>,
    builder: PayloadBuilder,
    config: SimulatorConfig,
    session: SessionStore,
    fsm: ReadMachine,
    rng: StdRng,
    clock: fn() -> i64,
    repairs: u32,
    refreshes: u32,
}

impl ReadSimulator {
    pub fn new(
        api: Arc<dyn ReadApi>,
        renewer: Arc<dyn SessionRenewer>,
        notifier: Arc<dyn Notifier>,
        builder: PayloadBuilder,
        config: SimulatorConfig,
        session: SessionStore,
    ) -> Self {
        Self {
            api,
            renewer,
            notifier,
            builder,
            config,
            session,
            fsm: ReadMachine::new(),
            rng: StdRng::from_entropy(),
            clock: unix_now,
            repairs: 0,
            refreshes: 0,
        }
    }

    /// Replace the random source (seeded runs).
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Replace the unix-seconds clock.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> ReadMachineState {
        self.fsm.state().clone()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn transition(&mut self, input: ReadMachineInput) -> ReaderResult<()> {
        self.fsm.consume(&input).map_err(|_| {
            ReaderError::InvalidTransition(format!(
                "Cannot apply {:?} in state {:?}",
                input,
                self.fsm.state()
            ))
        })?;
        debug!(input = ?input, state = ?self.fsm.state(), "Read state transition");
        Ok(())
    }

    /// Run to completion.
    ///
    /// Returns `Err` only for fatal conditions, after a single notification
    /// attempt. Missing cursors and recoverable expiries are handled inside.
    pub async fn run(&mut self) -> ReaderResult<RunSummary> {
        if let Recovery::Fatal(reason) = self.recover_session().await {
            self.transition(ReadMachineInput::BootstrapFailed)?;
            return Err(self.fail(ReaderError::SessionExpired(reason)).await);
        }
        self.transition(ReadMachineInput::SessionReady)?;

        let mut state = LoopState::new(self.config.target_count, (self.clock)());
        info!(target_count = state.target, "Starting reading run");

        while !state.is_complete() {
            self.transition(ReadMachineInput::Submit)?;

            let attempted_at = (self.clock)();
            let payload = match self
                .builder
                .build(&mut self.rng, attempted_at, state.last_success)
            {
                Ok(payload) => payload,
                Err(e) => {
                    self.transition(ReadMachineInput::SubmitFailed)?;
                    return Err(self.fail(e).await);
                }
            };

            info!(attempt = state.index, "Attempting read");
            debug!(payload = ?payload, "Read payload");

            let body = match self.api.submit_read(&self.session, &payload).await {
                Ok(body) => body,
                Err(e) => {
                    self.transition(ReadMachineInput::SubmitFailed)?;
                    return Err(self.fail(e).await);
                }
            };

            match classify(&body) {
                ResponseClassification::Succeeded => {
                    self.transition(ReadMachineInput::CursorPresent)?;
                    state.record_success(attempted_at);
                    info!(
                        minutes = state.credited_minutes(),
                        "Read confirmed, progress {:.1} minutes",
                        state.credited_minutes()
                    );
                    tokio::time::sleep(self.config.pace).await;
                    self.transition(ReadMachineInput::Paced)?;
                }
                ResponseClassification::MissingCursor => {
                    self.transition(ReadMachineInput::CursorMissing)?;
                    warn!(attempt = state.index, "No synckey in response, repairing");
                    self.repairs += 1;
                    self.api.repair_sync_cursor(&self.session).await;
                    self.transition(ReadMachineInput::Repaired)?;
                }
                ResponseClassification::SessionExpired => {
                    self.transition(ReadMachineInput::AuthRejected)?;
                    warn!(attempt = state.index, "Session cookie expired, refreshing");
                    match self.recover_session().await {
                        Recovery::Continue => {
                            info!(attempt = state.index, "Retrying this read");
                            self.transition(ReadMachineInput::RefreshSucceeded)?;
                        }
                        Recovery::Fatal(reason) => {
                            self.transition(ReadMachineInput::RefreshFailed)?;
                            return Err(self.fail(ReaderError::SessionExpired(reason)).await);
                        }
                    }
                }
            }
        }

        self.transition(ReadMachineInput::TargetReached)?;

        let summary = RunSummary {
            successes: state.successes(),
            minutes: state.credited_minutes(),
            repairs: self.repairs,
            refreshes: self.refreshes,
        };
        info!(
            successes = summary.successes,
            repairs = summary.repairs,
            refreshes = summary.refreshes,
            "Reading run complete"
        );

        if let Some(method) = self.config.push_method {
            let message = format!(
                "WeRead autoread finished!\nReading time: {:.1} minutes.",
                summary.minutes
            );
            if let Err(e) = self.notifier.notify(&message, Some(&method)).await {
                error!(error = %e, method = %method, "Completion notification failed");
            }
        }

        Ok(summary)
    }

    /// One refresh attempt. Never retried.
    async fn recover_session(&mut self) -> Recovery {
        self.refreshes += 1;
        if self.renewer.refresh(&mut self.session).await {
            Recovery::Continue
        } else {
            Recovery::Fatal(SESSION_FATAL_MESSAGE.to_string())
        }
    }

    /// Log and report a fatal error once, then hand it back to the caller.
    ///
    /// The attempt is made even without a configured method. A failed
    /// notification is logged and does not replace `err`.
    async fn fail(&self, err: ReaderError) -> ReaderError {
        error!(error = %err, "Reading run aborted");
        let method = self.config.push_method.as_ref();
        if let Err(notify_err) = self.notifier.notify(&err.to_string(), method).await {
            error!(error = %notify_err, method = ?method, "Failure notification failed");
        }
        err
    }
}
