//! # ReadSimulator: reading-progress submission loop
//!
//! Drives repeated signed submissions to the read endpoint until the target
//! number of confirmed reads is reached.
//!
//! ## Flow
//!
//! ```text
//!  Bootstrapping ──SessionReady──▶ AwaitingAttempt ──TargetReached──▶ Finished
//!        │                          ▲    │
//!   BootstrapFailed                 │    │ Submit
//!        ▼                          │    ▼
//!      Failed ◀──SubmitFailed──── Requesting
//!        ▲                          │ CursorPresent / CursorMissing / AuthRejected
//!        │                          ▼
//!        └──RefreshFailed── {Succeeded, MissingCursor, SessionExpired}
//!                                   │ Paced / Repaired / RefreshSucceeded
//!                                   └──────────▶ AwaitingAttempt
//! ```
//!
//! - **Succeeded**: the iteration index advances and the loop pauses.
//! - **MissingCursor**: a best-effort repair call fires and the same
//!   iteration is retried at once.
//! - **SessionExpired**: one session refresh; success retries the same
//!   iteration, failure ends the run with a single notification.

mod api;
mod classify;
mod error;
mod payload_builder;
mod read_fsm;
mod simulator;

pub use api::{ReadApi, ReadEndpoints, WebReadApi, DEFAULT_FIX_SYNCKEY_URL, DEFAULT_READ_URL};
pub use classify::{classify, ResponseClassification};
pub use error::{ReaderError, ReaderResult};
pub use payload_builder::PayloadBuilder;
pub use read_fsm::read_machine;
pub use read_fsm::{ReadMachine, ReadMachineInput, ReadMachineState};
pub use simulator::{
    LoopState, ReadSimulator, Recovery, RunSummary, SimulatorConfig, MINUTES_PER_READ,
    SESSION_FATAL_MESSAGE,
};
