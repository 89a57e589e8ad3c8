//! Read loop state machine using rust-fsm.
//!
//! Every step of the loop is consumed through this machine. An out-of-order
//! step (for example pacing without a success) is an error.

use rust_fsm::*;

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub read_machine(Bootstrapping)

    Bootstrapping => {
        SessionReady => AwaitingAttempt,
        BootstrapFailed => Failed
    },
    AwaitingAttempt => {
        Submit => Requesting,
        TargetReached => Finished
    },
    Requesting => {
        CursorPresent => Succeeded,
        CursorMissing => MissingCursor,
        AuthRejected => SessionExpired,
        SubmitFailed => Failed
    },
    Succeeded => {
        Paced => AwaitingAttempt
    },
    MissingCursor => {
        Repaired => AwaitingAttempt
    },
    SessionExpired => {
        RefreshSucceeded => AwaitingAttempt,
        RefreshFailed => Failed
    }
}

pub use read_machine::Input as ReadMachineInput;
pub use read_machine::State as ReadMachineState;
pub use read_machine::StateMachine as ReadMachine;
