//! Error taxonomy for the handoff state machines.
//!
//! Two classes matter to the protocol: guard violations are non-fatal and
//! handled locally (the machine logs and withholds its reply, stalling the
//! exchange), while invariant violations are safety interlocks that abort
//! the run. The two must never be conflated.

use thiserror::Error;

/// Non-fatal protocol guard violation.
///
/// Raised when a message arrives in a state that does not permit it, or an
/// external safety signal forbids the transition. The receiving machine logs
/// the violation and returns no reply.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GuardError {
    /// Message requires a state the machine is not in
    #[error("guard '{guard}' rejected transition: requires state '{required}', current state '{current}'")]
    StateMismatch {
        guard: &'static str,
        required: &'static str,
        current: String,
    },

    /// External safety signal forbids moving into the loading zone
    #[error("guard '{guard}' rejected transition: path to loading position is not clear")]
    PathObstructed { guard: &'static str },
}

/// Result type for guard checks
pub type GuardResult<T> = Result<T, GuardError>;

/// Create a state-mismatch guard error
pub fn state_mismatch(
    guard: &'static str,
    required: &'static str,
    current: impl ToString,
) -> GuardError {
    GuardError::StateMismatch {
        guard,
        required,
        current: current.to_string(),
    }
}

/// Fatal safety invariant violation.
///
/// Discovered after an action that the guards should have made safe; treated
/// as a hardware emergency stop. Never downgraded to a warning and never
/// recovered from — the dispatcher aborts the run when one surfaces.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvariantViolation {
    /// Arm was not retracted when a fetch was about to begin
    #[error("arm not retracted before fetch: horizontal {horizontal_m} m, vertical {vertical_m} m")]
    ArmNotRetracted { horizontal_m: f64, vertical_m: f64 },

    /// Weight sensor did not register the placed box
    #[error("weight sensor reads {reading_kg} kg after placement, expected a positive reading")]
    WeightNotDetected { reading_kg: f64 },

    /// Belt still moving while the box is presented for fetching
    #[error("belt still moving with box presented at fetch position")]
    BeltStillMoving,

    /// Transport finished without the box present at the fetch position
    #[error("box not present at fetch position after transport")]
    BoxMissingAfterTransport,

    /// Loading position occupied while the station was about to signal it vacant
    #[error("loading position already occupied while signaled vacant")]
    LoadingPositionOccupied,
}

/// Result type for operations that can trip a safety interlock
pub type InvariantResult<T> = Result<T, InvariantViolation>;

/// Failure in a side-channel transition action (event publishing).
///
/// Action failures never stall or abort the protocol; callers log and move on.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("failed to publish lifecycle event '{event_name}'")]
    EventPublishFailed { event_name: String },
}

/// Result type for transition actions
pub type ActionResult<T> = Result<T, ActionError>;
