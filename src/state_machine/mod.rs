// State machine module for the robot/station box handoff protocol
//
// The two machines own their attributes exclusively and communicate only
// through protocol messages routed by the dispatcher. Guards reject unsafe
// transitions; invariant checks model hardware safety interlocks.

pub mod actions;
pub mod errors;
pub mod guards;
pub mod messages;
pub mod robot;
pub mod states;
pub mod station;

// Re-export main types for convenient access
pub use errors::{ActionError, GuardError, InvariantViolation};
pub use messages::{Envelope, MessageKind, ProtocolMessage, Recipient};
pub use robot::{RobotMachine, RobotSnapshot};
pub use states::{RobotPosition, RobotState, StationState};
pub use station::{StationMachine, StationSnapshot};

// Common traits
pub use actions::StateAction;
pub use guards::StateGuard;
