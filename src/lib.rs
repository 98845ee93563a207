//! # Handoff Core
//!
//! Synchronous state-machine core for a robot/conveyor box-handoff
//! coordination protocol: a mobile robot and a conveyor/loading station
//! exchange messages to hand a box over without collision, double-loading,
//! or premature fetch.
//!
//! ## Architecture
//!
//! Two finite-state machines own their attributes exclusively and talk only
//! through protocol messages routed by a FIFO dispatcher. Guarded
//! transitions stall the exchange on protocol violations; invariant checks
//! model hardware safety interlocks and abort the run. All physical effects
//! are fixed-duration simulated actions behind an injectable delay strategy,
//! so tests run instantly and the demo binary runs in real time.
//!
//! ## Module Organization
//!
//! - [`state_machine`] - Robot and station machines, messages, guards, actions
//! - [`dispatcher`] - FIFO message routing and cycle reporting
//! - [`events`] - In-process lifecycle event publishing
//! - [`config`] - Physical constants and simulated timing
//! - [`simulation`] - Injectable delay strategies
//! - [`logging`] - Structured tracing setup
//! - [`error`] - Crate-level error type
//!
//! ## Quick Start
//!
//! ```rust
//! use handoff_core::config::HandoffConfig;
//! use handoff_core::dispatcher::MessageDispatcher;
//! use handoff_core::events::EventPublisher;
//! use handoff_core::simulation::NoDelay;
//! use handoff_core::state_machine::{RobotMachine, StationMachine};
//!
//! let config = HandoffConfig::default();
//! let publisher = EventPublisher::new();
//! let robot = RobotMachine::new(&config, publisher.clone(), Box::new(NoDelay));
//! let station = StationMachine::new(&config, publisher.clone(), Box::new(NoDelay));
//!
//! let mut dispatcher = MessageDispatcher::new(robot, station, publisher);
//! let report = dispatcher.run_cycle().expect("safety interlocks must not trip");
//! assert!(report.completed);
//! ```

pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod logging;
pub mod simulation;
pub mod state_machine;

pub use config::HandoffConfig;
pub use constants::system_events;
pub use dispatcher::{CycleReport, DispatchError, MessageDispatcher};
pub use error::{HandoffError, Result};
pub use events::EventPublisher;
pub use simulation::{DelaySource, NoDelay, WallClockDelay};
pub use state_machine::{
    Envelope, GuardError, InvariantViolation, MessageKind, ProtocolMessage, Recipient,
    RobotMachine, RobotState, StationMachine, StationState,
};
