//! Conveyor/loading station ("CB") side of the handoff protocol.
//!
//! The station admits one robot at a time: it signals the loading position
//! vacant, waits for the robot's readiness, transports the box to the fetch
//! position with the belt, and resets once the robot reports completion.

use super::actions::{PublishTransitionEventAction, StateAction};
use super::errors::{InvariantResult, InvariantViolation};
use super::guards::{
    AwaitingRobotReadyGuard, BoxAtFetchPositionGuard, StateGuard, StationIdleGuard,
};
use super::messages::{Envelope, MessageKind, ProtocolMessage, Recipient};
use super::states::StationState;
use crate::config::{HandoffConfig, StationConfig, TimingConfig};
use crate::events::EventPublisher;
use crate::simulation::DelaySource;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Read-only monitoring snapshot of all station attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSnapshot {
    pub state: StationState,
    pub box_at_fetch_position: bool,
    pub loading_position_occupied: bool,
    pub belt_moving: bool,
    pub box_position_m: f64,
}

/// State machine for the conveyor/loading station
pub struct StationMachine {
    state: StationState,
    box_at_fetch_position: bool,
    loading_position_occupied: bool,
    belt_moving: bool,
    box_position_m: f64,
    config: StationConfig,
    timing: TimingConfig,
    delay: Box<dyn DelaySource>,
    transition_action: PublishTransitionEventAction,
}

impl StationMachine {
    /// Create a station machine with default initial attributes
    pub fn new(
        config: &HandoffConfig,
        event_publisher: EventPublisher,
        delay: Box<dyn DelaySource>,
    ) -> Self {
        Self {
            state: StationState::default(),
            box_at_fetch_position: false,
            loading_position_occupied: false,
            belt_moving: false,
            box_position_m: 0.0,
            config: config.station.clone(),
            timing: config.timing.clone(),
            delay,
            transition_action: PublishTransitionEventAction::new(event_publisher),
        }
    }

    /// Handle an incoming protocol message.
    ///
    /// Guard failures are logged and answered with no envelope; invariant
    /// violations propagate as fatal errors.
    pub fn receive(&mut self, message: &ProtocolMessage) -> InvariantResult<Option<Envelope>> {
        match message.kind {
            MessageKind::AtWaitingPosition => self.handle_at_waiting_position(),
            MessageKind::ReadyToReceive => self.handle_ready_to_receive(),
            MessageKind::OperationComplete => Ok(self.handle_operation_complete()),
            kind => {
                warn!(kind = %kind, state = %self.state, "unexpected message for station");
                Ok(None)
            }
        }
    }

    /// Read-only snapshot of all attributes, safe at any time
    pub fn snapshot(&self) -> StationSnapshot {
        StationSnapshot {
            state: self.state,
            box_at_fetch_position: self.box_at_fetch_position,
            loading_position_occupied: self.loading_position_occupied,
            belt_moving: self.belt_moving,
            box_position_m: self.box_position_m,
        }
    }

    pub fn state(&self) -> StationState {
        self.state
    }

    pub fn box_at_fetch_position(&self) -> bool {
        self.box_at_fetch_position
    }

    pub fn loading_position_occupied(&self) -> bool {
        self.loading_position_occupied
    }

    pub fn belt_moving(&self) -> bool {
        self.belt_moving
    }

    pub fn box_position_m(&self) -> f64 {
        self.box_position_m
    }

    /// Robot arrived at the waiting position; clear it into the loading zone
    fn handle_at_waiting_position(&mut self) -> InvariantResult<Option<Envelope>> {
        if let Err(err) = StationIdleGuard.check(self) {
            error!(error = %err, "cannot signal loading position vacant");
            return Ok(None);
        }

        // Interlock: an occupied loading position in idle means a previous
        // cycle never released it.
        if self.loading_position_occupied {
            return Err(InvariantViolation::LoadingPositionOccupied);
        }

        info!("robot at waiting position, signaling loading position vacant");
        self.transition_to(StationState::LoadingPositionVacant, "at_waiting_position");

        Ok(Some(Envelope::new(
            Recipient::Robot,
            ProtocolMessage::new(MessageKind::LoadingPositionVacant),
        )))
    }

    /// Robot is in place; transport the box to the fetch position
    fn handle_ready_to_receive(&mut self) -> InvariantResult<Option<Envelope>> {
        if let Err(err) = AwaitingRobotReadyGuard.check(self) {
            error!(error = %err, "unexpected readiness report");
            return Ok(None);
        }

        info!("robot is ready, starting box transport");
        self.loading_position_occupied = true;
        self.transition_to(StationState::WaitingForRobotReady, "ready_to_receive");

        self.transport_box()?;

        Ok(Some(Envelope::new(
            Recipient::Robot,
            ProtocolMessage::new(MessageKind::FetchBox),
        )))
    }

    /// Robot cleared the loading zone; reset for the next cycle
    fn handle_operation_complete(&mut self) -> Option<Envelope> {
        if let Err(err) = BoxAtFetchPositionGuard.check(self) {
            error!(error = %err, "unexpected completion report");
            return None;
        }

        info!("operation complete, returning to idle");
        self.box_at_fetch_position = false;
        self.loading_position_occupied = false;
        self.box_position_m = 0.0;
        self.transition_to(StationState::Idle, "operation_complete");

        None
    }

    /// Run the belt until the box reaches the fetch position
    fn transport_box(&mut self) -> InvariantResult<()> {
        self.transition_to(StationState::TransportingBox, "transport_started");
        info!("transporting box to fetch position");

        self.belt_moving = true;
        self.delay.pause(self.timing.transport());

        self.box_position_m = self.config.fetch_position_m;
        self.belt_moving = false;
        self.box_at_fetch_position = true;
        info!(position_m = self.box_position_m, "box at fetch position, belt stopped");
        self.transition_to(StationState::BoxAtFetchPosition, "transport_complete");

        // Interlocks: the robot must never be told to fetch from a moving or
        // empty belt.
        if self.belt_moving {
            return Err(InvariantViolation::BeltStillMoving);
        }
        if !self.box_at_fetch_position {
            return Err(InvariantViolation::BoxMissingAfterTransport);
        }
        Ok(())
    }

    fn transition_to(&mut self, next: StationState, trigger: &str) {
        let from = self.state;
        self.state = next;
        debug!(from = %from, to = %next, trigger, "station state transition");

        if let Err(err) =
            self.transition_action
                .execute(&*self, Some(from.to_string()), next.to_string(), trigger)
        {
            warn!(error = %err, "failed to publish transition event");
        }
    }
}

#[cfg(test)]
impl StationMachine {
    /// Test support: force the machine into an arbitrary state
    pub(crate) fn force_state(&mut self, state: StationState) {
        self.state = state;
    }

    /// Test support: mark the loading position occupied
    pub(crate) fn force_loading_position_occupied(&mut self) {
        self.loading_position_occupied = true;
    }
}
