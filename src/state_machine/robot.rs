//! Robot side of the handoff protocol.
//!
//! The robot stages at a waiting position, enters the loading zone once the
//! station clears it and the radar reports a free path, then runs the fetch
//! sequence: extend arm, grip, place on its own platform, retreat. Guard
//! failures stall the exchange; safety interlocks inside the fetch sequence
//! abort the run.

use super::actions::{PublishTransitionEventAction, StateAction};
use super::errors::{InvariantResult, InvariantViolation};
use super::guards::{
    AtLoadingPositionGuard, AtWaitingPositionGuard, RadarClearGuard, RobotIdleGuard, StateGuard,
};
use super::messages::{Envelope, MessageKind, ProtocolMessage, Recipient};
use super::states::{RobotPosition, RobotState};
use crate::config::{HandoffConfig, RobotConfig, TimingConfig};
use crate::events::EventPublisher;
use crate::simulation::DelaySource;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Read-only monitoring snapshot of all robot attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotSnapshot {
    pub state: RobotState,
    pub position: Option<RobotPosition>,
    pub arm_horizontal_m: f64,
    pub arm_vertical_m: f64,
    pub grip_active: bool,
    pub weight_sensor_kg: f64,
    pub radar_clear: bool,
}

/// State machine for the mobile robot
pub struct RobotMachine {
    state: RobotState,
    position: Option<RobotPosition>,
    arm_horizontal_m: f64,
    arm_vertical_m: f64,
    grip_active: bool,
    weight_sensor_kg: f64,
    radar_clear: bool,
    config: RobotConfig,
    timing: TimingConfig,
    delay: Box<dyn DelaySource>,
    transition_action: PublishTransitionEventAction,
}

impl RobotMachine {
    /// Create a robot machine with default initial attributes
    pub fn new(
        config: &HandoffConfig,
        event_publisher: EventPublisher,
        delay: Box<dyn DelaySource>,
    ) -> Self {
        Self {
            state: RobotState::default(),
            position: None,
            arm_horizontal_m: 0.0,
            arm_vertical_m: 0.0,
            grip_active: false,
            weight_sensor_kg: 0.0,
            radar_clear: true,
            config: config.robot.clone(),
            timing: config.timing.clone(),
            delay,
            transition_action: PublishTransitionEventAction::new(event_publisher),
        }
    }

    /// Initiate a fetch operation.
    ///
    /// Allowed only from idle; moves the robot to the waiting position and
    /// returns the first protocol message, addressed to the station. A guard
    /// failure is logged and yields no envelope.
    pub fn start(&mut self) -> Option<Envelope> {
        if let Err(err) = RobotIdleGuard.check(self) {
            error!(error = %err, "cannot start operation");
            return None;
        }

        info!("starting operation");
        self.transition_to(RobotState::MovingToWaiting, "start");
        Some(self.move_to_waiting_position())
    }

    /// Handle an incoming protocol message.
    ///
    /// Guard failures are logged and answered with no envelope; invariant
    /// violations inside the fetch sequence propagate as fatal errors.
    pub fn receive(&mut self, message: &ProtocolMessage) -> InvariantResult<Option<Envelope>> {
        match message.kind {
            MessageKind::LoadingPositionVacant => Ok(self.handle_loading_position_vacant()),
            MessageKind::FetchBox => self.handle_fetch_box(),
            kind => {
                warn!(kind = %kind, state = %self.state, "unexpected message for robot");
                Ok(None)
            }
        }
    }

    /// Update the externally supplied radar path-clear signal
    pub fn set_radar_clear(&mut self, clear: bool) {
        info!(clear, "radar signal updated");
        self.radar_clear = clear;
    }

    /// Read-only snapshot of all attributes, safe at any time
    pub fn snapshot(&self) -> RobotSnapshot {
        RobotSnapshot {
            state: self.state,
            position: self.position,
            arm_horizontal_m: self.arm_horizontal_m,
            arm_vertical_m: self.arm_vertical_m,
            grip_active: self.grip_active,
            weight_sensor_kg: self.weight_sensor_kg,
            radar_clear: self.radar_clear,
        }
    }

    pub fn state(&self) -> RobotState {
        self.state
    }

    pub fn position(&self) -> Option<RobotPosition> {
        self.position
    }

    pub fn arm_horizontal_m(&self) -> f64 {
        self.arm_horizontal_m
    }

    pub fn arm_vertical_m(&self) -> f64 {
        self.arm_vertical_m
    }

    pub fn grip_active(&self) -> bool {
        self.grip_active
    }

    pub fn weight_sensor_kg(&self) -> f64 {
        self.weight_sensor_kg
    }

    pub fn radar_clear(&self) -> bool {
        self.radar_clear
    }

    /// Station cleared the loading position for us
    fn handle_loading_position_vacant(&mut self) -> Option<Envelope> {
        if let Err(err) = AtWaitingPositionGuard.check(self) {
            error!(error = %err, "refusing to move to loading position");
            return None;
        }
        if let Err(err) = RadarClearGuard.check(self) {
            error!(error = %err, "refusing to move to loading position");
            return None;
        }

        self.transition_to(RobotState::MovingToLoading, "loading_position_vacant");
        Some(self.move_to_loading_position())
    }

    /// Station presents the box; run the fetch sequence
    fn handle_fetch_box(&mut self) -> InvariantResult<Option<Envelope>> {
        if let Err(err) = AtLoadingPositionGuard.check(self) {
            error!(error = %err, "refusing to fetch");
            return Ok(None);
        }

        // Interlock: the guards guarantee a retracted arm here; anything else
        // means the sequencing itself is broken.
        self.verify_arm_retracted()?;

        self.fetch_box_sequence()?;

        Ok(Some(Envelope::new(
            Recipient::Station,
            ProtocolMessage::new(MessageKind::OperationComplete),
        )))
    }

    fn move_to_waiting_position(&mut self) -> Envelope {
        info!("moving to waiting position");
        self.delay.pause(self.timing.move_to_waiting());
        self.position = Some(RobotPosition::Waiting);
        self.transition_to(RobotState::AtWaitingPosition, "move_to_waiting");
        info!("arrived at waiting position");

        Envelope::new(
            Recipient::Station,
            ProtocolMessage::new(MessageKind::AtWaitingPosition),
        )
    }

    fn move_to_loading_position(&mut self) -> Envelope {
        info!("moving to loading position");
        self.delay.pause(self.timing.move_to_loading());
        self.position = Some(RobotPosition::Loading);
        self.transition_to(RobotState::AtLoadingPosition, "move_to_loading");
        info!("arrived at loading position");

        Envelope::new(
            Recipient::Station,
            ProtocolMessage::new(MessageKind::ReadyToReceive),
        )
    }

    /// Full box fetching sequence: extend, grip, place, retreat
    fn fetch_box_sequence(&mut self) -> InvariantResult<()> {
        self.transition_to(RobotState::ExtendingArm, "fetch_box");
        info!(
            horizontal_m = self.config.fetch_x_m,
            vertical_m = self.config.fetch_y_m,
            "extending arm"
        );
        self.delay.pause(self.timing.extend_arm());
        self.arm_horizontal_m = self.config.fetch_x_m;
        self.arm_vertical_m = self.config.fetch_y_m;

        info!("gripping box");
        self.delay.pause(self.timing.grip());
        self.transition_to(RobotState::GrippingBox, "arm_extended");
        self.grip_active = true;

        info!("placing box on platform");
        self.delay.pause(self.timing.place());
        self.arm_horizontal_m = 0.0;
        self.arm_vertical_m = 0.0;
        self.grip_active = false;
        self.transition_to(RobotState::PlaceBox, "box_gripped");

        self.weight_sensor_kg = self.config.box_mass_kg;
        info!(reading_kg = self.weight_sensor_kg, "weight sensor reading");
        if self.weight_sensor_kg <= 0.0 {
            return Err(InvariantViolation::WeightNotDetected {
                reading_kg: self.weight_sensor_kg,
            });
        }

        self.transition_to(RobotState::MovingToIdle, "box_placed");
        info!("moving away from loading position");
        self.delay.pause(self.timing.move_to_idle());
        self.position = None;

        self.transition_to(RobotState::Idle, "cycle_complete");
        info!("operation complete, returned to idle");
        Ok(())
    }

    fn verify_arm_retracted(&self) -> InvariantResult<()> {
        if self.arm_horizontal_m != 0.0 || self.arm_vertical_m != 0.0 {
            return Err(InvariantViolation::ArmNotRetracted {
                horizontal_m: self.arm_horizontal_m,
                vertical_m: self.arm_vertical_m,
            });
        }
        Ok(())
    }

    fn transition_to(&mut self, next: RobotState, trigger: &str) {
        let from = self.state;
        self.state = next;
        debug!(from = %from, to = %next, trigger, "robot state transition");

        if let Err(err) =
            self.transition_action
                .execute(&*self, Some(from.to_string()), next.to_string(), trigger)
        {
            warn!(error = %err, "failed to publish transition event");
        }
    }
}

#[cfg(test)]
impl RobotMachine {
    /// Test support: force the machine into an arbitrary state
    pub(crate) fn force_state(&mut self, state: RobotState) {
        self.state = state;
    }

    /// Test support: force the arm out of its retracted pose
    pub(crate) fn force_arm_extension(&mut self, horizontal_m: f64, vertical_m: f64) {
        self.arm_horizontal_m = horizontal_m;
        self.arm_vertical_m = vertical_m;
    }
}
