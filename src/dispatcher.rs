//! Synchronous message dispatcher for the handoff protocol.
//!
//! The dispatcher owns the FIFO queue and both machines. Each envelope is
//! fully processed (including any internal multi-step action sequence)
//! before the next one is popped; machines are never invoked concurrently
//! with themselves. Routing follows the address each reply carries, with no
//! assumption of strict alternation.

use crate::constants::system_events;
use crate::events::EventPublisher;
use crate::state_machine::{Envelope, InvariantViolation, Recipient, RobotMachine, StationMachine};
use serde::Serialize;
use serde_json::json;
use std::collections::VecDeque;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Fatal dispatch failure.
///
/// An invariant breach aborts the drain; any envelopes still queued are
/// carried in the error instead of being silently dropped.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invariant breach during dispatch: {violation}")]
    InvariantBreach {
        violation: InvariantViolation,
        unprocessed: Vec<Envelope>,
    },
}

/// Outcome of a drained cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Number of messages routed before the queue emptied
    pub exchanges: usize,
    /// Whether both machines came back to idle (a stalled cycle did not)
    pub completed: bool,
}

/// Synchronous router owning both machines and the message queue
pub struct MessageDispatcher {
    robot: RobotMachine,
    station: StationMachine,
    queue: VecDeque<Envelope>,
    event_publisher: EventPublisher,
}

impl MessageDispatcher {
    pub fn new(
        robot: RobotMachine,
        station: StationMachine,
        event_publisher: EventPublisher,
    ) -> Self {
        Self {
            robot,
            station,
            queue: VecDeque::new(),
            event_publisher,
        }
    }

    /// Run one full handoff cycle: start the robot, seed the queue with its
    /// first message, and drain until empty or an invariant breach aborts.
    pub fn run_cycle(&mut self) -> Result<CycleReport, DispatchError> {
        info!("initializing handoff operation");

        if let Some(envelope) = self.robot.start() {
            self.queue.push_back(envelope);
        }

        let exchanges = self.drain()?;

        let completed =
            exchanges > 0 && self.robot.state().is_idle() && self.station.state().is_idle();
        let report = CycleReport {
            exchanges,
            completed,
        };

        if completed {
            info!(exchanges, "handoff cycle complete");
            self.publish_protocol_event(system_events::PROTOCOL_CYCLE_COMPLETE, &report);
        } else {
            warn!(
                exchanges,
                robot_state = %self.robot.state(),
                station_state = %self.station.state(),
                "protocol stalled before completion"
            );
            self.publish_protocol_event(system_events::PROTOCOL_STALLED, &report);
        }

        Ok(report)
    }

    /// Read access to the robot for snapshot verification
    pub fn robot(&self) -> &RobotMachine {
        &self.robot
    }

    /// Mutable access to the robot, for external inputs such as the radar signal
    pub fn robot_mut(&mut self) -> &mut RobotMachine {
        &mut self.robot
    }

    /// Read access to the station for snapshot verification
    pub fn station(&self) -> &StationMachine {
        &self.station
    }

    fn drain(&mut self) -> Result<usize, DispatchError> {
        let mut exchanges = 0;

        while let Some(envelope) = self.queue.pop_front() {
            exchanges += 1;
            info!(
                recipient = %envelope.to,
                kind = %envelope.message.kind,
                "routing message"
            );

            let reply = match envelope.to {
                Recipient::Robot => self.robot.receive(&envelope.message),
                Recipient::Station => self.station.receive(&envelope.message),
            };

            match reply {
                Ok(Some(reply)) => self.queue.push_back(reply),
                Ok(None) => {}
                Err(violation) => {
                    error!(error = %violation, "invariant breach, aborting dispatch");
                    let unprocessed: Vec<Envelope> = self.queue.drain(..).collect();
                    for envelope in &unprocessed {
                        error!(
                            recipient = %envelope.to,
                            kind = %envelope.message.kind,
                            "message left unprocessed"
                        );
                    }
                    return Err(DispatchError::InvariantBreach {
                        violation,
                        unprocessed,
                    });
                }
            }

            debug!(depth = self.queue.len(), "message queue depth");
        }

        Ok(exchanges)
    }

    fn publish_protocol_event(&self, event_name: &'static str, report: &CycleReport) {
        let context = json!({
            "exchanges": report.exchanges,
            "completed": report.completed,
            "robot_state": self.robot.state().to_string(),
            "station_state": self.station.state().to_string(),
        });
        if let Err(err) = self.event_publisher.publish(event_name, context) {
            warn!(error = %err, "failed to publish protocol event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HandoffConfig;
    use crate::constants::CYCLE_EXCHANGES;
    use crate::simulation::NoDelay;
    use crate::state_machine::{MessageKind, ProtocolMessage, RobotState, StationState};

    fn dispatcher() -> MessageDispatcher {
        let config = HandoffConfig::default();
        let publisher = EventPublisher::new();
        let robot = RobotMachine::new(&config, publisher.clone(), Box::new(NoDelay));
        let station = StationMachine::new(&config, publisher.clone(), Box::new(NoDelay));
        MessageDispatcher::new(robot, station, publisher)
    }

    #[test]
    fn test_cycle_drains_in_expected_exchanges() {
        let mut dispatcher = dispatcher();
        let report = dispatcher.run_cycle().unwrap();

        assert_eq!(report.exchanges, CYCLE_EXCHANGES);
        assert!(report.completed);
        assert!(dispatcher.robot().state().is_idle());
        assert!(dispatcher.station().state().is_idle());
    }

    #[test]
    fn test_invariant_breach_reports_unprocessed_messages() {
        let mut dispatcher = dispatcher();

        // Drive the robot into position, then break the arm interlock and
        // queue a fetch plus a trailing message that must not be dropped.
        dispatcher.robot.start().unwrap();
        let _ = dispatcher
            .robot
            .receive(&ProtocolMessage::new(MessageKind::LoadingPositionVacant))
            .unwrap();
        dispatcher.robot.force_arm_extension(0.4, 0.2);

        dispatcher.queue.push_back(Envelope::new(
            Recipient::Robot,
            ProtocolMessage::new(MessageKind::FetchBox),
        ));
        dispatcher.queue.push_back(Envelope::new(
            Recipient::Station,
            ProtocolMessage::new(MessageKind::AtWaitingPosition),
        ));

        let err = dispatcher.drain().unwrap_err();
        let DispatchError::InvariantBreach {
            violation,
            unprocessed,
        } = err;

        assert!(matches!(
            violation,
            InvariantViolation::ArmNotRetracted { .. }
        ));
        assert_eq!(unprocessed.len(), 1);
        assert_eq!(unprocessed[0].message.kind, MessageKind::AtWaitingPosition);
    }

    #[test]
    fn test_stalled_cycle_is_reported() {
        let mut dispatcher = dispatcher();
        dispatcher.robot_mut().set_radar_clear(false);

        let report = dispatcher.run_cycle().unwrap();

        assert!(!report.completed);
        assert_eq!(report.exchanges, 2);
        assert_eq!(dispatcher.robot().state(), RobotState::AtWaitingPosition);
        assert_eq!(
            dispatcher.station().state(),
            StationState::LoadingPositionVacant
        );
    }
}
