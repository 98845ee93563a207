//! Property-based tests: the guards make the fatal interlocks unreachable
//! from the outside, whatever message order an adversarial peer produces.

mod common;

use common::strategies::*;
use handoff_core::config::HandoffConfig;
use handoff_core::events::EventPublisher;
use handoff_core::simulation::NoDelay;
use handoff_core::state_machine::{
    ProtocolMessage, RobotMachine, StationMachine, StationState,
};
use proptest::prelude::*;

proptest! {
    /// Property: no externally injectable stimulus sequence can trip a
    /// safety interlock or leave a machine resting in an unsafe pose.
    #[test]
    fn arbitrary_stimuli_never_trip_safety_interlocks(
        stimuli in stimulus_sequence_strategy()
    ) {
        let config = HandoffConfig::default();
        let publisher = EventPublisher::new();
        let mut robot = RobotMachine::new(&config, publisher.clone(), Box::new(NoDelay));
        let mut station = StationMachine::new(&config, publisher, Box::new(NoDelay));

        for stimulus in stimuli {
            match stimulus {
                Stimulus::StartRobot => {
                    let _ = robot.start();
                }
                Stimulus::ToRobot(kind) => {
                    let outcome = robot.receive(&ProtocolMessage::new(kind));
                    prop_assert!(outcome.is_ok(), "robot interlock tripped: {:?}", outcome);
                }
                Stimulus::ToStation(kind) => {
                    let outcome = station.receive(&ProtocolMessage::new(kind));
                    prop_assert!(outcome.is_ok(), "station interlock tripped: {:?}", outcome);
                }
            }

            // Between stimuli the machines are at rest; mid-sequence poses
            // must not leak out.
            let robot_snapshot = robot.snapshot();
            if !robot_snapshot.state.permits_arm_extension() {
                prop_assert_eq!(robot_snapshot.arm_horizontal_m, 0.0);
                prop_assert_eq!(robot_snapshot.arm_vertical_m, 0.0);
            }

            let station_snapshot = station.snapshot();
            if station_snapshot.state == StationState::BoxAtFetchPosition {
                prop_assert!(!station_snapshot.belt_moving);
            }
            if matches!(
                station_snapshot.state,
                StationState::Idle | StationState::LoadingPositionVacant
            ) {
                prop_assert!(!station_snapshot.loading_position_occupied);
            }
        }
    }

    /// Property: an idle robot rejects every message kind without mutating
    #[test]
    fn idle_robot_rejects_all_messages(kind in message_kind_strategy()) {
        let config = HandoffConfig::default();
        let publisher = EventPublisher::new();
        let mut robot = RobotMachine::new(&config, publisher, Box::new(NoDelay));
        let before = robot.snapshot();

        let reply = robot.receive(&ProtocolMessage::new(kind)).unwrap();

        prop_assert!(reply.is_none());
        prop_assert_eq!(robot.snapshot(), before);
    }
}
