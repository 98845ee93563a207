//! End-to-end handoff cycle tests driven through the dispatcher.

use handoff_core::config::HandoffConfig;
use handoff_core::constants::{system_events, CYCLE_EXCHANGES};
use handoff_core::dispatcher::MessageDispatcher;
use handoff_core::events::EventPublisher;
use handoff_core::simulation::NoDelay;
use handoff_core::state_machine::{
    MessageKind, ProtocolMessage, RobotMachine, RobotState, StationMachine, StationState,
};

fn harness() -> (MessageDispatcher, EventPublisher) {
    let config = HandoffConfig::default();
    let publisher = EventPublisher::new();
    let robot = RobotMachine::new(&config, publisher.clone(), Box::new(NoDelay));
    let station = StationMachine::new(&config, publisher.clone(), Box::new(NoDelay));
    (
        MessageDispatcher::new(robot, station, publisher.clone()),
        publisher,
    )
}

#[test]
fn full_cycle_completes_in_five_exchanges() {
    let (mut dispatcher, _publisher) = harness();
    let initial_robot = dispatcher.robot().snapshot();
    let initial_station = dispatcher.station().snapshot();

    let report = dispatcher.run_cycle().expect("no interlock may trip");

    assert_eq!(report.exchanges, CYCLE_EXCHANGES);
    assert!(report.completed);

    // Station comes back to its exact initial snapshot.
    assert_eq!(dispatcher.station().snapshot(), initial_station);

    // Robot comes back to initial except the retained weight reading.
    let final_robot = dispatcher.robot().snapshot();
    assert_eq!(final_robot.state, RobotState::Idle);
    assert_eq!(final_robot.position, initial_robot.position);
    assert_eq!(final_robot.arm_horizontal_m, 0.0);
    assert_eq!(final_robot.arm_vertical_m, 0.0);
    assert_eq!(final_robot.grip_active, initial_robot.grip_active);
    assert_eq!(final_robot.radar_clear, initial_robot.radar_clear);
    assert_eq!(final_robot.weight_sensor_kg, 5.0);
}

#[test]
fn machines_are_reusable_for_consecutive_cycles() {
    let (mut dispatcher, _publisher) = harness();

    for _ in 0..2 {
        let report = dispatcher.run_cycle().expect("no interlock may trip");
        assert_eq!(report.exchanges, CYCLE_EXCHANGES);
        assert!(report.completed);
        assert!(dispatcher.robot().state().is_idle());
        assert!(dispatcher.station().state().is_idle());
    }
}

#[test]
fn blocked_radar_stalls_the_protocol_detectably() {
    let (mut dispatcher, _publisher) = harness();
    dispatcher.robot_mut().set_radar_clear(false);

    let report = dispatcher.run_cycle().expect("a stall is not an interlock");

    assert!(!report.completed);
    assert_eq!(report.exchanges, 2);
    assert_eq!(dispatcher.robot().state(), RobotState::AtWaitingPosition);
    assert_eq!(
        dispatcher.station().state(),
        StationState::LoadingPositionVacant
    );
}

#[test]
fn out_of_order_ready_to_receive_is_rejected() {
    let config = HandoffConfig::default();
    let publisher = EventPublisher::new();
    let mut station = StationMachine::new(&config, publisher, Box::new(NoDelay));
    let before = station.snapshot();

    let reply = station
        .receive(&ProtocolMessage::new(MessageKind::ReadyToReceive))
        .expect("a guard rejection is not an interlock");

    assert!(reply.is_none());
    assert_eq!(station.snapshot(), before);
    assert_eq!(station.state(), StationState::Idle);
}

#[test]
fn lifecycle_events_trace_the_whole_cycle() {
    let (mut dispatcher, publisher) = harness();
    let receiver = publisher.subscribe();

    dispatcher.run_cycle().expect("no interlock may trip");

    let names: Vec<String> = receiver.try_iter().map(|event| event.name).collect();
    assert_eq!(
        names,
        vec![
            system_events::ROBOT_OPERATION_STARTED,
            system_events::ROBOT_ARRIVED_AT_WAITING,
            system_events::STATION_LOADING_POSITION_VACANT,
            system_events::ROBOT_ARRIVED_AT_LOADING,
            system_events::STATION_TRANSPORT_STARTED,
            system_events::STATION_BOX_AT_FETCH_POSITION,
            system_events::ROBOT_BOX_PLACED,
            system_events::ROBOT_RETURNED_TO_IDLE,
            system_events::STATION_CYCLE_RESET,
            system_events::PROTOCOL_CYCLE_COMPLETE,
        ]
    );
}

#[test]
fn arm_is_retracted_at_every_published_robot_event() {
    let (mut dispatcher, publisher) = harness();
    let receiver = publisher.subscribe();

    dispatcher.run_cycle().expect("no interlock may trip");

    for event in receiver.try_iter() {
        if !event.name.starts_with("robot.") {
            continue;
        }
        let to_state = event.context["to_state"].as_str().unwrap();
        assert!(
            !matches!(to_state, "extending_arm" | "gripping_box"),
            "mid-extension states publish no events"
        );
        assert_eq!(
            event.context["arm_horizontal_m"].as_f64().unwrap(),
            0.0,
            "arm must be retracted at {}",
            event.name
        );
        assert_eq!(event.context["arm_vertical_m"].as_f64().unwrap(), 0.0);
    }
}

#[test]
fn belt_is_stopped_when_the_box_is_presented() {
    let (mut dispatcher, publisher) = harness();
    let receiver = publisher.subscribe();

    dispatcher.run_cycle().expect("no interlock may trip");

    let presented: Vec<_> = receiver
        .try_iter()
        .filter(|event| event.name == system_events::STATION_BOX_AT_FETCH_POSITION)
        .collect();
    assert_eq!(presented.len(), 1);
    assert_eq!(presented[0].context["belt_moving"], false);
    assert_eq!(presented[0].context["box_position_m"].as_f64().unwrap(), 10.0);
}

#[test]
fn stalled_run_publishes_a_protocol_stalled_event() {
    let (mut dispatcher, publisher) = harness();
    let receiver = publisher.subscribe();
    dispatcher.robot_mut().set_radar_clear(false);

    dispatcher.run_cycle().expect("a stall is not an interlock");

    let names: Vec<String> = receiver.try_iter().map(|event| event.name).collect();
    assert!(names.contains(&system_events::PROTOCOL_STALLED.to_string()));
    assert!(!names.contains(&system_events::PROTOCOL_CYCLE_COMPLETE.to_string()));
}
