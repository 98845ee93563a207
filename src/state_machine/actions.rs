use super::errors::{ActionError, ActionResult};
use super::robot::RobotMachine;
use super::station::StationMachine;
use crate::constants::system_events;
use crate::events::EventPublisher;
use serde_json::{json, Value};

/// Trait for implementing state transition actions
pub trait StateAction<T> {
    /// Execute the action for a committed transition
    fn execute(
        &self,
        entity: &T,
        from_state: Option<String>,
        to_state: String,
        trigger: &str,
    ) -> ActionResult<()>;

    /// Get a description of this action for logging
    fn description(&self) -> &'static str;
}

/// Action to publish lifecycle events when state transitions occur
#[derive(Debug, Clone)]
pub struct PublishTransitionEventAction {
    event_publisher: EventPublisher,
}

impl PublishTransitionEventAction {
    pub fn new(event_publisher: EventPublisher) -> Self {
        Self { event_publisher }
    }
}

impl StateAction<RobotMachine> for PublishTransitionEventAction {
    fn execute(
        &self,
        robot: &RobotMachine,
        from_state: Option<String>,
        to_state: String,
        trigger: &str,
    ) -> ActionResult<()> {
        if let Some(event_name) = determine_robot_event_name(from_state.as_deref(), &to_state) {
            let context = build_robot_event_context(robot, &from_state, &to_state, trigger);

            self.event_publisher
                .publish(event_name, context)
                .map_err(|_| ActionError::EventPublishFailed {
                    event_name: event_name.to_string(),
                })?;
        }

        Ok(())
    }

    fn description(&self) -> &'static str {
        "Publish lifecycle event for robot transition"
    }
}

impl StateAction<StationMachine> for PublishTransitionEventAction {
    fn execute(
        &self,
        station: &StationMachine,
        from_state: Option<String>,
        to_state: String,
        trigger: &str,
    ) -> ActionResult<()> {
        if let Some(event_name) = determine_station_event_name(from_state.as_deref(), &to_state) {
            let context = build_station_event_context(station, &from_state, &to_state, trigger);

            self.event_publisher
                .publish(event_name, context)
                .map_err(|_| ActionError::EventPublishFailed {
                    event_name: event_name.to_string(),
                })?;
        }

        Ok(())
    }

    fn description(&self) -> &'static str {
        "Publish lifecycle event for station transition"
    }
}

/// Map a robot transition to a lifecycle event name.
///
/// Intermediate motion states carry no event of their own; returning to idle
/// is only an event when it ends a cycle (a `from` state exists).
fn determine_robot_event_name(from_state: Option<&str>, to_state: &str) -> Option<&'static str> {
    match to_state {
        "moving_to_waiting" => Some(system_events::ROBOT_OPERATION_STARTED),
        "at_waiting_position" => Some(system_events::ROBOT_ARRIVED_AT_WAITING),
        "at_loading_position" => Some(system_events::ROBOT_ARRIVED_AT_LOADING),
        "place_box" => Some(system_events::ROBOT_BOX_PLACED),
        "idle" if from_state.is_some() => Some(system_events::ROBOT_RETURNED_TO_IDLE),
        _ => None,
    }
}

/// Map a station transition to a lifecycle event name
fn determine_station_event_name(from_state: Option<&str>, to_state: &str) -> Option<&'static str> {
    match to_state {
        "loading_position_vacant" => Some(system_events::STATION_LOADING_POSITION_VACANT),
        "transporting_box" => Some(system_events::STATION_TRANSPORT_STARTED),
        "box_at_fetch_position" => Some(system_events::STATION_BOX_AT_FETCH_POSITION),
        "idle" if from_state.is_some() => Some(system_events::STATION_CYCLE_RESET),
        _ => None,
    }
}

fn build_robot_event_context(
    robot: &RobotMachine,
    from_state: &Option<String>,
    to_state: &str,
    trigger: &str,
) -> Value {
    json!({
        "from_state": from_state,
        "to_state": to_state,
        "trigger": trigger,
        "position": robot.position().map(|p| p.to_string()),
        "arm_horizontal_m": robot.arm_horizontal_m(),
        "arm_vertical_m": robot.arm_vertical_m(),
        "grip_active": robot.grip_active(),
        "weight_sensor_kg": robot.weight_sensor_kg(),
        "radar_clear": robot.radar_clear(),
    })
}

fn build_station_event_context(
    station: &StationMachine,
    from_state: &Option<String>,
    to_state: &str,
    trigger: &str,
) -> Value {
    json!({
        "from_state": from_state,
        "to_state": to_state,
        "trigger": trigger,
        "box_at_fetch_position": station.box_at_fetch_position(),
        "loading_position_occupied": station.loading_position_occupied(),
        "belt_moving": station.belt_moving(),
        "box_position_m": station.box_position_m(),
    })
}
