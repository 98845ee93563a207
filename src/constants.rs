//! System constants for the handoff protocol.

/// Number of message exchanges in one complete handoff cycle
pub const CYCLE_EXCHANGES: usize = 5;

/// Lifecycle events emitted as the machines move through a handoff cycle
pub mod system_events {
    // Robot lifecycle events
    pub const ROBOT_OPERATION_STARTED: &str = "robot.operation_started";
    pub const ROBOT_ARRIVED_AT_WAITING: &str = "robot.arrived_at_waiting_position";
    pub const ROBOT_ARRIVED_AT_LOADING: &str = "robot.arrived_at_loading_position";
    pub const ROBOT_BOX_PLACED: &str = "robot.box_placed";
    pub const ROBOT_RETURNED_TO_IDLE: &str = "robot.returned_to_idle";

    // Station lifecycle events
    pub const STATION_LOADING_POSITION_VACANT: &str = "station.loading_position_vacant";
    pub const STATION_TRANSPORT_STARTED: &str = "station.transport_started";
    pub const STATION_BOX_AT_FETCH_POSITION: &str = "station.box_at_fetch_position";
    pub const STATION_CYCLE_RESET: &str = "station.cycle_reset";

    // Protocol-level events emitted by the dispatcher
    pub const PROTOCOL_CYCLE_COMPLETE: &str = "protocol.cycle_complete";
    pub const PROTOCOL_STALLED: &str = "protocol.stalled";
}
