use serde::{Deserialize, Serialize};
use std::fmt;

/// Robot-side states of the box handoff protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotState {
    /// Initial and terminal state of every cycle
    Idle,
    /// Robot is driving to the waiting position near the station
    MovingToWaiting,
    /// Robot is staged at the waiting position
    AtWaitingPosition,
    /// Robot is driving from waiting to loading position
    MovingToLoading,
    /// Robot is parked at the loading position next to the belt
    AtLoadingPosition,
    /// Arm is extending toward the fetch offsets
    ExtendingArm,
    /// Gripper is closed around the box
    GrippingBox,
    /// Box is being placed on the robot platform
    PlaceBox,
    /// Robot is driving away from the loading position
    MovingToIdle,
}

impl RobotState {
    /// Check if the robot is at rest and ready for a new cycle
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Check if the robot base is in motion
    pub fn is_moving(&self) -> bool {
        matches!(
            self,
            Self::MovingToWaiting | Self::MovingToLoading | Self::MovingToIdle
        )
    }

    /// Check if the arm is allowed to be extended in this state
    pub fn permits_arm_extension(&self) -> bool {
        matches!(self, Self::ExtendingArm | Self::GrippingBox)
    }
}

impl fmt::Display for RobotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::MovingToWaiting => write!(f, "moving_to_waiting"),
            Self::AtWaitingPosition => write!(f, "at_waiting_position"),
            Self::MovingToLoading => write!(f, "moving_to_loading"),
            Self::AtLoadingPosition => write!(f, "at_loading_position"),
            Self::ExtendingArm => write!(f, "extending_arm"),
            Self::GrippingBox => write!(f, "gripping_box"),
            Self::PlaceBox => write!(f, "place_box"),
            Self::MovingToIdle => write!(f, "moving_to_idle"),
        }
    }
}

impl std::str::FromStr for RobotState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "moving_to_waiting" => Ok(Self::MovingToWaiting),
            "at_waiting_position" => Ok(Self::AtWaitingPosition),
            "moving_to_loading" => Ok(Self::MovingToLoading),
            "at_loading_position" => Ok(Self::AtLoadingPosition),
            "extending_arm" => Ok(Self::ExtendingArm),
            "gripping_box" => Ok(Self::GrippingBox),
            "place_box" => Ok(Self::PlaceBox),
            "moving_to_idle" => Ok(Self::MovingToIdle),
            _ => Err(format!("Invalid robot state: {s}")),
        }
    }
}

impl Default for RobotState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Named locations the robot base can occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotPosition {
    /// Staging location before entering the loading zone
    Waiting,
    /// Location adjacent to the station while receiving the box
    Loading,
}

impl fmt::Display for RobotPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Loading => write!(f, "loading"),
        }
    }
}

/// Conveyor/loading station states of the box handoff protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationState {
    /// Initial and terminal state of every cycle
    Idle,
    /// Loading position signaled vacant, waiting for the robot to move in
    LoadingPositionVacant,
    /// Robot confirmed ready, transport about to start
    WaitingForRobotReady,
    /// Belt is moving the box toward the fetch position
    TransportingBox,
    /// Box is presented at the fetch position with the belt stopped
    BoxAtFetchPosition,
}

impl StationState {
    /// Check if the station is at rest and ready for a new cycle
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Check if the belt is expected to be running in this state
    pub fn is_transporting(&self) -> bool {
        matches!(self, Self::TransportingBox)
    }

    /// Check if the robot is permitted to fetch in this state
    pub fn permits_fetch(&self) -> bool {
        matches!(self, Self::BoxAtFetchPosition)
    }
}

impl fmt::Display for StationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::LoadingPositionVacant => write!(f, "loading_position_vacant"),
            Self::WaitingForRobotReady => write!(f, "waiting_for_robot_ready"),
            Self::TransportingBox => write!(f, "transporting_box"),
            Self::BoxAtFetchPosition => write!(f, "box_at_fetch_position"),
        }
    }
}

impl std::str::FromStr for StationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "loading_position_vacant" => Ok(Self::LoadingPositionVacant),
            "waiting_for_robot_ready" => Ok(Self::WaitingForRobotReady),
            "transporting_box" => Ok(Self::TransportingBox),
            "box_at_fetch_position" => Ok(Self::BoxAtFetchPosition),
            _ => Err(format!("Invalid station state: {s}")),
        }
    }
}

impl Default for StationState {
    fn default() -> Self {
        Self::Idle
    }
}
