use super::errors::{state_mismatch, GuardError, GuardResult};
use super::robot::RobotMachine;
use super::states::{RobotState, StationState};
use super::station::StationMachine;

/// Trait for implementing state transition guards
pub trait StateGuard<T> {
    /// Check if a transition is allowed
    fn check(&self, entity: &T) -> GuardResult<()>;

    /// Get a description of this guard for logging
    fn description(&self) -> &'static str;
}

/// Guard requiring the robot to be idle before a new operation starts
pub struct RobotIdleGuard;

impl StateGuard<RobotMachine> for RobotIdleGuard {
    fn check(&self, robot: &RobotMachine) -> GuardResult<()> {
        if robot.state() != RobotState::Idle {
            return Err(state_mismatch("robot_idle", "idle", robot.state()));
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Robot must be idle to start an operation"
    }
}

/// Guard requiring the robot to be staged at the waiting position
pub struct AtWaitingPositionGuard;

impl StateGuard<RobotMachine> for AtWaitingPositionGuard {
    fn check(&self, robot: &RobotMachine) -> GuardResult<()> {
        if robot.state() != RobotState::AtWaitingPosition {
            return Err(state_mismatch(
                "at_waiting_position",
                "at_waiting_position",
                robot.state(),
            ));
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Robot must be at the waiting position before moving to loading"
    }
}

/// Guard requiring the radar path-clear signal before entering the loading zone
pub struct RadarClearGuard;

impl StateGuard<RobotMachine> for RadarClearGuard {
    fn check(&self, robot: &RobotMachine) -> GuardResult<()> {
        if !robot.radar_clear() {
            return Err(GuardError::PathObstructed {
                guard: "radar_clear",
            });
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Radar must report a clear path into the loading zone"
    }
}

/// Guard requiring the robot to be parked at the loading position
pub struct AtLoadingPositionGuard;

impl StateGuard<RobotMachine> for AtLoadingPositionGuard {
    fn check(&self, robot: &RobotMachine) -> GuardResult<()> {
        if robot.state() != RobotState::AtLoadingPosition {
            return Err(state_mismatch(
                "at_loading_position",
                "at_loading_position",
                robot.state(),
            ));
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Robot must be at the loading position before fetching"
    }
}

/// Guard requiring the station to be idle before admitting a robot
pub struct StationIdleGuard;

impl StateGuard<StationMachine> for StationIdleGuard {
    fn check(&self, station: &StationMachine) -> GuardResult<()> {
        if station.state() != StationState::Idle {
            return Err(state_mismatch("station_idle", "idle", station.state()));
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Station must be idle to signal the loading position vacant"
    }
}

/// Guard requiring the station to be waiting on the robot's readiness
pub struct AwaitingRobotReadyGuard;

impl StateGuard<StationMachine> for AwaitingRobotReadyGuard {
    fn check(&self, station: &StationMachine) -> GuardResult<()> {
        if station.state() != StationState::LoadingPositionVacant {
            return Err(state_mismatch(
                "awaiting_robot_ready",
                "loading_position_vacant",
                station.state(),
            ));
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Station must have signaled the loading position vacant"
    }
}

/// Guard requiring the box to be presented at the fetch position
pub struct BoxAtFetchPositionGuard;

impl StateGuard<StationMachine> for BoxAtFetchPositionGuard {
    fn check(&self, station: &StationMachine) -> GuardResult<()> {
        if station.state() != StationState::BoxAtFetchPosition {
            return Err(state_mismatch(
                "box_at_fetch_position",
                "box_at_fetch_position",
                station.state(),
            ));
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Station must be presenting the box at the fetch position"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HandoffConfig;
    use crate::events::EventPublisher;
    use crate::simulation::NoDelay;

    fn robot() -> RobotMachine {
        RobotMachine::new(
            &HandoffConfig::default(),
            EventPublisher::new(),
            Box::new(NoDelay),
        )
    }

    fn station() -> StationMachine {
        StationMachine::new(
            &HandoffConfig::default(),
            EventPublisher::new(),
            Box::new(NoDelay),
        )
    }

    #[test]
    fn test_guard_descriptions() {
        assert_eq!(
            RobotIdleGuard.description(),
            "Robot must be idle to start an operation"
        );
        assert_eq!(
            RadarClearGuard.description(),
            "Radar must report a clear path into the loading zone"
        );
        assert_eq!(
            BoxAtFetchPositionGuard.description(),
            "Station must be presenting the box at the fetch position"
        );
    }

    #[test]
    fn test_robot_guards_on_fresh_machine() {
        let robot = robot();
        assert!(RobotIdleGuard.check(&robot).is_ok());
        assert!(RadarClearGuard.check(&robot).is_ok());
        assert!(matches!(
            AtWaitingPositionGuard.check(&robot),
            Err(GuardError::StateMismatch { .. })
        ));
        assert!(matches!(
            AtLoadingPositionGuard.check(&robot),
            Err(GuardError::StateMismatch { .. })
        ));
    }

    #[test]
    fn test_radar_guard_tracks_input() {
        let mut robot = robot();
        robot.set_radar_clear(false);
        assert!(matches!(
            RadarClearGuard.check(&robot),
            Err(GuardError::PathObstructed { .. })
        ));
        robot.set_radar_clear(true);
        assert!(RadarClearGuard.check(&robot).is_ok());
    }

    #[test]
    fn test_station_guards_on_fresh_machine() {
        let station = station();
        assert!(StationIdleGuard.check(&station).is_ok());
        assert!(AwaitingRobotReadyGuard.check(&station).is_err());
        assert!(BoxAtFetchPositionGuard.check(&station).is_err());
    }

    #[test]
    fn test_guard_error_reports_current_state() {
        let station = station();
        let err = AwaitingRobotReadyGuard.check(&station).unwrap_err();
        assert_eq!(
            err.to_string(),
            "guard 'awaiting_robot_ready' rejected transition: requires state \
             'loading_position_vacant', current state 'idle'"
        );
    }
}
