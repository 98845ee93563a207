//! Warehouse handoff simulation.
//!
//! Runs one full robot/station handoff cycle with wall-clock delays and logs
//! the final machine snapshots for verification.

use handoff_core::config::HandoffConfig;
use handoff_core::dispatcher::MessageDispatcher;
use handoff_core::events::EventPublisher;
use handoff_core::logging;
use handoff_core::simulation::WallClockDelay;
use handoff_core::state_machine::{RobotMachine, StationMachine};
use handoff_core::{HandoffError, Result};
use tracing::{error, info};

fn run() -> Result<()> {
    let config = HandoffConfig::load()?;
    let publisher = EventPublisher::new();

    let robot = RobotMachine::new(&config, publisher.clone(), Box::new(WallClockDelay));
    let station = StationMachine::new(&config, publisher.clone(), Box::new(WallClockDelay));
    let mut dispatcher = MessageDispatcher::new(robot, station, publisher);

    let report = dispatcher.run_cycle()?;
    info!(
        exchanges = report.exchanges,
        completed = report.completed,
        "simulation finished"
    );

    let robot_state = serde_json::to_string(&dispatcher.robot().snapshot())
        .unwrap_or_else(|_| "<unserializable>".to_string());
    let station_state = serde_json::to_string(&dispatcher.station().snapshot())
        .unwrap_or_else(|_| "<unserializable>".to_string());
    info!(snapshot = %robot_state, "final robot state");
    info!(snapshot = %station_state, "final station state");

    Ok(())
}

fn main() {
    logging::init_logging();

    if let Err(err) = run() {
        error!(error = %err, "simulation aborted");
        let code = match err {
            HandoffError::ConfigurationError(_) => 2,
            // Emergency-stop path: an invariant breach surfaced from dispatch
            HandoffError::DispatchError(_) => 1,
        };
        std::process::exit(code);
    }
}
