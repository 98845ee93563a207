use handoff_core::state_machine::MessageKind;
use proptest::prelude::*;

/// One externally injectable protocol stimulus
#[derive(Debug, Clone, Copy)]
pub enum Stimulus {
    /// Operator starts the robot
    StartRobot,
    /// Deliver a message to the robot
    ToRobot(MessageKind),
    /// Deliver a message to the station
    ToStation(MessageKind),
}

/// Strategy for generating any protocol message kind
pub fn message_kind_strategy() -> impl Strategy<Value = MessageKind> {
    prop_oneof![
        Just(MessageKind::AtWaitingPosition),
        Just(MessageKind::LoadingPositionVacant),
        Just(MessageKind::ReadyToReceive),
        Just(MessageKind::FetchBox),
        Just(MessageKind::OperationComplete),
    ]
}

/// Strategy for generating a single stimulus
pub fn stimulus_strategy() -> impl Strategy<Value = Stimulus> {
    prop_oneof![
        Just(Stimulus::StartRobot),
        message_kind_strategy().prop_map(Stimulus::ToRobot),
        message_kind_strategy().prop_map(Stimulus::ToStation),
    ]
}

/// Strategy for generating a stimulus sequence of protocol-relevant length
pub fn stimulus_sequence_strategy() -> impl Strategy<Value = Vec<Stimulus>> {
    prop::collection::vec(stimulus_strategy(), 0..24)
}
