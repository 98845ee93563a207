use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Kinds of messages exchanged between the robot and the station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Robot has arrived at the waiting position
    AtWaitingPosition,
    /// Station signals the loading position is vacant
    LoadingPositionVacant,
    /// Robot is parked at the loading position and ready for the box
    ReadyToReceive,
    /// Station presents the box at the fetch position
    FetchBox,
    /// Robot finished the fetch sequence and cleared the loading zone
    OperationComplete,
}

impl MessageKind {
    /// Get the wire/log string form of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AtWaitingPosition => "at_waiting_position",
            Self::LoadingPositionVacant => "loading_position_vacant",
            Self::ReadyToReceive => "ready_to_receive",
            Self::FetchBox => "fetch_box",
            Self::OperationComplete => "operation_complete",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "at_waiting_position" => Ok(Self::AtWaitingPosition),
            "loading_position_vacant" => Ok(Self::LoadingPositionVacant),
            "ready_to_receive" => Ok(Self::ReadyToReceive),
            "fetch_box" => Ok(Self::FetchBox),
            "operation_complete" => Ok(Self::OperationComplete),
            _ => Err(format!("Invalid message kind: {s}")),
        }
    }
}

/// Immutable protocol message: a kind plus an optional opaque payload.
///
/// The payload is `None` everywhere in the base protocol; the slot exists so
/// future senders can attach context without changing the wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolMessage {
    pub kind: MessageKind,
    pub payload: Option<Value>,
}

impl ProtocolMessage {
    /// Create a payload-less message of the given kind
    pub fn new(kind: MessageKind) -> Self {
        Self { kind, payload: None }
    }

    /// Create a message carrying an opaque payload
    pub fn with_payload(kind: MessageKind, payload: Value) -> Self {
        Self {
            kind,
            payload: Some(payload),
        }
    }
}

/// The two protocol actors a message can be addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    Robot,
    Station,
}

impl Recipient {
    /// The peer on the other side of the handoff
    pub fn other(&self) -> Self {
        match self {
            Self::Robot => Self::Station,
            Self::Station => Self::Robot,
        }
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Robot => write!(f, "robot"),
            Self::Station => write!(f, "station"),
        }
    }
}

/// A message addressed to a recipient, as carried on the dispatcher queue.
///
/// Replies carry their own address so the dispatcher routes whatever the
/// machine returns instead of assuming strict alternation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub to: Recipient,
    pub message: ProtocolMessage,
}

impl Envelope {
    pub fn new(to: Recipient, message: ProtocolMessage) -> Self {
        Self { to, message }
    }
}
