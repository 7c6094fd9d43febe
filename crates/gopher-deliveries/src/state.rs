//! Delivery state and reply codes, with their numeric wire values.
//!
//! The numeric values are shared with the delivery feedback and goal reply messages
//! consumed by the rest of the robot, so both tables are fixed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CodeError;

/// Coarse execution state reported once per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryState {
    /// No goal, or the last goal finished.
    #[default]
    Idle,
    /// Holding for a human: at a confirmation gate or recovering home.
    Waiting,
    /// Moving between locations.
    Travelling,
    /// The tree could not be classified this cycle.
    Invalid,
}

const STATE_CODES: [(DeliveryState, u8); 4] = [
    (DeliveryState::Idle, 0),
    (DeliveryState::Waiting, 1),
    (DeliveryState::Travelling, 2),
    (DeliveryState::Invalid, 3),
];

impl DeliveryState {
    pub fn code(self) -> u8 {
        match self {
            DeliveryState::Idle => 0,
            DeliveryState::Waiting => 1,
            DeliveryState::Travelling => 2,
            DeliveryState::Invalid => 3,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, CodeError> {
        STATE_CODES
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(state, _)| *state)
            .ok_or(CodeError::UnknownState(code))
    }

    /// Mid-delivery: a new goal may only preempt while `Waiting`.
    pub fn is_executing(self) -> bool {
        matches!(self, DeliveryState::Waiting | DeliveryState::Travelling)
    }
}

impl From<DeliveryState> for u8 {
    fn from(value: DeliveryState) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for DeliveryState {
    type Error = CodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DeliveryState::from_code(value)
    }
}

impl fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryState::Idle => write!(f, "idle"),
            DeliveryState::Waiting => write!(f, "waiting"),
            DeliveryState::Travelling => write!(f, "travelling"),
            DeliveryState::Invalid => write!(f, "invalid"),
        }
    }
}

/// Result code of a goal submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Success,
    GoalEmptyNothingToDo,
    AlreadyAssignedAGoal,
    InvalidLocations,
}

const ERROR_CODES: [(ErrorCode, u8); 4] = [
    (ErrorCode::Success, 0),
    (ErrorCode::GoalEmptyNothingToDo, 1),
    (ErrorCode::AlreadyAssignedAGoal, 2),
    (ErrorCode::InvalidLocations, 3),
];

impl ErrorCode {
    pub fn code(self) -> u8 {
        match self {
            ErrorCode::Success => 0,
            ErrorCode::GoalEmptyNothingToDo => 1,
            ErrorCode::AlreadyAssignedAGoal => 2,
            ErrorCode::InvalidLocations => 3,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, CodeError> {
        ERROR_CODES
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(error, _)| *error)
            .ok_or(CodeError::UnknownErrorCode(code))
    }
}

impl From<ErrorCode> for u8 {
    fn from(value: ErrorCode) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for ErrorCode {
    type Error = CodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ErrorCode::from_code(value)
    }
}
