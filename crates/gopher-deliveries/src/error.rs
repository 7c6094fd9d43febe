//! Goal submission rejections and wire code decoding errors.

use thiserror::Error;

use crate::state::ErrorCode;

/// Why a goal submission was refused. Returned synchronously, never raised later.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalRejected {
    #[error("goal empty, nothing to do.")]
    GoalEmpty,

    #[error("sorry, busy (already assigned a goal)")]
    AlreadyAssigned,

    #[error("received invalid locations: {}", .0.join(", "))]
    InvalidLocations(Vec<String>),
}

impl GoalRejected {
    pub fn code(&self) -> ErrorCode {
        match self {
            GoalRejected::GoalEmpty => ErrorCode::GoalEmptyNothingToDo,
            GoalRejected::AlreadyAssigned => ErrorCode::AlreadyAssignedAGoal,
            GoalRejected::InvalidLocations(_) => ErrorCode::InvalidLocations,
        }
    }
}

/// A numeric code received from outside that maps to no known variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("unknown delivery state code {0}")]
    UnknownState(u8),

    #[error("unknown delivery error code {0}")]
    UnknownErrorCode(u8),
}
