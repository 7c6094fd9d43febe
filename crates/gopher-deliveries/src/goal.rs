use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::GoalRejected;
use crate::state::ErrorCode;

/// An ordered list of unique destinations plus the hints the planner needs for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub locations: Vec<String>,
    #[serde(default)]
    pub always_assume_initialised: bool,
    #[serde(default)]
    pub doors: Vec<String>,
}

impl Goal {
    pub fn new<I, S>(locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            locations: locations.into_iter().map(Into::into).collect(),
            always_assume_initialised: false,
            doors: Vec::new(),
        }
    }

    pub fn assume_initialised(mut self, always_assume_initialised: bool) -> Self {
        self.always_assume_initialised = always_assume_initialised;
        self
    }

    pub fn with_doors<I, S>(mut self, doors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.doors = doors.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Locations that appear more than once, in first-repeat order.
    pub fn duplicate_locations(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut repeated = Vec::new();
        for location in &self.locations {
            if !seen.insert(location.as_str()) && !repeated.contains(location) {
                repeated.push(location.clone());
            }
        }
        repeated
    }
}

/// How an accepted goal relates to the work already in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalAccepted {
    /// Nothing was running; the goal starts fresh.
    Assigned,
    /// The robot was waiting; the goal replaces the current one at the next cycle.
    Preempting,
}

impl GoalAccepted {
    pub fn message(self) -> &'static str {
        match self {
            GoalAccepted::Assigned => "assigned new goal",
            GoalAccepted::Preempting => "pre-empting current goal",
        }
    }
}

/// `(code, message)` pair sent back to whoever submitted the goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalReply {
    pub code: ErrorCode,
    pub message: String,
}

impl From<Result<GoalAccepted, GoalRejected>> for GoalReply {
    fn from(result: Result<GoalAccepted, GoalRejected>) -> Self {
        match result {
            Ok(accepted) => GoalReply {
                code: ErrorCode::Success,
                message: accepted.message().to_string(),
            },
            Err(rejected) => GoalReply {
                code: rejected.code(),
                message: rejected.to_string(),
            },
        }
    }
}
