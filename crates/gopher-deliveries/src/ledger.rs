use std::sync::Arc;

use parking_lot::Mutex;

/// Point-in-time copy of the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub goal: Vec<String>,
    pub remaining: Vec<String>,
    pub traversed: Vec<String>,
    /// Where the robot was when the current goal took over from a previous tree.
    pub origin: Option<String>,
}

/// Remaining and traversed locations of the goal being delivered.
///
/// Cloning shares the same ledger. `remaining ∪ traversed` always equals the goal: legs
/// move the head of `remaining` to the tail of `traversed`, nothing else edits either list.
#[derive(Debug, Clone, Default)]
pub struct LocationLedger {
    inner: Arc<Mutex<LedgerSnapshot>>,
}

impl LocationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start bookkeeping for `goal`.
    ///
    /// With `resume`, the last known position of the replaced goal becomes the new origin.
    pub fn reset(&self, goal: &[String], resume: bool) {
        let mut ledger = self.inner.lock();
        if !resume {
            ledger.origin = None;
        } else if let Some(last) = ledger.traversed.last().cloned() {
            ledger.origin = Some(last);
        }
        ledger.goal = goal.to_vec();
        ledger.remaining = goal.to_vec();
        ledger.traversed.clear();
    }

    /// Record arrival at `location`. Only the next remaining location can be completed.
    pub fn complete_leg(&self, location: &str) -> bool {
        let mut ledger = self.inner.lock();
        if ledger.remaining.first().map(String::as_str) != Some(location) {
            tracing::warn!(
                location,
                next = ?ledger.remaining.first(),
                "Ignoring arrival at a location that is not next in the goal"
            );
            return false;
        }
        let arrived = ledger.remaining.remove(0);
        ledger.traversed.push(arrived);
        true
    }

    pub fn remaining(&self) -> Vec<String> {
        self.inner.lock().remaining.clone()
    }

    pub fn traversed(&self) -> Vec<String> {
        self.inner.lock().traversed.clone()
    }

    pub fn next_destination(&self) -> Option<String> {
        self.inner.lock().remaining.first().cloned()
    }

    /// Last location reached, falling back to the origin of a resumed goal.
    pub fn current_location(&self) -> Option<String> {
        let ledger = self.inner.lock();
        ledger.traversed.last().cloned().or_else(|| ledger.origin.clone())
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.inner.lock().clone()
    }

    /// Human readable description of the leg in progress.
    pub fn travel_feedback(&self) -> String {
        let ledger = self.inner.lock();
        let from = ledger.traversed.last().or(ledger.origin.as_ref());
        match (from, ledger.remaining.first()) {
            (Some(from), Some(to)) => format!("moving from '{from}' to '{to}'"),
            (None, Some(to)) => format!("moving to '{to}'"),
            (Some(from), None) => format!("moving on from '{from}'"),
            (None, None) => "moving".to_string(),
        }
    }
}
