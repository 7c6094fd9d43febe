//! The planner seam: location validation and goal decomposition are provided by the
//! caller; this crate only assembles and supervises what the planner returns.

use gopher_bt::BtNode;

use crate::gate::WaitingGate;
use crate::ledger::LocationLedger;
use crate::notify::Notifier;
use crate::signals::Button;
use crate::travel::TravelLeg;

/// Knows which location identifiers exist on the current map.
pub trait LocationCatalog: Send + Sync {
    fn check_locations(&self, locations: &[String]) -> bool;

    /// The entries of `locations` this catalog does not know.
    fn unknown_locations(&self, locations: &[String]) -> Vec<String> {
        if self.check_locations(locations) {
            Vec::new()
        } else {
            locations.to_vec()
        }
    }
}

/// Turns a goal into the ordered steps of a delivery.
pub trait Planner<W>: LocationCatalog
where
    W: 'static,
{
    /// Decompose the request. An empty list means the goal cannot be planned.
    fn create_tree(&mut self, request: PlanRequest<'_>) -> Vec<Box<dyn BtNode<W>>>;

    /// Where the robot ended up after the last completed delivery.
    fn set_current_location(&mut self, location: Option<String>);
}

/// Everything the planner gets to decompose one goal.
#[derive(Debug)]
pub struct PlanRequest<'a> {
    pub world: &'a str,
    pub locations: &'a [String],
    pub include_parking_behaviours: bool,
    pub doors: &'a [String],
    pub kit: &'a StepKit,
}

/// Builders for the delivery-aware steps a planner places in its decomposition.
#[derive(Debug, Clone)]
pub struct StepKit {
    ledger: LocationLedger,
    go: Button,
    notifier: Notifier,
    dont_wait_for_humans: bool,
}

impl StepKit {
    pub fn new(
        ledger: LocationLedger,
        go: Button,
        notifier: Notifier,
        dont_wait_for_humans: bool,
    ) -> Self {
        Self {
            ledger,
            go,
            notifier,
            dont_wait_for_humans,
        }
    }

    pub fn ledger(&self) -> &LocationLedger {
        &self.ledger
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn waiting_gate(&self, location: impl Into<String>) -> WaitingGate {
        WaitingGate::new(
            location,
            &self.go,
            self.notifier.clone(),
            self.ledger.clone(),
        )
        .dont_wait_for_humans(self.dont_wait_for_humans)
    }

    pub fn travel_leg<W>(
        &self,
        location: impl Into<String>,
        motion: Box<dyn BtNode<W>>,
    ) -> TravelLeg<W>
    where
        W: 'static,
    {
        TravelLeg::new(location, motion, self.ledger.clone())
    }
}
