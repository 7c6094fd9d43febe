use gopher_bt::{BtNode, BtStatus, NodeKind, TickContext};

use crate::ledger::LocationLedger;

/// One leg of a delivery: drives a motion behaviour to `location` and records the arrival.
///
/// The motion itself comes from the planner; this wrapper only tags it as travel and
/// keeps the ledger in step with it.
pub struct TravelLeg<W>
where
    W: 'static,
{
    name: String,
    location: String,
    motion: Box<dyn BtNode<W>>,
    ledger: LocationLedger,
}

impl<W> TravelLeg<W>
where
    W: 'static,
{
    pub fn new(
        location: impl Into<String>,
        motion: Box<dyn BtNode<W>>,
        ledger: LocationLedger,
    ) -> Self {
        let location = location.into();
        Self {
            name: format!("Travel to {location}"),
            location,
            motion,
            ledger,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

impl<W> BtNode<W> for TravelLeg<W>
where
    W: 'static,
{
    fn tick(&mut self, ctx: &TickContext, world: &mut W) -> BtStatus {
        let status = self.motion.tick(ctx, world);
        match status {
            BtStatus::Success => {
                self.ledger.complete_leg(&self.location);
                tracing::info!(location = %self.location, tick = ctx.tick, "Arrived");
            }
            BtStatus::Failure => {
                tracing::warn!(location = %self.location, tick = ctx.tick, "Travel failed");
            }
            BtStatus::Running => {}
        }
        status
    }

    fn reset(&mut self) {
        self.motion.reset();
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Travel
    }
}
