use std::sync::Arc;

use gopher_bt::{BtNode, BtStatus, NodeKind, TickContext};

use crate::notify::{Notification, Notifier};
use crate::signals::{Button, ButtonLatch};

/// Succeeds once for every stop press received since the tree was assembled.
pub struct CancelCheck {
    name: String,
    latch: Arc<ButtonLatch>,
}

impl CancelCheck {
    pub fn new(name: impl Into<String>, stop: &Button) -> Self {
        Self {
            name: name.into(),
            latch: stop.subscribe_armed(),
        }
    }

    /// Check a latch already subscribed to the stop button.
    pub fn with_latch(name: impl Into<String>, latch: Arc<ButtonLatch>) -> Self {
        Self {
            name: name.into(),
            latch,
        }
    }
}

impl<W> BtNode<W> for CancelCheck
where
    W: 'static,
{
    fn tick(&mut self, ctx: &TickContext, _world: &mut W) -> BtStatus {
        if self.latch.take() {
            tracing::info!(tick = ctx.tick, "Delivery cancelled");
            BtStatus::Success
        } else {
            BtStatus::Failure
        }
    }

    // A press is kept across resets until it is consumed.
    fn reset(&mut self) {}

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Condition
    }
}

/// Waits for a human to bring the robot back to base, then succeeds on a go press.
pub struct HomebaseRecovery {
    name: String,
    latch: Arc<ButtonLatch>,
    notifier: Notifier,
}

impl HomebaseRecovery {
    pub fn new(name: impl Into<String>, go: &Button, notifier: Notifier) -> Self {
        Self {
            name: name.into(),
            latch: go.subscribe(),
            notifier,
        }
    }
}

impl<W> BtNode<W> for HomebaseRecovery
where
    W: 'static,
{
    fn tick(&mut self, ctx: &TickContext, _world: &mut W) -> BtStatus {
        if self.latch.take() {
            self.latch.disarm();
            tracing::info!(recovery = %self.name, tick = ctx.tick, "Back at base");
            return BtStatus::Success;
        }

        if !self.latch.is_armed() {
            self.latch.arm();
            tracing::warn!(recovery = %self.name, tick = ctx.tick, "Recovery started");
        }
        self.notifier.send(Notification::recovering(&self.name));
        BtStatus::Running
    }

    fn reset(&mut self) {
        self.latch.disarm();
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Recovery
    }
}
