use std::sync::Arc;

use gopher_bt::{BtNode, BtStatus, NodeKind, TickContext};

use crate::ledger::LocationLedger;
use crate::notify::{Notification, Notifier};
use crate::signals::{Button, ButtonLatch};

/// Holds the delivery at one location until a human presses go.
///
/// The latch is armed only while this gate is the running node, so a press meant for
/// an earlier or later stop never releases it. The gate never fails; cancelling is the
/// job of the cancel branch.
pub struct WaitingGate {
    name: String,
    location: String,
    dont_wait_for_humans: bool,
    latch: Arc<ButtonLatch>,
    notifier: Notifier,
    ledger: LocationLedger,
    feedback: String,
}

impl WaitingGate {
    pub fn new(
        location: impl Into<String>,
        go: &Button,
        notifier: Notifier,
        ledger: LocationLedger,
    ) -> Self {
        let location = location.into();
        Self {
            name: format!("Waiting at {location}"),
            feedback: format!("hanging around at '{location}' waiting for confirmation"),
            location,
            dont_wait_for_humans: false,
            latch: go.subscribe(),
            notifier,
            ledger,
        }
    }

    /// Pass straight through instead of waiting for a press.
    pub fn dont_wait_for_humans(mut self, skip: bool) -> Self {
        self.dont_wait_for_humans = skip;
        self
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// True once a press has been latched and not yet consumed.
    pub fn go_requested(&self) -> bool {
        self.latch.is_pressed()
    }

    fn refresh_feedback(&mut self) {
        let remaining = self.ledger.remaining();
        self.feedback = if remaining.is_empty() {
            "remaining: none".to_string()
        } else {
            format!("remaining: {}", remaining.join(", "))
        };
    }
}

impl<W> BtNode<W> for WaitingGate
where
    W: 'static,
{
    fn tick(&mut self, ctx: &TickContext, _world: &mut W) -> BtStatus {
        if self.dont_wait_for_humans {
            self.refresh_feedback();
            return BtStatus::Success;
        }

        if self.latch.take() {
            self.latch.disarm();
            self.notifier.send(Notification::confirmed());
            self.refresh_feedback();
            tracing::debug!(location = %self.location, tick = ctx.tick, "Confirmation received");
            return BtStatus::Success;
        }

        self.latch.arm();
        self.notifier.send(Notification::awaiting_confirmation());
        self.refresh_feedback();
        BtStatus::Running
    }

    fn reset(&mut self) {
        self.latch.disarm();
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Confirmation
    }

    fn feedback_message(&self) -> &str {
        &self.feedback
    }
}
