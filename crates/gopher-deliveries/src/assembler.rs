use std::sync::Arc;

use gopher_bt::{BehaviourTree, BtNode, OneshotSequence, ReactiveSelector, Sequence, TreeId};

use crate::notify::Notifier;
use crate::recovery::{CancelCheck, HomebaseRecovery};
use crate::signals::{ButtonBoard, ButtonLatch};

pub const ROOT_NAME: &str = "Deliveries";
pub const CANCEL_BRANCH: &str = "Cancellation";
pub const DELIVER_OR_RECOVER: &str = "Deliver or Recover";
pub const DELIVERY_SEQUENCE: &str = "Delivery";

/// Wraps planner steps in the fixed delivery tree:
///
/// ```text
/// Deliveries (reactive selector)
/// ├── Cancellation (sequence)
/// │   ├── Cancel Pressed?
/// │   └── Delivery Cancelled (recovery)
/// └── Deliver or Recover (reactive selector)
///     ├── Delivery (oneshot sequence of planner steps)
///     └── Delivery Failed (recovery)
/// ```
#[derive(Debug, Clone)]
pub struct TreeAssembler {
    buttons: ButtonBoard,
    notifier: Notifier,
}

impl TreeAssembler {
    pub fn new(buttons: ButtonBoard, notifier: Notifier) -> Self {
        Self { buttons, notifier }
    }

    /// A fresh armed latch on the stop button, for the cancel branch of the next tree.
    pub fn cancel_latch(&self) -> Arc<ButtonLatch> {
        self.buttons.stop().subscribe_armed()
    }

    /// Build a fresh tree around `steps`. Door handling is already part of the steps.
    pub fn assemble<W>(
        &self,
        id: TreeId,
        world: &str,
        doors: &[String],
        steps: Vec<Box<dyn BtNode<W>>>,
        cancel: Arc<ButtonLatch>,
    ) -> BehaviourTree<W>
    where
        W: 'static,
    {
        tracing::debug!(tree = %id, world, ?doors, steps = steps.len(), "Assembling delivery tree");

        let cancel = Sequence::new(
            CANCEL_BRANCH,
            vec![
                Box::new(CancelCheck::with_latch("Cancel Pressed?", cancel)) as Box<dyn BtNode<W>>,
                Box::new(HomebaseRecovery::new(
                    "Delivery Cancelled",
                    self.buttons.go(),
                    self.notifier.clone(),
                )),
            ],
        );

        let deliver_or_recover = ReactiveSelector::new(
            DELIVER_OR_RECOVER,
            vec![
                Box::new(OneshotSequence::new(DELIVERY_SEQUENCE, steps)) as Box<dyn BtNode<W>>,
                Box::new(HomebaseRecovery::new(
                    "Delivery Failed",
                    self.buttons.go(),
                    self.notifier.clone(),
                )),
            ],
        );

        let root = ReactiveSelector::new(
            ROOT_NAME,
            vec![
                Box::new(cancel) as Box<dyn BtNode<W>>,
                Box::new(deliver_or_recover),
            ],
        );

        BehaviourTree::new(id, Box::new(root))
    }
}
