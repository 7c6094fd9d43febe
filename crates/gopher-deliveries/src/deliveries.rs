//! Goal lifecycle: acceptance and preemption, per-cycle tree replacement, and the
//! classification of each tick into a [`DeliveryState`].
//!
//! A control cycle is `advance_cycle` → `tick` → `classify_after_tick`, all on the
//! cycle thread. [`DeliveryHandle`] is the messaging-side view: it queues goals and
//! forwards button presses, and reads the state published by the last classification.

use std::sync::Arc;

use gopher_bt::{BehaviourTree, BtNode, BtStatus, NodeKind, TickContext, TreeId};
use parking_lot::{Mutex, MutexGuard};

use crate::assembler::TreeAssembler;
use crate::config::DeliveryConfig;
use crate::error::GoalRejected;
use crate::goal::{Goal, GoalAccepted};
use crate::ledger::LocationLedger;
use crate::notify::{NotificationSink, Notifier};
use crate::planner::{LocationCatalog, PlanRequest, Planner, StepKit};
use crate::semantics::SemanticLocation;
use crate::signals::{ButtonBoard, ButtonLatch};
use crate::state::DeliveryState;

pub const IDLE_FEEDBACK: &str = "idling";
pub const RECOVERY_FEEDBACK: &str =
    "delivery failed, waiting for human to teleop us back home before cancelling";
pub const UNTICKED_FEEDBACK: &str = "delivery tree was not ticked this cycle";

/// State shared between the cycle thread and messaging handles.
///
/// The pending goal and the published state live under one lock so that a submission
/// is judged against, and queued relative to, a single cycle boundary.
#[derive(Debug)]
struct Mailbox {
    pending: Option<Goal>,
    state: DeliveryState,
    feedback: String,
    /// The cancel or failure recovery branch was active on the last tick.
    recovering: bool,
}

struct Shared {
    mailbox: Mutex<Mailbox>,
    catalog: Arc<dyn LocationCatalog>,
    buttons: ButtonBoard,
}

/// Exposes a planner behind the cycle thread's lock as a catalog for handles.
struct SharedCatalog<P>(Arc<Mutex<P>>);

impl<P> LocationCatalog for SharedCatalog<P>
where
    P: LocationCatalog + Send,
{
    fn check_locations(&self, locations: &[String]) -> bool {
        self.0.lock().check_locations(locations)
    }

    fn unknown_locations(&self, locations: &[String]) -> Vec<String> {
        self.0.lock().unknown_locations(locations)
    }
}

/// Cloneable, thread-safe entry point for the messaging context.
#[derive(Clone)]
pub struct DeliveryHandle {
    shared: Arc<Shared>,
}

impl DeliveryHandle {
    /// Queue a goal for the next cycle.
    ///
    /// Rejected when empty, while travelling or recovering, or when any location is
    /// unknown or repeated. While waiting at a stop the goal preempts the current one,
    /// replacing any goal still queued.
    pub fn submit_goal(&self, goal: Goal) -> Result<GoalAccepted, GoalRejected> {
        if goal.is_empty() {
            tracing::warn!("Rejected goal: no locations");
            return Err(GoalRejected::GoalEmpty);
        }

        let mut mailbox = self.shared.mailbox.lock();
        let accepted = match mailbox.state {
            DeliveryState::Idle => GoalAccepted::Assigned,
            DeliveryState::Waiting if !mailbox.recovering => GoalAccepted::Preempting,
            _ => {
                tracing::warn!(
                    state = %mailbox.state,
                    recovering = mailbox.recovering,
                    "Rejected goal: busy"
                );
                return Err(GoalRejected::AlreadyAssigned);
            }
        };

        let mut invalid = goal.duplicate_locations();
        if invalid.is_empty() {
            invalid = self.shared.catalog.unknown_locations(&goal.locations);
        }
        if !invalid.is_empty() {
            tracing::warn!(?invalid, "Rejected goal: invalid locations");
            return Err(GoalRejected::InvalidLocations(invalid));
        }

        tracing::info!(
            locations = ?goal.locations,
            preempting = accepted == GoalAccepted::Preempting,
            "Accepted goal"
        );
        mailbox.pending = Some(goal);
        Ok(accepted)
    }

    pub fn state(&self) -> DeliveryState {
        self.shared.mailbox.lock().state
    }

    pub fn feedback_message(&self) -> String {
        self.shared.mailbox.lock().feedback.clone()
    }

    pub fn is_executing(&self) -> bool {
        self.state().is_executing()
    }

    /// True while a cancelled or failed delivery waits for the robot to be brought home.
    pub fn is_recovering(&self) -> bool {
        self.shared.mailbox.lock().recovering
    }

    pub fn has_pending_goal(&self) -> bool {
        self.shared.mailbox.lock().pending.is_some()
    }

    pub fn press_go(&self) -> usize {
        self.shared.buttons.go().press()
    }

    pub fn press_cancel(&self) -> usize {
        self.shared.buttons.stop().press()
    }

    /// Route a press by configured button id. `None` if the id is unknown.
    pub fn press(&self, button: &str) -> Option<usize> {
        self.shared.buttons.press(button)
    }
}

/// The delivery goal state machine. Owns the current tree; lives on the cycle thread.
pub struct Deliveries<W, P>
where
    W: 'static,
    P: Planner<W>,
{
    planner: Arc<Mutex<P>>,
    shared: Arc<Shared>,
    kit: StepKit,
    assembler: TreeAssembler,
    ledger: LocationLedger,
    tree: Option<BehaviourTree<W>>,
    /// Stop latch of the cancel branch in `tree`.
    cancel_latch: Option<Arc<ButtonLatch>>,
    next_tree_id: u64,
    previous_tree_id: Option<TreeId>,
    tree_replaced: bool,
    ticked_this_cycle: bool,
    locations: Vec<String>,
}

impl<W, P> Deliveries<W, P>
where
    W: 'static,
    P: Planner<W> + Send + 'static,
{
    pub fn new(planner: P, config: DeliveryConfig, sink: Arc<dyn NotificationSink>) -> Self {
        let planner = Arc::new(Mutex::new(planner));
        let buttons = ButtonBoard::new(&config.buttons);
        let notifier = Notifier::new(config.topics.display_notification.as_str(), sink);
        let ledger = LocationLedger::new();
        let kit = StepKit::new(
            ledger.clone(),
            buttons.go().clone(),
            notifier.clone(),
            config.dont_wait_for_humans,
        );
        let shared = Arc::new(Shared {
            mailbox: Mutex::new(Mailbox {
                pending: None,
                state: DeliveryState::Idle,
                feedback: String::new(),
                recovering: false,
            }),
            catalog: Arc::new(SharedCatalog(planner.clone())),
            buttons: buttons.clone(),
        });

        Self {
            planner,
            shared,
            kit,
            assembler: TreeAssembler::new(buttons, notifier),
            ledger,
            tree: None,
            cancel_latch: None,
            next_tree_id: 1,
            previous_tree_id: None,
            tree_replaced: false,
            ticked_this_cycle: false,
            locations: Vec::new(),
        }
    }

    /// Start with a goal visiting every given location, without validation.
    pub fn with_preloaded_goal(self, locations: &[SemanticLocation]) -> Self {
        let goal = Goal::new(locations.iter().map(|l| l.unique_name.clone()));
        if !goal.is_empty() {
            self.shared.mailbox.lock().pending = Some(goal);
        }
        self
    }

    pub fn handle(&self) -> DeliveryHandle {
        DeliveryHandle {
            shared: self.shared.clone(),
        }
    }

    pub fn submit_goal(&self, goal: Goal) -> Result<GoalAccepted, GoalRejected> {
        self.handle().submit_goal(goal)
    }

    pub fn press_go(&self) -> usize {
        self.shared.buttons.go().press()
    }

    pub fn press_cancel(&self) -> usize {
        self.shared.buttons.stop().press()
    }

    /// Pre-tick phase: turn a pending goal into a new tree, or retire a finished one.
    pub fn advance_cycle(&mut self, world: &str) {
        self.ticked_this_cycle = false;

        let pending = self.shared.mailbox.lock().pending.take();
        if let Some(goal) = pending {
            self.tree_replaced = self.replace_tree(world, goal);
        } else if self.tree.as_ref().is_some_and(|t| t.succeeded()) {
            let current = self.ledger.current_location();
            self.planner.lock().set_current_location(current.clone());
            self.previous_tree_id = self.tree.take().map(|t| t.id());
            self.cancel_latch = None;
            self.tree_replaced = true;
            tracing::info!(
                tree = ?self.previous_tree_id,
                location = ?current,
                "Delivery complete"
            );
        } else {
            self.tree_replaced = false;
        }
    }

    fn replace_tree(&mut self, world: &str, goal: Goal) -> bool {
        // Subscribed before the outgoing latch is checked, so no stop press falls between them.
        let cancel = self.assembler.cancel_latch();
        let cancelled = self.cancel_latch.as_ref().is_some_and(|latch| latch.is_pressed());
        if cancelled && self.tree.as_ref().is_some_and(|t| t.is_running()) {
            tracing::warn!(
                locations = ?goal.locations,
                "Dropping preempting goal, the current delivery was cancelled"
            );
            return false;
        }

        let resuming = self.tree.is_some();
        let include_parking_behaviours = !(goal.always_assume_initialised || resuming);

        let steps = self.planner.lock().create_tree(PlanRequest {
            world,
            locations: &goal.locations,
            include_parking_behaviours,
            doors: &goal.doors,
            kit: &self.kit,
        });
        if steps.is_empty() {
            tracing::warn!(
                locations = ?goal.locations,
                world,
                "Received a goal, but none of the locations could be planned"
            );
            return false;
        }

        let id = TreeId(self.next_tree_id);
        self.next_tree_id += 1;
        self.previous_tree_id = self.tree.as_ref().map(|t| t.id());
        self.ledger.reset(&goal.locations, resuming);
        self.tree = Some(
            self.assembler
                .assemble(id, world, &goal.doors, steps, cancel.clone()),
        );
        self.cancel_latch = Some(cancel);
        self.locations = goal.locations;

        tracing::info!(
            tree = %id,
            previous = ?self.previous_tree_id,
            locations = ?self.locations,
            include_parking_behaviours,
            "Delivery tree replaced"
        );
        true
    }

    /// Tick the current tree, if there is one.
    pub fn tick(&mut self, ctx: &TickContext, world: &mut W) -> Option<BtStatus> {
        self.ticked_this_cycle = true;
        self.tree.as_mut().map(|tree| tree.tick(ctx, world))
    }

    /// Post-tick phase: derive and publish the state and feedback message.
    pub fn classify_after_tick(&mut self) {
        let classified = match self.tree.as_ref() {
            Some(_) if !self.ticked_this_cycle => Some((
                DeliveryState::Invalid,
                UNTICKED_FEEDBACK.to_string(),
                false,
            )),
            Some(tree) if tree.is_running() => classify_running(tree, &self.ledger),
            _ => Some((DeliveryState::Idle, IDLE_FEEDBACK.to_string(), false)),
        };

        let mut mailbox = self.shared.mailbox.lock();
        let (state, feedback, recovering) = match classified {
            Some(classified) => classified,
            // Running some other step (doors, parking): still mid-delivery.
            None if mailbox.state.is_executing() => {
                (mailbox.state, mailbox.feedback.clone(), false)
            }
            None => (DeliveryState::Travelling, self.ledger.travel_feedback(), false),
        };
        if mailbox.state != state {
            tracing::debug!(from = %mailbox.state, to = %state, "Delivery state changed");
        }
        mailbox.state = state;
        mailbox.feedback = feedback;
        mailbox.recovering = recovering;
    }

    /// One full control cycle.
    pub fn cycle(&mut self, world_name: &str, ctx: &TickContext, world: &mut W) -> DeliveryState {
        self.advance_cycle(world_name);
        self.tick(ctx, world);
        self.classify_after_tick();
        self.state()
    }

    pub fn state(&self) -> DeliveryState {
        self.shared.mailbox.lock().state
    }

    pub fn feedback_message(&self) -> String {
        self.shared.mailbox.lock().feedback.clone()
    }

    pub fn is_executing(&self) -> bool {
        self.state().is_executing()
    }

    pub fn is_recovering(&self) -> bool {
        self.shared.mailbox.lock().recovering
    }

    pub fn succeeded_on_last_tick(&self) -> bool {
        self.tree.as_ref().is_some_and(|t| t.succeeded())
    }

    pub fn tree(&self) -> Option<&BehaviourTree<W>> {
        self.tree.as_ref()
    }

    pub fn current_tree_id(&self) -> Option<TreeId> {
        self.tree.as_ref().map(|t| t.id())
    }

    pub fn previous_tree_id(&self) -> Option<TreeId> {
        self.previous_tree_id
    }

    /// Whether the last `advance_cycle` swapped the tree (in or out).
    pub fn tree_replaced(&self) -> bool {
        self.tree_replaced
    }

    /// Locations of the goal the current tree was built for.
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn ledger(&self) -> &LocationLedger {
        &self.ledger
    }

    pub fn planner(&self) -> MutexGuard<'_, P> {
        self.planner.lock()
    }
}

/// `None` when the running step is neither travel, a gate nor recovery.
fn classify_running<W>(
    tree: &BehaviourTree<W>,
    ledger: &LocationLedger,
) -> Option<(DeliveryState, String, bool)>
where
    W: 'static,
{
    let path: Vec<&dyn BtNode<W>> = tree.active_path();
    if path.iter().any(|node| node.kind() == NodeKind::Recovery) {
        return Some((DeliveryState::Waiting, RECOVERY_FEEDBACK.to_string(), true));
    }

    let step = path
        .iter()
        .find(|node| matches!(node.kind(), NodeKind::Travel | NodeKind::Confirmation));
    step.map(|node| match node.kind() {
        NodeKind::Travel => (DeliveryState::Travelling, ledger.travel_feedback(), false),
        _ => (
            DeliveryState::Waiting,
            node.feedback_message().to_string(),
            false,
        ),
    })
}
