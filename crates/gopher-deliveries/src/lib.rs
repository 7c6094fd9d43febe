//! Multi-stop delivery orchestration.
//!
//! A [`Deliveries`] instance accepts goals (ordered lists of locations), asks a
//! [`Planner`] to decompose each goal into travel legs and confirmation gates, wraps
//! those in a tree with cancellation and recovery branches, and reports a coarse
//! [`DeliveryState`] after every tick.

#![forbid(unsafe_code)]

pub mod assembler;
pub mod config;
pub mod deliveries;
pub mod error;
pub mod gate;
pub mod goal;
pub mod ledger;
pub mod notify;
pub mod planner;
pub mod recovery;
pub mod semantics;
pub mod signals;
pub mod state;
pub mod travel;

pub use assembler::TreeAssembler;
pub use config::{ButtonConfig, DeliveryConfig, TopicConfig};
pub use deliveries::{Deliveries, DeliveryHandle};
pub use error::{CodeError, GoalRejected};
pub use gate::WaitingGate;
pub use goal::{Goal, GoalAccepted, GoalReply};
pub use ledger::{LedgerSnapshot, LocationLedger};
pub use notify::{
    ButtonLight, LedPattern, Notification, NotificationSink, Notifier, NullSink, RecordingSink,
    TracingSink,
};
pub use planner::{LocationCatalog, PlanRequest, Planner, StepKit};
pub use recovery::{CancelCheck, HomebaseRecovery};
pub use semantics::{SemanticCatalog, SemanticLocation};
pub use signals::{Button, ButtonBoard, ButtonLatch};
pub use state::{DeliveryState, ErrorCode};
pub use travel::TravelLeg;
