//! Behaviour tree runtime used to assemble and tick delivery trees.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod bt;
pub mod nodes;
pub mod tick;
pub mod tree;

pub use bt::{active_path, BtNode, BtStatus, NodeKind};
// Selectors are reactive (higher priority children are re-checked every tick);
// sequences keep memory and resume at the running child.
pub use nodes::{Condition, OneshotSequence, ReactiveSelector, Sequence};
pub use nodes::ReactiveSelector as Selector;
pub use tick::TickContext;
pub use tree::{BehaviourTree, TreeId};
