use std::fmt;

use crate::bt::{active_path, BtNode, BtStatus};
use crate::TickContext;

/// Identity of one assembled tree. Ids only grow; a replacement tree always gets a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeId(pub u64);

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree-{}", self.0)
    }
}

/// An owned root node together with its identity and the status of its last tick.
///
/// The root is not reset when it finishes: the final status stays observable until the
/// whole tree is dropped and replaced.
pub struct BehaviourTree<W>
where
    W: 'static,
{
    id: TreeId,
    root: Box<dyn BtNode<W>>,
    last: Option<BtStatus>,
}

impl<W> BehaviourTree<W>
where
    W: 'static,
{
    pub fn new(id: TreeId, root: Box<dyn BtNode<W>>) -> Self {
        Self {
            id,
            root,
            last: None,
        }
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn root(&self) -> &dyn BtNode<W> {
        self.root.as_ref()
    }

    /// `None` until the tree has been ticked once.
    pub fn last_status(&self) -> Option<BtStatus> {
        self.last
    }

    pub fn succeeded(&self) -> bool {
        self.last == Some(BtStatus::Success)
    }

    pub fn is_running(&self) -> bool {
        self.last == Some(BtStatus::Running)
    }

    pub fn tick(&mut self, ctx: &TickContext, world: &mut W) -> BtStatus {
        let status = self.root.tick(ctx, world);
        self.last = Some(status);
        status
    }

    pub fn active_path(&self) -> Vec<&dyn BtNode<W>> {
        active_path(self.root.as_ref())
    }
}

impl<W> fmt::Debug for BehaviourTree<W>
where
    W: 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviourTree")
            .field("id", &self.id)
            .field("root", &self.root.name())
            .field("last", &self.last)
            .finish()
    }
}
