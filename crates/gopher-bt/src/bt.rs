use crate::TickContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BtStatus {
    Running,
    Success,
    Failure,
}

impl BtStatus {
    /// `Success` or `Failure`.
    pub fn is_finished(self) -> bool {
        !matches!(self, BtStatus::Running)
    }
}

/// Capability tag exposed by every node.
///
/// Callers classify what a tree is currently doing by walking the active path and
/// matching on these tags rather than by inspecting concrete node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Composite,
    Condition,
    Action,
    /// Moving the robot between two locations.
    Travel,
    /// Holding at a location until a human confirms.
    Confirmation,
    /// Returning to base after a cancelled or failed delivery.
    Recovery,
}

pub trait BtNode<W>: 'static
where
    W: 'static,
{
    fn tick(&mut self, ctx: &TickContext, world: &mut W) -> BtStatus;

    fn reset(&mut self);

    fn name(&self) -> &str;

    fn kind(&self) -> NodeKind {
        NodeKind::Action
    }

    /// The child currently running under this node, if any.
    fn active_child(&self) -> Option<&dyn BtNode<W>> {
        None
    }

    fn feedback_message(&self) -> &str {
        ""
    }
}

/// Nodes from `root` down to the deepest running descendant, root first.
pub fn active_path<W>(root: &dyn BtNode<W>) -> Vec<&dyn BtNode<W>>
where
    W: 'static,
{
    let mut path = vec![root];
    let mut node = root;
    while let Some(child) = node.active_child() {
        path.push(child);
        node = child;
    }
    path
}
