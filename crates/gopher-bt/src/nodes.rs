use crate::bt::{BtNode, BtStatus, NodeKind};
use crate::TickContext;

/// Priority selector that re-evaluates its children from the first one every tick.
///
/// A higher priority child that starts running preempts (resets) the child that was
/// running before it.
pub struct ReactiveSelector<W>
where
    W: 'static,
{
    name: String,
    children: Vec<Box<dyn BtNode<W>>>,
    running: Option<usize>,
}

impl<W> ReactiveSelector<W>
where
    W: 'static,
{
    pub fn new(name: impl Into<String>, children: Vec<Box<dyn BtNode<W>>>) -> Self {
        Self {
            name: name.into(),
            children,
            running: None,
        }
    }

    /// Index of the child that returned `Running` on the last tick.
    pub fn running_index(&self) -> Option<usize> {
        self.running
    }
}

impl<W> BtNode<W> for ReactiveSelector<W>
where
    W: 'static,
{
    fn tick(&mut self, ctx: &TickContext, world: &mut W) -> BtStatus {
        for (i, child) in self.children.iter_mut().enumerate() {
            let status = child.tick(ctx, world);
            match status {
                BtStatus::Failure => continue,
                BtStatus::Success => {
                    self.reset();
                    return BtStatus::Success;
                }
                BtStatus::Running => {
                    if self.running != Some(i) {
                        if let Some(prev) = self.running {
                            self.children[prev].reset();
                        }
                        self.running = Some(i);
                    }
                    return BtStatus::Running;
                }
            }
        }

        self.reset();
        BtStatus::Failure
    }

    fn reset(&mut self) {
        self.running = None;
        for c in self.children.iter_mut() {
            c.reset();
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Composite
    }

    fn active_child(&self) -> Option<&dyn BtNode<W>> {
        let i = self.running?;
        Some(self.children[i].as_ref())
    }
}

/// Sequence with memory: a running child is resumed on the next tick without
/// re-checking the children before it.
pub struct Sequence<W>
where
    W: 'static,
{
    name: String,
    children: Vec<Box<dyn BtNode<W>>>,
    index: usize,
    running: bool,
}

impl<W> Sequence<W>
where
    W: 'static,
{
    pub fn new(name: impl Into<String>, children: Vec<Box<dyn BtNode<W>>>) -> Self {
        Self {
            name: name.into(),
            children,
            index: 0,
            running: false,
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<W> BtNode<W> for Sequence<W>
where
    W: 'static,
{
    fn tick(&mut self, ctx: &TickContext, world: &mut W) -> BtStatus {
        while self.index < self.children.len() {
            let status = self.children[self.index].tick(ctx, world);
            match status {
                BtStatus::Running => {
                    self.running = true;
                    return BtStatus::Running;
                }
                BtStatus::Failure => {
                    self.reset();
                    return BtStatus::Failure;
                }
                BtStatus::Success => self.index += 1,
            }
        }

        self.reset();
        BtStatus::Success
    }

    fn reset(&mut self) {
        self.index = 0;
        self.running = false;
        for c in self.children.iter_mut() {
            c.reset();
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Composite
    }

    fn active_child(&self) -> Option<&dyn BtNode<W>> {
        if !self.running {
            return None;
        }
        self.children.get(self.index).map(|c| c.as_ref())
    }
}

/// Sequence that runs to completion exactly once.
///
/// After the first `Success` or `Failure` the children are never ticked again and the
/// retained status is returned verbatim. `reset` does not clear a retained status; only
/// dropping the node does.
pub struct OneshotSequence<W>
where
    W: 'static,
{
    inner: Sequence<W>,
    final_status: Option<BtStatus>,
}

impl<W> OneshotSequence<W>
where
    W: 'static,
{
    pub fn new(name: impl Into<String>, children: Vec<Box<dyn BtNode<W>>>) -> Self {
        Self {
            inner: Sequence::new(name, children),
            final_status: None,
        }
    }

    pub fn final_status(&self) -> Option<BtStatus> {
        self.final_status
    }
}

impl<W> BtNode<W> for OneshotSequence<W>
where
    W: 'static,
{
    fn tick(&mut self, ctx: &TickContext, world: &mut W) -> BtStatus {
        if let Some(status) = self.final_status {
            return status;
        }

        let status = self.inner.tick(ctx, world);
        if status.is_finished() {
            self.final_status = Some(status);
        }
        status
    }

    fn reset(&mut self) {
        if self.final_status.is_none() {
            self.inner.reset();
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Composite
    }

    fn active_child(&self) -> Option<&dyn BtNode<W>> {
        if self.final_status.is_some() {
            return None;
        }
        self.inner.active_child()
    }
}

pub struct Condition<F> {
    name: String,
    cond: F,
}

impl<F> Condition<F> {
    pub fn new(name: impl Into<String>, cond: F) -> Self {
        Self {
            name: name.into(),
            cond,
        }
    }
}

impl<F, W> BtNode<W> for Condition<F>
where
    F: FnMut(&TickContext, &W) -> bool + 'static,
    W: 'static,
{
    fn tick(&mut self, ctx: &TickContext, world: &mut W) -> BtStatus {
        if (self.cond)(ctx, &*world) {
            BtStatus::Success
        } else {
            BtStatus::Failure
        }
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Condition
    }
}
