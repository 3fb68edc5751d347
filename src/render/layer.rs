//! Drawing layer holding live annotation primitives
//!
//! Controllers add, mutate and destroy primitives here. Redraws are
//! coalesced: any number of [`Layer::batch_draw`] calls between two frames
//! collapse into a single pending redraw that the host drains with
//! [`Layer::take_redraw`].

use crate::domain::Primitive;

/// Handle to a primitive on a [`Layer`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

#[derive(Debug, Default)]
pub struct Layer {
    nodes: Vec<(NodeId, Primitive)>,
    next_id: u64,
    redraw_pending: bool,
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primitive on top of the existing ones
    pub fn add(&mut self, primitive: Primitive) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push((id, primitive));
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Primitive> {
        self.nodes.iter().find(|(n, _)| *n == id).map(|(_, p)| p)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Primitive> {
        self.nodes.iter_mut().find(|(n, _)| *n == id).map(|(_, p)| p)
    }

    /// Remove a primitive; returns false if it was already gone
    pub fn destroy(&mut self, id: NodeId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|(n, _)| *n != id);
        self.nodes.len() != before
    }

    /// Primitives in paint order (bottom first)
    pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
        self.nodes.iter().map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Count primitives matching a predicate
    pub fn count(&self, pred: impl Fn(&Primitive) -> bool) -> usize {
        self.iter().filter(|p| pred(*p)).count()
    }

    /// Request a redraw before the next frame
    pub fn batch_draw(&mut self) {
        self.redraw_pending = true;
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    /// Consume the pending redraw request, if any
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_pending)
    }
}
