use tracing::debug;

use super::{build_actor, Actor, ActorFlags, ActorId, ActorKind, ActorTree};
use crate::coord::Position;
use crate::geometry::Rect2;

#[derive(Debug, Default)]
pub struct ActorIdAllocator {
    next: u64,
}

impl ActorIdAllocator {
    pub fn allocate(&mut self) -> ActorId {
        let id = ActorId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// The live actor collection plus the pending-spawn buffer.
///
/// While a tick is in progress every spawn lands in the pending buffer so
/// the live collection is never mutated mid-iteration; the buffer is
/// drained after the removal sweep. Removal is an end-of-tick backward
/// sweep that swaps the last live element into the freed slot, so
/// iteration order is not load-bearing anywhere.
#[derive(Debug, Default)]
pub struct Actors {
    live: Vec<Actor>,
    pending: Vec<Actor>,
    allocator: ActorIdAllocator,
    updating: bool,
}

/// Borrowed spawn access handed to actor hooks through the world context
/// while the live collection is being iterated.
#[derive(Debug)]
pub struct Spawner<'a> {
    pending: &'a mut Vec<Actor>,
    allocator: &'a mut ActorIdAllocator,
}

impl<'a> Spawner<'a> {
    pub(crate) fn new(pending: &'a mut Vec<Actor>, allocator: &'a mut ActorIdAllocator) -> Self {
        Self { pending, allocator }
    }

    pub fn spawn(&mut self, kind: ActorKind, position: Position) -> ActorId {
        let id = self.allocator.allocate();
        self.pending.push(build_actor(id, kind, position));
        id
    }
}

impl Actors {
    /// Spawn from the kind's template. Goes straight into the live
    /// collection outside a tick, into the pending buffer during one.
    pub fn spawn(&mut self, kind: ActorKind, position: Position) -> ActorId {
        let id = self.allocator.allocate();
        let actor = build_actor(id, kind, position);
        if self.updating {
            self.pending.push(actor);
        } else {
            self.live.push(actor);
        }
        id
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.live.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.live.iter_mut()
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.live.iter().find(|actor| actor.id == id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.live.iter_mut().find(|actor| actor.id == id)
    }

    /// Linear scan for the first live actor of a kind; how the player
    /// singleton is located.
    pub fn find_first_of_kind(&self, kind: ActorKind) -> Option<&Actor> {
        self.live.iter().find(|actor| actor.kind == kind)
    }

    pub fn find_first_of_kind_mut(&mut self, kind: ActorKind) -> Option<&mut Actor> {
        self.live.iter_mut().find(|actor| actor.kind == kind)
    }

    /// Build a spatial index over the live collection for bulk region
    /// queries. The index is a snapshot: rebuild it after actors move.
    pub fn build_index(&self, bounds: Rect2) -> ActorTree {
        let mut tree = ActorTree::new(bounds);
        for actor in &self.live {
            tree.insert(actor.id, actor.visible_rect());
        }
        tree
    }

    pub(crate) fn begin_update(&mut self) {
        debug_assert!(
            self.pending.is_empty(),
            "pending buffer must be drained before a tick starts"
        );
        self.updating = true;
    }

    pub(crate) fn end_update(&mut self) -> usize {
        self.updating = false;
        self.drain_pending()
    }

    pub(crate) fn is_updating(&self) -> bool {
        self.updating
    }

    /// Promote pending spawns into the live collection. Strictly ordered
    /// after the removal sweep.
    pub(crate) fn drain_pending(&mut self) -> usize {
        let promoted = self.pending.len();
        self.live.append(&mut self.pending);
        promoted
    }

    /// Remove every flagged actor. Iterates backward replacing flagged
    /// slots with the last live element, so each removal is O(1).
    pub(crate) fn sweep(&mut self) -> usize {
        let mut removed = 0;
        for index in (0..self.live.len()).rev() {
            if self.live[index].flags.contains(ActorFlags::REMOVE) {
                let actor = self.live.swap_remove(index);
                debug!(kind = actor.kind.name(), id = actor.id.0, "actor_removed");
                removed += 1;
            }
        }
        removed
    }

    pub(crate) fn split_for_update(&mut self) -> (&mut Vec<Actor>, Spawner<'_>) {
        let Actors {
            live,
            pending,
            allocator,
            ..
        } = self;
        (
            live,
            Spawner {
                pending,
                allocator,
            },
        )
    }

    #[cfg(test)]
    pub(crate) fn push_live_for_test(&mut self, mut actor: Actor) -> ActorId {
        let id = self.allocator.allocate();
        actor.id = id;
        self.live.push(actor);
        id
    }
}
