use tracing::debug;

use super::ActorId;
use crate::geometry::Rect2;

/// Entries a node holds before subdividing.
pub const TREE_NODE_CAPACITY: usize = 8;
/// Levels below which overflow is no longer subdivided.
pub const TREE_MAX_DEPTH: usize = 6;

#[derive(Debug)]
struct Node {
    bounds: Rect2,
    depth: usize,
    entries: Vec<(ActorId, Rect2)>,
    quadrants: Option<Box<[Node; 4]>>,
}

impl Node {
    fn new(bounds: Rect2, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            entries: Vec::with_capacity(TREE_NODE_CAPACITY),
            quadrants: None,
        }
    }

    fn quadrant_bounds(&self, quadrant: usize) -> Rect2 {
        let w = self.bounds.w / 2.0;
        let h = self.bounds.h / 2.0;
        let (x, y) = match quadrant {
            0 => (self.bounds.x, self.bounds.y),
            1 => (self.bounds.x + w, self.bounds.y),
            2 => (self.bounds.x, self.bounds.y + h),
            _ => (self.bounds.x + w, self.bounds.y + h),
        };
        Rect2 { x, y, w, h }
    }

    fn insert(&mut self, id: ActorId, rect: Rect2) -> bool {
        if !self.bounds.contains_rect(&rect) {
            return false;
        }

        if self.entries.len() < TREE_NODE_CAPACITY {
            self.entries.push((id, rect));
            return true;
        }

        if self.depth + 1 >= TREE_MAX_DEPTH {
            return false;
        }

        if self.quadrants.is_none() {
            self.quadrants = Some(Box::new([
                Node::new(self.quadrant_bounds(0), self.depth + 1),
                Node::new(self.quadrant_bounds(1), self.depth + 1),
                Node::new(self.quadrant_bounds(2), self.depth + 1),
                Node::new(self.quadrant_bounds(3), self.depth + 1),
            ]));
        }

        // The first quadrant that fully contains the rect takes it; a rect
        // straddling child boundaries is refused by all four.
        if let Some(quadrants) = &mut self.quadrants {
            for quadrant in quadrants.iter_mut() {
                if quadrant.insert(id, rect) {
                    return true;
                }
            }
        }

        false
    }

    fn query(&self, rect: &Rect2, out: &mut Vec<ActorId>) {
        if !rect.intersects(&self.bounds) {
            return;
        }

        for &(id, entry_rect) in &self.entries {
            if rect.intersects(&entry_rect) {
                out.push(id);
            }
        }

        if let Some(quadrants) = &self.quadrants {
            for quadrant in quadrants.iter() {
                quadrant.query(rect, out);
            }
        }
    }
}

/// Loose spatial index over actor ids for bulk region queries.
///
/// The index is lossy: an actor that cannot be placed (outside the root
/// bounds, or overflow past the maximum depth) is simply not indexed. It
/// still exists and simulates normally, only index lookups miss it.
/// `insert` reports this so callers can fall back to a linear scan.
#[derive(Debug)]
pub struct ActorTree {
    root: Node,
    dropped: usize,
}

impl ActorTree {
    pub fn new(bounds: Rect2) -> Self {
        Self {
            root: Node::new(bounds, 0),
            dropped: 0,
        }
    }

    pub fn insert(&mut self, id: ActorId, rect: Rect2) -> bool {
        let inserted = self.root.insert(id, rect);
        if !inserted {
            self.dropped += 1;
            debug!(id = id.0, "actor_not_indexed");
        }
        inserted
    }

    /// Ids of indexed actors whose bounds intersect `rect`.
    pub fn query_rect(&self, rect: Rect2) -> Vec<ActorId> {
        let mut out = Vec::new();
        self.root.query(&rect, &mut out);
        out
    }

    /// How many inserts were refused since construction.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}
