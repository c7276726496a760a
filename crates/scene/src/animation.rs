//! Transient transaction arcs and their grow-in animation.

use std::collections::VecDeque;
use std::time::Duration;

use layers::TransactionArc;

use crate::backend::ObjectId;

pub const ARC_ANIMATION: Duration = Duration::from_millis(2000);
pub const MAX_TRANSIENT_ARCS: usize = 64;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ArcAnimation {
    elapsed: Duration,
    duration: Duration,
}

impl Default for ArcAnimation {
    fn default() -> Self {
        Self::new(ARC_ANIMATION)
    }
}

impl ArcAnimation {
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn scale(&self) -> f64 {
        self.progress()
    }

    pub fn opacity(&self) -> f64 {
        (self.progress() * 2.0).min(1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransientArc {
    pub id: ObjectId,
    pub arc: TransactionArc,
    pub animation: ArcAnimation,
}

/// Arcs currently in the scene, oldest first. Completed arcs stay until the
/// cap pushes them out.
#[derive(Debug, Clone)]
pub struct TransientArcs {
    arcs: VecDeque<TransientArc>,
    capacity: usize,
    next_id: u64,
}

impl Default for TransientArcs {
    fn default() -> Self {
        Self::with_capacity(MAX_TRANSIENT_ARCS)
    }
}

impl TransientArcs {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arcs: VecDeque::new(),
            capacity: capacity.max(1),
            next_id: 0,
        }
    }

    /// Returns the new arc's id and the id evicted to make room, if any.
    pub fn insert(&mut self, arc: TransactionArc) -> (ObjectId, Option<ObjectId>) {
        let evicted = if self.arcs.len() == self.capacity {
            self.arcs.pop_front().map(|a| a.id)
        } else {
            None
        };
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.arcs.push_back(TransientArc {
            id,
            arc,
            animation: ArcAnimation::default(),
        });
        (id, evicted)
    }

    /// Advances every running animation. Returns `(id, scale, opacity)` for
    /// each arc that was still animating.
    pub fn advance(&mut self, dt: Duration) -> Vec<(ObjectId, f64, f64)> {
        self.arcs
            .iter_mut()
            .filter(|a| !a.animation.is_complete())
            .map(|a| {
                a.animation.advance(dt);
                (a.id, a.animation.scale(), a.animation.opacity())
            })
            .collect()
    }

    pub fn get(&self, id: ObjectId) -> Option<&TransientArc> {
        self.arcs.iter().find(|a| a.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.arcs.iter().map(|a| a.id)
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Drops every arc, returning their ids.
    pub fn clear(&mut self) -> Vec<ObjectId> {
        self.arcs.drain(..).map(|a| a.id).collect()
    }
}
