//! Bounded max-heap of neighbor candidates.
//!
//! Holds at most `capacity` candidates, each within `max_distance` of the
//! query target, ordered so the farthest admitted candidate sits at the root
//! and can be evicted in O(log k) when a closer one arrives.

use crate::point::PointId;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub(crate) point: PointId,
    pub(crate) distance: f64,
}

#[derive(Debug)]
pub(crate) struct NeighborHeap {
    entries: Vec<Candidate>,
    capacity: usize,
    max_distance: f64,
}

impl NeighborHeap {
    pub(crate) fn new(capacity: usize, max_distance: f64) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            max_distance,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Offer a candidate. Rejections and evictions are logged but never
    /// change control flow.
    pub(crate) fn offer(&mut self, point: PointId, distance: f64) {
        if self.capacity == 0 || distance > self.max_distance {
            log::trace!(
                "knn: rejected point {point} at distance {distance} (radius {})",
                self.max_distance
            );
            return;
        }

        let candidate = Candidate { point, distance };
        if self.entries.len() < self.capacity {
            self.entries.push(candidate);
            self.sift_up(self.entries.len() - 1);
            return;
        }

        // At capacity: only a strictly closer candidate displaces the
        // current farthest.
        if distance >= self.entries[0].distance {
            log::trace!("knn: rejected point {point} at distance {distance} (heap full)");
            return;
        }
        log::debug!(
            "knn: evicting point {} at distance {}",
            self.entries[0].point,
            self.entries[0].distance
        );
        self.entries[0] = candidate;
        self.sift_down(0);
    }

    /// Drain the heap into a list sorted ascending by distance.
    pub(crate) fn into_sorted(mut self) -> Vec<PointId> {
        self.entries
            .sort_by(|a, b| a.distance.total_cmp(&b.distance));
        self.entries.into_iter().map(|c| c.point).collect()
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.entries[parent].distance >= self.entries[i].distance {
                break;
            }
            self.entries.swap(parent, i);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        loop {
            let mut child = i * 2 + 1;
            if child >= self.entries.len() {
                break;
            }
            if child + 1 < self.entries.len()
                && self.entries[child].distance < self.entries[child + 1].distance
            {
                child += 1;
            }
            if self.entries[i].distance >= self.entries[child].distance {
                break;
            }
            self.entries.swap(i, child);
            i = child;
        }
    }
}
