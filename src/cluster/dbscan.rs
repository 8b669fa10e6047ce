//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise,
//! specialized to weighted 2-D points and a KD-tree neighbor index.
//!
//! # Core Concepts
//!
//! - **Radius (ε)**: maximum weighted distance between two neighbors.
//! - **MinPoints**: minimum neighbors within ε for a point to be "core".
//! - **Core point**: has at least MinPoints neighbors within ε.
//! - **Border point**: claimed by a core point's neighbor set but not core.
//! - **Noise point**: never claimed; keeps `cluster_id == 0`.
//!
//! # Differences from textbook DBSCAN
//!
//! This engine reproduces a specific reference behavior rather than the
//! canonical algorithm:
//!
//! - Neighborhoods come from a *bounded* kNN query (`k = min_points`), so a
//!   point is core exactly when the query fills up.
//! - Expansion is **one hop deep**: when a core's neighbor is itself core,
//!   the cluster id is pushed to that neighbor's cached neighbors, but no
//!   further. Chains of cores still merge because every core gets its own
//!   driver-loop turn and reuses an id it already carries.
//! - There is no negative noise sentinel; unclaimed points simply stay at 0.
//!
//! # References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use crate::error::{Error, Result};
use crate::point::{Point, PointId};
use crate::tree::{Axis, KdTree};

/// DBSCAN clustering engine.
#[derive(Debug, Clone)]
pub struct Dbscan {
    /// Maximum weighted distance for neighborhood membership.
    radius: f64,
    /// Minimum neighbors within `radius` for core classification.
    min_points: usize,
}

impl Dbscan {
    /// Create a new engine.
    ///
    /// # Arguments
    ///
    /// * `radius` - Neighborhood radius in weighted-distance units. Note that
    ///   the distance between two points includes both their weights, so the
    ///   useful radius is at least the typical pairwise weight sum.
    /// * `min_points` - Minimum neighbor count for a core point.
    pub fn new(radius: f64, min_points: usize) -> Self {
        Self { radius, min_points }
    }

    /// Set the neighborhood radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the minimum neighbor count for core classification.
    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.radius > 0.0) {
            return Err(Error::InvalidParameter {
                name: "radius",
                message: "must be positive",
            });
        }
        if self.min_points == 0 {
            return Err(Error::InvalidParameter {
                name: "min_points",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Classify every point as core or non-core.
    ///
    /// Each point gets one bounded kNN query (`k = min_points`, descent
    /// starting on X) against `tree`; points whose query fills up are marked
    /// core, cache their neighbor set, and are collected in index order.
    /// That order later determines cluster-id assignment.
    ///
    /// Core-ness depends only on fixed neighbor counts, so running this
    /// twice over fresh copies of the same points classifies identically.
    pub fn find_cores(&self, points: &mut [Point], tree: &KdTree) -> Result<Vec<PointId>> {
        self.validate()?;

        let mut cores = Vec::new();
        for id in 0..points.len() {
            let neighbors = tree.search_knn(points, id, self.min_points, Axis::X, self.radius);
            if neighbors.len() >= self.min_points {
                points[id].is_core = true;
                points[id].neighbors = Some(neighbors);
                cores.push(id);
            }
        }
        log::debug!(
            "core discovery: {} of {} points are core",
            cores.len(),
            points.len()
        );
        Ok(cores)
    }

    /// Assign cluster ids by expanding outward from each core point, in the
    /// order `find_cores` discovered them.
    ///
    /// A core already visited (claimed during an earlier expansion) is
    /// skipped. A core already carrying a positive id expands under that id;
    /// otherwise it allocates the next id, starting at 1. An empty `cores`
    /// slice leaves every point at `cluster_id == 0`.
    pub fn run_clustering(&self, points: &mut [Point], cores: &[PointId]) {
        let mut next_id: i32 = 0;
        for &core in cores {
            if points[core].visited {
                continue;
            }
            points[core].visited = true;

            let id = if points[core].cluster_id > 0 {
                points[core].cluster_id
            } else {
                next_id += 1;
                next_id
            };
            expand(points, core, id);
        }
        log::debug!("clustering: assigned {next_id} cluster ids over {} cores", cores.len());
    }

    /// Full pipeline: build the index, find cores, run clustering.
    ///
    /// Returns the core points in discovery order. An empty input is a
    /// normal "no clusters" outcome, not an error.
    pub fn fit(&self, points: &mut [Point]) -> Result<Vec<PointId>> {
        self.validate()?;
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let tree = KdTree::build(points);
        log::debug!("index: built {} nodes", tree.len());
        let cores = self.find_cores(points, &tree)?;
        self.run_clustering(points, &cores);
        Ok(cores)
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(0.5, 5)
    }
}

/// Claim `cluster_id` for `core` and push it one hop through the cached
/// neighbor sets.
fn expand(points: &mut [Point], core: PointId, cluster_id: i32) {
    points[core].cluster_id = cluster_id;

    let neighbors = points[core].neighbors.clone().unwrap_or_default();
    for p in neighbors {
        if !points[p].visited {
            points[p].visited = true;
            if points[p].is_core {
                // One hop only: the id reaches p's cached neighbors but does
                // not cascade further during this call.
                let hop = points[p].neighbors.clone().unwrap_or_default();
                for q in hop {
                    if points[q].cluster_id <= 0 {
                        points[q].cluster_id = cluster_id;
                    }
                }
            }
        }
        // Claimed independently of the visited check.
        if points[p].cluster_id <= 0 {
            points[p].cluster_id = cluster_id;
        }
    }
}

/// One label per point: `Some(cluster_id)` for clustered points, `None` for
/// noise (`cluster_id == 0`).
pub fn labels(points: &[Point]) -> Vec<Option<i32>> {
    points
        .iter()
        .map(|p| {
            if p.cluster_id() > 0 {
                Some(p.cluster_id())
            } else {
                None
            }
        })
        .collect()
}
