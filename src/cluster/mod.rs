//! DBSCAN driver over the KD-tree index.
//!
//! Clustering runs in two sequential passes over a caller-owned
//! `Vec<Point>`:
//!
//! 1. **Core discovery** ([`Dbscan::find_cores`]): every point is classified
//!    by one bounded kNN query against the index. A point with at least
//!    `min_points` neighbors within `radius` becomes core and caches its
//!    neighbor set.
//! 2. **Expansion** ([`Dbscan::run_clustering`]): core points are walked in
//!    discovery order; each unvisited core claims (or reuses) a cluster id
//!    and pushes it one hop through the cached neighbor sets.
//!
//! Points never claimed by any expansion end the run with `cluster_id == 0`
//! and are noise. [`labels`] converts that convention to noise-as-`None`.

mod dbscan;

pub use dbscan::{labels, Dbscan};
