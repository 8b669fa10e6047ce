//! Density clustering of weighted 2-D points.
//!
//! `kdscan` implements DBSCAN over a balanced 2-D KD-tree. The tree answers
//! bounded k-nearest-neighbor queries (at most `k` results, each within a
//! caller-supplied radius), which the clustering engine uses both to classify
//! points as core/non-core and to cache the neighbor sets that cluster labels
//! are propagated through.
//!
//! The distance function is Euclidean distance *plus the sum of both points'
//! weights* (see [`Point::distance`]). This is deliberate: it reproduces the
//! reference behavior this crate is defined against, even though the weighted
//! form is not a true metric.
//!
//! ```rust
//! use kdscan::{Dbscan, Point};
//!
//! let mut points = vec![
//!     Point::new(2.0, 2.0, 1.0),
//!     Point::new(3.0, 1.0, 1.0),
//!     Point::new(3.0, 4.0, 1.0),
//!     Point::new(5.0, 3.0, 1.0),
//! ];
//!
//! let cores = Dbscan::new(5.0, 3).fit(&mut points).unwrap();
//! assert!(!cores.is_empty());
//! assert!(points.iter().all(|p| p.cluster_id() == 1));
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod io;
pub mod point;
pub mod synth;
pub mod tree;

pub use cluster::{labels, Dbscan};
pub use error::{Error, Result};
pub use point::{Point, PointId};
pub use tree::{Axis, KdTree};
