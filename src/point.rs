//! Weighted 2-D points and their clustering state.
//!
//! Points are arena-indexed: callers keep them in a `Vec<Point>` and every
//! other structure (the KD-tree, cached neighbor sets) refers to them by
//! [`PointId`]. Mutations made during clustering are therefore visible
//! through every holder without copying.

/// Index of a point in the caller's point collection.
pub type PointId = usize;

/// A weighted 2-D point with mutable clustering state.
///
/// Coordinates and weight are fixed at construction. The clustering fields
/// (`visited`, `is_core`, `cluster_id`, `neighbors`) are written only by the
/// [`Dbscan`](crate::Dbscan) engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
    weight: f64,
    pub(crate) visited: bool,
    pub(crate) is_core: bool,
    pub(crate) cluster_id: i32,
    pub(crate) neighbors: Option<Vec<PointId>>,
}

impl Point {
    /// Create an unvisited, unlabeled point.
    pub fn new(x: f64, y: f64, weight: f64) -> Self {
        Self {
            x,
            y,
            weight,
            visited: false,
            is_core: false,
            cluster_id: 0,
            neighbors: None,
        }
    }

    /// X coordinate.
    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y coordinate.
    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Weight term added to every distance involving this point.
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Whether the clustering driver has visited this point.
    pub fn visited(&self) -> bool {
        self.visited
    }

    /// Whether core-point discovery classified this point as core.
    pub fn is_core(&self) -> bool {
        self.is_core
    }

    /// Cluster label: 0 = unassigned (noise after a run), positive = cluster.
    /// Never negative.
    pub fn cluster_id(&self) -> i32 {
        self.cluster_id
    }

    /// Neighbor set cached during core-point discovery. Empty for non-core
    /// points.
    pub fn neighbors(&self) -> &[PointId] {
        self.neighbors.as_deref().unwrap_or(&[])
    }

    /// Distance to `other`: Euclidean distance plus both points' weights.
    ///
    /// ```text
    /// d(a, b) = sqrt((ax - bx)^2 + (ay - by)^2) + aw + bw
    /// ```
    ///
    /// With nonzero weights this is **not** a metric (it violates the
    /// triangle inequality), so KD-tree pruning built on it is best-effort.
    /// The formula is kept as-is because cluster results are defined
    /// relative to it.
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt() + self.weight + other.weight
    }
}
