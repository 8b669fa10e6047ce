//! Synthetic point sets for demos, benches, and tests.

use crate::point::Point;

/// Two offset trigonometric bands of `size / 2` points each, weight 1.
pub fn sine_points(size: usize) -> Vec<Point> {
    let half = size / 2;
    let mut points = Vec::with_capacity(half * 2);
    let step = std::f64::consts::PI / half as f64;
    for i in 0..half {
        let x = step * (i + 1) as f64;
        points.push(Point::new(x, x.sin(), 1.0));
    }
    for i in 0..half {
        let x = 1.5 + step * (i + 1) as f64;
        points.push(Point::new(x, x.cos(), 1.0));
    }
    points
}

/// A fixed 19-point set with two visually obvious dense regions and a few
/// stragglers, handy for exercising clustering end to end.
pub fn special_points() -> Vec<Point> {
    [
        (2.0, 2.0),
        (3.0, 1.0),
        (3.0, 4.0),
        (3.0, 14.0),
        (5.0, 3.0),
        (8.0, 3.0),
        (8.0, 6.0),
        (9.0, 8.0),
        (10.0, 4.0),
        (10.0, 7.0),
        (10.0, 10.0),
        (10.0, 14.0),
        (11.0, 13.0),
        (12.0, 7.0),
        (12.0, 15.0),
        (14.0, 7.0),
        (14.0, 9.0),
        (14.0, 15.0),
        (15.0, 8.0),
    ]
    .iter()
    .map(|&(x, y)| Point::new(x, y, 1.0))
    .collect()
}
