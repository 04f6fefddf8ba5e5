//! Plane geometry used for vertex placement and hit testing.
//!
//! [`Point`] is the continuous coordinate that zoom and pan operate on; [`Pixel`] is its floored
//! counterpart used for drawing and hit testing.

use derive_more::{Add, Display, From, Sub};
use itertools::Itertools;

const EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, Default, PartialEq, Display, From, Add, Sub)]
#[display("({x}, {y})")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, From, Add, Sub)]
#[display("({x}, {y})")]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// `pivot + factor * (self - pivot)`.
    #[must_use]
    pub fn scale_about(self, pivot: Self, factor: f64) -> Self {
        Self {
            x: pivot.x + factor * (self.x - pivot.x),
            y: pivot.y + factor * (self.y - pivot.y),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn floor(self) -> Pixel {
        Pixel {
            x: self.x.floor() as i32,
            y: self.y.floor() as i32,
        }
    }
}

impl Pixel {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        Point::from(self).distance(Point::from(other))
    }
}

impl From<Pixel> for Point {
    fn from(pixel: Pixel) -> Self {
        Self {
            x: f64::from(pixel.x),
            y: f64::from(pixel.y),
        }
    }
}

/// Twice the signed area of the triangle `a b c`; positive when `c` lies to the left of `a -> b`.
fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn sign(value: f64) -> i8 {
    if value > EPSILON {
        1
    } else if value < -EPSILON {
        -1
    } else {
        0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Display)]
#[display("[{start}, {end}]")]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Distance between the nearest points of two segments; zero when they meet.
    #[must_use]
    pub fn separation(self, other: Self) -> f64 {
        if self.crosses(other) || other.crosses(self) {
            return 0.0;
        }
        [
            self.distance_to(other.start),
            self.distance_to(other.end),
            other.distance_to(self.start),
            other.distance_to(self.end),
        ]
        .into_iter()
        .fold(f64::INFINITY, f64::min)
    }

    /// Euclidean distance from `p` to the nearest point of the segment.
    #[must_use]
    pub fn distance_to(self, p: Point) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let norm = dx * dx + dy * dy;
        if norm <= EPSILON {
            return p.distance(self.start);
        }
        let t = (((p.x - self.start.x) * dx + (p.y - self.start.y) * dy) / norm).clamp(0.0, 1.0);
        p.distance(Point::new(self.start.x + t * dx, self.start.y + t * dy))
    }

    /// Whether `p` lies on the closed segment.
    #[must_use]
    pub fn contains(self, p: Point) -> bool {
        sign(orientation(self.start, self.end, p)) == 0
            && p.x >= self.start.x.min(self.end.x) - EPSILON
            && p.x <= self.start.x.max(self.end.x) + EPSILON
            && p.y >= self.start.y.min(self.end.y) - EPSILON
            && p.y <= self.start.y.max(self.end.y) + EPSILON
    }

    fn is_endpoint(self, p: Point) -> bool {
        p.distance(self.start) <= EPSILON || p.distance(self.end) <= EPSILON
    }

    /// Whether this stroke crosses `target`.
    ///
    /// The two closed segments must share a point other than an endpoint of `target`: a proper
    /// crossing, an endpoint of the stroke resting on the inside of `target`, or a collinear
    /// overlap of positive length. Touching `target` only at one of its endpoints does not count.
    #[must_use]
    pub fn crosses(self, target: Self) -> bool {
        let o1 = sign(orientation(target.start, target.end, self.start));
        let o2 = sign(orientation(target.start, target.end, self.end));
        let o3 = sign(orientation(self.start, self.end, target.start));
        let o4 = sign(orientation(self.start, self.end, target.end));

        if o1 == 0 && o2 == 0 && o3 == 0 && o4 == 0 {
            return self.overlaps_collinear(target);
        }
        if o1 * o2 < 0 && o3 * o4 < 0 {
            return true;
        }
        [self.start, self.end]
            .into_iter()
            .any(|p| target.contains(p) && !target.is_endpoint(p))
    }

    fn overlaps_collinear(self, target: Self) -> bool {
        let dx = target.end.x - target.start.x;
        let dy = target.end.y - target.start.y;
        let norm = dx * dx + dy * dy;
        if norm <= EPSILON {
            // A point-sized target has nothing but endpoints.
            return false;
        }
        let param = |p: Point| ((p.x - target.start.x) * dx + (p.y - target.start.y) * dy) / norm;
        let (a, b) = (param(self.start), param(self.end));
        let low = a.min(b).max(0.0);
        let high = a.max(b).min(1.0);
        if high - low > EPSILON {
            true
        } else {
            (high - low).abs() <= EPSILON && low > EPSILON && low < 1.0 - EPSILON
        }
    }
}

/// Convex hull in counter-clockwise order (in a y-up frame), without repeated points.
///
/// Fewer than three distinct points, or collinear input, give a degenerate hull of the extreme
/// points.
#[must_use]
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let sorted: Vec<Point> = points
        .iter()
        .copied()
        .sorted_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)))
        .dedup()
        .collect();
    if sorted.len() < 3 {
        return sorted;
    }

    let mut hull: Vec<Point> = Vec::with_capacity(sorted.len() + 1);
    for &p in &sorted {
        push_convex(&mut hull, p, 2);
    }
    let floor = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        push_convex(&mut hull, p, floor);
    }
    // The upper chain ends where the lower one started.
    hull.pop();
    hull
}

fn push_convex(hull: &mut Vec<Point>, p: Point, floor: usize) {
    while hull.len() >= floor
        && orientation(hull[hull.len() - 2], hull[hull.len() - 1], p) <= EPSILON
    {
        hull.pop();
    }
    hull.push(p);
}

/// Whether `p` lies inside or on the boundary of a hull produced by [`convex_hull`].
#[must_use]
pub fn polygon_contains(hull: &[Point], p: Point) -> bool {
    match hull {
        [] => false,
        [only] => only.distance(p) <= EPSILON,
        [a, b] => Segment::new(*a, *b).contains(p),
        _ => hull
            .iter()
            .circular_tuple_windows()
            .all(|(a, b)| orientation(*a, *b, p) >= -EPSILON),
    }
}
