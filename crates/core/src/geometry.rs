//! Planar geometry primitives used to lay out the detector and beam.
//!
//! Coordinates are in centimeters. Points are plain `nalgebra` vectors so the
//! usual vector arithmetic (add, subtract, scale) is available without extra
//! operator boilerplate.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// 2D point or offset in centimeters.
pub type Point = Vector2<f64>;

/// Axis-aligned rectangle given by its top-left and bottom-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner (minimum x and y)
    pub tl: Point,
    /// Bottom-right corner (maximum x and y)
    pub br: Point,
}

impl Rect {
    pub fn new(tl: Point, br: Point) -> Self {
        Self { tl, br }
    }

    pub fn width(&self) -> f64 {
        self.br.x - self.tl.x
    }

    pub fn height(&self) -> f64 {
        self.br.y - self.tl.y
    }

    /// Midpoint of the two corners
    pub fn center(&self) -> Point {
        (self.tl + self.br) / 2.0
    }
}

/// Circle with a strict-interior containment test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Circle centered at `(x, y)`
    pub fn at(x: f64, y: f64, radius: f64) -> Self {
        Self::new(Point::new(x, y), radius)
    }

    /// True when `p` lies strictly inside the circle (`dx² + dy² < r²`).
    ///
    /// Points exactly on the boundary are outside.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        let dx = self.center.x - p.x;
        let dy = self.center.y - p.y;
        dx * dx + dy * dy < self.radius * self.radius
    }

    /// Same as [`Circle::contains`] without building a [`Point`]
    #[inline]
    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        self.contains(Point::new(x, y))
    }
}

/// Smallest axis-aligned square enclosing `circle`.
pub fn outer_square(circle: &Circle) -> Rect {
    let r = Point::new(circle.radius, circle.radius);
    Rect::new(circle.center - r, circle.center + r)
}

/// Largest axis-aligned square inscribed in `circle`.
pub fn inner_square(circle: &Circle) -> Rect {
    let half = circle.radius / std::f64::consts::SQRT_2;
    let r = Point::new(half, half);
    Rect::new(circle.center - r, circle.center + r)
}

/// Circumscribed circle of `rect` (passes through all four corners).
pub fn outer_circle(rect: &Rect) -> Circle {
    let w2 = rect.width() / 2.0;
    let h2 = rect.height() / 2.0;
    Circle::new(rect.center(), (w2 * w2 + h2 * h2).sqrt())
}

/// Largest circle centered in `rect` that fits inside it.
pub fn inner_circle(rect: &Rect) -> Circle {
    let w2 = rect.width() / 2.0;
    let h2 = rect.height() / 2.0;
    Circle::new(rect.center(), w2.min(h2))
}
