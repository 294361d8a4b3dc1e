//! Beam dose-rate models
//!
//! A beam is a spatial dose-rate distribution centred on a movable point.
//! Two shapes exist:
//!
//! - [`CircleBeam`]: flat dose rate `I` strictly inside a disk of radius `r`
//! - [`GaussBeam`]: radial Gaussian with standard deviation `r`
//!
//! The Gaussian uses the 1D normalisation constant on a 2D radial distance:
//!
//! ```text
//! I(x, y) = I₀ / (r·√(2π)) · exp(−((x−cx)² + (y−cy)²) / (2r²))
//! ```
//!
//! Its integral over the plane is therefore `I₀·r·√(2π)`, not `I₀`. Existing
//! dose maps were produced with this profile and it is kept as is.

use crate::error::{Error, Result};
use crate::geometry::{Circle, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Capabilities shared by every beam shape
pub trait BeamProfile {
    /// Dose rate (W/cm²) at `(x, y)` for the current position and intensity
    fn intensity(&self, x: f64, y: f64) -> f64;

    /// Move the beam centre to `(x, y)`
    fn set_position(&mut self, x: f64, y: f64);

    /// Add `delta` to the baseline intensity
    fn change_intensity(&mut self, delta: f64);

    /// Current baseline intensity
    fn base_intensity(&self) -> f64;

    /// Current beam centre
    fn position(&self) -> Point;
}

/// Uniform disk beam
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleBeam {
    disk: Circle,
    base_intensity: f64,
}

impl CircleBeam {
    pub fn new(center: Point, radius: f64, intensity: f64) -> Self {
        Self {
            disk: Circle::new(center, radius),
            base_intensity: intensity,
        }
    }

    pub fn radius(&self) -> f64 {
        self.disk.radius
    }
}

impl BeamProfile for CircleBeam {
    #[inline]
    fn intensity(&self, x: f64, y: f64) -> f64 {
        if self.disk.contains_xy(x, y) {
            self.base_intensity
        } else {
            0.0
        }
    }

    fn set_position(&mut self, x: f64, y: f64) {
        self.disk.center = Point::new(x, y);
    }

    fn change_intensity(&mut self, delta: f64) {
        self.base_intensity += delta;
    }

    fn base_intensity(&self) -> f64 {
        self.base_intensity
    }

    fn position(&self) -> Point {
        self.disk.center
    }
}

/// Gaussian beam with standard deviation `radius`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussBeam {
    center: Point,
    radius: f64,
    base_intensity: f64,
}

impl GaussBeam {
    pub fn new(center: Point, radius: f64, intensity: f64) -> Self {
        Self {
            center,
            radius,
            base_intensity: intensity,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Dose rate at the beam centre
    pub fn peak(&self) -> f64 {
        self.base_intensity / (self.radius * (2.0 * PI).sqrt())
    }
}

impl BeamProfile for GaussBeam {
    #[inline]
    fn intensity(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.center.x;
        let dy = y - self.center.y;
        self.base_intensity / (self.radius * (2.0 * PI).sqrt())
            * (-(dx * dx + dy * dy) / (2.0 * (self.radius * self.radius))).exp()
    }

    fn set_position(&mut self, x: f64, y: f64) {
        self.center = Point::new(x, y);
    }

    fn change_intensity(&mut self, delta: f64) {
        self.base_intensity += delta;
    }

    fn base_intensity(&self) -> f64 {
        self.base_intensity
    }

    fn position(&self) -> Point {
        self.center
    }
}

/// Beam shape selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamKind {
    Circle,
    Gauss,
}

impl BeamKind {
    /// Parse a beam type token.
    ///
    /// Only the first character counts, case-insensitively: `c` selects the
    /// uniform disk and `g` the Gaussian, so `"Circle"` and `"gaussian"` work
    /// as well.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownBeamType`] for any other token, including an
    /// empty one.
    pub fn from_token(token: &str) -> Result<Self> {
        match token.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('c') => Ok(Self::Circle),
            Some('g') => Ok(Self::Gauss),
            _ => Err(Error::UnknownBeamType(token.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Gauss => "gauss",
        }
    }
}

/// A beam of either shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Beam {
    Circle(CircleBeam),
    Gauss(GaussBeam),
}

impl Beam {
    /// Build a beam of `kind` centred at `center`.
    ///
    /// `radius` is the disk radius for [`BeamKind::Circle`] and the standard
    /// deviation for [`BeamKind::Gauss`].
    pub fn new(kind: BeamKind, center: Point, radius: f64, intensity: f64) -> Self {
        match kind {
            BeamKind::Circle => Self::Circle(CircleBeam::new(center, radius, intensity)),
            BeamKind::Gauss => Self::Gauss(GaussBeam::new(center, radius, intensity)),
        }
    }

    pub fn kind(&self) -> BeamKind {
        match self {
            Self::Circle(_) => BeamKind::Circle,
            Self::Gauss(_) => BeamKind::Gauss,
        }
    }
}

impl BeamProfile for Beam {
    #[inline]
    fn intensity(&self, x: f64, y: f64) -> f64 {
        match self {
            Self::Circle(b) => b.intensity(x, y),
            Self::Gauss(b) => b.intensity(x, y),
        }
    }

    fn set_position(&mut self, x: f64, y: f64) {
        match self {
            Self::Circle(b) => b.set_position(x, y),
            Self::Gauss(b) => b.set_position(x, y),
        }
    }

    fn change_intensity(&mut self, delta: f64) {
        match self {
            Self::Circle(b) => b.change_intensity(delta),
            Self::Gauss(b) => b.change_intensity(delta),
        }
    }

    fn base_intensity(&self) -> f64 {
        match self {
            Self::Circle(b) => b.base_intensity(),
            Self::Gauss(b) => b.base_intensity(),
        }
    }

    fn position(&self) -> Point {
        match self {
            Self::Circle(b) => b.position(),
            Self::Gauss(b) => b.position(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circle_beam_flat_inside_zero_outside() {
        let beam = CircleBeam::new(Point::new(0.0, 0.0), 1.0, 5.0);
        assert_eq!(beam.intensity(0.5, 0.0), 5.0);
        assert_eq!(beam.intensity(0.0, 0.0), 5.0);
        assert_eq!(beam.intensity(1.0, 0.0), 0.0);
        assert_eq!(beam.intensity(1.0001, 0.0), 0.0);
        assert_eq!(beam.intensity(0.8, 0.8), 0.0);
    }

    #[test]
    fn test_circle_beam_follows_position() {
        let mut beam = CircleBeam::new(Point::new(0.0, 0.0), 1.0, 2.0);
        beam.set_position(0.0, 10.0);
        assert_eq!(beam.intensity(0.0, 0.0), 0.0);
        assert_eq!(beam.intensity(0.0, 9.5), 2.0);
        assert_eq!(beam.position(), Point::new(0.0, 10.0));
    }

    #[test]
    fn test_gauss_peak_at_center() {
        let mut beam = GaussBeam::new(Point::new(0.0, 0.0), 2.0, 3.0);
        beam.set_position(1.0, -1.0);
        let expected = 3.0 / (2.0 * (2.0 * PI).sqrt());
        assert_eq!(beam.intensity(1.0, -1.0), expected);
        assert_eq!(beam.peak(), expected);
    }

    #[test]
    fn test_gauss_decreases_with_distance() {
        let beam = GaussBeam::new(Point::new(0.0, 0.0), 1.0, 2.0);
        let mut previous = beam.intensity(0.0, 0.0);
        for step in 1..50 {
            let r = f64::from(step) * 0.1;
            let current = beam.intensity(r * 0.6, r * 0.8);
            assert!(current < previous, "not decreasing at r = {r}");
            previous = current;
        }
    }

    #[test]
    fn test_gauss_one_sigma_value() {
        let beam = GaussBeam::new(Point::new(0.0, 0.0), 0.5, 1.0);
        // One standard deviation out the profile drops by exp(-1/2)
        assert_relative_eq!(
            beam.intensity(0.5, 0.0),
            beam.peak() * (-0.5_f64).exp(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_change_intensity_is_additive() {
        let mut beam = Beam::new(BeamKind::Circle, Point::new(0.0, 0.0), 1.0, 2.0);
        beam.change_intensity(0.5);
        beam.change_intensity(-1.0);
        assert_eq!(beam.base_intensity(), 1.5);
        assert_eq!(beam.intensity(0.0, 0.0), 1.5);

        let mut gauss = Beam::new(BeamKind::Gauss, Point::new(0.0, 0.0), 1.0, 2.0);
        gauss.change_intensity(2.0);
        assert_eq!(gauss.base_intensity(), 4.0);
    }

    #[test]
    fn test_beam_dispatch_matches_variants() {
        let center = Point::new(0.3, -0.2);
        let circle = Beam::new(BeamKind::Circle, center, 1.0, 2.0);
        let gauss = Beam::new(BeamKind::Gauss, center, 1.0, 2.0);
        assert_eq!(circle.kind(), BeamKind::Circle);
        assert_eq!(gauss.kind(), BeamKind::Gauss);
        assert_eq!(
            gauss.intensity(0.1, 0.1),
            GaussBeam::new(center, 1.0, 2.0).intensity(0.1, 0.1)
        );
        assert_eq!(circle.position(), center);
    }

    #[test]
    fn test_beam_kind_tokens() {
        assert_eq!(BeamKind::from_token("c").unwrap(), BeamKind::Circle);
        assert_eq!(BeamKind::from_token("C").unwrap(), BeamKind::Circle);
        assert_eq!(BeamKind::from_token("circle").unwrap(), BeamKind::Circle);
        assert_eq!(BeamKind::from_token("g").unwrap(), BeamKind::Gauss);
        assert_eq!(BeamKind::from_token("Gaussian").unwrap(), BeamKind::Gauss);
        assert!(matches!(
            BeamKind::from_token("x"),
            Err(Error::UnknownBeamType(_))
        ));
        assert!(BeamKind::from_token("").is_err());
    }
}
