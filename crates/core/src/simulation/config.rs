//! Run configuration for the falling-beam dose simulation
//!
//! All inputs for one run live in a single immutable [`SimulationConfig`]
//! built once at startup. Nothing here validates numeric ranges: a zero
//! resolution or negative radius produces a degenerate run rather than an
//! error.

use crate::beam::BeamKind;
use serde::{Deserialize, Serialize};

/// Gravitational acceleration (cm/s²)
pub const GRAVITY_CM_PER_S2: f64 = 9.81e2;

/// Default detector radius (cm)
pub const DEFAULT_GRID_RADIUS: f64 = 0.15;

/// Default beam radius or standard deviation (cm)
pub const DEFAULT_BEAM_RADIUS: f64 = 1.0;

/// Default baseline intensity (W/cm²)
pub const DEFAULT_INTENSITY: f64 = 2.0;

/// Default lattice points per axis
pub const DEFAULT_RESOLUTION: usize = 50;

/// Parameters for a single simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Initial beam height above the detector (cm)
    pub start_height: f64,
    /// Fixed time step (s)
    pub dt: f64,
    /// The loop runs while elapsed time is below this (s)
    pub end_time: f64,
    /// Beam shape
    pub beam_kind: BeamKind,
    /// Detector circle radius (cm)
    pub grid_radius: f64,
    /// Disk radius for circle beams, standard deviation for Gaussian beams (cm)
    pub beam_radius: f64,
    /// Baseline beam intensity (W/cm²)
    pub intensity: f64,
    /// Lattice points per axis
    pub resolution: usize,
    /// Downward acceleration (cm/s²)
    pub gravity: f64,
    /// Intensity change per second of simulated time (W/cm²/s)
    pub intensity_ramp: f64,
}

impl SimulationConfig {
    /// Config with the four required inputs and defaults for everything else
    pub fn new(start_height: f64, dt: f64, end_time: f64, beam_kind: BeamKind) -> Self {
        Self {
            start_height,
            dt,
            end_time,
            beam_kind,
            ..Self::default()
        }
    }

    pub fn with_grid_radius(mut self, grid_radius: f64) -> Self {
        self.grid_radius = grid_radius;
        self
    }

    pub fn with_beam_radius(mut self, beam_radius: f64) -> Self {
        self.beam_radius = beam_radius;
        self
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_intensity_ramp(mut self, intensity_ramp: f64) -> Self {
        self.intensity_ramp = intensity_ramp;
        self
    }
}

impl Default for SimulationConfig {
    /// 100 cm drop over one second in 10 ms steps with a circular beam
    fn default() -> Self {
        Self {
            start_height: 100.0,
            dt: 0.01,
            end_time: 1.0,
            beam_kind: BeamKind::Circle,
            grid_radius: DEFAULT_GRID_RADIUS,
            beam_radius: DEFAULT_BEAM_RADIUS,
            intensity: DEFAULT_INTENSITY,
            resolution: DEFAULT_RESOLUTION,
            gravity: GRAVITY_CM_PER_S2,
            intensity_ramp: 0.0,
        }
    }
}
