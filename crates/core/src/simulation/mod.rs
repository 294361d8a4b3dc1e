//! Falling-beam dose simulation
//!
//! A beam starts `start_height` cm above a circular detector and falls under
//! gravity. Each tick advances the beam with semi-implicit Euler (velocity
//! first, then position from the new velocity) and adds `dose_rate · dt` into
//! every lattice point that lies strictly inside the detector circle. Points
//! outside the detector never receive dose.
//!
//! The loop runs while `time < end_time` with a fixed step, so the last tick
//! may overshoot `end_time` by up to one `dt`.

pub mod config;

pub use config::{SimulationConfig, GRAVITY_CM_PER_S2};

use crate::beam::{Beam, BeamKind, BeamProfile};
use crate::geometry::{outer_square, Circle, Point};
use crate::grid::DoseGrid;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Beam kinematics and elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    /// Elapsed simulated time (s)
    pub time: f64,
    /// Vertical beam velocity (cm/s, negative is downward)
    pub velocity: f64,
    /// Vertical beam position (cm)
    pub position: f64,
}

impl KinematicState {
    /// At rest at `height`, time zero
    pub fn at_rest(height: f64) -> Self {
        Self {
            time: 0.0,
            velocity: 0.0,
            position: height,
        }
    }

    /// Advance one semi-implicit Euler step under constant downward `gravity`
    #[inline]
    pub fn advance(&mut self, gravity: f64, dt: f64) {
        self.velocity -= gravity * dt;
        self.position += self.velocity * dt;
        self.time += dt;
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of ticks executed
    pub ticks: u64,
    /// Final kinematic state
    pub state: KinematicState,
    /// Baseline beam intensity after the last tick (W/cm²)
    pub final_intensity: f64,
    /// Sum of dose over all lattice points
    pub total_dose: f64,
}

/// Owns the beam, detector and dose lattice for one run
#[derive(Debug)]
pub struct DoseSimulation {
    config: SimulationConfig,
    detector: Circle,
    beam: Beam,
    grid: DoseGrid<f64>,
    state: KinematicState,
    ticks: u64,
}

impl DoseSimulation {
    /// Set up a run from `config`.
    ///
    /// The detector is a circle of `grid_radius` at the origin, and the lattice
    /// covers its bounding square with `resolution` points per axis. The beam
    /// starts at the origin and is moved to its first height on tick one.
    pub fn new(config: &SimulationConfig) -> Self {
        let detector = Circle::at(0.0, 0.0, config.grid_radius);
        let grid = DoseGrid::square(outer_square(&detector), config.resolution);
        let beam = Beam::new(
            config.beam_kind,
            Point::new(0.0, 0.0),
            config.beam_radius,
            config.intensity,
        );

        info!(
            "Dose simulation initialized: {}x{} grid, detector r={}cm, {} beam r={}cm I={}W/cm²",
            grid.cols(),
            grid.rows(),
            config.grid_radius,
            config.beam_kind.name(),
            config.beam_radius,
            config.intensity
        );

        Self {
            config: *config,
            detector,
            beam,
            grid,
            state: KinematicState::at_rest(config.start_height),
            ticks: 0,
        }
    }

    /// True once elapsed time has reached `end_time`
    pub fn is_finished(&self) -> bool {
        // NaN on either side stops the loop
        let running = self.state.time < self.config.end_time;
        !running
    }

    /// Execute one tick: move the beam, then accumulate its dose.
    pub fn step(&mut self) {
        let dt = self.config.dt;
        self.state.advance(self.config.gravity, dt);

        self.beam.set_position(0.0, self.state.position);
        if self.config.intensity_ramp != 0.0 {
            self.beam.change_intensity(self.config.intensity_ramp * dt);
        }

        let beam = &self.beam;
        let detector = self.detector;
        self.grid.accumulate(|x, y| {
            if detector.contains_xy(x, y) {
                beam.intensity(x, y) * dt
            } else {
                0.0
            }
        });

        self.ticks += 1;
        debug!(
            "Tick {}: t={:.4}s, v={:.3}cm/s, y={:.4}cm",
            self.ticks, self.state.time, self.state.velocity, self.state.position
        );
    }

    /// Step until [`DoseSimulation::is_finished`].
    ///
    /// A non-positive `dt` with a positive `end_time` never finishes.
    pub fn run(&mut self) -> RunSummary {
        while !self.is_finished() {
            self.step();
        }

        let summary = self.summary();
        info!(
            "Simulation finished after {} ticks: t={:.4}s, beam at {:.4}cm, total dose {:.6}",
            summary.ticks, summary.state.time, summary.state.position, summary.total_dose
        );
        summary
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.ticks,
            state: self.state,
            final_intensity: self.beam.base_intensity(),
            total_dose: self.grid.total(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn detector(&self) -> Circle {
        self.detector
    }

    pub fn beam(&self) -> &Beam {
        &self.beam
    }

    pub fn beam_kind(&self) -> BeamKind {
        self.beam.kind()
    }

    pub fn state(&self) -> KinematicState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Accumulated dose lattice
    pub fn grid(&self) -> &DoseGrid<f64> {
        &self.grid
    }

    /// Consume the run and keep only the dose lattice
    pub fn into_grid(self) -> DoseGrid<f64> {
        self.grid
    }
}
