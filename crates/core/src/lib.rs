//! Dose Simulation Core Library
//!
//! Simulates a radiation beam falling under gravity above a circular detector
//! and accumulates the deposited dose on a 2D lattice.
//!
//! ## Pieces
//!
//! - [`grid::DoseGrid`]: samples a scalar field over a rectangular lattice and
//!   sums the samples per cell, evaluating rows in parallel with Rayon
//! - [`beam::Beam`]: uniform-disk and Gaussian dose-rate profiles
//! - [`simulation::DoseSimulation`]: semi-implicit Euler free fall driving
//!   the accumulation, masked by the detector circle
//! - [`output`]: plain-text `x y value` dump

// Core types and utilities
pub mod error;
pub mod geometry;

// Simulation modules
pub mod beam;
pub mod grid;
pub mod output;
pub mod simulation;

// Re-export core types
pub use error::{Error, Result};
pub use geometry::{Circle, Point, Rect};

// Re-export simulation types
pub use beam::{Beam, BeamKind, BeamProfile, CircleBeam, GaussBeam};
pub use grid::{DoseGrid, GridSample};
pub use output::{format_general, write_dump};
pub use simulation::{DoseSimulation, KinematicState, RunSummary, SimulationConfig};
