//! Grid-based accumulation modules

pub mod dose_grid;

// Re-export main types
pub use dose_grid::{DoseGrid, GridSample};
