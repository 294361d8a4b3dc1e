//! Rectangular accumulation lattice
//!
//! A [`DoseGrid`] samples a scalar field at regularly spaced points of a
//! bounding rectangle and adds the samples into per-cell accumulators. Every
//! call to [`DoseGrid::accumulate`] is one Riemann-sum term: the caller folds
//! the time step into the field it passes in.
//!
//! # Index convention
//!
//! Storage is row-major with `rows` chunks of `cols` cells. During
//! accumulation the row index `i` is scaled by `spacing_x` and the column
//! index `j` by `spacing_y`. The dump walks `i` over the column count instead
//! and reads `data[i * rows + j]`. Both walks agree on square lattices, which
//! is what the simulation builds; non-square lattices keep the same mapping so
//! dumps line up with earlier runs.

use crate::geometry::{Point, Rect};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use tracing::trace;

/// One dumped lattice point and its accumulated value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSample<T> {
    /// Physical x coordinate (cm)
    pub x: f64,
    /// Physical y coordinate (cm)
    pub y: f64,
    /// Accumulated value at this lattice point
    pub value: T,
}

/// Dense accumulator over a fixed rectangle.
///
/// The backing buffer is allocated once and owned by the grid. The type is
/// intentionally not `Clone` so a run never carries two copies of the lattice.
#[derive(Debug)]
pub struct DoseGrid<T = f64> {
    rect: Rect,
    spacing_x: f64,
    spacing_y: f64,
    rows: usize,
    cols: usize,
    // Row-major: data[i * cols + j]
    data: Vec<T>,
}

impl<T> DoseGrid<T>
where
    T: Copy + Default + AddAssign + Send + Sync,
{
    /// Create a zeroed lattice over `rect`.
    ///
    /// `cols` points are laid along x and `rows` along y, giving
    /// `spacing_x = width / cols` and `spacing_y = height / rows`.
    ///
    /// Zero counts are accepted and yield infinite spacing with an empty
    /// buffer; callers are expected to pass positive counts.
    pub fn new(rect: Rect, cols: usize, rows: usize) -> Self {
        Self {
            rect,
            spacing_x: rect.width() / cols as f64,
            spacing_y: rect.height() / rows as f64,
            rows,
            cols,
            data: vec![T::default(); rows * cols],
        }
    }

    /// Square lattice with `points` samples per axis
    pub fn square(rect: Rect, points: usize) -> Self {
        Self::new(rect, points, points)
    }

    /// Sample `field` at every lattice point and add the result into the cell.
    ///
    /// Rows are evaluated in parallel with Rayon. Each task owns one row
    /// slice, so no two tasks ever touch the same cell, and the call only
    /// returns once every row has been written. `field` must therefore be
    /// callable from several threads at once and must not rely on the order
    /// in which points are visited.
    pub fn accumulate<F>(&mut self, field: F)
    where
        F: Fn(f64, f64) -> T + Sync,
    {
        if self.data.is_empty() {
            return;
        }

        let origin = self.rect.tl;
        let (sx, sy) = (self.spacing_x, self.spacing_y);
        trace!(rows = self.rows, cols = self.cols, "accumulating field");

        self.data
            .par_chunks_mut(self.cols)
            .enumerate()
            .for_each(|(i, row)| {
                let x = origin.x + i as f64 * sx;
                for (j, cell) in row.iter_mut().enumerate() {
                    let y = origin.y + j as f64 * sy;
                    *cell += field(x, y);
                }
            });
    }

    /// Every lattice point with its accumulated value.
    ///
    /// Yields `cols * rows` samples, outer loop over `i < cols` (x), inner
    /// loop over `j < rows` (y). Read-only; may be called any number of times.
    pub fn dump(&self) -> impl Iterator<Item = GridSample<T>> + '_ {
        let origin = self.rect.tl;
        (0..self.cols).flat_map(move |i| {
            let x = origin.x + i as f64 * self.spacing_x;
            (0..self.rows).map(move |j| GridSample {
                x,
                y: origin.y + j as f64 * self.spacing_y,
                value: self.data[i * self.rows + j],
            })
        })
    }

    /// Physical coordinates sampled for cell `(i, j)` during accumulation
    pub fn sample_point(&self, i: usize, j: usize) -> Point {
        Point::new(
            self.rect.tl.x + i as f64 * self.spacing_x,
            self.rect.tl.y + j as f64 * self.spacing_y,
        )
    }

    /// Accumulated value of cell `(i, j)` (row `i`, column `j`)
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows` or `j >= cols`
    pub fn cell_value(&self, i: usize, j: usize) -> T {
        assert!(i < self.rows && j < self.cols, "Cell out of bounds");
        self.data[i * self.cols + j]
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(spacing_x, spacing_y)` in cm
    pub fn spacing(&self) -> (f64, f64) {
        (self.spacing_x, self.spacing_y)
    }

    /// Raw row-major buffer
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl DoseGrid<f64> {
    /// Sum of all cells
    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Largest cell value, `None` for an empty lattice
    pub fn max_value(&self) -> Option<f64> {
        self.data.iter().copied().reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::collections::HashSet;

    fn unit_rect() -> Rect {
        Rect::new(Point::new(-1.0, -1.0), Point::new(1.0, 1.0))
    }

    #[test]
    fn test_grid_creation() {
        let grid: DoseGrid = DoseGrid::new(unit_rect(), 4, 8);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.rows(), 8);
        assert_eq!(grid.as_slice().len(), 32);
        assert!(grid.as_slice().iter().all(|&v| v == 0.0));
        assert_eq!(grid.spacing(), (0.5, 0.25));
    }

    #[test]
    fn test_accumulate_adds_rather_than_replaces() {
        let mut grid: DoseGrid = DoseGrid::square(unit_rect(), 5);
        grid.accumulate(|_, _| 1.5);
        grid.accumulate(|_, _| 2.0);
        assert!(grid.as_slice().iter().all(|&v| v == 3.5));
    }

    #[test]
    fn test_accumulate_samples_expected_coordinates() {
        let mut grid: DoseGrid = DoseGrid::square(unit_rect(), 10);
        // Encode the sampled coordinates so each cell can be checked
        grid.accumulate(|x, y| 1000.0 * x + y);

        for i in 0..10 {
            for j in 0..10 {
                let p = grid.sample_point(i, j);
                assert_relative_eq!(p.x, -1.0 + i as f64 * 0.2, epsilon = 1e-12);
                assert_relative_eq!(p.y, -1.0 + j as f64 * 0.2, epsilon = 1e-12);
                assert_relative_eq!(grid.cell_value(i, j), 1000.0 * p.x + p.y, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_dump_pairs_coordinates_with_cells() {
        let mut grid: DoseGrid = DoseGrid::square(unit_rect(), 6);
        grid.accumulate(|x, y| 1000.0 * x + y);

        let samples: Vec<_> = grid.dump().collect();
        assert_eq!(samples.len(), 36);

        for (n, s) in samples.iter().enumerate() {
            let (i, j) = (n / 6, n % 6);
            let p = grid.sample_point(i, j);
            assert_eq!((s.x, s.y), (p.x, p.y));
            assert_relative_eq!(s.value, 1000.0 * s.x + s.y, epsilon = 1e-9);
        }

        let unique: HashSet<(u64, u64)> = samples
            .iter()
            .map(|s| (s.x.to_bits(), s.y.to_bits()))
            .collect();
        assert_eq!(unique.len(), 36);
    }

    #[test]
    fn test_dump_is_repeatable() {
        let mut grid: DoseGrid = DoseGrid::square(unit_rect(), 3);
        grid.accumulate(|x, y| x * y);
        let first: Vec<_> = grid.dump().collect();
        let second: Vec<_> = grid.dump().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_square_dump_keeps_index_mapping() {
        let mut grid: DoseGrid = DoseGrid::new(unit_rect(), 2, 4);
        grid.accumulate(|_, _| 1.0);

        let samples: Vec<_> = grid.dump().collect();
        assert_eq!(samples.len(), 8);
        // Outer loop over the 2 columns along x, inner loop over the 4 rows along y
        assert_eq!(samples[0].x, -1.0);
        assert_eq!(samples[3].x, -1.0);
        assert_eq!(samples[4].x, 0.0);
        assert_eq!(samples[1].y, -0.5);
        assert_eq!(samples[3].y, 0.5);
    }

    #[test]
    fn test_accumulation_matches_sequential_sum() {
        let mut rng = StdRng::seed_from_u64(7);
        let offsets: Vec<f64> = (0..20).map(|_| rng.random_range(-5.0..5.0)).collect();

        let mut grid: DoseGrid = DoseGrid::square(unit_rect(), 16);
        for &k in &offsets {
            grid.accumulate(|x, y| k * (x - y) + k * k);
        }

        for i in 0..16 {
            for j in 0..16 {
                let p = grid.sample_point(i, j);
                let expected: f64 = offsets.iter().map(|&k| k * (p.x - p.y) + k * k).sum();
                assert_relative_eq!(grid.cell_value(i, j), expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_integer_cells() {
        let mut grid: DoseGrid<u32> = DoseGrid::square(unit_rect(), 4);
        grid.accumulate(|x, _| u32::from(x < 0.0));
        grid.accumulate(|x, _| u32::from(x < 0.0));
        let counted: u32 = grid.as_slice().iter().sum();
        // Rows 0 and 1 sample x < 0
        assert_eq!(counted, 2 * 4 * 2);
    }

    #[test]
    fn test_zero_resolution_is_empty() {
        let mut grid: DoseGrid = DoseGrid::square(unit_rect(), 0);
        grid.accumulate(|_, _| 1.0);
        assert_eq!(grid.dump().count(), 0);
        assert!(grid.spacing().0.is_infinite());
        assert_eq!(grid.max_value(), None);
    }

    #[test]
    fn test_total_and_max() {
        let mut grid: DoseGrid = DoseGrid::square(unit_rect(), 2);
        grid.accumulate(|x, y| if x > -1.0 && y > -1.0 { 4.0 } else { 1.0 });
        assert_eq!(grid.total(), 7.0);
        assert_eq!(grid.max_value(), Some(4.0));
    }

    #[test]
    #[should_panic(expected = "Cell out of bounds")]
    fn test_cell_bounds_check() {
        let grid: DoseGrid = DoseGrid::square(unit_rect(), 3);
        let _ = grid.cell_value(3, 0);
    }
}
