//! Row-major `f32` matrix buffers.
//!
//! The slice-level functions take the extents alongside the data, the way the
//! kernels see their operands. [`Matrix`] owns a cache-line-aligned buffer and
//! forwards to them.

use std::fmt;

use rand::Rng;

use crate::error::Result;
use crate::utils::AlignedVec;

/// Size in bytes of the cache line every matrix buffer is aligned to.
pub const CACHE_LINE_SIZE: usize = 64;

/// Smallest and largest value written by [`fill_random`].
pub const RANDOM_MIN: i32 = 1;
pub const RANDOM_MAX: i32 = 10;

/// Sets every element of a `rows × cols` matrix to `0.0`.
pub fn zero(buf: &mut [f32], rows: usize, cols: usize) {
    buf[..rows * cols].fill(0.0);
}

/// Assigns each element an integer-valued float drawn uniformly from
/// `RANDOM_MIN..=RANDOM_MAX`.
pub fn fill_random<R: Rng>(buf: &mut [f32], rows: usize, cols: usize, rng: &mut R) {
    for x in buf[..rows * cols].iter_mut() {
        *x = rng.random_range(RANDOM_MIN..=RANDOM_MAX) as f32;
    }
}

/// Writes `src` (`rows × cols`) transposed into `dst` (`cols × rows`).
pub fn transpose(src: &[f32], dst: &mut [f32], rows: usize, cols: usize) {
    for r in 0..rows {
        for c in 0..cols {
            dst[c * rows + r] = src[r * cols + c];
        }
    }
}

/// Exact element-wise comparison of two `rows × cols` matrices.
pub fn equals(a: &[f32], b: &[f32], rows: usize, cols: usize) -> bool {
    let len = rows * cols;
    a[..len].iter().zip(&b[..len]).all(|(x, y)| x == y)
}

/// Writes the matrix one row per line, each element as `{:.2}` followed by a space.
pub fn dump<W: fmt::Write>(out: &mut W, buf: &[f32], rows: usize, cols: usize) -> fmt::Result {
    for r in 0..rows {
        for c in 0..cols {
            write!(out, "{:.2} ", buf[r * cols + c])?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// An owned, cache-line-aligned, row-major matrix of `f32`.
#[derive(Debug)]
pub struct Matrix {
    data: AlignedVec<f32>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Allocates a zeroed `rows × cols` matrix aligned to [`CACHE_LINE_SIZE`].
    pub fn allocate(rows: usize, cols: usize) -> Result<Self> {
        let len = rows.checked_mul(cols).unwrap_or(usize::MAX);
        let data = AlignedVec::new_zeroed(len, CACHE_LINE_SIZE)?;
        Ok(Matrix { data, rows, cols })
    }

    /// Builds a matrix from equally long rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    pub fn from_rows(rows: &[&[f32]]) -> Result<Self> {
        let cols = rows.first().map_or(0, |row| row.len());
        let mut matrix = Matrix::allocate(rows.len(), cols)?;
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), cols, "row {r} has {} elements, expected {cols}", row.len());
            matrix.data[r * cols..(r + 1) * cols].copy_from_slice(row);
        }
        Ok(matrix)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn is_cache_aligned(&self) -> bool {
        self.data.is_aligned_to(CACHE_LINE_SIZE)
    }

    pub fn zero(&mut self) {
        zero(&mut self.data, self.rows, self.cols);
    }

    pub fn fill_random<R: Rng>(&mut self, rng: &mut R) {
        fill_random(&mut self.data, self.rows, self.cols, rng);
    }

    /// Writes the transpose of `self` into `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `dst` is not `cols × rows`.
    pub fn transpose_into(&self, dst: &mut Matrix) {
        assert_eq!(
            (dst.rows, dst.cols),
            (self.cols, self.rows),
            "transpose destination has the wrong shape"
        );
        transpose(&self.data, &mut dst.data, self.rows, self.cols);
    }

    /// Allocates and returns the transpose of `self`.
    pub fn transposed(&self) -> Result<Matrix> {
        let mut dst = Matrix::allocate(self.cols, self.rows)?;
        self.transpose_into(&mut dst);
        Ok(dst)
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && equals(&self.data, &other.data, self.rows, self.cols)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dump(f, &self.data, self.rows, self.cols)
    }
}
