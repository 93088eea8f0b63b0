//! The eight `f32` matrix multiplication kernels.
//!
//! Every kernel computes `C = A · B` for row-major A (`M × N`) and C (`M × P`).
//! The second operand is B (`N × P`) or, for the `*_transposed` kernels, Bᵗ
//! (`P × N`). Kernels do not validate shapes: a mismatch is a caller bug that
//! surfaces as an out-of-bounds panic (or a `debug_assert!` in debug builds).
//!
//! | Kernel | Strategy |
//! |--------|----------|
//! | [`naive::matmul_naive`] | i-j-k loops, strided walk down B's columns |
//! | [`naive::matmul_naive_transposed`] | i-j-k loops over Bᵗ, contiguous dot products |
//! | [`cacheline::matmul_cacheline`] | (M, P, N) tiles of one cache line |
//! | [`cacheline::matmul_cacheline_transposed`] | tiles over Bᵗ, per-N-tile partial dots added into C |
//! | [`sse::matmul_sse`] | cache-line tiles, 4-wide updates of C |
//! | [`sse::matmul_sse_transposed`] | (M, P) tiles, 4-wide full-length dots stored once |
//! | [`avx::matmul_avx`] | cache-line tiles, 8-wide updates of C |
//! | [`avx::matmul_avx_transposed`] | (M, P) tiles, 8-wide full-length dots stored once |
//!
//! The blocked kernels add into C, so C must be zeroed before each call.
//!
//! The SSE and AVX register types are internal; these kernels, with their
//! runtime feature checks, are the only way to reach them.
//!
//! ```compile_fail
//! use matbench::simd::SimdVector;
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{invalid_argument, MatbenchError};
use crate::matrix::CACHE_LINE_SIZE;

pub mod avx;
pub mod cacheline;
pub mod naive;
pub mod sse;
mod vectorized;

/// Tile edge: the number of `f32` in one cache line.
pub const TILE: usize = CACHE_LINE_SIZE / std::mem::size_of::<f32>();

/// Shared extents of a product: A is `m × n`, B is `n × p`, C is `m × p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dims {
    pub m: usize,
    pub n: usize,
    pub p: usize,
}

impl Dims {
    /// `size × size` operands.
    pub const fn square(size: usize) -> Self {
        Dims {
            m: size,
            n: size,
            p: size,
        }
    }
}

#[inline]
fn check_dims(a: &[f32], b: &[f32], c: &[f32], dims: Dims) {
    debug_assert!(a.len() >= dims.m * dims.n, "A is smaller than M×N");
    debug_assert!(b.len() >= dims.n * dims.p, "B is smaller than N×P");
    debug_assert!(c.len() >= dims.m * dims.p, "C is smaller than M×P");
}

/// Signature shared by every kernel.
pub type KernelFn = fn(&[f32], &[f32], &mut [f32], Dims);

/// The kernel set, one variant per implementation.
///
/// Each variant carries a display name, whether it expects Bᵗ, and the function
/// that runs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kernel {
    Naive,
    NaiveTransposed,
    Cacheline,
    CachelineTransposed,
    Sse,
    SseTransposed,
    Avx,
    AvxTransposed,
}

impl Kernel {
    /// All kernels, in the order a sweep runs them.
    pub const ALL: [Kernel; 8] = [
        Kernel::Naive,
        Kernel::NaiveTransposed,
        Kernel::Cacheline,
        Kernel::CachelineTransposed,
        Kernel::Sse,
        Kernel::SseTransposed,
        Kernel::Avx,
        Kernel::AvxTransposed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Kernel::Naive => "naive",
            Kernel::NaiveTransposed => "naive_transposed",
            Kernel::Cacheline => "cacheline",
            Kernel::CachelineTransposed => "cacheline_transposed",
            Kernel::Sse => "sse",
            Kernel::SseTransposed => "sse_transposed",
            Kernel::Avx => "avx",
            Kernel::AvxTransposed => "avx_transposed",
        }
    }

    /// Whether the second operand must be passed as Bᵗ.
    pub fn expects_transposed(self) -> bool {
        matches!(
            self,
            Kernel::NaiveTransposed
                | Kernel::CachelineTransposed
                | Kernel::SseTransposed
                | Kernel::AvxTransposed
        )
    }

    pub fn function(self) -> KernelFn {
        match self {
            Kernel::Naive => naive::matmul_naive,
            Kernel::NaiveTransposed => naive::matmul_naive_transposed,
            Kernel::Cacheline => cacheline::matmul_cacheline,
            Kernel::CachelineTransposed => cacheline::matmul_cacheline_transposed,
            Kernel::Sse => sse::matmul_sse,
            Kernel::SseTransposed => sse::matmul_sse_transposed,
            Kernel::Avx => avx::matmul_avx,
            Kernel::AvxTransposed => avx::matmul_avx_transposed,
        }
    }

    /// Runs the kernel once. `b` must be in the orientation given by
    /// [`expects_transposed`](Kernel::expects_transposed).
    #[inline]
    pub fn run(self, a: &[f32], b: &[f32], c: &mut [f32], dims: Dims) {
        (self.function())(a, b, c, dims)
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kernel {
    type Err = MatbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kernel::ALL
            .into_iter()
            .find(|kernel| kernel.name() == s)
            .ok_or_else(|| invalid_argument(format!("unknown kernel: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_is_one_cache_line_of_f32() {
        assert_eq!(TILE, 16);
    }

    #[test]
    fn test_names_round_trip_and_are_unique() {
        for kernel in Kernel::ALL {
            assert_eq!(kernel.name().parse::<Kernel>().unwrap(), kernel);
            assert_eq!(kernel.to_string(), kernel.name());
        }
        let mut names: Vec<_> = Kernel::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Kernel::ALL.len());
    }

    #[test]
    fn test_orientation_flags() {
        let transposed: Vec<_> = Kernel::ALL
            .into_iter()
            .filter(|k| k.expects_transposed())
            .collect();
        assert_eq!(
            transposed,
            [
                Kernel::NaiveTransposed,
                Kernel::CachelineTransposed,
                Kernel::SseTransposed,
                Kernel::AvxTransposed
            ]
        );
        assert!(transposed.iter().all(|k| k.name().ends_with("_transposed")));
    }

    #[test]
    fn test_unknown_kernel_name() {
        assert!(matches!(
            "blas".parse::<Kernel>(),
            Err(MatbenchError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_run_scalar_product() {
        for kernel in Kernel::ALL {
            let mut c = [0.0];
            kernel.run(&[3.0], &[7.0], &mut c, Dims::square(1));
            assert_eq!(c, [21.0], "{kernel}");
        }
    }
}
