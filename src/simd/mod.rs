//! Fixed-width `f32` vectors used by the SSE and AVX kernels.
//!
//! The vectorized kernels are written once against [`SimdVector`] and
//! instantiated with a hardware register type ([`sse::f32x4::F32x4`],
//! [`avx::f32x8::F32x8`]) or with the portable [`Lanes`] array, which performs
//! the same operations in the same order so results agree bit for bit.

use std::ops::{Add, Mul};

#[cfg(all(sse, any(target_arch = "x86", target_arch = "x86_64")))]
pub mod sse;

#[cfg(all(avx, any(target_arch = "x86", target_arch = "x86_64")))]
pub mod avx;

/// A vector register holding `LANES` packed `f32` values.
///
/// Hardware implementors are only sound to use inside code compiled for (and
/// running on a CPU with) their instruction set; the kernels guarantee this by
/// calling them from `#[target_feature]` functions behind runtime detection.
pub trait SimdVector: Copy + Add<Output = Self> + Mul<Output = Self> {
    /// Number of `f32` lanes in the register.
    const LANES: usize;

    fn zero() -> Self;

    /// Broadcasts `value` to every lane.
    fn splat(value: f32) -> Self;

    /// Loads the first `LANES` elements of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src` is shorter than `LANES`.
    fn load(src: &[f32]) -> Self;

    /// Stores all lanes into the first `LANES` elements of `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `dst` is shorter than `LANES`.
    fn store(self, dst: &mut [f32]);

    /// Sums the lanes by repeated pairwise addition of neighbouring lanes
    /// (the order of two `hadd` steps); 8-lane registers then add the reduced
    /// low and high halves.
    fn horizontal_sum(self) -> f32;
}

/// Portable stand-in for a vector register, used when the instruction set is
/// not available.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Lanes<const N: usize>(pub [f32; N]);

impl<const N: usize> Add for Lanes<N> {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o += r;
        }
        Lanes(out)
    }
}

impl<const N: usize> Mul for Lanes<N> {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o *= r;
        }
        Lanes(out)
    }
}

/// Sums a group of four lanes the way two `hadd` steps do.
#[inline(always)]
fn pairwise_sum4(l: &[f32]) -> f32 {
    (l[0] + l[1]) + (l[2] + l[3])
}

impl<const N: usize> SimdVector for Lanes<N> {
    const LANES: usize = N;

    #[inline(always)]
    fn zero() -> Self {
        Lanes([0.0; N])
    }

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Lanes([value; N])
    }

    #[inline(always)]
    fn load(src: &[f32]) -> Self {
        let mut lanes = [0.0; N];
        lanes.copy_from_slice(&src[..N]);
        Lanes(lanes)
    }

    #[inline(always)]
    fn store(self, dst: &mut [f32]) {
        dst[..N].copy_from_slice(&self.0);
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f32 {
        match N {
            4 => pairwise_sum4(&self.0),
            8 => pairwise_sum4(&self.0[..4]) + pairwise_sum4(&self.0[4..]),
            _ => self.0.iter().sum(),
        }
    }
}
