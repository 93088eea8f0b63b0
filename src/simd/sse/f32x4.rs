//! SSE 4-lane f32 SIMD vector implementation.
//!
//! `F32x4` wraps the `__m128` register and implements [`SimdVector`] for the
//! 4-wide kernels.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, Mul};

use crate::simd::SimdVector;

/// SSE memory alignment requirement in bytes.
pub(crate) const SSE_ALIGNMENT: usize = 16;

/// Number of f32 elements that fit in a 128-bit register.
pub(crate) const LANE_COUNT: usize = 4;

/// SSE vector containing 4 packed f32 values.
#[derive(Copy, Clone, Debug)]
pub struct F32x4 {
    pub elements: __m128,
}

impl F32x4 {
    /// Checks if a pointer is 16-byte aligned.
    #[inline(always)]
    pub fn is_aligned(ptr: *const f32) -> bool {
        (ptr as usize) % SSE_ALIGNMENT == 0
    }

    /// Loads 4 elements from 16-byte aligned memory.
    ///
    /// # Safety
    ///
    /// Pointer must be 16-byte aligned and point to at least 4 valid f32 values.
    #[inline(always)]
    pub unsafe fn load_aligned(ptr: *const f32) -> Self {
        Self {
            elements: _mm_load_ps(ptr),
        }
    }

    /// Loads 4 elements from unaligned memory.
    ///
    /// # Safety
    ///
    /// Pointer must point to at least 4 valid f32 values.
    #[inline(always)]
    pub unsafe fn load_unaligned(ptr: *const f32) -> Self {
        Self {
            elements: _mm_loadu_ps(ptr),
        }
    }

    /// # Safety
    ///
    /// Pointer must be 16-byte aligned and point to at least 4 writable f32 slots.
    #[inline(always)]
    pub unsafe fn store_aligned_at(&self, ptr: *mut f32) {
        _mm_store_ps(ptr, self.elements)
    }

    /// # Safety
    ///
    /// Pointer must point to at least 4 writable f32 slots.
    #[inline(always)]
    pub unsafe fn store_unaligned_at(&self, ptr: *mut f32) {
        _mm_storeu_ps(ptr, self.elements)
    }
}

impl SimdVector for F32x4 {
    const LANES: usize = LANE_COUNT;

    #[inline(always)]
    fn zero() -> Self {
        Self {
            elements: unsafe { _mm_setzero_ps() },
        }
    }

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self {
            elements: unsafe { _mm_set1_ps(value) },
        }
    }

    #[inline(always)]
    fn load(src: &[f32]) -> Self {
        assert!(src.len() >= LANE_COUNT, "load needs {LANE_COUNT} elements");

        let ptr = src.as_ptr();
        match F32x4::is_aligned(ptr) {
            true => unsafe { Self::load_aligned(ptr) },
            false => unsafe { Self::load_unaligned(ptr) },
        }
    }

    #[inline(always)]
    fn store(self, dst: &mut [f32]) {
        assert!(dst.len() >= LANE_COUNT, "store needs {LANE_COUNT} elements");

        let ptr = dst.as_mut_ptr();
        match F32x4::is_aligned(ptr) {
            true => unsafe { self.store_aligned_at(ptr) },
            false => unsafe { self.store_unaligned_at(ptr) },
        }
    }

    /// `[a, b, c, d]` -> `[a+b, c+d, ..]` -> `[(a+b)+(c+d), ..]`.
    #[inline(always)]
    fn horizontal_sum(self) -> f32 {
        unsafe {
            let pairs = _mm_hadd_ps(self.elements, self.elements);
            let total = _mm_hadd_ps(pairs, pairs);
            _mm_cvtss_f32(total)
        }
    }
}

impl Add for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm_add_ps(self.elements, rhs.elements) },
        }
    }
}

impl Mul for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm_mul_ps(self.elements, rhs.elements) },
        }
    }
}
