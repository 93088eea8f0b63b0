//! AVX 8-lane f32 SIMD vector implementation.
//!
//! This module provides `F32x8`, a SIMD vector type that wraps the AVX `__m256`
//! register to perform vectorized operations on 8 single-precision values.
//!
//! # Supported Operations
//!
//! - `load()` / `store()` on slices, choosing aligned or unaligned instructions
//!   from the pointer's alignment
//! - Element-wise addition (`+`) and multiplication (`*`)
//! - `horizontal_sum()`: two `vhaddps` steps, then the low and high 128-bit
//!   halves are added

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, Mul};

use crate::simd::SimdVector;

/// AVX memory alignment requirement in bytes.
///
/// `_mm256_load_ps` and `_mm256_store_ps` fault on addresses that are not
/// 32-byte aligned.
pub(crate) const AVX_ALIGNMENT: usize = 32;

/// Number of f32 elements that fit in an AVX 256-bit vector.
pub(crate) const LANE_COUNT: usize = 8;

/// AVX SIMD vector containing 8 packed f32 values.
///
/// # Memory Alignment
///
/// Matrix rows start on 64-byte boundaries only when the column count is a
/// multiple of 16, so most loads inside a tile are unaligned; `load` checks
/// the pointer and uses the aligned instruction when it can.
#[derive(Copy, Clone, Debug)]
pub struct F32x8 {
    /// AVX 256-bit vector register containing 8 packed f32 values
    pub elements: __m256,
}

impl F32x8 {
    /// Checks if a pointer is properly aligned for AVX operations.
    #[inline(always)]
    pub fn is_aligned(ptr: *const f32) -> bool {
        let ptr = ptr as usize;

        ptr % AVX_ALIGNMENT == 0
    }

    /// Loads 8 elements from 32-byte aligned memory.
    ///
    /// # Safety
    ///
    /// Pointer must be 32-byte aligned and point to at least 8 valid f32 values.
    #[inline(always)]
    pub unsafe fn load_aligned(ptr: *const f32) -> Self {
        Self {
            elements: _mm256_load_ps(ptr),
        }
    }

    /// Loads 8 elements from unaligned memory.
    ///
    /// # Safety
    ///
    /// Pointer must point to at least 8 valid f32 values.
    #[inline(always)]
    pub unsafe fn load_unaligned(ptr: *const f32) -> Self {
        Self {
            elements: _mm256_loadu_ps(ptr),
        }
    }

    /// Stores 8 elements to 32-byte aligned memory.
    ///
    /// # Safety
    ///
    /// Pointer must be 32-byte aligned and point to at least 8 valid f32
    /// memory locations.
    #[inline(always)]
    pub unsafe fn store_aligned_at(&self, ptr: *mut f32) {
        _mm256_store_ps(ptr, self.elements)
    }

    /// Stores 8 elements to unaligned memory.
    ///
    /// # Safety
    ///
    /// Pointer must point to at least 8 valid f32 memory locations.
    #[inline(always)]
    pub unsafe fn store_unaligned_at(&self, ptr: *mut f32) {
        _mm256_storeu_ps(ptr, self.elements)
    }
}

impl SimdVector for F32x8 {
    const LANES: usize = LANE_COUNT;

    #[inline(always)]
    fn zero() -> Self {
        Self {
            elements: unsafe { _mm256_setzero_ps() },
        }
    }

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self {
            elements: unsafe { _mm256_set1_ps(value) },
        }
    }

    #[inline(always)]
    fn load(src: &[f32]) -> Self {
        assert!(src.len() >= LANE_COUNT, "load needs {LANE_COUNT} elements");

        let ptr = src.as_ptr();
        match F32x8::is_aligned(ptr) {
            true => unsafe { Self::load_aligned(ptr) },
            false => unsafe { Self::load_unaligned(ptr) },
        }
    }

    #[inline(always)]
    fn store(self, dst: &mut [f32]) {
        assert!(dst.len() >= LANE_COUNT, "store needs {LANE_COUNT} elements");

        let ptr = dst.as_mut_ptr();
        match F32x8::is_aligned(ptr) {
            true => unsafe { self.store_aligned_at(ptr) },
            false => unsafe { self.store_unaligned_at(ptr) },
        }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f32 {
        unsafe {
            // hadd works within each 128-bit half.
            let pairs = _mm256_hadd_ps(self.elements, self.elements);
            let quads = _mm256_hadd_ps(pairs, pairs);
            let low = _mm256_castps256_ps128(quads);
            let high = _mm256_extractf128_ps(quads, 1);
            _mm_cvtss_f32(_mm_add_ss(low, high))
        }
    }
}

impl Add for F32x8 {
    type Output = Self;

    /// Performs element-wise addition using `_mm256_add_ps`.
    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_add_ps(self.elements, rhs.elements) },
        }
    }
}

impl Mul for F32x8 {
    type Output = Self;

    /// Performs element-wise multiplication using `_mm256_mul_ps`.
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_mul_ps(self.elements, rhs.elements) },
        }
    }
}
