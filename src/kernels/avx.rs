//! 8-lane (256-bit) kernels.

#[cfg(all(avx, any(target_arch = "x86", target_arch = "x86_64")))]
use crate::simd::avx::f32x8::F32x8;
use crate::simd::Lanes;

use super::{vectorized, Dims};

/// Returns `true` when the AVX kernels run on hardware registers rather than
/// the portable fallback.
pub fn is_accelerated() -> bool {
    #[cfg(all(avx, any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if is_x86_feature_detected!("avx") {
            return true;
        }
    }
    false
}

/// Cache-line blocked `C += A · B` with 8-wide vector updates of C rows.
pub fn matmul_avx(a: &[f32], b: &[f32], c: &mut [f32], dims: Dims) {
    #[cfg(all(avx, any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if is_accelerated() {
            // SAFETY: the running CPU supports AVX.
            unsafe { blocked_avx(a, b, c, dims) };
            return;
        }
    }
    vectorized::blocked::<Lanes<8>>(a, b, c, dims);
}

/// `C = A · B` from a pre-transposed B with 8-wide dot products.
pub fn matmul_avx_transposed(a: &[f32], bt: &[f32], c: &mut [f32], dims: Dims) {
    #[cfg(all(avx, any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if is_accelerated() {
            // SAFETY: the running CPU supports AVX.
            unsafe { transposed_avx(a, bt, c, dims) };
            return;
        }
    }
    vectorized::transposed::<Lanes<8>>(a, bt, c, dims);
}

#[cfg(all(avx, any(target_arch = "x86", target_arch = "x86_64")))]
#[target_feature(enable = "avx")]
unsafe fn blocked_avx(a: &[f32], b: &[f32], c: &mut [f32], dims: Dims) {
    vectorized::blocked::<F32x8>(a, b, c, dims)
}

#[cfg(all(avx, any(target_arch = "x86", target_arch = "x86_64")))]
#[target_feature(enable = "avx")]
unsafe fn transposed_avx(a: &[f32], bt: &[f32], c: &mut [f32], dims: Dims) {
    vectorized::transposed::<F32x8>(a, bt, c, dims)
}
