//! 4-lane (128-bit) kernels.

#[cfg(all(sse, any(target_arch = "x86", target_arch = "x86_64")))]
use crate::simd::sse::f32x4::F32x4;
use crate::simd::Lanes;

use super::{vectorized, Dims};

/// Returns `true` when the SSE kernels run on hardware registers rather than
/// the portable fallback.
pub fn is_accelerated() -> bool {
    #[cfg(all(sse, any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if is_x86_feature_detected!("sse3") {
            return true;
        }
    }
    false
}

/// Cache-line blocked `C += A · B` with 4-wide vector updates of C rows.
pub fn matmul_sse(a: &[f32], b: &[f32], c: &mut [f32], dims: Dims) {
    #[cfg(all(sse, any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if is_accelerated() {
            // SAFETY: the running CPU supports SSE3.
            unsafe { blocked_sse3(a, b, c, dims) };
            return;
        }
    }
    vectorized::blocked::<Lanes<4>>(a, b, c, dims);
}

/// `C = A · B` from a pre-transposed B with 4-wide dot products.
pub fn matmul_sse_transposed(a: &[f32], bt: &[f32], c: &mut [f32], dims: Dims) {
    #[cfg(all(sse, any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if is_accelerated() {
            // SAFETY: the running CPU supports SSE3.
            unsafe { transposed_sse3(a, bt, c, dims) };
            return;
        }
    }
    vectorized::transposed::<Lanes<4>>(a, bt, c, dims);
}

#[cfg(all(sse, any(target_arch = "x86", target_arch = "x86_64")))]
#[target_feature(enable = "sse3")]
unsafe fn blocked_sse3(a: &[f32], b: &[f32], c: &mut [f32], dims: Dims) {
    vectorized::blocked::<F32x4>(a, b, c, dims)
}

#[cfg(all(sse, any(target_arch = "x86", target_arch = "x86_64")))]
#[target_feature(enable = "sse3")]
unsafe fn transposed_sse3(a: &[f32], bt: &[f32], c: &mut [f32], dims: Dims) {
    vectorized::transposed::<F32x4>(a, bt, c, dims)
}
