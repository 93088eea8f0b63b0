//! AVX implementations for 256-bit vector operations.
//!
//! Only AVX (not AVX2 or FMA) instructions are used: unaligned/aligned loads and
//! stores, packed add and multiply, and `vhaddps` for reductions. Kernels built
//! on [`f32x8::F32x8`] run inside `#[target_feature(enable = "avx")]` functions
//! after `is_x86_feature_detected!("avx")` succeeds.

pub mod f32x8;
