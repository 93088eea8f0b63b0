//! SSE implementations for 128-bit vector operations.
//!
//! Loads, stores and arithmetic use SSE/SSE2, which every x86_64 CPU has; the
//! horizontal reduction uses the SSE3 `haddps` instruction. Kernels built on
//! [`f32x4::F32x4`] run inside `#[target_feature(enable = "sse3")]` functions
//! after `is_x86_feature_detected!("sse3")` succeeds.

pub mod f32x4;
