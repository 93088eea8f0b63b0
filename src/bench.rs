//! Timing of repeated kernel invocations.

use std::hint::black_box;
use std::time::Instant;

use tracing::{debug, debug_span};

use crate::kernels::{Dims, Kernel};
use crate::matrix::zero;

/// Unrecorded calls made before timing starts.
pub const WARMUP_RUNS: usize = 2;

/// Runs `kernel` [`WARMUP_RUNS`] times, then `iterations` timed times, and
/// returns the summed elapsed nanoseconds of the timed calls.
///
/// C is zeroed before every timed call, outside the timed region. Time comes
/// from [`Instant`], which is monotonic. Slow outliers are kept: a single
/// preempted iteration raises the total and nothing detects it.
///
/// `b` must already be in the orientation the kernel expects.
pub fn measure(
    a: &[f32],
    b: &[f32],
    c: &mut [f32],
    dims: Dims,
    iterations: usize,
    kernel: Kernel,
) -> u128 {
    let _span = debug_span!(
        "measure",
        kernel = kernel.name(),
        m = dims.m,
        n = dims.n,
        p = dims.p,
        iterations
    )
    .entered();

    for _ in 0..WARMUP_RUNS {
        kernel.run(black_box(a), black_box(b), black_box(&mut *c), dims);
    }
    debug!(runs = WARMUP_RUNS, "warmup done");

    let mut total_ns: u128 = 0;
    for _ in 0..iterations {
        zero(c, dims.m, dims.p);

        let start = Instant::now();
        kernel.run(black_box(a), black_box(b), black_box(&mut *c), dims);
        total_ns += start.elapsed().as_nanos();
    }

    total_ns
}

/// Per-call average of a [`measure`] total; zero iterations give `0.0`.
pub fn average_ns(total_ns: u128, iterations: usize) -> f64 {
    if iterations == 0 {
        return 0.0;
    }
    total_ns as f64 / iterations as f64
}
