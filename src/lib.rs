//! Benchmarks dense single-precision matrix multiplication kernels.
//!
//! Eight kernels compute `C = A · B` on row-major `f32` matrices, from a plain
//! triple loop up to cache-line tiling with SSE and AVX vector updates. The
//! [`sweep`] module times each of them over a range of square sizes and hands
//! the samples to a [`Reporter`].
//!
//! ```
//! use matbench::{run_sweep, Kernel, Sample, SweepConfig};
//!
//! let config = SweepConfig {
//!     sizes: vec![16],
//!     kernels: vec![Kernel::Naive, Kernel::AvxTransposed],
//!     seed: Some(7),
//! };
//! let mut samples: Vec<Sample> = Vec::new();
//! assert_eq!(run_sweep(&config, &mut samples).unwrap(), 2);
//! assert_eq!(samples[1].implementation, "avx_transposed");
//! ```

pub mod bench;
pub mod cli;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod report;
pub(crate) mod simd;
pub mod sweep;
pub mod utils;

pub use error::{MatbenchError, Result};
pub use kernels::{Dims, Kernel};
pub use matrix::Matrix;
pub use report::{ConsoleReporter, CsvReporter, Reporter, Sample, Tee};
pub use sweep::{run_sweep, SweepConfig};
