//! Runs every kernel over a sequence of square matrix sizes.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, info_span};

use crate::bench::{average_ns, measure};
use crate::error::Result;
use crate::kernels::{Dims, Kernel};
use crate::matrix::Matrix;
use crate::report::{Reporter, Sample};

/// Matrix sizes a default sweep visits, in order.
pub const DEFAULT_SIZES: [usize; 9] = [32, 64, 96, 128, 192, 256, 384, 512, 1024];

/// Timed iterations for a `size × size` product.
///
/// Larger products cost more per call, so they get fewer repetitions.
pub fn iterations_for(size: usize) -> usize {
    match size {
        0..=128 => 100,
        129..=256 => 50,
        _ => 25,
    }
}

/// What a sweep runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    pub sizes: Vec<usize>,
    pub kernels: Vec<Kernel>,
    /// Seed for the random operands; `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            sizes: DEFAULT_SIZES.to_vec(),
            kernels: Kernel::ALL.to_vec(),
            seed: None,
        }
    }
}

impl SweepConfig {
    /// Number of samples a complete sweep emits.
    pub fn sample_count(&self) -> usize {
        self.sizes.len() * self.kernels.len()
    }
}

/// Measures one kernel at one size on freshly allocated operands and returns
/// the sample. All four buffers are dropped before returning, on error too.
pub fn run_one(kernel: Kernel, size: usize, rng: &mut StdRng) -> Result<Sample> {
    let dims = Dims::square(size);

    let mut a = Matrix::allocate(dims.m, dims.n)?;
    let mut b = Matrix::allocate(dims.n, dims.p)?;
    let mut bt = Matrix::allocate(dims.p, dims.n)?;
    let mut c = Matrix::allocate(dims.m, dims.p)?;

    a.fill_random(rng);
    b.fill_random(rng);
    b.transpose_into(&mut bt);
    c.zero();

    let rhs = if kernel.expects_transposed() { &bt } else { &b };
    let iterations = iterations_for(size);
    let total_ns = measure(
        a.as_slice(),
        rhs.as_slice(),
        c.as_mut_slice(),
        dims,
        iterations,
        kernel,
    );

    Ok(Sample {
        implementation: kernel.name(),
        size,
        average_ns: average_ns(total_ns, iterations),
    })
}

/// Runs every configured kernel at every configured size, handing each sample
/// to `reporter` as soon as it is measured.
///
/// Returns the number of samples emitted. The first error (allocation or
/// reporting) stops the sweep; samples reported before it stay reported.
pub fn run_sweep<R: Reporter + ?Sized>(config: &SweepConfig, reporter: &mut R) -> Result<usize> {
    let _span = info_span!(
        "sweep",
        kernels = config.kernels.len(),
        sizes = config.sizes.len()
    )
    .entered();

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    info!(samples = config.sample_count(), "starting sweep");

    let mut emitted = 0;
    for &kernel in &config.kernels {
        reporter.begin_kernel(kernel.name())?;

        for &size in &config.sizes {
            let sample = run_one(kernel, size, &mut rng)?;
            debug!(
                kernel = sample.implementation,
                size = sample.size,
                average_ns = sample.average_ns,
                "sample"
            );
            reporter.report(&sample)?;
            emitted += 1;
        }
    }

    info!(samples = emitted, "sweep finished");
    Ok(emitted)
}
