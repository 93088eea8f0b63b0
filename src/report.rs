//! Destinations for benchmark samples.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::Result;

/// Header line of the CSV stream.
pub const CSV_HEADER: &str = "implementation,matrix_size,duration_ns";

const NS_PER_MS: f64 = 1_000_000.0;

/// One measured (kernel, size) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub implementation: &'static str,
    pub size: usize,
    pub average_ns: f64,
}

/// Receives samples as the sweep produces them.
pub trait Reporter {
    /// Called before the first size of each kernel.
    fn begin_kernel(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn report(&mut self, sample: &Sample) -> Result<()>;
}

/// Writes `implementation,matrix_size,duration_ns` lines, flushing after each
/// one so samples already written survive a crash later in the sweep.
pub struct CsvReporter<W: Write> {
    out: W,
}

impl<W: Write> CsvReporter<W> {
    /// Wraps `out` and writes the header line.
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(out, "{CSV_HEADER}")?;
        out.flush()?;
        Ok(CsvReporter { out })
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl CsvReporter<BufWriter<File>> {
    /// Creates (or truncates) `path` and writes the header line.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        CsvReporter::new(BufWriter::new(file))
    }
}

impl<W: Write> Reporter for CsvReporter<W> {
    fn report(&mut self, sample: &Sample) -> Result<()> {
        writeln!(
            self.out,
            "{},{},{:.3}",
            sample.implementation, sample.size, sample.average_ns
        )?;
        self.out.flush()?;
        Ok(())
    }
}

/// Human-readable progress on a writer (stdout by default).
pub struct ConsoleReporter<W: Write = io::Stdout> {
    out: W,
}

impl ConsoleReporter {
    pub fn stdout() -> Self {
        ConsoleReporter { out: io::stdout() }
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        ConsoleReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn begin_kernel(&mut self, name: &str) -> Result<()> {
        writeln!(self.out, "\n{name}")?;
        writeln!(self.out, "{}", "-".repeat(50))?;
        Ok(())
    }

    fn report(&mut self, sample: &Sample) -> Result<()> {
        writeln!(
            self.out,
            "  {:>5}x{:<5} {:>16.1} ns  {:>10.3} ms",
            sample.size,
            sample.size,
            sample.average_ns,
            sample.average_ns / NS_PER_MS
        )?;
        self.out.flush()?;
        Ok(())
    }
}

/// Forwards every call to two reporters, first to `A`.
pub struct Tee<A, B>(pub A, pub B);

impl<A: Reporter, B: Reporter> Reporter for Tee<A, B> {
    fn begin_kernel(&mut self, name: &str) -> Result<()> {
        self.0.begin_kernel(name)?;
        self.1.begin_kernel(name)
    }

    fn report(&mut self, sample: &Sample) -> Result<()> {
        self.0.report(sample)?;
        self.1.report(sample)
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn begin_kernel(&mut self, name: &str) -> Result<()> {
        (**self).begin_kernel(name)
    }

    fn report(&mut self, sample: &Sample) -> Result<()> {
        (**self).report(sample)
    }
}

impl Reporter for Vec<Sample> {
    fn report(&mut self, sample: &Sample) -> Result<()> {
        self.push(sample.clone());
        Ok(())
    }
}
