use std::env;
use std::process;

use chrono::Local;
use tracing::{error, info, Level};

use matbench::cli::{parse_args, usage, Args};
use matbench::kernels::{avx, sse};
use matbench::report::{ConsoleReporter, CsvReporter, Tee};
use matbench::sweep::{run_sweep, SweepConfig};
use matbench::Result;

fn main() {
    let mut argv = env::args();
    let program = argv.next().unwrap_or_else(|| "matbench".to_string());

    let args = match parse_args(argv) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {err}");
            eprint!("{}", usage(&program));
            process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(&args) {
        error!(%err, "benchmark aborted");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    println!("Matrix multiplication benchmark");
    println!("Started: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!(
        "SSE3: {}  AVX: {}",
        accel_label(sse::is_accelerated()),
        accel_label(avx::is_accelerated())
    );

    let config = SweepConfig::default();
    let mut console = ConsoleReporter::stdout();

    let samples = match &args.output {
        Some(path) => {
            info!(path = %path.display(), "writing CSV results");
            let csv = CsvReporter::create(path)?;
            run_sweep(&config, &mut Tee(console, csv))?
        }
        None => run_sweep(&config, &mut console)?,
    };

    println!("\nFinished {samples} samples at {}", Local::now().format("%H:%M:%S"));
    Ok(())
}

fn accel_label(accelerated: bool) -> &'static str {
    if accelerated {
        "hardware"
    } else {
        "portable fallback"
    }
}
