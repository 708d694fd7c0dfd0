use std::io::{self, Write};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tridiag_jacobi::config::options::{DEFAULT_MAX_ITERS, DEFAULT_N};
use tridiag_jacobi::{Driver, Exec, Executor, SolverOptions, hartley_matrix, matmul};

#[derive(Parser)]
#[command(name = "tjacobi", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Jacobi iteration for the (-1, 2, -1) tridiagonal system.
    Jacobi {
        /// Number of unknowns.
        #[arg(short = 'n', long, default_value_t = DEFAULT_N)]
        n: usize,

        /// Number of iterations.
        #[arg(short = 'm', long, default_value_t = DEFAULT_MAX_ITERS)]
        iterations: usize,

        /// Worker threads. Defaults to one per logical CPU.
        #[arg(short = 'w', long)]
        workers: Option<usize>,

        /// Stop early once the residual norm falls below this value.
        #[arg(long)]
        tol: Option<f64>,

        /// Rounds reported at the start and at the end of the run.
        #[arg(long, default_value_t = 10)]
        window: usize,
    },
    /// Timed dense matrix product C = A*B.
    Mxm {
        /// Matrix order.
        #[arg(short = 'n', long, default_value_t = 500)]
        n: usize,

        /// Worker threads. Defaults to one per logical CPU.
        #[arg(short = 'w', long)]
        workers: Option<usize>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = main_inner(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn main_inner(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Jacobi { n, iterations, workers, tol, window } => {
            let mut opts = SolverOptions::new(n, iterations).with_report_window(window, window);
            opts.workers = workers;
            opts.tol = tol;
            let mut driver = Driver::<f64>::new(opts).context("could not set up the Jacobi run")?;
            driver.run(io::stdout().lock()).context("Jacobi run failed")?;
            Ok(())
        }
        Command::Mxm { n, workers } => run_mxm(n, workers),
    }
}

fn run_mxm(n: usize, workers: Option<usize>) -> anyhow::Result<()> {
    anyhow::ensure!(n > 0, "matrix order must be positive");
    let exec = Executor::new(workers).context("could not build the worker pool")?;
    let mut out = io::stdout().lock();
    writeln!(out)?;
    writeln!(out, "MXM:")?;
    writeln!(out, "  Compute matrix product C = A * B.")?;
    writeln!(out)?;
    writeln!(out, "  The number of processors available = {}", num_cpus::get())?;
    writeln!(out, "  The number of threads available    = {}", exec.workers())?;
    writeln!(out, "  The matrix order N                 = {n}")?;

    let start = Instant::now();
    let a = hartley_matrix(n);
    let c = matmul(&exec, &a, &a).context("matrix product failed")?;
    let elapsed = start.elapsed();

    let k = n.min(100) - 1;
    writeln!(out, "  Elapsed seconds = {}", elapsed.as_secs_f64())?;
    writeln!(out, "  C({},{})  = {}", k + 1, k + 1, c[(k, k)])?;
    writeln!(out)?;
    writeln!(out, "MXM:")?;
    writeln!(out, "  Normal end of execution.")?;
    tracing::info!(
        n,
        workers = exec.workers(),
        elapsed_ms = elapsed.as_millis() as u64,
        "mxm finished"
    );
    Ok(())
}
