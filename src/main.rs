//! CLI entry point (§10.3): `vrptw-bap solve --instance <path.json> [--customers <k>]
//! [--time-limit-secs <n>] [--verbose]`.
//!
//! Argument shape mirrors `pd-tsp-solver`'s `clap`-derived `Solve` subcommand; the
//! load-or-exit pattern (`eprintln!` the error chain, `std::process::exit(1)`) is the
//! same one `pd_tsp_solver`'s `main.rs` uses around `PDTSPInstance::from_file`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use vrptw_bap::{Instance, VrptwSolver};

#[derive(Parser)]
#[command(name = "vrptw-bap")]
#[command(about = "Branch-and-price solver for the Vehicle Routing Problem with Time Windows")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a VRPTW instance to optimality via branch-and-price.
    Solve {
        /// Path to a JSON instance file.
        #[arg(short, long)]
        instance: PathBuf,

        /// Restrict the instance to its first k customers before solving.
        #[arg(short, long)]
        customers: Option<usize>,

        /// Abort the solve after this many seconds, reporting the best bound found.
        #[arg(short, long)]
        time_limit_secs: Option<usize>,

        /// Print every non-zero route in the best solution found.
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Solve {
            instance,
            customers,
            time_limit_secs,
            verbose,
        } => solve(instance, customers, time_limit_secs, verbose),
    }
}

fn solve(path: PathBuf, customers: Option<usize>, time_limit_secs: Option<usize>, verbose: bool) -> ExitCode {
    let instance = match Instance::load(&path) {
        Ok(instance) => instance,
        Err(err) => {
            eprintln!("error loading instance {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    };

    let instance = match customers {
        Some(k) => match instance.truncate_to_first_k(k) {
            Ok(truncated) => truncated,
            Err(err) => {
                eprintln!("error restricting instance to {k} customers: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => instance,
    };

    let mut solver = VrptwSolver::new();
    if let Some(secs) = time_limit_secs {
        solver = solver.with_time_limit_secs(secs);
    }

    let solution = solver.solve(instance);

    println!("status: {:?}", solution.status);
    match solution.objective {
        Some(obj) => println!("objective: {obj}"),
        None => println!("objective: none found"),
    }

    if verbose {
        for route in &solution.routes {
            let nodes: Vec<String> = route.iter().map(|n| n.to_string()).collect();
            println!("route: {}", nodes.join(" -> "));
        }
    }

    ExitCode::SUCCESS
}
