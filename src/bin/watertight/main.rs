//! Watertight CLI - mesh repair command-line tool.
//!
//! Usage: watertight <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `watertight --help` for available commands.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};

use watertight::algo::manifold::{Manifold, ManifoldOptions, DEFAULT_DEPTH};
use watertight::algo::Progress;
use watertight::io;

#[derive(Parser)]
#[command(name = "watertight")]
#[command(author, version, about = "Watertight manifold mesh repair", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information and topology
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Rebuild a mesh as a closed 2-manifold
    Process {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Octree depth (leaf size is the bounding cube over 2^depth)
        #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
        depth: u32,

        /// Log pipeline stages and show a progress bar
        #[arg(short, long)]
        verbose: bool,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,

        /// Skip cells with pinched topology instead of filling around them
        #[arg(long)]
        no_regularize: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Process { verbose: true, .. });
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Process {
            input,
            output,
            depth,
            verbose,
            sequential,
            no_regularize,
        } => {
            let options = ManifoldOptions::default()
                .with_depth(depth)
                .with_verbose(verbose)
                .with_parallel(!sequential)
                .with_regularize(!no_regularize);
            cmd_process(&input, &output, options)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0)); // Track highest percent seen (monotonic)

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Only ever move forward
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (raw_percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {:<20}", bar, space, raw_percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());

    let mut total_area = 0.0;
    let mut min_area = f64::MAX;
    let mut max_area = 0.0_f64;

    for f in 0..mesh.num_faces() {
        let area = mesh.face_area(f);
        total_area += area;
        min_area = min_area.min(area);
        max_area = max_area.max(area);
    }

    println!("Surface area: {:.6}", total_area);
    if mesh.num_faces() > 0 {
        println!("Face area range: [{:.6}, {:.6}]", min_area, max_area);
    }

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    print!("{}", mesh.topology());

    Ok(())
}

fn cmd_process(
    input: &PathBuf,
    output: &PathBuf,
    options: ManifoldOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;

    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    let mode = if options.parallel { "parallel" } else { "sequential" };
    println!("Rebuilding at depth {} ({})...", options.depth, mode);

    let verbose = options.verbose;
    let manifold = Manifold::new(options);

    let start = Instant::now();
    let result = if verbose {
        manifold.process_with_progress(&mesh, &create_progress())?
    } else {
        manifold.process(&mesh)?
    };
    let elapsed = start.elapsed();

    print!("{}", result.report);
    println!(
        "Result: {} vertices, {} faces",
        result.mesh.num_vertices(),
        result.mesh.num_faces()
    );
    if !result.report.is_complete() {
        eprintln!(
            "Warning: {} cells could not be resolved, the output has holes",
            result.report.skipped_cells.len()
        );
    }

    io::save(&result.mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}
