// Copyright (C) 2025  The Software Heritage developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};
use dsi_progress_logger::{ProgressLog, ProgressLogger};
use log::info;

use pbfs::graph::{Graph, NodeId};
use pbfs::{bfs, pbfs, UNREACHED};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Algo {
    /// Serial reference BFS
    Bfs,
    /// Bag-based parallel BFS
    Pbfs,
}

#[derive(Parser, Debug)]
#[command(about = "Run serial or bag-based parallel BFS over an edge-list graph. Example usage:  cargo run --release --bin pbfs-bench -- graph.txt --algo pbfs --check", long_about = None)]
struct Args {
    /// Path of a whitespace-separated edge-list file, one "src dst" arc
    /// per line, `#` lines ignored.
    path: PathBuf,

    /// The algorithm to time.
    #[arg(long, value_enum, default_value = "pbfs")]
    algo: Algo,

    /// The source node.
    #[arg(long, default_value_t = 0)]
    source: NodeId,

    /// Number of timed runs.
    #[arg(long, default_value_t = 10)]
    trials: usize,

    /// Compare every run against the serial reference and fail on the
    /// first mismatch.
    #[arg(long)]
    check: bool,

    /// Number of worker threads. Defaults to all cores.
    #[arg(long)]
    threads: Option<usize>,
}

fn load_edge_list(path: &PathBuf) -> Result<Graph> {
    let file = File::open(path).with_context(|| format!("Could not open {}", path.display()))?;

    let mut pl = ProgressLogger::default();
    pl.item_name("arc");
    pl.local_speed(true);
    pl.start("loading edge list ...");

    let mut arcs: Vec<(NodeId, NodeId)> = Vec::new();
    let mut num_nodes = 0;
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Could not read {}", path.display()))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace().map(|field| {
            field
                .parse::<NodeId>()
                .with_context(|| format!("Invalid node id {:?} on line {}", field, line_no + 1))
        });
        let (src, dst) = match (fields.next(), fields.next()) {
            (Some(src), Some(dst)) => (src?, dst?),
            _ => anyhow::bail!("Expected \"src dst\" on line {}", line_no + 1),
        };
        num_nodes = num_nodes.max(src + 1).max(dst + 1);
        arcs.push((src, dst));
        pl.light_update();
    }
    pl.done();

    Ok(Graph::from_edges(num_nodes, &arcs))
}

pub fn main() -> Result<()> {
    let args = Args::parse();

    stderrlog::new()
        .verbosity(2)
        .timestamp(stderrlog::Timestamp::Second)
        .init()
        .with_context(|| "While initializing the stderrlog")?;

    let graph = load_edge_list(&args.path)?;
    info!(
        "loaded {} nodes and {} arcs from {}",
        graph.num_nodes(),
        graph.num_edges(),
        args.path.display()
    );

    let num_threads = args.threads.unwrap_or_else(num_cpus::get);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .with_context(|| "While building the thread pool")?;
    info!("running {:?} on {} threads", args.algo, num_threads);

    let mut distances = vec![0u32; graph.num_nodes()];
    let mut reference = args.check.then(|| vec![0u32; graph.num_nodes()]);

    for trial in 0..args.trials {
        let start = Instant::now();
        match args.algo {
            Algo::Bfs => bfs(&graph, args.source, &mut distances)?,
            Algo::Pbfs => pool.install(|| pbfs(&graph, args.source, &mut distances))?,
        }
        let elapsed = start.elapsed();
        println!(
            "{:?} on {}: {} seconds",
            args.algo,
            args.path.display(),
            elapsed.as_secs_f64()
        );

        if let Some(reference) = &mut reference {
            bfs(&graph, args.source, reference)?;
            for (node, (&got, &expected)) in distances.iter().zip(reference.iter()).enumerate() {
                ensure!(
                    got == expected,
                    "Mismatch on trial {}: distances[{}] = {}, reference = {}",
                    trial,
                    node,
                    got,
                    expected
                );
            }
        }
    }

    let reached = distances.iter().filter(|&&d| d != UNREACHED).count();
    info!(
        "distances computed: {} of {} nodes reached from {}",
        reached,
        graph.num_nodes(),
        args.source
    );

    Ok(())
}
