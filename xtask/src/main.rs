use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Sylva workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the criterion suites and write a markdown report
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,

        /// Also enable the rayon-backed execution model
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
}

const BENCHES: &[&str] = &["partitioned_storage", "traversal", "concurrency_models"];

const BASELINE: &str = "sylva";

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench {
            quick,
            report_only,
            parallel,
        } => {
            if !report_only {
                run_benchmarks(quick, parallel)?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_benchmarks(quick: bool, parallel: bool) -> Result<()> {
    for bench in BENCHES {
        println!("\n>>> Benchmarking {bench}");
        let start = Instant::now();

        let mut cmd = Command::new("cargo");
        cmd.env("CARGO_INCREMENTAL", "0");
        cmd.args(["bench", "-p", "sylva", "--bench", bench]);
        if parallel {
            cmd.args(["--features", "parallel"]);
        }

        // Args for the test runner (Criterion) go after --
        cmd.arg("--").arg("--save-baseline").arg(BASELINE);
        if quick {
            cmd.args(["--measurement-time", "0.1", "--noplot", "--sample-size", "10"]);
        }

        let status = cmd
            .status()
            .with_context(|| format!("failed to run bench {bench}"))?;
        if status.success() {
            println!("Finished {bench} in {:.2?}", start.elapsed());
        } else {
            eprintln!("Warning: bench {bench} failed");
        }
    }

    Ok(())
}

/// Per group, per benchmark id: operations (or elements) per second.
type Results = BTreeMap<String, BTreeMap<String, f64>>;

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");
    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    let mut results = Results::new();
    collect_results(criterion_dir, &mut results);

    let report_path = Path::new("benchmark_results/report.md");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(report_path)
        .with_context(|| format!("cannot create {}", report_path.display()))?;

    writeln!(file, "# Sylva Benchmark Report")?;
    for (group, rows) in &results {
        writeln!(file, "\n## {group}\n")?;
        writeln!(file, "| Benchmark | Throughput (/s) |")?;
        writeln!(file, "|---|---|")?;
        for (id, ops) in rows {
            writeln!(file, "| {id} | {} |", human(*ops))?;
        }
    }

    println!("Report written to {}", report_path.display());
    Ok(())
}

fn human(ops: f64) -> String {
    if ops > 1_000_000.0 {
        format!("{:.2}M", ops / 1_000_000.0)
    } else if ops > 1_000.0 {
        format!("{:.2}K", ops / 1_000.0)
    } else {
        format!("{ops:.0}")
    }
}

fn collect_results(dir: &Path, results: &mut Results) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for path in entries.flatten().map(|entry| entry.path()) {
        if path.is_dir() {
            collect_results(&path, results);
        } else if path.file_name().and_then(|s| s.to_str()) == Some("estimates.json") {
            if let Some((group, id, ops)) = read_estimate(&path) {
                results.entry(group).or_default().insert(id, ops);
            }
        }
    }
}

/// Reads `<group>/<id...>/<baseline>/estimates.json`.
fn read_estimate(path: &Path) -> Option<(String, String, f64)> {
    let baseline_dir = path.parent()?;
    if baseline_dir.file_name()?.to_str()? != BASELINE {
        return None;
    }
    let bench_dir = baseline_dir.parent()?;

    let bench_json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(bench_dir.join("benchmark.json")).ok()?).ok()?;
    let group = bench_json.get("group_id")?.as_str()?.to_owned();
    let id = bench_json
        .get("full_id")
        .and_then(|v| v.as_str())
        .map_or_else(|| group.clone(), |full| full.trim_start_matches(&format!("{group}/")).to_owned());
    let elements = bench_json
        .get("throughput")
        .and_then(|t| t.get("Elements"))
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(1.0);

    let estimates: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).ok()?).ok()?;
    let time_ns = estimates.get("mean")?.get("point_estimate")?.as_f64()?;
    (time_ns > 0.0).then(|| (group, id, elements * 1e9 / time_ns))
}
