//! `respb-bench`: head-to-head comparison of RESP and RESPB parsing
//! performance.
//!
//! Grounded in `examples/original_source/protocol-bench/src/main.c`; the
//! flag surface (`-r -b -i -l -w -p -h`) is carried over one-to-one rather
//! than rebuilt on `clap` (SPEC_FULL.md §10.3) — it is small, fixed, and
//! close enough to `getopt` that a parser crate would add a dependency
//! without adding expressiveness.

use anyhow::{bail, Result};
use respb::bench::{BenchmarkConfig, Protocol};
use respb::workload::WorkloadKind;
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn print_usage(prog_name: &str) {
    println!("Usage: {prog_name} [options]");
    println!();
    println!("Options:");
    println!("  -r FILE        RESP workload file");
    println!("  -b FILE        RESPB workload file");
    println!("  -i N           Number of iterations (default: 10)");
    println!("  -l             Sample per-command latency");
    println!("  -w TYPE        Synthetic workload type:");
    println!("                   small   - Small keys (GET)");
    println!("                   medium  - Medium keys/values (SET)");
    println!("                   large   - Large values (SET)");
    println!("                   mixed   - Mixed commands");
    println!("  -p PROTOCOL    Benchmark only this protocol (resp|respb|both)");
    println!("  -h             Show this help");
    println!();
    println!("Examples:");
    println!("  {prog_name} -w mixed -i 100");
    println!("  {prog_name} -r data/workload_resp.bin -b data/workload_respb.bin -i 50 -l");
    println!();
}

/// Parse the flat `-x value` / `-x` flag surface described above. Returns
/// `Ok(None)` when `-h` was given (caller should print usage and exit 0).
fn parse_args(args: &[String]) -> Result<Option<BenchmarkConfig>> {
    let mut config = BenchmarkConfig::default();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if arg == "-h" || arg == "--help" {
            return Ok(None);
        }
        if arg == "-l" {
            config.sample_latency = true;
            i += 1;
            continue;
        }

        let raw = args
            .get(i + 1)
            .map(String::as_str)
            .ok_or_else(|| anyhow::anyhow!("missing argument for {arg}"))?;

        match arg {
            "-r" => config.resp_workload_file = Some(PathBuf::from(raw)),
            "-b" => config.respb_workload_file = Some(PathBuf::from(raw)),
            "-i" => {
                let n: i64 = raw.parse().map_err(|_| anyhow::anyhow!("invalid iterations: {raw}"))?;
                if n <= 0 {
                    bail!("invalid iterations: {raw}");
                }
                config.iterations = n as u32;
            }
            "-w" => {
                config.workload_kind =
                    Some(WorkloadKind::parse(raw).ok_or_else(|| anyhow::anyhow!("invalid workload type: {raw}"))?);
            }
            "-p" => {
                config.protocol =
                    Protocol::parse(raw).ok_or_else(|| anyhow::anyhow!("invalid protocol: {raw}"))?;
            }
            other => bail!("unrecognized argument: {other}"),
        }
        i += 2;
    }
    Ok(Some(config))
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args: Vec<String> = std::env::args().collect();
    let prog_name = args.remove(0);

    let config = match parse_args(&args) {
        Ok(Some(config)) => config,
        Ok(None) => {
            print_usage(&prog_name);
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            print_usage(&prog_name);
            std::process::exit(1);
        }
    };

    if respb::bench::run_benchmark(&config).is_err() {
        eprintln!("\nBenchmark failed!");
        std::process::exit(1);
    }

    println!("\nBenchmark complete!");
    Ok(())
}
