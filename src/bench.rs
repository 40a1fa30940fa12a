//! Orchestrates a RESP-vs-RESPB comparison run: load or generate a
//! workload for each protocol, parse it in a tight loop, and report.
//!
//! Grounded in `examples/original_source/protocol-bench/src/benchmark.c`.

use crate::metrics::{Metrics, Timer};
use crate::resp_ref::{ClientState, RespOutcome};
use crate::respb;
use crate::workload::{Workload, WorkloadKind};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Resp,
    Respb,
    Both,
}

impl Protocol {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "resp" => Some(Protocol::Resp),
            "respb" => Some(Protocol::Respb),
            "both" => Some(Protocol::Both),
            _ => None,
        }
    }

    fn bench_resp(self) -> bool {
        matches!(self, Protocol::Resp | Protocol::Both)
    }

    fn bench_respb(self) -> bool {
        matches!(self, Protocol::Respb | Protocol::Both)
    }
}

pub struct BenchmarkConfig {
    pub resp_workload_file: Option<PathBuf>,
    pub respb_workload_file: Option<PathBuf>,
    pub iterations: u32,
    pub sample_latency: bool,
    pub workload_kind: Option<WorkloadKind>,
    pub protocol: Protocol,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            resp_workload_file: None,
            respb_workload_file: None,
            iterations: 10,
            sample_latency: false,
            workload_kind: None,
            protocol: Protocol::Both,
        }
    }
}

pub struct BenchmarkOutcome {
    pub resp: Option<Metrics>,
    pub respb: Option<Metrics>,
}

/// Replay `workload` through the reference RESP parser for `iterations`
/// full passes, recording throughput and (optionally) per-command latency.
fn benchmark_resp_parsing(workload: &Workload, iterations: u32, sample_latency: bool) -> Metrics {
    let mut metrics = Metrics::new();
    let timer = Timer::start();

    for _ in 0..iterations {
        let mut client = ClientState::new();
        client.feed(&workload.data);

        loop {
            let cmd_start = sample_latency.then(Instant::now);

            match client.parse_command() {
                Ok(RespOutcome::Complete(_argv)) => {
                    if let Some(t0) = cmd_start {
                        metrics.record_latency(t0.elapsed().as_nanos() as u64);
                    }
                    metrics.commands_processed += 1;
                    metrics.bytes_processed += client.net_input_bytes_curr_cmd as u64;
                }
                Ok(RespOutcome::Incomplete) => break,
                Err(e) => {
                    log::error!("RESP parse error: {e}");
                    break;
                }
            }
        }
    }

    timer.stop(&mut metrics);
    metrics.compute_percentiles();
    metrics
}

/// Replay `workload` through the RESPB parser for `iterations` full passes.
fn benchmark_respb_parsing(workload: &Workload, iterations: u32, sample_latency: bool) -> Metrics {
    let mut metrics = Metrics::new();
    let timer = Timer::start();

    for _ in 0..iterations {
        let mut pos = 0usize;
        while pos < workload.data.len() {
            let cmd_start = sample_latency.then(Instant::now);
            let result = respb::parse_command(&workload.data[pos..]);

            match result {
                Ok(respb::ParseOutcome::Complete(_cmd, consumed)) => {
                    if let Some(t0) = cmd_start {
                        metrics.record_latency(t0.elapsed().as_nanos() as u64);
                    }
                    metrics.commands_processed += 1;
                    metrics.bytes_processed += consumed as u64;
                    pos += consumed;
                }
                Ok(respb::ParseOutcome::Incomplete) => break,
                Err(e) => {
                    log::error!("RESPB parse error at position {pos}: {e}");
                    break;
                }
            }
        }
    }

    timer.stop(&mut metrics);
    metrics.compute_percentiles();
    metrics
}

pub fn run_benchmark(config: &BenchmarkConfig) -> anyhow::Result<BenchmarkOutcome> {
    println!("\n=== Protocol Benchmark Suite ===");
    println!("Configuration:");
    println!("  Iterations:          {}", config.iterations);
    println!("  Sample latency:      {}", if config.sample_latency { "Yes" } else { "No" });
    println!(
        "  Workload type:       {}",
        match (config.workload_kind, &config.resp_workload_file) {
            (_, Some(_)) => "File",
            (Some(k), None) => k.name(),
            (None, None) => "Mixed",
        }
    );
    println!();

    let (resp_workload, respb_workload) = load_or_generate(config)?;

    let mut outcome = BenchmarkOutcome { resp: None, respb: None };

    if let Some(wl) = &resp_workload {
        if config.protocol.bench_resp() {
            println!("Running RESP benchmark...");
            let m = benchmark_resp_parsing(wl, config.iterations, config.sample_latency);
            m.print("RESP");
            outcome.resp = Some(m);
        }
    }

    if let Some(wl) = &respb_workload {
        if config.protocol.bench_respb() {
            println!("Running RESPB benchmark...");
            let m = benchmark_respb_parsing(wl, config.iterations, config.sample_latency);
            m.print("RESPB");
            outcome.respb = Some(m);
        }
    }

    if let (Some(resp), Some(respb)) = (&outcome.resp, &outcome.respb) {
        crate::metrics::print_comparison(resp, respb);
    }

    Ok(outcome)
}

fn load_or_generate(config: &BenchmarkConfig) -> anyhow::Result<(Option<Workload>, Option<Workload>)> {
    if config.resp_workload_file.is_some() || config.respb_workload_file.is_some() {
        let resp = config
            .resp_workload_file
            .as_deref()
            .map(Workload::load)
            .transpose()?;
        let respb = config
            .respb_workload_file
            .as_deref()
            .map(Workload::load)
            .transpose()?;
        return Ok((resp, respb));
    }

    let kind = config.workload_kind.unwrap_or(WorkloadKind::Mixed);
    let target = crate::workload::default_synthetic_target();
    let resp = Workload::generate_resp(kind, target);
    let respb = Workload::generate_respb(kind, target);
    Ok((Some(resp), Some(respb)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_mixed_benchmark_runs_both_protocols() {
        let config = BenchmarkConfig {
            iterations: 1,
            workload_kind: Some(WorkloadKind::Mixed),
            ..Default::default()
        };
        let outcome = run_benchmark(&config).unwrap();
        let resp = outcome.resp.unwrap();
        let respb = outcome.respb.unwrap();
        assert!(resp.commands_processed > 0);
        assert!(respb.commands_processed > 0);
    }
}
