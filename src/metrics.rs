//! Timing and latency accounting for the RESP/RESPB comparison benchmark.
//!
//! Grounded in `examples/original_source/protocol-bench/src/metrics.c`.
//! `Timer` wraps a monotonic clock plus (on Linux) `getrusage` CPU-time
//! sampling, matching the teacher crate's own use of `libc` for
//! Linux-specific resource queries (see `src/aof.rs`'s fsync handling).

use std::time::Instant;

/// Per-command latency samples beyond this count are dropped, and so is
/// their contribution to `total_latency_ns` — the running sum counts only
/// sampled commands, so the average computed from it stays meaningful
/// (SPEC_FULL.md §4.5).
pub const MAX_LATENCY_SAMPLES: usize = 10_000;

#[derive(Debug, Clone, Default)]
pub struct Metrics {
    pub commands_processed: u64,
    pub bytes_processed: u64,
    pub total_time_ns: u64,
    pub cpu_time_us: u64,
    pub peak_memory_kb: u64,
    pub latency_samples: Vec<u64>,
    pub total_latency_ns: u64,
    pub min_latency_ns: u64,
    pub max_latency_ns: u64,
    pub avg_latency_ns: u64,
    pub p50_latency_ns: u64,
    pub p90_latency_ns: u64,
    pub p99_latency_ns: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Metrics {
            min_latency_ns: u64::MAX,
            latency_samples: Vec::with_capacity(MAX_LATENCY_SAMPLES),
            ..Default::default()
        }
    }

    pub fn record_latency(&mut self, latency_ns: u64) {
        if self.latency_samples.len() < MAX_LATENCY_SAMPLES {
            self.latency_samples.push(latency_ns);
            self.total_latency_ns += latency_ns;
        }
        self.min_latency_ns = self.min_latency_ns.min(latency_ns);
        self.max_latency_ns = self.max_latency_ns.max(latency_ns);
    }

    pub fn compute_percentiles(&mut self) {
        if self.latency_samples.is_empty() {
            return;
        }
        self.latency_samples.sort_unstable();
        let n = self.latency_samples.len();
        let p50 = n * 50 / 100;
        let p90 = n * 90 / 100;
        let p99 = n * 99 / 100;
        self.p50_latency_ns = self.latency_samples[p50.min(n - 1)];
        self.p90_latency_ns = self.latency_samples[p90.min(n - 1)];
        self.p99_latency_ns = self.latency_samples[p99.min(n - 1)];
        self.avg_latency_ns = self.total_latency_ns / n as u64;
    }

    pub fn print(&self, protocol_name: &str) {
        println!("\n=== {protocol_name} Benchmark Results ===");
        println!("Commands processed:    {}", self.commands_processed);
        println!("Bytes processed:       {}", self.bytes_processed);
        println!("Total time:            {:.3} ms", self.total_time_ns as f64 / 1_000_000.0);
        println!("CPU time:              {:.3} ms", self.cpu_time_us as f64 / 1_000.0);
        println!("Peak memory:           {} KB", self.peak_memory_kb);

        if self.commands_processed > 0 {
            let throughput = self.commands_processed as f64 / (self.total_time_ns as f64 / 1e9);
            println!("Throughput:            {throughput:.0} commands/sec");
            let bandwidth_mbps = self.bytes_processed as f64 * 8.0 / (self.total_time_ns as f64 / 1e3);
            println!("Bandwidth:             {bandwidth_mbps:.2} Mbps");
        }

        if !self.latency_samples.is_empty() {
            println!("\nLatency (per command):");
            println!("  Average:             {:.3} us", self.avg_latency_ns as f64 / 1000.0);
            println!("  Minimum:             {:.3} us", self.min_latency_ns as f64 / 1000.0);
            println!("  Maximum:             {:.3} us", self.max_latency_ns as f64 / 1000.0);
            println!("  P50 (median):        {:.3} us", self.p50_latency_ns as f64 / 1000.0);
            println!("  P90:                 {:.3} us", self.p90_latency_ns as f64 / 1000.0);
            println!("  P99:                 {:.3} us", self.p99_latency_ns as f64 / 1000.0);
        }
        println!();
    }
}

/// Print a head-to-head comparison of a RESP run against a RESPB run.
pub fn print_comparison(resp: &Metrics, respb: &Metrics) {
    println!("\n=== RESP vs RESPB Comparison ===\n");

    let time_ratio = resp.total_time_ns as f64 / respb.total_time_ns as f64;
    println!("Total Time:");
    println!("  RESP:                {:.3} ms", resp.total_time_ns as f64 / 1e6);
    println!("  RESPB:               {:.3} ms", respb.total_time_ns as f64 / 1e6);
    println!(
        "  RESPB is {:.2}x faster ({:.1}% time savings)\n",
        time_ratio,
        (1.0 - 1.0 / time_ratio) * 100.0
    );

    let cpu_ratio = resp.cpu_time_us as f64 / respb.cpu_time_us.max(1) as f64;
    println!("CPU Time:");
    println!("  RESP:                {:.3} ms", resp.cpu_time_us as f64 / 1000.0);
    println!("  RESPB:               {:.3} ms", respb.cpu_time_us as f64 / 1000.0);
    println!(
        "  RESPB uses {:.2}x less CPU ({:.1}% CPU savings)\n",
        cpu_ratio,
        (1.0 - 1.0 / cpu_ratio) * 100.0
    );

    let size_ratio = resp.bytes_processed as f64 / respb.bytes_processed.max(1) as f64;
    println!("Wire Size:");
    println!("  RESP:                {:.3} MB", resp.bytes_processed as f64 / (1024.0 * 1024.0));
    println!("  RESPB:               {:.3} MB", respb.bytes_processed as f64 / (1024.0 * 1024.0));
    println!(
        "  RESPB is {:.2}x smaller ({:.1}% bandwidth savings)\n",
        size_ratio,
        (1.0 - 1.0 / size_ratio) * 100.0
    );

    let resp_throughput = resp.commands_processed as f64 / (resp.total_time_ns as f64 / 1e9);
    let respb_throughput = respb.commands_processed as f64 / (respb.total_time_ns as f64 / 1e9);
    println!("Throughput:");
    println!("  RESP:                {resp_throughput:.0} cmd/s");
    println!("  RESPB:               {respb_throughput:.0} cmd/s");
    println!("  RESPB is {:.2}x higher throughput\n", respb_throughput / resp_throughput);

    if !resp.latency_samples.is_empty() && !respb.latency_samples.is_empty() {
        let lat_ratio = resp.avg_latency_ns as f64 / respb.avg_latency_ns.max(1) as f64;
        println!("Average Latency:");
        println!("  RESP:                {:.3} us", resp.avg_latency_ns as f64 / 1000.0);
        println!("  RESPB:               {:.3} us", respb.avg_latency_ns as f64 / 1000.0);
        println!("  RESPB is {lat_ratio:.2}x lower latency\n");
    }

    println!("Peak Memory:");
    println!("  RESP:                {} KB", resp.peak_memory_kb);
    println!("  RESPB:               {} KB", respb.peak_memory_kb);
    if respb.peak_memory_kb > 0 {
        println!(
            "  Memory ratio:        {:.2}x",
            resp.peak_memory_kb as f64 / respb.peak_memory_kb as f64
        );
    }
    println!();
}

/// A running wall-clock + CPU-time measurement, started once and stopped
/// once per benchmark run (not per command — per-command latency uses
/// `Instant::now()` pairs directly, see `bench.rs`).
pub struct Timer {
    start: Instant,
    start_cpu_us: u64,
}

impl Timer {
    pub fn start() -> Self {
        Timer {
            start: Instant::now(),
            start_cpu_us: cpu_time_us(),
        }
    }

    pub fn elapsed_ns(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    /// Stop the timer and fill in `metrics`'s time/CPU/memory fields.
    pub fn stop(self, metrics: &mut Metrics) {
        metrics.total_time_ns = self.elapsed_ns();
        metrics.cpu_time_us = cpu_time_us().saturating_sub(self.start_cpu_us);
        metrics.peak_memory_kb = peak_memory_kb();
    }
}

#[cfg(target_os = "linux")]
fn rusage_self() -> libc::rusage {
    use std::mem::MaybeUninit;
    unsafe {
        let mut usage = MaybeUninit::<libc::rusage>::zeroed();
        libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr());
        usage.assume_init()
    }
}

#[cfg(target_os = "linux")]
fn cpu_time_us() -> u64 {
    let usage = rusage_self();
    let utime_us = usage.ru_utime.tv_sec as u64 * 1_000_000 + usage.ru_utime.tv_usec as u64;
    let stime_us = usage.ru_stime.tv_sec as u64 * 1_000_000 + usage.ru_stime.tv_usec as u64;
    utime_us + stime_us
}

#[cfg(target_os = "linux")]
fn peak_memory_kb() -> u64 {
    rusage_self().ru_maxrss as u64
}

#[cfg(not(target_os = "linux"))]
fn cpu_time_us() -> u64 {
    0
}

#[cfg(not(target_os = "linux"))]
fn peak_memory_kb() -> u64 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentiles_of_a_simple_distribution() {
        let mut m = Metrics::new();
        for ns in [10, 20, 30, 40, 50, 60, 70, 80, 90, 100] {
            m.record_latency(ns);
        }
        m.compute_percentiles();
        assert_eq!(m.min_latency_ns, 10);
        assert_eq!(m.max_latency_ns, 100);
        assert_eq!(m.avg_latency_ns, 55);
        assert_eq!(m.p50_latency_ns, 60);
    }

    #[test]
    fn total_latency_stops_accumulating_past_the_sample_cap() {
        let mut m = Metrics::new();
        for _ in 0..(MAX_LATENCY_SAMPLES + 50) {
            m.record_latency(1);
        }
        assert_eq!(m.latency_samples.len(), MAX_LATENCY_SAMPLES);
        assert_eq!(m.total_latency_ns, MAX_LATENCY_SAMPLES as u64);
    }

    #[test]
    fn min_and_max_still_track_samples_past_the_cap() {
        let mut m = Metrics::new();
        for _ in 0..MAX_LATENCY_SAMPLES {
            m.record_latency(5);
        }
        m.record_latency(999);
        assert_eq!(m.max_latency_ns, 999);
    }
}
