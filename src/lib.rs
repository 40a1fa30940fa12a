//! `respb`: a binary command protocol codec for Redis/Valkey-compatible
//! services, plus a comparative benchmark harness against classical RESP.
//!
//! - [`respb`] implements the RESPB wire format: the opcode catalogue, the
//!   zero-copy parser, and the symmetric serializer.
//! - [`resp_ref`] implements a reference incremental RESP multi-bulk
//!   decoder, the baseline RESPB is benchmarked against.
//! - [`workload`] generates or loads the byte streams both parsers run
//!   against.
//! - [`metrics`] times a run and reports throughput, CPU time, and
//!   per-command latency percentiles.
//! - [`bench`] orchestrates a side-by-side RESP-vs-RESPB comparison.

pub mod bench;
pub mod metrics;
pub mod resp_ref;
pub mod respb;
pub mod workload;
