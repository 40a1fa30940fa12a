use criterion::{black_box, criterion_group, criterion_main, Criterion};
use respb::resp_ref::{ClientState, RespOutcome};
use respb::workload::{Workload, WorkloadKind};

fn bench_resp_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("resp_ref");
    let workload = Workload::generate_resp(WorkloadKind::Mixed, 1024 * 1024);

    group.bench_function("parse_mixed_1mb", |b| {
        b.iter(|| {
            let mut client = ClientState::new();
            client.feed(&workload.data);
            let mut count = 0u64;
            loop {
                match client.parse_command().unwrap() {
                    RespOutcome::Complete(_argv) => count += 1,
                    RespOutcome::Incomplete => break,
                }
            }
            black_box(count);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_resp_parse);
criterion_main!(benches);
