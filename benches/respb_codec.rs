use criterion::{black_box, criterion_group, criterion_main, Criterion};
use respb::respb::{opcodes, parse_command, serialize_command, Command, ParseOutcome};
use respb::workload::{Workload, WorkloadKind};

fn bench_respb_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("respb");
    let workload = Workload::generate_respb(WorkloadKind::Mixed, 1024 * 1024);

    group.bench_function("parse_mixed_1mb", |b| {
        b.iter(|| {
            let mut pos = 0;
            let mut count = 0u64;
            while pos < workload.data.len() {
                match parse_command(&workload.data[pos..]).unwrap() {
                    ParseOutcome::Complete(_cmd, n) => {
                        pos += n;
                        count += 1;
                    }
                    ParseOutcome::Incomplete => break,
                }
            }
            black_box(count);
        });
    });

    group.bench_function("serialize_set", |b| {
        let key: &[u8] = b"benchmarkkey";
        let value: &[u8] = b"benchmarkvalue";
        let mut buf = [0u8; 256];
        b.iter(|| {
            let mut cmd = Command::new(opcodes::OP_SET, 0);
            cmd.push_arg(key);
            cmd.push_arg(value);
            let n = serialize_command(&mut buf, &cmd).unwrap();
            black_box(n);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_respb_parse);
criterion_main!(benches);
