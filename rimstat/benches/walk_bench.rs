// cargo bench -p rimstat
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::{fs, hint::black_box, path::Path};

use rimstat::{Distribution, RawStats, Root, Roots, ScanConfig, cook, size_bucket, walk};

criterion_group!(benches, bench_size_bucket, bench_walk, bench_cook);
criterion_main!(benches);

/// `width` directories per level, `depth` levels, two files per directory.
fn make_tree(base: &Path, width: usize, depth: usize) {
    if depth == 0 {
        return;
    }
    for i in 0..width {
        let dir = base.join(format!("d{i}"));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("small"), vec![1u8; 100 + i]).unwrap();
        fs::write(dir.join("large"), vec![1u8; 8192 * (i + 1)]).unwrap();
        make_tree(&dir, width, depth - 1);
    }
}

fn bench_size_bucket(c: &mut Criterion) {
    let sizes: Vec<u64> = (1..4096u64).map(|i| i * 997).collect();
    c.bench_function("size_bucket_4k", |b| {
        b.iter(|| sizes.iter().map(|&s| size_bucket(black_box(s))).sum::<u32>())
    });
}

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");
    for width in [2usize, 4, 6] {
        let tmp = tempfile::tempdir().unwrap();
        make_tree(tmp.path(), width, 4);
        let roots = Roots::Custom(vec![Root::new(tmp.path(), 0)]);
        let config = ScanConfig::default();

        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, _| {
            b.iter(|| walk(black_box(&roots), &config))
        });
    }
    group.finish();
}

fn bench_cook(c: &mut Criterion) {
    let mut raw = RawStats::new();
    for depth in 0..32u64 {
        raw.dir_depths.add(depth, 1000 - depth * 10);
        raw.file_depths.add(depth, 5000 - depth * 50);
        raw.byte_depths.add(depth, (5000 - depth * 50) * 4096);
    }
    raw.subdir_counts = (0..200u64).map(|k| (k, 1 + 200 - k)).collect::<Distribution<u64>>();
    raw.file_counts = raw.subdir_counts.clone();
    for bucket in 0..40u64 {
        raw.file_sizes.add(bucket, 100 + bucket);
        raw.file_bytes.add(bucket, (100 + bucket) << bucket.min(30));
    }

    c.bench_function("cook", |b| b.iter(|| cook(black_box(raw.clone()))));
}
