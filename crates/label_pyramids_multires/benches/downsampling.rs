use label_pyramids_core::prelude::*;
use label_pyramids_multires::prelude::*;
use label_pyramids_storage::prelude::*;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_labels(size: i32, num_labels: u64) -> Array3<LabelId> {
    let mut rng = StdRng::seed_from_u64(size as u64);
    let extent = Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(size));

    Array3::fill_with(extent, |_| rng.gen_range(0..num_labels))
}

fn half_extent(size: i32) -> Extent3i {
    Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(size / 2))
}

fn winner_takes_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("winner_takes_all");
    for size in BLOCK_SIZES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_with_setup(
                || random_labels(size, 8),
                |labels| {
                    black_box(WinnerTakesAllDownsampler.downsample(&labels, half_extent(size)).unwrap());
                },
            );
        });
    }
    group.finish();
}

fn multiset_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiset_merge");
    for size in BLOCK_SIZES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_with_setup(
                || {
                    let labels = random_labels(size, 8);
                    MultisetDownsampler.downsample(&labels, half_extent(size)).unwrap()
                },
                |multisets: Array3<LabelMultiset>| {
                    black_box(MultisetDownsampler.downsample(&multisets, half_extent(size / 2)).unwrap());
                },
            );
        });
    }
    group.finish();
}

fn build_pyramid(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_pyramid");
    group.sample_size(10);
    for size in [32, 64].iter() {
        let container = MemoryContainer::new();
        let source = container
            .create_dataset(
                "raw",
                DatasetAttributes::labels(Point3i::fill(*size), Point3i::fill(16), BlockCompression::Raw),
            )
            .unwrap();
        write_labels(&source, &random_labels(*size, 64)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                LabelPyramidBuilder::new(&container, "raw", &container, "pyramid")
                    .with_config(PyramidConfig::default().with_overwrite_existing(true))
                    .build_with(&SerialExecutor)
                    .unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, winner_takes_all, multiset_merge, build_pyramid);
criterion_main!(benches);

const BLOCK_SIZES: [i32; 3] = [8, 16, 32];
