use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kd_index::kdtree::KDTree;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstar::{RTree, AABB};

fn generate_points(n: usize) -> Vec<[f64; 2]> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|_| [rng.gen_range(-180.0..180.0), rng.gen_range(-90.0..90.0)])
        .collect()
}

fn construct_kdtree(points: &[[f64; 2]]) -> KDTree<usize> {
    let mut tree = KDTree::new(2).unwrap();
    for (i, p) in points.iter().enumerate() {
        tree.insert(p, i).unwrap();
    }
    tree
}

fn construct_rstar(points: Vec<[f64; 2]>) -> RTree<[f64; 2]> {
    RTree::bulk_load(points)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    for size in [1_000, 100_000] {
        let points = generate_points(size);

        let mut group = c.benchmark_group("construction");
        group.bench_with_input(BenchmarkId::new("kdtree", size), &points, |b, points| {
            b.iter(|| construct_kdtree(points))
        });
        group.bench_with_input(BenchmarkId::new("rstar bulk", size), &points, |b, points| {
            b.iter(|| construct_rstar(points.to_vec()))
        });
        group.finish();

        let kdtree = construct_kdtree(&points);
        let rstar_tree = construct_rstar(points.to_vec());
        let (min, max) = ([-10., -10.], [10., 10.]);
        let center = [1.5, -2.5];

        let mut group = c.benchmark_group("search");
        group.bench_with_input(BenchmarkId::new("kdtree", size), &size, |b, _| {
            b.iter(|| kdtree.query(&min, &max).unwrap().count())
        });
        group.bench_with_input(BenchmarkId::new("rstar", size), &size, |b, _| {
            let aabb = AABB::from_corners(min, max);
            b.iter(|| rstar_tree.locate_in_envelope(&aabb).count())
        });
        group.finish();

        let mut group = c.benchmark_group("nearest");
        group.bench_with_input(BenchmarkId::new("kdtree", size), &size, |b, _| {
            b.iter(|| kdtree.nn_query(&center).unwrap())
        });
        group.finish();

        let mut group = c.benchmark_group("knn 10");
        group.bench_with_input(BenchmarkId::new("kdtree", size), &size, |b, _| {
            b.iter(|| kdtree.knn_query(&center, 10).unwrap().count())
        });
        group.finish();

        let mut group = c.benchmark_group("remove and reinsert");
        group.bench_with_input(BenchmarkId::new("kdtree", size), &points, |b, points| {
            let mut tree = construct_kdtree(points);
            let mut i = 0;
            b.iter(|| {
                let key = &points[i % points.len()];
                let value = tree.remove(key).unwrap().unwrap();
                tree.insert(key, value).unwrap();
                i += 1;
            })
        });
        group.finish();
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
