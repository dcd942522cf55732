//! Pipeline benchmarks using Criterion.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Point2;
use std::sync::Arc;

use sightline::{CameraSpec, ObservationSet, Sighting, TargetSpec};

/// Create synthetic rectangular detections spread across the frame.
fn create_test_detections(n: usize) -> Vec<Sighting> {
    (0..n)
        .map(|i| {
            let x = 10.0 + (i as f64 * 293.0) % 300.0;
            let y = 10.0 + (i as f64 * 157.0) % 220.0;
            Sighting::from_contour(vec![
                Point2::new(x, y),
                Point2::new(x + 12.0, y),
                Point2::new(x + 12.0, y + 6.0),
                Point2::new(x, y + 6.0),
            ])
            .expect("valid contour")
        })
        .collect()
}

fn bench_camera() -> CameraSpec {
    let mut camera = CameraSpec::new(54f64.to_radians(), 41f64.to_radians(), 320.0, 240.0);
    camera.vertical_offset = 24.0;
    camera.horizontal_offset = 6.0;
    camera.tilt_angle = 0.2;
    camera
}

fn benchmark_update_10_sightings(c: &mut Criterion) {
    let set = ObservationSet::new(bench_camera(), Arc::new(TargetSpec::new("bench", 80.0, 2.0)));
    let detections = create_test_detections(10);

    c.bench_function("observation_update_10_sightings", |b| {
        b.iter(|| {
            set.update(black_box(detections.clone()));
        })
    });
}

fn benchmark_update_50_sightings(c: &mut Criterion) {
    let set = ObservationSet::new(bench_camera(), Arc::new(TargetSpec::new("bench", 80.0, 2.0)));
    let detections = create_test_detections(50);

    c.bench_function("observation_update_50_sightings", |b| {
        b.iter(|| {
            set.update(black_box(detections.clone()));
        })
    });
}

fn benchmark_update_with_merging_pre_filter(c: &mut Criterion) {
    let mut target = TargetSpec::new("bench-merge", 80.0, 2.0);
    target.set_pre_filter(|sightings| {
        let mut groups: Vec<Sighting> = Vec::new();
        for s in sightings {
            match groups.iter_mut().find(|g| g.pixel_distance_to(&s) < 25.0) {
                Some(group) => group.merge(s),
                None => groups.push(s),
            }
        }
        groups
    });
    let set = ObservationSet::new(bench_camera(), Arc::new(target));
    let detections = create_test_detections(20);

    c.bench_function("observation_update_20_sightings_with_merge", |b| {
        b.iter(|| {
            set.update(black_box(detections.clone()));
        })
    });
}

fn benchmark_pixel_distance(c: &mut Criterion) {
    let detections = create_test_detections(2);
    let (a, b_sighting) = (&detections[0], &detections[1]);

    c.bench_function("pixel_distance_between_quads", |bench| {
        bench.iter(|| black_box(a).pixel_distance_to(black_box(b_sighting)))
    });
}

criterion_group!(
    benches,
    benchmark_update_10_sightings,
    benchmark_update_50_sightings,
    benchmark_update_with_merging_pre_filter,
    benchmark_pixel_distance
);
criterion_main!(benches);
