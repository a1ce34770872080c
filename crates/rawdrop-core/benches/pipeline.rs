//! Benchmarks for the rawdrop conversion pipeline.
//!
//! Run with: cargo bench -p rawdrop-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::DynamicImage;
use rawdrop_core::pipeline::enhance::{AutoContrast, Enhancer};
use rawdrop_core::pipeline::resize::{fit_to_box, resize_to_box};
use rawdrop_core::pipeline::{DirectoryScanner, ScanSnapshot};
use std::fs;
use std::path::PathBuf;

fn benchmark_scan(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    for folder in 0..10 {
        let sub = dir.path().join(format!("roll{folder:02}"));
        fs::create_dir_all(&sub).unwrap();
        for n in 0..100 {
            fs::write(sub.join(format!("DSC{n:04}.NEF")), b"").unwrap();
            fs::write(sub.join(format!("DSC{n:04}.jpg")), b"").unwrap();
        }
    }
    let scanner = DirectoryScanner::new(["nef"]);

    c.bench_function("scan_2000_files", |b| {
        b.iter(|| {
            let _ = scanner.scan(black_box(dir.path()));
        })
    });
}

fn benchmark_snapshot_diff(c: &mut Criterion) {
    let prior: ScanSnapshot = (0..5000)
        .map(|n| PathBuf::from(format!("/photos/DSC{n:05}.NEF")))
        .collect();
    let current: ScanSnapshot = (0..5010)
        .map(|n| PathBuf::from(format!("/photos/DSC{n:05}.NEF")))
        .collect();

    c.bench_function("snapshot_diff_5000", |b| {
        b.iter(|| {
            let _ = black_box(&current).newly_appeared(black_box(&prior));
        })
    });
}

fn benchmark_fit_to_box(c: &mut Criterion) {
    c.bench_function("fit_to_box", |b| {
        b.iter(|| {
            let _ = fit_to_box(black_box(6000), black_box(4000), black_box(1920));
        })
    });
}

fn benchmark_resize(c: &mut Criterion) {
    let img = DynamicImage::new_rgb8(3000, 2000);

    c.bench_function("resize_to_1920_box", |b| {
        b.iter(|| {
            let _ = resize_to_box(black_box(img.clone()), 1920);
        })
    });
}

fn benchmark_enhance(c: &mut Criterion) {
    let img = DynamicImage::new_rgb8(1920, 1280);
    let enhancer = AutoContrast::default();

    c.bench_function("auto_contrast_1920", |b| {
        b.iter(|| {
            let _ = enhancer.enhance(black_box(img.clone()));
        })
    });
}

criterion_group!(
    benches,
    benchmark_scan,
    benchmark_snapshot_diff,
    benchmark_fit_to_box,
    benchmark_resize,
    benchmark_enhance,
);
criterion_main!(benches);
