// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, Criterion};
use image_rs::{Rgba, RgbaImage};
use std::hint::black_box;
use testimonial_editor::domain::editing::{AdjustmentField, FilterKind};
use testimonial_editor::editor::{EditSession, Exporter};
use testimonial_editor::media::PercentPoint;

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

fn session(width: u32, height: u32) -> EditSession {
    let mut session = EditSession::default();
    session
        .load_decoded(gradient(width, height))
        .expect("load should succeed");
    session
}

fn pipeline_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("raster_pipeline");

    let mut basic = session(800, 600);
    basic
        .apply_quick_adjustment(AdjustmentField::Brightness(115.0))
        .expect("preview");
    basic
        .apply_quick_adjustment(AdjustmentField::Saturation(140.0))
        .expect("preview");
    group.bench_function("basic_800x600", |b| {
        b.iter(|| {
            let job = basic.render_job(false).expect("job");
            black_box(job.run().expect("render"));
        });
    });

    let mut full = session(800, 600);
    for field in [
        AdjustmentField::Contrast(120.0),
        AdjustmentField::Filter(FilterKind::Sepia),
        AdjustmentField::Rotation(15.0),
        AdjustmentField::Zoom(150.0),
    ] {
        full.apply_quick_adjustment(field).expect("preview");
    }
    group.bench_function("full_800x600", |b| {
        b.iter(|| {
            let job = full.render_job(false).expect("job");
            black_box(job.run().expect("render"));
        });
    });

    group.finish();
}

fn export_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    group.sample_size(20);

    let mut session = session(1280, 960);
    session.add_text_overlay(PercentPoint::new(50.0, 80.0), "Best service in town");

    group.bench_function("png_with_text", |b| {
        b.iter(|| {
            let mut exporter = Exporter::new(&mut session);
            black_box(exporter.save_image("image/png", 1.0).expect("export"));
        });
    });
    group.bench_function("jpeg_with_text", |b| {
        b.iter(|| {
            let mut exporter = Exporter::new(&mut session);
            black_box(exporter.save_image("image/jpeg", 0.92).expect("export"));
        });
    });

    group.finish();
}

criterion_group!(benches, pipeline_benchmark, export_benchmark);
criterion_main!(benches);
