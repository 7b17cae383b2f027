use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use viewvector_rs::view_pipeline::{Level1Geometry, RasterSource, Result, ViewVectorSet};

/// In-memory view vector raster of `rows` x `cols`.
struct SyntheticSource {
    rows: usize,
    cols: usize,
}

impl RasterSource for SyntheticSource {
    fn header(&self, key: &str) -> Option<String> {
        match key {
            "samples" => Some(self.rows.to_string()),
            "lines" => Some(self.cols.to_string()),
            "bands" => Some("3".to_string()),
            "spatial binning" => Some("1".to_string()),
            _ => None,
        }
    }

    fn read_band(&mut self, band: usize, buffer: &mut [f64]) -> Result<()> {
        for (i, value) in buffer.iter_mut().enumerate() {
            *value = (band * 1000 + i % self.rows) as f64 * 1e-4;
        }
        Ok(())
    }

    fn close(&mut self) {}
}

fn benchmark_reconcile_by_scale(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_by_scale");
    let (rows, cols) = (1600, 1000);
    let raw = ViewVectorSet::from_source(Box::new(SyntheticSource { rows, cols })).unwrap();

    for scale in [1u32, 2, 4, 8] {
        let x_start = 8;
        let target = Level1Geometry::new(rows / scale as usize - x_start, x_start, vec![scale]).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(scale), &target, |b, target| {
            b.iter(|| {
                let mut set = raw.clone();
                set.reconcile(black_box(target)).unwrap();
                set
            });
        });
    }

    group.finish();
}

fn benchmark_angle_rotations(c: &mut Criterion) {
    let mut set = ViewVectorSet::from_source(Box::new(SyntheticSource { rows: 1600, cols: 1000 })).unwrap();
    c.bench_function("apply_angle_rotations", |b| {
        b.iter(|| set.apply_angle_rotations(black_box(1e-6), black_box(0.0), black_box(-1e-6)));
    });
}

criterion_group!(benches, benchmark_reconcile_by_scale, benchmark_angle_rotations);
criterion_main!(benches);
