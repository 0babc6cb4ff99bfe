use candle_core::{Device, Tensor};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use karasu_core::metrics::accuracy;

fn matrix(rows: usize, cols: usize, unlabeled_every: usize) -> (Tensor, Tensor) {
    let mut truth = Vec::with_capacity(rows * cols);
    let mut pred = Vec::with_capacity(rows * cols);
    for i in 0..rows * cols {
        if unlabeled_every > 0 && i % unlabeled_every == 0 {
            truth.push(f32::NAN);
        } else {
            truth.push((i % 7) as f32);
        }
        pred.push((i % 5) as f32);
    }
    let device = Device::Cpu;
    (
        Tensor::from_vec(truth, (rows, cols), &device).unwrap(),
        Tensor::from_vec(pred, (rows, cols), &device).unwrap(),
    )
}

fn bench_accuracy(c: &mut Criterion) {
    let (truth, pred) = matrix(10_000, 1, 0);
    c.bench_function("accuracy_10k_single_column", |b| {
        b.iter(|| accuracy(black_box(&truth), black_box(&pred)).unwrap());
    });

    let (truth, pred) = matrix(10_000, 8, 13);
    c.bench_function("accuracy_10k_multi_column_sparse_labels", |b| {
        b.iter(|| accuracy(black_box(&truth), black_box(&pred)).unwrap());
    });
}

criterion_group!(benches, bench_accuracy);
criterion_main!(benches);
