use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use house_price_regression::{
    config::RegressionConfig,
    dataset::{InMemoryDataset, Observation},
    loss::MSELoss,
    model::linear::{LinearParams, LinearRegression},
    optimizer::SGD,
    session::CpuSession,
    storage::MemoryStore,
    trainer::Trainer,
    CpuBackend,
};

type BenchTrainer = Trainer<
    CpuBackend,
    MSELoss,
    SGD<CpuBackend>,
    LinearRegression<CpuBackend>,
    LinearParams<CpuBackend>,
>;

/// Normalized single-feature data with a little deterministic noise.
fn synthetic(n: usize) -> InMemoryDataset {
    let x: Vec<f64> = (0..n).map(|i| i as f64 / n as f64).collect();
    let y: Vec<f64> = x
        .iter()
        .enumerate()
        .map(|(i, v)| 0.8 * v + 0.01 * ((i * 7919 % 13) as f64 - 6.0))
        .collect();
    InMemoryDataset::new(x, y).expect("non-empty synthetic data")
}

fn observations(n: usize) -> Vec<Observation> {
    (0..n)
        .map(|i| {
            let sqft = 400.0 + (i * 37 % 5000) as f64;
            Observation::new(sqft, 280.0 * sqft + (i * 7919 % 50_000) as f64)
        })
        .collect()
}

fn bench_fit(c: &mut Criterion) {
    let dataset = synthetic(10_000);

    for batch_size in [16, 32, 64, 128].iter() {
        c.bench_with_input(BenchmarkId::new("fit", batch_size), batch_size, |b, &bs| {
            let trainer: BenchTrainer = Trainer::builder(MSELoss, SGD::new(0.1))
                .batch_size(bs)
                .max_epochs(20)
                .seed(1)
                .build();

            b.iter(|| {
                trainer
                    .fit(LinearRegression::<CpuBackend>::new(1), black_box(&dataset))
                    .expect("fit")
            });
        });
    }
}

fn bench_session_predict(c: &mut Criterion) {
    let config = RegressionConfig::default().with_seed(3);
    let mut session = CpuSession::start(observations(20_000), config, MemoryStore::new())
        .expect("session start");
    session.train(|_| {}).expect("train");

    c.bench_function("session_predict", |b| {
        b.iter(|| session.predict(black_box("2080")).expect("predict"))
    });

    c.bench_function("prediction_line_100", |b| {
        b.iter(|| session.prediction_line(black_box(100)).expect("line"))
    });
}

criterion_group!(benches, bench_fit, bench_session_predict);
criterion_main!(benches);
