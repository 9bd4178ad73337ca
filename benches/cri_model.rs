use criterion::{criterion_group, criterion_main, Criterion};

use swingfit::ability::AbilityVector;
use swingfit::model::{outcome_probabilities, OutcomeModel};

fn criterion_benchmark(c: &mut Criterion) {
    let abilities = AbilityVector::new(120.0, 75.0, 95.0);

    // sanity check
    let distribution = outcome_probabilities(&abilities, 0.009);
    assert!((distribution.probs().iter().sum::<f64>() - 1.0).abs() < 1e-9);

    c.bench_function("cri_model_probabilities", |b| {
        let model = OutcomeModel::default();
        b.iter(|| model.probabilities(&abilities, 0.009));
    });

    c.bench_function("cri_model_clamped_rates", |b| {
        let model = OutcomeModel::default();
        b.iter(|| model.clamped_rates(&abilities));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
