use criterion::{criterion_group, criterion_main, Criterion};
use tinyrand::{StdRand, Wyrand};
use tinyrand_alloc::Mock;

use swingfit::ability::AbilityVector;
use swingfit::model::outcome_probabilities;
use swingfit::season::{ExpectedSeason, MonteCarloSeason, SeasonSimulator};
use swingfit::stats::{BoxScore, StatsAggregator};

const PLATE_APPEARANCES: u64 = 650;

fn criterion_benchmark(c: &mut Criterion) {
    let distribution = outcome_probabilities(&AbilityVector::new(95.0, 90.0, 85.0), 0.011);

    // sanity check
    let counts = MonteCarloSeason.simulate(&distribution, PLATE_APPEARANCES, &mut StdRand::default());
    assert_eq!(PLATE_APPEARANCES, counts.total());

    c.bench_function("cri_season_mc_wyrand", |b| {
        let mut rand = Wyrand::default();
        b.iter(|| MonteCarloSeason.simulate(&distribution, PLATE_APPEARANCES, &mut rand));
    });

    c.bench_function("cri_season_mc_mock", |b| {
        let mut rand = Mock::default();
        b.iter(|| MonteCarloSeason.simulate(&distribution, PLATE_APPEARANCES, &mut rand));
    });

    c.bench_function("cri_season_expected", |b| {
        let mut rand = Mock::default();
        b.iter(|| ExpectedSeason.simulate(&distribution, PLATE_APPEARANCES, &mut rand));
    });

    c.bench_function("cri_season_box_score", |b| {
        b.iter(|| BoxScore.aggregate(&counts, PLATE_APPEARANCES));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
