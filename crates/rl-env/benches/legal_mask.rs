//! Benchmark for legal action masks and full environment steps

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use hundredandten_rl_env::{
    legal_action_mask, run_episode, BasicFeatureExtractor, EnvConfig, Environment,
    HundredAndTenEnv, LegalityConfig, RandomAgent,
};

fn bench_legal_mask_initial(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let mut env = HundredAndTenEnv::new(EnvConfig::default(), BasicFeatureExtractor::default());
    env.reset(&mut rng).expect("reset");
    let config = LegalityConfig::default();

    c.bench_function("legal_mask_initial", |b| {
        b.iter(|| black_box(legal_action_mask(black_box(&env.game), env.current_player, &config)))
    });
}

fn bench_random_episode(c: &mut Criterion) {
    let mut env = HundredAndTenEnv::new(EnvConfig::default(), BasicFeatureExtractor::default());
    let mut agents: [RandomAgent; 4] = Default::default();
    let mut seed = 0u64;

    c.bench_function("random_episode", |b| {
        b.iter(|| {
            seed += 1;
            let mut rng = StdRng::seed_from_u64(seed);
            let mut replay = Vec::new();
            let summary =
                run_episode(&mut env, &mut agents, &mut rng, &mut replay).expect("episode");
            black_box(summary)
        })
    });
}

criterion_group!(benches, bench_legal_mask_initial, bench_random_episode);
criterion_main!(benches);
