//! Tick throughput benchmarks
//!
//! Run with: cargo bench --bench tick

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use terminal_racer::game::obstacle::Obstacle;
use terminal_racer::game::session::GameSession;
use terminal_racer::game::track::Track;
use terminal_racer::input::{Direction, DirectionSlot, InputSource};
use terminal_racer::render::NullRenderer;
use terminal_racer::GameConfig;
use tokio::time::Instant;

/// Input that is always running and never steers
#[derive(Default)]
struct IdleInput {
    slot: DirectionSlot,
}

impl InputSource for IdleInput {
    fn initialize(&self) {}

    fn current_direction(&self) -> Option<Direction> {
        self.slot.load()
    }

    fn clear(&self) {
        self.slot.clear();
    }

    fn is_running(&self) -> bool {
        true
    }

    fn shutdown(&self) {}
}

/// Track of the given height with one obstacle on every other row
fn create_dense_track(height: i32) -> Track {
    let mut track = Track::with_seed(40, height, 7);
    for y in (0..height).step_by(2) {
        track.add_obstacle(Obstacle::standard(2 + (y % 30), y));
    }
    track
}

fn bench_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll");

    for height in [40, 200, 1000] {
        group.throughput(Throughput::Elements(height as u64 / 2));
        group.bench_with_input(BenchmarkId::from_parameter(height), &height, |b, &height| {
            b.iter_batched(
                || create_dense_track(height),
                |mut track| black_box(track.scroll()),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_session_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_tick");

    for height in [40, 400] {
        let config = GameConfig {
            track_height: height,
            game_duration: Duration::from_secs(3600),
            fatal_collisions: false,
            seed: Some(11),
            ..GameConfig::default()
        };

        group.bench_with_input(BenchmarkId::from_parameter(height), &config, |b, config| {
            let mut session = GameSession::new(
                config.clone(),
                Arc::new(IdleInput::default()),
                Box::new(NullRenderer),
            );
            let start = Instant::now();
            session.begin(start);
            let mut now = start;

            b.iter(|| {
                now += config.tick_interval;
                if !session.is_running() {
                    session.begin(now);
                }
                black_box(session.tick(now))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scroll, bench_session_tick);
criterion_main!(benches);
