use criterion::{black_box, criterion_group, criterion_main, Criterion};
use human_amplifier::audio::MockAudio;
use human_amplifier::core::{ButtonReader, ManualClock};
use human_amplifier::engine::{AppConfig, GameManager};
use human_amplifier::input::{ScriptHandle, ScriptedSampler};
use human_amplifier::types::{LedStrip, PixelBuffer};

type Manager = GameManager<ScriptedSampler, MockAudio<ManualClock>, ManualClock>;

fn manager() -> (Manager, ScriptHandle, ManualClock) {
    let config = AppConfig::default();
    let clock = ManualClock::new(0);
    let (sampler, buttons) = ScriptedSampler::new(config.button_count());
    let reader = ButtonReader::new(sampler).unwrap();
    let strips: Vec<Box<dyn LedStrip>> = config
        .strips
        .iter()
        .map(|s| Box::new(PixelBuffer::new(s.pixels)) as Box<dyn LedStrip>)
        .collect();
    // Tracks long enough that no bench run reaches the end of one.
    let audio = MockAudio::new(clock.clone()).with_track_ms(u64::MAX / 4);
    let manager = GameManager::new(&config, reader, strips, audio, clock.clone()).unwrap();
    (manager, buttons, clock)
}

fn step(manager: &mut Manager, clock: &ManualClock) {
    clock.advance(20);
    black_box(manager.step().unwrap());
}

fn bench_idle(c: &mut Criterion) {
    let (mut manager, _buttons, clock) = manager();
    c.bench_function("frame_idle", |b| b.iter(|| step(&mut manager, &clock)));
}

fn bench_amplify(c: &mut Criterion) {
    let (mut manager, buttons, clock) = manager();
    buttons.hold_only(&[0, 2, 4, 6]);
    step(&mut manager, &clock);
    assert_eq!(manager.state_name(), "amplify");
    c.bench_function("frame_amplify", |b| b.iter(|| step(&mut manager, &clock)));
}

fn bench_party(c: &mut Criterion) {
    let (mut manager, buttons, clock) = manager();
    buttons.hold_only(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    step(&mut manager, &clock);
    step(&mut manager, &clock);
    assert_eq!(manager.state_name(), "party");
    c.bench_function("frame_party", |b| b.iter(|| step(&mut manager, &clock)));
}

criterion_group!(benches, bench_idle, bench_amplify, bench_party);
criterion_main!(benches);
