use std::time::Duration;

use approx::assert_relative_eq;
use cadence_timing_core::{
    CollectingListener, Engine, EngineConfig, EventKind, ManualClock, Runner, TimerEngine,
};

#[test]
fn steps_are_deterministic_under_a_manual_clock() {
    let clock = ManualClock::starting_at(1000.0);
    let engine = TimerEngine::new(EngineConfig::launched().with_limit(4.0)).unwrap();
    let mut runner = Runner::with_clock(engine, Box::new(clock.clone()));

    runner.step(); // baseline
    clock.advance(250.0);
    runner.step();

    assert_relative_eq!(runner.engine().rate(), 4.0, epsilon = 1e-9);
}

#[test]
fn stop_handle_ends_the_loop_before_it_starts() {
    let engine = TimerEngine::new(EngineConfig::launched()).unwrap();
    let mut runner = Runner::new(engine);

    runner.stop_handle().stop();
    let started = std::time::Instant::now();
    runner.run_for(Duration::from_secs(5));

    assert!(started.elapsed() < Duration::from_millis(500));
}

#[test]
fn run_for_drives_real_ticks() {
    let mut engine = TimerEngine::new(EngineConfig::launched().with_limit(200.0)).unwrap();
    let events = CollectingListener::new();
    engine.add_listener(Box::new(events.clone()));

    let mut runner = Runner::new(engine);
    runner.run_for(Duration::from_millis(50));

    // Loose bound: host sleep slop makes the exact count unpredictable.
    assert!(events.count_of(EventKind::Tick) >= 1);
}
