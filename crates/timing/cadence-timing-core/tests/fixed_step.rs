use approx::assert_relative_eq;
use cadence_timing_core::{
    CollectingListener, Engine, EngineConfig, EventKind, FixedStepEngine, Rearm,
};

fn ten_hz_launched() -> (FixedStepEngine, CollectingListener) {
    let mut engine = FixedStepEngine::new(EngineConfig::launched().with_limit(10.0)).unwrap();
    let collector = CollectingListener::new();
    engine.add_listener(Box::new(collector.clone()));
    (engine, collector)
}

#[test]
fn whole_steps_are_drained_and_the_remainder_carries() {
    let (mut engine, events) = ten_hz_launched();

    engine.pump(1000.0); // baseline
    engine.pump(1250.0); // 250 ms elapsed at 100 ms steps

    assert_eq!(events.count_of(EventKind::Tick), 2);
    assert_eq!(engine.last_tick_ms(), 1200.0); // 50 ms carried over
    assert_relative_eq!(engine.rate(), 8.0, epsilon = 1e-9);

    // The carried 50 ms joins the next interval.
    engine.pump(1300.0); // 100 ms since step boundary
    assert_eq!(events.count_of(EventKind::Tick), 3);
    assert_eq!(engine.last_tick_ms(), 1300.0);
}

#[test]
fn catch_up_burst_delivers_floor_of_elapsed_over_step() {
    let (mut engine, events) = ten_hz_launched();

    engine.pump(1000.0);
    engine.pump(2000.0); // 1000 ms backlog

    assert_eq!(events.count_of(EventKind::Tick), 10);
    assert_relative_eq!(engine.rate(), 10.0, epsilon = 1e-9);
}

#[test]
fn no_drift_accumulates_over_irregular_pumps() {
    let (mut engine, events) = ten_hz_launched();
    let step = 100.0;

    let mut now = 1000.0;
    engine.pump(now);
    // Gaps deliberately never aligned with the step size.
    for gap in [37.0, 91.0, 143.0, 66.0, 212.0, 49.0, 158.0, 95.0, 121.0, 78.0] {
        now += gap;
        engine.pump(now);
    }

    let elapsed = now - 1000.0;
    let ticks = events.count_of(EventKind::Tick) as f64;
    // Cumulative dispatched ticks x step matches cumulative real time to
    // within one step: the remainder is carried, never discarded.
    assert!(elapsed - ticks * step < step);
    assert_relative_eq!(engine.last_tick_ms(), 1000.0 + ticks * step, epsilon = 1e-9);
}

#[test]
fn inactive_engine_consumes_time_without_events() {
    let (mut engine, events) = ten_hz_launched();

    engine.pump(1000.0);
    engine.set_active(false);
    engine.pump(1500.0); // 5 steps pass silently

    assert_eq!(events.count_of(EventKind::Tick), 0);
    assert_eq!(engine.last_tick_ms(), 1500.0);
    // Rate still reflects the consumed steps.
    assert_relative_eq!(engine.rate(), 10.0, epsilon = 1e-9);

    // No backlog replay after refocus: only newly elapsed steps fire.
    engine.set_active(true);
    engine.pump(1600.0);
    assert_eq!(events.count_of(EventKind::Tick), 1);
}

#[test]
fn unlaunched_engine_also_drops_steps() {
    let mut engine = FixedStepEngine::new(EngineConfig::default().with_limit(10.0)).unwrap();
    let events = CollectingListener::new();
    engine.add_listener(Box::new(events.clone()));

    engine.pump(1000.0);
    engine.pump(1400.0);

    assert_eq!(events.count(), 0);
    assert_eq!(engine.last_tick_ms(), 1400.0);
}

#[test]
fn sub_step_elapsed_time_changes_nothing() {
    let (mut engine, events) = ten_hz_launched();

    engine.pump(1000.0);
    engine.pump(1099.0); // under one 100 ms step

    assert_eq!(events.count(), 0);
    assert_eq!(engine.last_tick_ms(), 1000.0);
    assert_eq!(engine.rate(), 0.0);
}

#[test]
fn rearms_immediately() {
    let (mut engine, _events) = ten_hz_launched();
    assert_eq!(engine.pump(1000.0), Rearm::After(0.0));
    assert_eq!(engine.pump(1250.0), Rearm::After(0.0));
}
