use approx::assert_relative_eq;
use cadence_timing_core::{
    CollectingListener, Engine, EngineConfig, EventKind, Rearm, TimerEngine,
};

fn attach(engine: &mut TimerEngine) -> CollectingListener {
    let collector = CollectingListener::new();
    engine.add_listener(Box::new(collector.clone()));
    collector
}

#[test]
fn measures_real_gaps_at_four_hertz() {
    let mut engine = TimerEngine::new(EngineConfig::launched().with_limit(4.0)).unwrap();
    let events = attach(&mut engine);

    engine.pump(1000.0); // baseline fire
    engine.pump(1250.0);
    assert_relative_eq!(engine.rate(), 4.0, epsilon = 1e-9);
    engine.pump(1510.0);
    assert_relative_eq!(engine.rate(), 1000.0 / 260.0, epsilon = 1e-9);
    engine.pump(1750.0);
    assert_relative_eq!(engine.rate(), 1000.0 / 240.0, epsilon = 1e-9);

    assert_eq!(events.count_of(EventKind::Tick), 3);
}

#[test]
fn rearm_delay_tracks_the_limit_regardless_of_launched() {
    let mut engine = TimerEngine::default();
    assert_eq!(engine.pump(1000.0), Rearm::After(1000.0 / 60.0));

    engine.set_limit(10.0).unwrap();
    assert_eq!(engine.pump(1100.0), Rearm::After(100.0));

    engine.set_launched(true);
    assert_eq!(engine.pump(1200.0), Rearm::After(100.0));
}

#[test]
fn rate_converges_to_the_limit_under_exact_cadence() {
    let mut engine = TimerEngine::new(EngineConfig::launched().with_limit(50.0)).unwrap();

    let mut now = 1000.0;
    engine.pump(now);
    for _ in 0..10 {
        now += 20.0;
        engine.pump(now);
    }

    assert_relative_eq!(engine.rate(), 50.0, epsilon = 1e-6);
}

#[test]
fn missed_time_is_lost_not_compensated() {
    let mut engine = TimerEngine::new(EngineConfig::launched().with_limit(10.0)).unwrap();
    let events = attach(&mut engine);

    engine.pump(1000.0);
    // One late fire covering 500 ms of real time still delivers one tick.
    engine.pump(1500.0);

    assert_eq!(events.count_of(EventKind::Tick), 1);
    assert_relative_eq!(engine.rate(), 2.0, epsilon = 1e-9);
}

#[test]
fn paused_fires_keep_the_baseline_fresh() {
    let mut engine = TimerEngine::default();
    let events = attach(&mut engine);

    engine.pump(1000.0);
    engine.pump(1500.0); // not launched: no tick, baseline moves to 1500
    assert_eq!(events.count_of(EventKind::Tick), 0);

    engine.set_launched(true);
    engine.pump(1520.0);

    assert_eq!(events.count_of(EventKind::Tick), 1);
    // Measured against the last fire, not the whole paused span.
    assert_relative_eq!(engine.rate(), 50.0, epsilon = 1e-9);
}
