use cadence_timing_core::{
    CollectingListener, Display, Engine, EngineEvent, EventKind, Surface, TimerEngine,
};

/// Surface fake with a controllable layout box.
struct FakeSurface {
    layout: (u32, u32),
    applied: Option<(u32, u32)>,
}

impl FakeSurface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            layout: (width, height),
            applied: None,
        }
    }
}

impl Surface for FakeSurface {
    fn layout_size(&self) -> (u32, u32) {
        self.layout
    }

    fn set_pixel_size(&mut self, width: u32, height: u32) {
        self.applied = Some((width, height));
    }
}

#[test]
fn construction_sizes_the_surface_and_dispatches_resize_then_tick() {
    let mut engine = TimerEngine::default();
    let events = CollectingListener::new();
    engine.add_listener(Box::new(events.clone()));

    let display = Display::new(FakeSurface::new(300, 150), engine, false);

    assert_eq!(display.surface().applied, Some((300, 150)));
    assert_eq!(
        events.snapshot(),
        vec![
            EngineEvent::Resize {
                width: 300,
                height: 150
            },
            EngineEvent::Tick,
        ]
    );
}

#[test]
fn every_resize_yields_exactly_one_resize_then_one_tick_even_unlaunched() {
    let mut engine = TimerEngine::default();
    let events = CollectingListener::new();
    engine.add_listener(Box::new(events.clone()));
    let mut display = Display::new(FakeSurface::new(300, 150), engine, false);
    events.clear();

    display.surface_mut().layout = (640, 480);
    display.resize();

    assert!(!display.engine().launched());
    assert_eq!(
        events.snapshot(),
        vec![
            EngineEvent::Resize {
                width: 640,
                height: 480
            },
            EngineEvent::Tick,
        ]
    );
    assert_eq!(display.surface().applied, Some((640, 480)));
}

#[test]
fn initial_launched_flag_is_applied_to_the_engine() {
    let display = Display::new(FakeSurface::new(10, 10), TimerEngine::default(), true);
    assert!(display.engine().launched());
}

#[test]
fn synthetic_ticks_do_not_consume_the_start_latch() {
    let mut engine = TimerEngine::default();
    let events = CollectingListener::new();
    engine.add_listener(Box::new(events.clone()));

    let mut display = Display::new(FakeSurface::new(300, 150), engine, true);
    display.resize(); // more synthetic ticks
    events.clear();

    // First real tick from the wrapped engine is still preceded by Start.
    display.pump(1000.0);
    display.pump(1100.0);

    assert_eq!(events.count_of(EventKind::Start), 1);
    let snapshot = events.snapshot();
    assert_eq!(snapshot[0], EngineEvent::Start);
    assert_eq!(snapshot[1], EngineEvent::Tick);
}
