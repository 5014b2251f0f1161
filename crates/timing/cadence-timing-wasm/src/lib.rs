//! wasm-bindgen interface for the cadence timing engines.
//!
//! Hosts the core engines on the browser's scheduling primitives:
//! `Rearm::NextFrame` becomes `requestAnimationFrame`, `Rearm::After(ms)`
//! becomes `setTimeout`, window `focus`/`blur` drive the fixed-step activity
//! gate, and an `HtmlCanvasElement` backs the canvas display.
//!
//! Events crossing into JS are buffered while the engine is borrowed and
//! delivered in order once the borrow is released, so a callback may freely
//! read or mutate the engine that emitted it. Events caused by such a
//! mutation are delivered after the current batch.

use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use cadence_timing_core::{
    Display, Engine, EngineConfig, EngineEvent, EventKind, EventListener, FixedStepEngine,
    FrameEngine, Rearm, Surface, TimerEngine,
};

fn window() -> Result<web_sys::Window, JsError> {
    web_sys::window().ok_or_else(|| JsError::new("no window available"))
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Parse a JS config object; undefined/null means defaults.
fn parse_config(config: JsValue) -> Result<EngineConfig, JsError> {
    if jsvalue_is_undefined_or_null(&config) {
        Ok(EngineConfig::default())
    } else {
        serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsError::new(&format!("config error: {e}")))
    }
}

type EventQueue = Rc<RefCell<Vec<EngineEvent>>>;
type Subscriptions = Rc<RefCell<Vec<(EventKind, Function)>>>;

/// Core-side listener that only records events. JS callbacks are invoked
/// later by [`flush_events`], never while the engine is borrowed.
struct QueueListener {
    queue: EventQueue,
}

impl EventListener for QueueListener {
    fn on_event(&mut self, event: &EngineEvent) {
        self.queue.borrow_mut().push(event.clone());
    }
}

fn subscribe(subs: &Subscriptions, event: &str, callback: Function) -> Result<(), JsError> {
    let kind = EventKind::from_str(event).map_err(|e| JsError::new(&e.to_string()))?;
    subs.borrow_mut().push((kind, callback));
    Ok(())
}

/// Deliver queued events to the subscribed JS callbacks, in queue order.
///
/// Callbacks run with no engine borrow held, so they may call back into the
/// exported surface. Mutations from inside a callback queue further events;
/// the drain loop keeps going until the queue is empty. The subscription list
/// is snapshotted per round so a callback can also add subscriptions.
fn flush_events(queue: &EventQueue, subs: &Subscriptions) {
    loop {
        let drained: Vec<EngineEvent> = queue.borrow_mut().drain(..).collect();
        if drained.is_empty() {
            return;
        }
        let snapshot = subs.borrow().clone();
        for event in &drained {
            let kind = event.kind();
            for (interested, callback) in &snapshot {
                if *interested != kind {
                    continue;
                }
                let payload = serde_wasm_bindgen::to_value(event).unwrap_or(JsValue::UNDEFINED);
                // A throwing callback is a consumer bug; report it on the
                // console instead of unwinding through the engine.
                if let Err(err) = callback.call1(&JsValue::UNDEFINED, &payload) {
                    web_sys::console::error_1(&err);
                }
            }
        }
    }
}

type PumpFn = Box<dyn FnMut(f64) -> Rearm>;
type ClosureSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn arm(win: &web_sys::Window, slot: &ClosureSlot, rearm: Rearm) {
    let borrowed = slot.borrow();
    let closure = match borrowed.as_ref() {
        Some(c) => c,
        None => return,
    };
    let callback: &Function = closure.as_ref().unchecked_ref();
    let scheduled = match rearm {
        Rearm::NextFrame => win.request_animation_frame(callback).map(|_| ()),
        Rearm::After(ms) => win
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback, ms.round() as i32)
            .map(|_| ()),
    };
    if let Err(err) = scheduled {
        web_sys::console::error_1(&err);
    }
}

/// Start a self-rearming callback chain around `pump`.
///
/// The chain holds itself alive through the closure slot and is never
/// cancelled: engines are born scheduled, and only tick delivery is gated.
fn drive(mut pump: PumpFn) -> Result<(), JsError> {
    let win = window()?;
    let slot: ClosureSlot = Rc::new(RefCell::new(None));
    let slot_for_callback = slot.clone();
    let win_for_callback = win.clone();
    *slot.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let rearm = pump(now_ms());
        arm(&win_for_callback, &slot_for_callback, rearm);
    }) as Box<dyn FnMut()>));
    // First callback as soon as possible; the engine decides from there.
    arm(&win, &slot, Rearm::After(0.0));
    Ok(())
}

/// Frame-synced engine riding `requestAnimationFrame`.
#[wasm_bindgen(js_name = FrameEngine)]
pub struct WasmFrameEngine {
    inner: Rc<RefCell<FrameEngine>>,
    queue: EventQueue,
    subs: Subscriptions,
}

#[wasm_bindgen(js_class = FrameEngine)]
impl WasmFrameEngine {
    /// Create the engine and start its callback chain. Pass a config object
    /// (`{ launch?, limit? }`) or undefined/null for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmFrameEngine, JsError> {
        console_error_panic_hook::set_once();
        let cfg = parse_config(config)?;
        let mut engine = FrameEngine::new(cfg).map_err(|e| JsError::new(&e.to_string()))?;

        let queue: EventQueue = Rc::default();
        let subs: Subscriptions = Rc::default();
        engine.add_listener(Box::new(QueueListener {
            queue: queue.clone(),
        }));
        let inner = Rc::new(RefCell::new(engine));

        let pump = {
            let inner = inner.clone();
            let queue = queue.clone();
            let subs = subs.clone();
            Box::new(move |now: f64| {
                let rearm = inner.borrow_mut().pump(now);
                flush_events(&queue, &subs);
                rearm
            })
        };
        drive(pump)?;
        Ok(Self { inner, queue, subs })
    }

    #[wasm_bindgen(getter)]
    pub fn launched(&self) -> bool {
        self.inner.borrow().launched()
    }

    #[wasm_bindgen(setter)]
    pub fn set_launched(&self, launched: bool) {
        self.inner.borrow_mut().set_launched(launched);
        flush_events(&self.queue, &self.subs);
    }

    #[wasm_bindgen(getter)]
    pub fn limit(&self) -> f64 {
        self.inner.borrow().limit()
    }

    #[wasm_bindgen(setter)]
    pub fn set_limit(&self, limit: f64) -> Result<(), JsError> {
        self.inner
            .borrow_mut()
            .set_limit(limit)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn rate(&self) -> f64 {
        self.inner.borrow().rate()
    }

    #[wasm_bindgen(getter)]
    pub fn delta(&self) -> f64 {
        self.inner.borrow().delta()
    }

    /// Subscribe a callback to one event name
    /// (`launch`/`change`/`start`/`tick`/`resize`).
    pub fn on(&self, event: &str, callback: Function) -> Result<(), JsError> {
        subscribe(&self.subs, event, callback)
    }
}

/// Wall-clock timer engine riding `setTimeout`.
#[wasm_bindgen(js_name = TimerEngine)]
pub struct WasmTimerEngine {
    inner: Rc<RefCell<TimerEngine>>,
    queue: EventQueue,
    subs: Subscriptions,
}

#[wasm_bindgen(js_class = TimerEngine)]
impl WasmTimerEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmTimerEngine, JsError> {
        console_error_panic_hook::set_once();
        let cfg = parse_config(config)?;
        let mut engine = TimerEngine::new(cfg).map_err(|e| JsError::new(&e.to_string()))?;

        let queue: EventQueue = Rc::default();
        let subs: Subscriptions = Rc::default();
        engine.add_listener(Box::new(QueueListener {
            queue: queue.clone(),
        }));
        let inner = Rc::new(RefCell::new(engine));

        let pump = {
            let inner = inner.clone();
            let queue = queue.clone();
            let subs = subs.clone();
            Box::new(move |now: f64| {
                let rearm = inner.borrow_mut().pump(now);
                flush_events(&queue, &subs);
                rearm
            })
        };
        drive(pump)?;
        Ok(Self { inner, queue, subs })
    }

    #[wasm_bindgen(getter)]
    pub fn launched(&self) -> bool {
        self.inner.borrow().launched()
    }

    #[wasm_bindgen(setter)]
    pub fn set_launched(&self, launched: bool) {
        self.inner.borrow_mut().set_launched(launched);
        flush_events(&self.queue, &self.subs);
    }

    #[wasm_bindgen(getter)]
    pub fn limit(&self) -> f64 {
        self.inner.borrow().limit()
    }

    #[wasm_bindgen(setter)]
    pub fn set_limit(&self, limit: f64) -> Result<(), JsError> {
        self.inner
            .borrow_mut()
            .set_limit(limit)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn rate(&self) -> f64 {
        self.inner.borrow().rate()
    }

    #[wasm_bindgen(getter)]
    pub fn delta(&self) -> f64 {
        self.inner.borrow().delta()
    }

    pub fn on(&self, event: &str, callback: Function) -> Result<(), JsError> {
        subscribe(&self.subs, event, callback)
    }
}

fn wire_focus(inner: Rc<RefCell<FixedStepEngine>>) -> Result<(), JsError> {
    let win = window()?;
    for (name, active) in [("focus", true), ("blur", false)] {
        let engine = inner.clone();
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            engine.borrow_mut().set_active(active);
        }) as Box<dyn FnMut(web_sys::Event)>);
        win.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .map_err(|_| JsError::new("failed to attach focus listener"))?;
        closure.forget();
    }
    Ok(())
}

/// Fixed-step engine with catch-up bursts, gated by window focus.
#[wasm_bindgen(js_name = FixedStepEngine)]
pub struct WasmFixedStepEngine {
    inner: Rc<RefCell<FixedStepEngine>>,
    queue: EventQueue,
    subs: Subscriptions,
}

#[wasm_bindgen(js_class = FixedStepEngine)]
impl WasmFixedStepEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmFixedStepEngine, JsError> {
        console_error_panic_hook::set_once();
        let cfg = parse_config(config)?;
        let mut engine = FixedStepEngine::new(cfg).map_err(|e| JsError::new(&e.to_string()))?;

        let queue: EventQueue = Rc::default();
        let subs: Subscriptions = Rc::default();
        engine.add_listener(Box::new(QueueListener {
            queue: queue.clone(),
        }));
        let inner = Rc::new(RefCell::new(engine));
        wire_focus(inner.clone())?;

        let pump = {
            let inner = inner.clone();
            let queue = queue.clone();
            let subs = subs.clone();
            Box::new(move |now: f64| {
                let rearm = inner.borrow_mut().pump(now);
                flush_events(&queue, &subs);
                rearm
            })
        };
        drive(pump)?;
        Ok(Self { inner, queue, subs })
    }

    #[wasm_bindgen(getter)]
    pub fn launched(&self) -> bool {
        self.inner.borrow().launched()
    }

    #[wasm_bindgen(setter)]
    pub fn set_launched(&self, launched: bool) {
        self.inner.borrow_mut().set_launched(launched);
        flush_events(&self.queue, &self.subs);
    }

    #[wasm_bindgen(getter)]
    pub fn limit(&self) -> f64 {
        self.inner.borrow().limit()
    }

    #[wasm_bindgen(setter)]
    pub fn set_limit(&self, limit: f64) -> Result<(), JsError> {
        self.inner
            .borrow_mut()
            .set_limit(limit)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn rate(&self) -> f64 {
        self.inner.borrow().rate()
    }

    #[wasm_bindgen(getter)]
    pub fn delta(&self) -> f64 {
        self.inner.borrow().delta()
    }

    /// Whether ticks are currently delivered (window focused).
    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.inner.borrow().active()
    }

    #[wasm_bindgen(setter)]
    pub fn set_active(&self, active: bool) {
        self.inner.borrow_mut().set_active(active);
    }

    pub fn on(&self, event: &str, callback: Function) -> Result<(), JsError> {
        subscribe(&self.subs, event, callback)
    }
}

/// Canvas-backed drawing surface.
struct CanvasSurface {
    canvas: web_sys::HtmlCanvasElement,
}

impl Surface for CanvasSurface {
    fn layout_size(&self) -> (u32, u32) {
        let rect = self.canvas.get_bounding_client_rect();
        (rect.width().max(0.0) as u32, rect.height().max(0.0) as u32)
    }

    fn set_pixel_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}

/// Canvas display over a frame-synced engine: keeps the canvas backing store
/// matched to its layout box and guarantees a render tick after each resize.
#[wasm_bindgen(js_name = CanvasDisplay)]
pub struct WasmCanvasDisplay {
    inner: Rc<RefCell<Display<CanvasSurface, FrameEngine>>>,
    queue: EventQueue,
    subs: Subscriptions,
}

#[wasm_bindgen(js_class = CanvasDisplay)]
impl WasmCanvasDisplay {
    /// Wrap a canvas. Sizes it immediately, tracks window resizes, and
    /// starts the render callback chain.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: web_sys::HtmlCanvasElement,
        launch: bool,
    ) -> Result<WasmCanvasDisplay, JsError> {
        console_error_panic_hook::set_once();

        let queue: EventQueue = Rc::default();
        let subs: Subscriptions = Rc::default();
        let mut engine = FrameEngine::default();
        engine.add_listener(Box::new(QueueListener {
            queue: queue.clone(),
        }));
        // The initial Resize + render tick land in the queue and are flushed
        // once the chain below is in place.
        let display = Display::new(CanvasSurface { canvas }, engine, launch);
        let inner = Rc::new(RefCell::new(display));

        let win = window()?;
        let resize_target = inner.clone();
        let resize_queue = queue.clone();
        let resize_subs = subs.clone();
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            resize_target.borrow_mut().resize();
            flush_events(&resize_queue, &resize_subs);
        }) as Box<dyn FnMut(web_sys::Event)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(|_| JsError::new("failed to attach resize listener"))?;
        closure.forget();

        let pump = {
            let inner = inner.clone();
            let queue = queue.clone();
            let subs = subs.clone();
            Box::new(move |now: f64| {
                let rearm = inner.borrow_mut().pump(now);
                flush_events(&queue, &subs);
                rearm
            })
        };
        drive(pump)?;
        flush_events(&queue, &subs);
        Ok(Self { inner, queue, subs })
    }

    /// Re-read the layout box and dispatch `resize` + a render tick now.
    pub fn resize(&self) {
        self.inner.borrow_mut().resize();
        flush_events(&self.queue, &self.subs);
    }

    #[wasm_bindgen(getter)]
    pub fn launched(&self) -> bool {
        self.inner.borrow().engine().launched()
    }

    #[wasm_bindgen(setter)]
    pub fn set_launched(&self, launched: bool) {
        self.inner.borrow_mut().engine_mut().set_launched(launched);
        flush_events(&self.queue, &self.subs);
    }

    #[wasm_bindgen(getter)]
    pub fn limit(&self) -> f64 {
        self.inner.borrow().engine().limit()
    }

    #[wasm_bindgen(setter)]
    pub fn set_limit(&self, limit: f64) -> Result<(), JsError> {
        self.inner
            .borrow_mut()
            .engine_mut()
            .set_limit(limit)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn rate(&self) -> f64 {
        self.inner.borrow().engine().rate()
    }

    #[wasm_bindgen(getter)]
    pub fn delta(&self) -> f64 {
        self.inner.borrow().engine().delta()
    }

    pub fn on(&self, event: &str, callback: Function) -> Result<(), JsError> {
        subscribe(&self.subs, event, callback)
    }
}
