//! Display consumer: owns a drawing surface and one engine, and guarantees a
//! render opportunity right after every size change.

use crate::engine::{Engine, Rearm};
use crate::event::{EngineEvent, EventListener};

/// Drawing surface seen by a [`Display`].
///
/// The core never touches a real canvas; adapters implement this for their
/// host surface (an `HtmlCanvasElement`, a test fake, ...).
pub trait Surface {
    /// Current layout-box size in pixels.
    fn layout_size(&self) -> (u32, u32);

    /// Apply pixel dimensions to the backing store.
    fn set_pixel_size(&mut self, width: u32, height: u32);
}

/// Wraps one engine 1:1 with a drawing surface.
///
/// On construction and on every [`resize`](Display::resize) call the surface's
/// pixel size is recomputed from its layout box, then a `Resize` event and one
/// synthetic `Tick` are dispatched through the engine's listener set. The
/// synthetic tick fires regardless of `launched`, so consumers always see a
/// render opportunity after a size change even if the engine is between ticks.
pub struct Display<S: Surface, E: Engine> {
    surface: S,
    engine: E,
}

impl<S: Surface, E: Engine> Display<S, E> {
    /// Create a display around a surface and an engine, with an initial
    /// `launched` flag. Sizes the surface and dispatches the initial
    /// `Resize` + synthetic tick immediately.
    pub fn new(surface: S, mut engine: E, launched: bool) -> Self {
        engine.set_launched(launched);
        let mut display = Self { surface, engine };
        display.resize();
        display
    }

    /// Host resize notification: re-read the layout box, apply it, and
    /// dispatch `Resize` followed by one synthetic tick.
    pub fn resize(&mut self) {
        let (width, height) = self.surface.layout_size();
        self.surface.set_pixel_size(width, height);
        let dispatcher = self.engine.dispatcher_mut();
        dispatcher.dispatch(&EngineEvent::Resize { width, height });
        // Synthetic: bypasses launch gating and the Start latch on purpose.
        dispatcher.dispatch(&EngineEvent::Tick);
    }

    /// Forward a host callback to the wrapped engine.
    pub fn pump(&mut self, now_ms: f64) -> Rearm {
        self.engine.pump(now_ms)
    }

    /// Subscribe a listener to the wrapped engine's events (including the
    /// display's `Resize` and synthetic ticks).
    pub fn add_listener(&mut self, listener: Box<dyn EventListener>) {
        self.engine.add_listener(listener);
    }

    /// The wrapped engine.
    #[inline]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The wrapped engine, mutably.
    #[inline]
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// The drawing surface.
    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The drawing surface, mutably.
    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
