use crate::audio::AnalyserBands;
use crate::canvas::CanvasPainter;
use crate::constants::REDUCED_MOTION_POLL_MS;
use crate::dom;
use blueprint_core::{
    BandSource, DrawList, FrameEnv, FrequencyBands, GlobeContext, GlobePhase, GlobeScene,
    Scheduler, TimerSlot, Viewport,
};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub ctx: GlobeContext,
    pub scene: Rc<RefCell<GlobeScene>>,
    pub painter: CanvasPainter,
    pub canvas: web::HtmlCanvasElement,
    pub marker_layer: Option<web::HtmlElement>,
    pub bands: Rc<RefCell<AnalyserBands>>,
    pub draw: DrawList,
    pub last_instant: Instant,
    pub pointer_enabled: Option<bool>,
}

impl FrameContext {
    /// One animated frame.
    pub fn frame(&mut self) {
        self.render(false);
    }

    /// One still frame with pinned time and spin. Shares the animated path.
    pub fn render_static(&mut self) {
        self.render(true);
    }

    fn render(&mut self, static_frame: bool) {
        let now = Instant::now();
        let dt = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        dom::sync_canvas_backing_size(&self.canvas);
        let now_ms = dom::now_ms();
        let phase = if static_frame {
            self.ctx.phase.phase()
        } else {
            self.ctx.phase.evaluate(now_ms)
        };
        let progress = self.ctx.phase.progress(now_ms);
        let bands = if static_frame {
            FrequencyBands::SILENT
        } else {
            self.bands.borrow_mut().bands()
        };

        let dpr = dom::device_pixel_ratio();
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        let env = FrameEnv {
            viewport: Viewport::new(w as f32, h as f32, dpr as f32),
            phase,
            progress,
            slide: self.ctx.slide.get(),
            markers_wanted: self.ctx.markers_wanted(),
            bands,
            dt,
            static_frame,
        };

        let pointer = {
            let mut scene = self.scene.borrow_mut();
            scene.frame(&env, &mut self.draw);
            scene.orbits().pointer_events_enabled()
        };
        self.painter.paint(&self.draw, w, h, dpr);
        self.sync_marker_layer(pointer);
    }

    /// The marker overlay only captures the pointer while markers are visible.
    fn sync_marker_layer(&mut self, enabled: bool) {
        if self.pointer_enabled == Some(enabled) {
            return;
        }
        self.pointer_enabled = Some(enabled);
        if let Some(layer) = &self.marker_layer {
            _ = layer
                .style()
                .set_property("pointer-events", if enabled { "auto" } else { "none" });
        }
    }
}

/// `requestAnimationFrame` loop that can be stopped.
type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

pub struct AnimationLoop {
    running: Rc<Cell<bool>>,
    handle: Rc<Cell<Option<i32>>>,
    tick: Tick,
}

impl AnimationLoop {
    pub fn start(frame_ctx: Rc<RefCell<FrameContext>>) -> Self {
        Self::run(move || {
            if let Ok(mut fc) = frame_ctx.try_borrow_mut() {
                fc.frame();
            }
        })
    }

    /// Call `on_frame` once per animation frame until stopped.
    pub fn run(mut on_frame: impl FnMut() + 'static) -> Self {
        let running = Rc::new(Cell::new(true));
        let handle = Rc::new(Cell::new(None));
        let tick: Tick = Rc::new(RefCell::new(None));
        let tick_next = tick.clone();
        let running_in = running.clone();
        let handle_in = handle.clone();

        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if !running_in.get() {
                return;
            }
            on_frame();
            handle_in.set(request_frame(&tick_next));
        }) as Box<dyn FnMut()>));

        handle.set(request_frame(&tick));
        log::info!("[frame] animation loop started");
        Self {
            running,
            handle,
            tick,
        }
    }

    /// Cancel the pending frame and release the tick closure, which holds a
    /// handle to itself.
    pub fn stop(&self) {
        if !self.running.replace(false) {
            return;
        }
        if let (Some(w), Some(id)) = (web::window(), self.handle.take()) {
            _ = w.cancel_animation_frame(id);
        }
        let released = self.tick.borrow_mut().take();
        drop(released);
        log::info!("[frame] animation loop stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request_frame(tick: &Tick) -> Option<i32> {
    let w = web::window()?;
    let cb = tick.borrow();
    let cb = cb.as_ref()?;
    w.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
}

/// Chooses between the animation loop and static frames, following the
/// reduced-motion preference.
pub struct Renderer {
    frame: Rc<RefCell<FrameContext>>,
    animation: RefCell<Option<AnimationLoop>>,
    poll: TimerSlot,
}

impl Renderer {
    pub fn new(frame: Rc<RefCell<FrameContext>>, scheduler: Rc<dyn Scheduler>) -> Rc<Self> {
        Rc::new(Self {
            frame,
            animation: RefCell::new(None),
            poll: TimerSlot::new(scheduler),
        })
    }

    pub fn is_animating(&self) -> bool {
        self.animation
            .borrow()
            .as_ref()
            .is_some_and(AnimationLoop::is_running)
    }

    pub fn set_reduced_motion(self: &Rc<Self>, reduced: bool) {
        if reduced {
            // dropping the loop stops it
            drop(self.animation.borrow_mut().take());
            self.redraw_if_static();
            self.arm_poll();
        } else {
            self.poll.clear();
            let mut anim = self.animation.borrow_mut();
            if anim.is_none() {
                *anim = Some(AnimationLoop::start(self.frame.clone()));
            }
        }
    }

    /// Observers call this on state changes; the animation loop redraws on
    /// its own.
    pub fn redraw_if_static(&self) {
        if self.is_animating() {
            return;
        }
        match self.frame.try_borrow_mut() {
            Ok(mut fc) => fc.render_static(),
            Err(_) => log::debug!("[frame] static redraw skipped: frame busy"),
        }
    }

    fn arm_poll(self: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(self);
        self.poll.arm(REDUCED_MOTION_POLL_MS, move || {
            if let Some(r) = weak.upgrade() {
                r.on_poll();
            }
        });
    }

    fn on_poll(self: Rc<Self>) {
        if self.is_animating() {
            return;
        }
        // Phase observers redraw when this completes a morph.
        let machine = self.frame.borrow().ctx.phase.clone();
        let phase = machine.settle();
        if phase != GlobePhase::Ready {
            self.arm_poll();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_releases_the_frame_callback() {
        let owned = Rc::new(());
        let held = owned.clone();
        let anim = AnimationLoop::run(move || {
            let _ = &held;
        });
        assert!(anim.is_running());
        assert_eq!(Rc::strong_count(&owned), 2);

        anim.stop();
        assert!(!anim.is_running());
        assert_eq!(Rc::strong_count(&owned), 1);
        // a second stop is a no-op
        anim.stop();
    }
}
