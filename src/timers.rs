use blueprint_core::{Scheduler, TimerId};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// `setTimeout`/`clearTimeout` behind the core `Scheduler` trait. Timer ids
/// are the browser's own handles.
pub struct WindowScheduler {
    window: web::Window,
}

impl WindowScheduler {
    pub fn new(window: web::Window) -> Self {
        Self { window }
    }
}

impl Scheduler for WindowScheduler {
    fn now(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId {
        // The JS function frees itself after its single call.
        let callback = Closure::once_into_js(move || task());
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay_ms.min(i32::MAX as u32) as i32,
            ) {
            Ok(handle) => handle as TimerId,
            Err(e) => {
                log::error!("[timers] setTimeout failed: {:?}", e);
                0
            }
        }
    }

    fn cancel(&self, id: TimerId) {
        if id != 0 {
            self.window.clear_timeout_with_handle(id as i32);
        }
    }
}
