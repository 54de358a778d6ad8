//! `requestAnimationFrame` scheduler.
use log::warn;
use playframe_core::{FrameScheduler, PlayerError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Performance, Window};

use crate::utils::{describe_js_error, platform_error};

/// Frame callback; receives the `DOMHighResTimeStamp` of the frame.
pub type FrameCallback = Closure<dyn FnMut(f64) -> Result<(), JsValue>>;

/// Every request reuses the one bound closure, so the id returned by
/// `requestAnimationFrame` is all that is needed to cancel.
pub struct AnimationFrameScheduler {
    window: Window,
    performance: Option<Performance>,
    callback: Option<FrameCallback>,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window) -> Self {
        let performance = window.performance();
        Self {
            window,
            performance,
            callback: None,
        }
    }

    /// Install the frame callback. Must happen before the first request.
    pub fn bind(&mut self, callback: FrameCallback) {
        self.callback = Some(callback);
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    type Handle = i32;

    fn request_frame(&mut self) -> Result<i32, PlayerError> {
        let callback = self
            .callback
            .as_ref()
            .ok_or_else(|| PlayerError::platform("frame callback is not bound"))?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(platform_error)
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Err(err) = self.window.cancel_animation_frame(handle) {
            warn!(
                "scheduler: cancelAnimationFrame({handle}) failed: {}",
                describe_js_error(&err)
            );
        }
    }

    fn now(&self) -> f64 {
        match &self.performance {
            Some(performance) => performance.now(),
            None => js_sys::Date::now(),
        }
    }
}
