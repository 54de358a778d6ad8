//! Browser binding for the playframe player.
//!
//! ```javascript
//! import { WasmPlayer } from "./pkg/playframe_wasm.js";
//!
//! const game = {
//!   load(target) { /* build scene inside target */ },
//!   update(target, dt) { /* advance by dt seconds */ },
//! };
//! const player = new WasmPlayer(game, { button_label: "PLAY" });
//! document.body.appendChild(player.element());
//! ```

pub mod logging;
pub mod playable;
pub mod scheduler;
pub mod stage;
mod utils;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::error;
use playframe_core::{ensure_capabilities, Capability, Player, PlayerConfig, PlayerError};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement};

pub use crate::playable::JsPlayable;
pub use crate::scheduler::{AnimationFrameScheduler, FrameCallback};
pub use crate::stage::{detect_pixel_ratio, DomStage};

use crate::utils::{describe_js_error, jsvalue_is_undefined_or_null, to_js_error};

type CorePlayer = Player<JsPlayable, DomStage, AnimationFrameScheduler>;
type ClickListener = Closure<dyn FnMut(Event) -> Result<(), JsValue>>;

const BUSY: &str = "player is busy: called from inside its own load/update";

/// The player plus requests that arrive while it is borrowed, i.e. from
/// inside the playable's own `load`/`update`.
struct Shared {
    core: RefCell<CorePlayer>,
    stop_requested: Cell<bool>,
}

impl Shared {
    /// Run `f` on the player, then apply a stop queued during the call.
    fn run<R>(
        &self,
        f: impl FnOnce(&mut CorePlayer) -> playframe_core::Result<R>,
    ) -> playframe_core::Result<R> {
        let mut core = self
            .core
            .try_borrow_mut()
            .map_err(|_| PlayerError::platform(BUSY))?;
        let result = f(&mut core);
        if self.stop_requested.replace(false) {
            core.stop_update_loop();
        }
        result
    }

    /// Stop now, or once the running `load`/`update` returns.
    fn stop(&self) -> bool {
        match self.core.try_borrow_mut() {
            Ok(mut core) => core.stop_update_loop(),
            Err(_) => {
                self.stop_requested.set(true);
                true
            }
        }
    }
}

/// Callback entry point. A dropped player makes this a no-op.
fn with_player<R>(
    weak: &Weak<Shared>,
    f: impl FnOnce(&mut CorePlayer) -> playframe_core::Result<R>,
) -> Result<(), JsValue> {
    let Some(shared) = weak.upgrade() else {
        return Ok(());
    };
    shared.run(f).map(|_| ()).map_err(|err| {
        error!("player: {err}");
        JsValue::from(to_js_error(err))
    })
}

/// Whether the click landed on (or inside) a gating control. Only the path
/// between the event target and `overlay` is searched.
fn hits_button(event: &Event, overlay: &Element, button_class: &str) -> bool {
    let mut node = event.target().and_then(|t| t.dyn_into::<Element>().ok());
    while let Some(element) = node {
        if element == *overlay {
            return false;
        }
        if element
            .class_name()
            .split_whitespace()
            .any(|class| class == button_class)
        {
            return true;
        }
        node = element.parent_element();
    }
    false
}

/// Check an object against the playable contract without building a player.
#[wasm_bindgen(js_name = isPlayable)]
pub fn is_playable(value: &JsValue) -> bool {
    ensure_capabilities(
        JsPlayable::has_capability(value, Capability::Load),
        JsPlayable::has_capability(value, Capability::Update),
    )
    .is_ok()
}

#[wasm_bindgen]
pub struct WasmPlayer {
    shared: Rc<Shared>,
    root: HtmlElement,
    overlay: HtmlElement,
    on_click: ClickListener,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player around `playable`. Pass a config object or undefined/null
    /// for defaults. Throws if `playable` lacks a callable `load` or `update`;
    /// in that case no element is created.
    ///
    /// Example:
    ///   new WasmPlayer(game, { button_label: "Start", render_surface: "canvas" })
    #[wasm_bindgen(constructor)]
    pub fn new(playable: JsValue, config: JsValue) -> Result<WasmPlayer, JsError> {
        console_error_panic_hook::set_once();
        logging::init_console_logger();

        let playable = JsPlayable::from_js(&playable).map_err(to_js_error)?;
        let mut cfg: PlayerConfig = if jsvalue_is_undefined_or_null(&config) {
            PlayerConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        cfg.validate().map_err(to_js_error)?;

        let window = web_sys::window().ok_or_else(|| JsError::new("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("window has no document"))?;
        if cfg.pixel_ratio.is_none() {
            cfg.pixel_ratio = Some(detect_pixel_ratio(&window));
        }
        let button_class = cfg.button_class.clone();

        let stage = DomStage::new(&document, &cfg).map_err(to_js_error)?;
        let root = stage.root().clone();
        let overlay = stage.overlay_element().clone();
        let scheduler = AnimationFrameScheduler::new(window);
        let player = Player::new(playable, stage, scheduler, cfg).map_err(to_js_error)?;
        let shared = Rc::new(Shared {
            core: RefCell::new(player),
            stop_requested: Cell::new(false),
        });

        let weak = Rc::downgrade(&shared);
        let frame: FrameCallback =
            Closure::new(move |timestamp: f64| with_player(&weak, |p| p.tick(timestamp)));
        shared.core.borrow_mut().scheduler_mut().bind(frame);

        let weak = Rc::downgrade(&shared);
        let overlay_element = Element::from(overlay.clone());
        let on_click: ClickListener = Closure::new(move |event: Event| {
            if !hits_button(&event, &overlay_element, &button_class) {
                return Ok(());
            }
            with_player(&weak, |p| p.activate())
        });
        overlay
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
            .map_err(|e| JsError::new(&describe_js_error(&e)))?;

        Ok(WasmPlayer {
            shared,
            root,
            overlay,
            on_click,
        })
    }

    fn with_core<R>(
        &self,
        f: impl FnOnce(&mut CorePlayer) -> playframe_core::Result<R>,
    ) -> Result<R, JsError> {
        self.shared.run(f).map_err(to_js_error)
    }

    fn inspect<R>(&self, f: impl FnOnce(&CorePlayer) -> R) -> Result<R, JsError> {
        let core = self.shared.core.try_borrow().map_err(|_| JsError::new(BUSY))?;
        Ok(f(&core))
    }

    /// Root container for the host page to insert.
    pub fn element(&self) -> HtmlElement {
        self.root.clone()
    }

    /// Same as clicking the gating control. Returns false when nothing was armed.
    pub fn activate(&self) -> Result<bool, JsError> {
        self.with_core(|p| p.activate())
    }

    #[wasm_bindgen(js_name = startUpdateLoop)]
    pub fn start_update_loop(&self) -> Result<(), JsError> {
        self.with_core(|p| p.start_update_loop())
    }

    /// Returns whether a running loop was stopped. Called from inside the
    /// playable's `load` or `update`, the stop is applied as soon as that
    /// call returns, and the frame already queued for next time is cancelled.
    #[wasm_bindgen(js_name = stopUpdateLoop)]
    pub fn stop_update_loop(&self) -> bool {
        self.shared.stop()
    }

    /// Show a gating control on a stopped player; clicking it restarts the loop.
    #[wasm_bindgen(js_name = showResumeGate)]
    pub fn show_resume_gate(&self, label: Option<String>) -> Result<(), JsError> {
        self.with_core(|p| p.show_resume_gate(label.as_deref()))
    }

    /// "awaiting_start", "running" or "stopped".
    pub fn state(&self) -> Result<String, JsError> {
        self.inspect(|p| p.state().name().to_string())
    }

    #[wasm_bindgen(js_name = overlayVisible)]
    pub fn overlay_visible(&self) -> Result<bool, JsError> {
        self.inspect(|p| p.overlay().is_visible())
    }

    #[wasm_bindgen(js_name = pixelRatio)]
    pub fn pixel_ratio(&self) -> Result<f64, JsError> {
        self.inspect(|p| p.pixel_ratio())
    }

    /// Counters for the current run of the loop:
    /// `{ started_at_ms, frames_dispatched, elapsed_seconds, last_delta_seconds }`.
    pub fn metrics(&self) -> Result<JsValue, JsError> {
        let metrics = self.inspect(|p| p.metrics().clone())?;
        swb::to_value(&metrics).map_err(|e| JsError::new(&format!("metrics error: {e}")))
    }
}

impl Drop for WasmPlayer {
    fn drop(&mut self) {
        let _ = self
            .overlay
            .remove_event_listener_with_callback("click", self.on_click.as_ref().unchecked_ref());
        self.root.remove();
        // `shared` drops after this, cancelling a pending frame.
    }
}
