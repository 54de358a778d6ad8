//! Adapter for playables written in JavaScript.
use js_sys::{Function, Reflect};
use playframe_core::{missing_capabilities, Capability, Playable, PlayerError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

use crate::utils::describe_js_error;

/// A JS object whose `load` and `update` properties are functions.
/// Both are invoked with the object itself as `this`.
pub struct JsPlayable {
    this: JsValue,
    load: Function,
    update: Function,
}

/// Look up `cap` on `value`, keeping it only if it is callable.
fn lookup(value: &JsValue, cap: Capability) -> Option<Function> {
    if !value.is_object() && !value.is_function() {
        return None;
    }
    Reflect::get(value, &JsValue::from_str(cap.name()))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

impl JsPlayable {
    /// Validate `value` against the playable contract. Fails with
    /// `NotPlayable` naming every missing operation.
    pub fn from_js(value: &JsValue) -> Result<Self, PlayerError> {
        match (lookup(value, Capability::Load), lookup(value, Capability::Update)) {
            (Some(load), Some(update)) => Ok(Self {
                this: value.clone(),
                load,
                update,
            }),
            (load, update) => Err(PlayerError::not_playable(&missing_capabilities(
                load.is_some(),
                update.is_some(),
            ))),
        }
    }

    pub(crate) fn has_capability(value: &JsValue, cap: Capability) -> bool {
        lookup(value, cap).is_some()
    }

    pub fn object(&self) -> &JsValue {
        &self.this
    }
}

impl Playable<Element> for JsPlayable {
    fn load(&mut self, target: &Element) -> anyhow::Result<()> {
        self.load
            .call1(&self.this, target)
            .map(|_| ())
            .map_err(|e| anyhow::Error::msg(describe_js_error(&e)))
    }

    fn update(&mut self, target: &Element, time_delta_seconds: f64) -> anyhow::Result<()> {
        self.update
            .call2(&self.this, target, &JsValue::from_f64(time_delta_seconds))
            .map(|_| ())
            .map_err(|e| anyhow::Error::msg(describe_js_error(&e)))
    }
}
