//! Conversions between JS values and player errors.
use playframe_core::PlayerError;
use wasm_bindgen::{JsCast, JsError, JsValue};

pub(crate) fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Human-readable text for a thrown JS value.
pub(crate) fn describe_js_error(err: &JsValue) -> String {
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

pub(crate) fn platform_error(err: JsValue) -> PlayerError {
    PlayerError::platform(describe_js_error(&err))
}

pub(crate) fn to_js_error(err: PlayerError) -> JsError {
    JsError::new(&err.to_string())
}
