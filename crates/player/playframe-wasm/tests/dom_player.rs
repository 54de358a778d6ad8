#![cfg(target_arch = "wasm32")]
use js_sys::{Array, Function, Object, Promise, Reflect, JSON};
use playframe_wasm::{is_playable, WasmPlayer};
use serde_json::json;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Element, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

/// `{ load, update }` that counts calls on itself, remembers the load target's tag
/// and collects every `dt` in `this.dts`.
fn counting_playable() -> JsValue {
    let obj = Object::new();
    let load = Function::new_with_args(
        "target",
        "this.loads = (this.loads || 0) + 1; this.tag = target.tagName;",
    );
    let update = Function::new_with_args(
        "target, dt",
        "this.updates = (this.updates || 0) + 1; (this.dts = this.dts || []).push(dt);",
    );
    Reflect::set(&obj, &"load".into(), &load).unwrap();
    Reflect::set(&obj, &"update".into(), &update).unwrap();
    obj.into()
}

fn config(value: serde_json::Value) -> JsValue {
    JSON::parse(&value.to_string()).unwrap()
}

fn get(obj: &JsValue, key: &str) -> JsValue {
    Reflect::get(obj, &key.into()).unwrap()
}

fn find(root: &HtmlElement, selector: &str) -> Option<Element> {
    root.query_selector(selector).unwrap()
}

fn dts(playable: &JsValue) -> Vec<f64> {
    let dts = get(playable, "dts");
    if dts.is_undefined() {
        return Vec::new();
    }
    Array::from(&dts).iter().filter_map(|v| v.as_f64()).collect()
}

/// Resolves on the next animation frame.
async fn next_frame() {
    let promise = Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .request_animation_frame(&resolve)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

async fn frames(n: usize) {
    for _ in 0..n {
        next_frame().await;
    }
}

fn overlay(player: &WasmPlayer) -> HtmlElement {
    find(&player.element(), ".modaloverlay")
        .expect("overlay")
        .dyn_into::<HtmlElement>()
        .unwrap()
}

fn click_button(player: &WasmPlayer) {
    find(&player.element(), ".modaloverlay .button")
        .expect("gate button")
        .dyn_into::<HtmlElement>()
        .unwrap()
        .click();
}

#[wasm_bindgen_test]
fn rejects_object_missing_operations() {
    let obj = Object::new();
    Reflect::set(&obj, &"load".into(), &JsValue::from_f64(1.0)).unwrap();
    let obj: JsValue = obj.into();
    assert!(!is_playable(&obj));
    assert!(WasmPlayer::new(obj, JsValue::UNDEFINED).is_err());
    assert!(WasmPlayer::new(JsValue::NULL, JsValue::UNDEFINED).is_err());
    assert!(is_playable(&counting_playable()));
}

#[wasm_bindgen_test]
fn builds_gated_container_with_defaults() {
    let player = WasmPlayer::new(counting_playable(), JsValue::NULL).unwrap();
    let root = player.element();
    assert_eq!(root.class_name(), "jsplayer");
    assert_eq!(player.state().unwrap(), "awaiting_start");
    assert!(player.overlay_visible().unwrap());

    let button = find(&root, ".modaloverlay a.button").expect("gate button");
    assert_eq!(button.text_content().as_deref(), Some("PLAY"));
    assert!(find(&root, "canvas").is_none());
}

#[wasm_bindgen_test]
fn clicking_gate_loads_once_and_runs() {
    let playable = counting_playable();
    let player = WasmPlayer::new(playable.clone(), JsValue::UNDEFINED).unwrap();

    click_button(&player);
    assert_eq!(player.state().unwrap(), "running");
    assert!(!player.overlay_visible().unwrap());
    assert_eq!(get(&playable, "loads").as_f64(), Some(1.0));
    assert_eq!(get(&playable, "tag").as_string().as_deref(), Some("DIV"));

    // Hidden gate is inert.
    assert!(!player.activate().unwrap());
    assert_eq!(get(&playable, "loads").as_f64(), Some(1.0));

    assert!(player.stop_update_loop());
    assert_eq!(player.state().unwrap(), "stopped");
    assert!(!player.stop_update_loop());
}

#[wasm_bindgen_test]
fn start_requires_gate_and_rejects_double_start() {
    let player = WasmPlayer::new(counting_playable(), JsValue::UNDEFINED).unwrap();
    assert!(player.start_update_loop().is_err());

    player.activate().unwrap();
    assert!(player.start_update_loop().is_err());

    player.stop_update_loop();
    assert!(player.start_update_loop().is_ok());
    assert_eq!(player.state().unwrap(), "running");
}

#[wasm_bindgen_test]
fn resume_gate_restarts_without_reloading() {
    let playable = counting_playable();
    let player = WasmPlayer::new(playable.clone(), JsValue::UNDEFINED).unwrap();
    click_button(&player);
    player.stop_update_loop();

    player.show_resume_gate(Some("Again".into())).unwrap();
    assert!(player.overlay_visible().unwrap());
    let button = find(&player.element(), ".button").unwrap();
    assert_eq!(button.text_content().as_deref(), Some("Again"));

    click_button(&player);
    assert_eq!(player.state().unwrap(), "running");
    assert_eq!(get(&playable, "loads").as_f64(), Some(1.0));

    let metrics = player.metrics().unwrap();
    assert_eq!(get(&metrics, "frames_dispatched").as_f64(), Some(0.0));
}

#[wasm_bindgen_test]
fn canvas_surface_and_custom_labels() {
    let playable = counting_playable();
    let cfg = config(json!({
        "button_label": "Go",
        "render_surface": "canvas",
        "pixel_ratio": 2.0,
    }));
    let player = WasmPlayer::new(playable.clone(), cfg).unwrap();
    assert_eq!(player.pixel_ratio().unwrap(), 2.0);

    let root = player.element();
    assert!(find(&root, "canvas").is_some());
    let button = find(&root, ".button").unwrap();
    assert_eq!(button.text_content().as_deref(), Some("Go"));

    click_button(&player);
    assert_eq!(get(&playable, "tag").as_string().as_deref(), Some("CANVAS"));
}

#[wasm_bindgen_test]
fn invalid_config_is_rejected() {
    let cfg = config(json!({ "pixel_ratio": -1.0 }));
    assert!(WasmPlayer::new(counting_playable(), cfg).is_err());

    let cfg = config(json!({ "button_class": "two words" }));
    assert!(WasmPlayer::new(counting_playable(), cfg).is_err());
}

#[wasm_bindgen_test]
fn failing_load_leaves_player_stopped() {
    let obj = Object::new();
    let load = Function::new_with_args("target", "throw new Error('no assets');");
    let update = Function::new_with_args("target, dt", "");
    Reflect::set(&obj, &"load".into(), &load).unwrap();
    Reflect::set(&obj, &"update".into(), &update).unwrap();

    let player = WasmPlayer::new(obj.into(), JsValue::UNDEFINED).unwrap();
    assert!(player.activate().is_err());
    assert_eq!(player.state().unwrap(), "stopped");
    assert!(player.start_update_loop().is_err());
}

#[wasm_bindgen_test]
fn dropping_player_detaches_root() {
    let document = web_sys::window().unwrap().document().unwrap();
    let body = document.body().unwrap();
    let player = WasmPlayer::new(counting_playable(), JsValue::UNDEFINED).unwrap();
    let root = player.element();
    body.append_child(&root).unwrap();
    player.activate().unwrap();

    drop(player);
    assert!(root.parent_node().is_none());
}

#[wasm_bindgen_test]
async fn animation_frames_drive_update_until_stopped() {
    let playable = counting_playable();
    let player = WasmPlayer::new(playable.clone(), JsValue::UNDEFINED).unwrap();
    click_button(&player);

    frames(3).await;
    let seen = dts(&playable);
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|dt| dt.is_finite()));
    // Consecutive frame timestamps never go backwards.
    assert!(seen.iter().skip(1).all(|dt| *dt >= 0.0));
    let metrics = player.metrics().unwrap();
    assert_eq!(
        get(&metrics, "frames_dispatched").as_f64(),
        Some(seen.len() as f64)
    );

    assert!(player.stop_update_loop());
    frames(3).await;
    assert_eq!(dts(&playable).len(), seen.len());
}

#[wasm_bindgen_test]
async fn update_can_stop_its_own_loop() {
    let obj = Object::new();
    let load = Function::new_no_args("");
    let update = Function::new_with_args(
        "target, dt",
        "this.updates = (this.updates || 0) + 1;
         if (this.updates === 2) { this.stopped = this.player.stopUpdateLoop(); }",
    );
    Reflect::set(&obj, &"load".into(), &load).unwrap();
    Reflect::set(&obj, &"update".into(), &update).unwrap();
    let playable: JsValue = obj.into();

    let player = WasmPlayer::new(playable.clone(), JsValue::UNDEFINED).unwrap();
    player.activate().unwrap();
    // From here on the player is only reachable the way page scripts reach it.
    let handle = JsValue::from(player);
    Reflect::set(&playable, &"player".into(), &handle).unwrap();

    frames(5).await;
    assert_eq!(get(&playable, "updates").as_f64(), Some(2.0));
    assert_eq!(get(&playable, "stopped").as_bool(), Some(true));

    let state = get(&handle, "state")
        .unchecked_into::<Function>()
        .call0(&handle)
        .unwrap();
    assert_eq!(state.as_string().as_deref(), Some("stopped"));
}

#[wasm_bindgen_test]
fn only_the_gate_control_activates() {
    let document = web_sys::window().unwrap().document().unwrap();
    let host = document.create_element("div").unwrap();
    host.set_class_name("button");
    document.body().unwrap().append_child(&host).unwrap();

    let playable = counting_playable();
    let player = WasmPlayer::new(playable.clone(), JsValue::UNDEFINED).unwrap();
    host.append_child(&player.element()).unwrap();

    overlay(&player).click();
    assert_eq!(player.state().unwrap(), "awaiting_start");
    assert!(get(&playable, "loads").is_undefined());

    click_button(&player);
    assert_eq!(player.state().unwrap(), "running");
    host.remove();
}

#[wasm_bindgen_test]
fn button_class_is_matched_literally() {
    let cfg = config(json!({ "button_class": "play:now" }));
    let playable = counting_playable();
    let player = WasmPlayer::new(playable.clone(), cfg).unwrap();

    let button = overlay(&player)
        .first_element_child()
        .expect("gate button")
        .dyn_into::<HtmlElement>()
        .unwrap();
    assert_eq!(button.class_name(), "play:now");
    button.click();
    assert_eq!(player.state().unwrap(), "running");
    assert_eq!(get(&playable, "loads").as_f64(), Some(1.0));
}
