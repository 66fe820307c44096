//! Browser integration tests
//!
//! Run with: wasm-pack test --headless --chrome
//! (or --firefox)

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use js_sys::{Function, Object, Reflect};

use sixfinger_wasm::collectors::devices;
use sixfinger_wasm::host::Canvas2d;
use sixfinger_wasm::{
    generate_fingerprint, BrowserHost, FingerprintConfig, HostCapabilities, SignalName,
};

wasm_bindgen_test_configure!(run_in_browser);

fn is_hash(s: &str) -> bool {
    s.len() == 32 && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

// ===== Host probes =====

#[wasm_bindgen_test]
fn navigator_matches_globals() {
    let host = BrowserHost::new();
    let nav = host.navigator();
    let window = web_sys::window().unwrap();
    let user_agent = window.navigator().user_agent().unwrap();
    assert_eq!(nav.user_agent, Some(user_agent));
}

#[wasm_bindgen_test]
fn screen_has_dimensions() {
    let screen = BrowserHost::new().screen();
    assert!(screen.width > 0);
    assert!(screen.height > 0);
    assert!(screen.color_depth > 0);
}

#[wasm_bindgen_test]
fn timezone_has_a_name() {
    let tz = BrowserHost::new().timezone();
    assert!(tz.name.is_some_and(|name| !name.is_empty()));
}

#[wasm_bindgen_test]
fn canvas_surface_encodes_png() {
    let host = BrowserHost::new();
    let surface = host.canvas_2d().unwrap().expect("headless browsers have a 2D canvas");
    surface.set_size(10, 10);
    surface.fill_rect(0.0, 0.0, 5.0, 5.0);
    assert!(surface.to_data_url().unwrap().starts_with("data:image/png"));
}

// ===== Pipeline =====

#[wasm_bindgen_test]
async fn fingerprint_is_complete_and_stable() {
    let host = BrowserHost::new();
    let config = FingerprintConfig::default();

    let a = generate_fingerprint(&host, &config).await;
    let b = generate_fingerprint(&host, &config).await;

    assert!(is_hash(&a.hash), "bad hash: {}", a.hash);
    assert_eq!(a.components.len(), 15);
    for name in SignalName::ALL {
        assert!(a.components.get(name).is_some(), "missing {}", name);
    }
    // Battery level and connection estimates drift between runs.
    let stable = SignalName::ALL
        .into_iter()
        .filter(|n| !matches!(n, SignalName::Battery | SignalName::Network));
    for name in stable {
        assert_eq!(a.components.get(name), b.components.get(name), "{} drifted", name);
    }
}

#[wasm_bindgen_test]
async fn zero_timeout_still_completes() {
    let host = BrowserHost::with_timeout(0);
    let result = generate_fingerprint(&host, &FingerprintConfig::default()).await;
    assert_eq!(result.components.len(), 15);
}

/// Shadow `target[prop]` with an own property until dropped.
struct Shadowed {
    target: Object,
    prop: JsValue,
}

impl Shadowed {
    fn install(target: &JsValue, prop: &str, value: &JsValue) -> Self {
        let target: Object = target.clone().unchecked_into();
        let prop = JsValue::from_str(prop);
        let descriptor = Object::new();
        Reflect::set(&descriptor, &"value".into(), value).unwrap();
        Reflect::set(&descriptor, &"configurable".into(), &JsValue::TRUE).unwrap();
        Reflect::set(&descriptor, &"writable".into(), &JsValue::TRUE).unwrap();
        Object::define_property(&target, &prop, &descriptor);
        Self { target, prop }
    }
}

impl Drop for Shadowed {
    fn drop(&mut self) {
        let _ = Reflect::delete_property(&self.target, &self.prop);
    }
}

fn navigator() -> JsValue {
    Reflect::get(&js_sys::global(), &"navigator".into()).unwrap()
}

/// A function returning a promise that never settles.
fn pending_promise_fn() -> Function {
    Function::new_no_args("return new Promise(() => {});")
}

#[wasm_bindgen_test]
async fn stalled_battery_query_times_out_to_error() {
    let _battery = Shadowed::install(&navigator(), "getBattery", &pending_promise_fn());

    let host = BrowserHost::with_timeout(50);
    assert_eq!(devices::battery(&host).await, "error");
}

#[wasm_bindgen_test]
async fn stalled_device_enumeration_times_out_to_error() {
    let media_devices = Object::new();
    Reflect::set(&media_devices, &"enumerateDevices".into(), &pending_promise_fn()).unwrap();
    let _media = Shadowed::install(&navigator(), "mediaDevices", &media_devices);

    let host = BrowserHost::with_timeout(50);
    assert_eq!(devices::media(&host).await, "error");
}

#[wasm_bindgen_test]
async fn timeout_error_names_the_query() {
    let _battery = Shadowed::install(&navigator(), "getBattery", &pending_promise_fn());

    let host = BrowserHost::with_timeout(50);
    match host.battery().await {
        Err(sixfinger_wasm::FingerprintError::Timeout { probe, millis }) => {
            assert_eq!(probe, "getBattery");
            assert_eq!(millis, 50);
        }
        other => panic!("expected a timeout, got {:?}", other),
    }
}

// ===== WASM exports =====

#[wasm_bindgen_test]
async fn get_fingerprint_returns_plain_object() {
    let value = sixfinger_wasm::get_fingerprint(JsValue::UNDEFINED).await.unwrap();

    let hash = Reflect::get(&value, &JsValue::from_str("hash")).unwrap();
    assert!(is_hash(&hash.as_string().unwrap()));

    let components = Reflect::get(&value, &JsValue::from_str("components")).unwrap();
    assert!(components.is_object());
    let screen = Reflect::get(&components, &JsValue::from_str("screen")).unwrap();
    assert!(screen.as_string().is_some());

    let digest = Reflect::get(&value, &JsValue::from_str("digest")).unwrap();
    assert_eq!(digest.as_string().as_deref(), Some("sha256"));
}

#[wasm_bindgen_test]
async fn malformed_options_fall_back_to_defaults() {
    let value = sixfinger_wasm::get_fingerprint(JsValue::from_str("not an object"))
        .await
        .unwrap();
    let digest = Reflect::get(&value, &JsValue::from_str("digest")).unwrap();
    assert_eq!(digest.as_string().as_deref(), Some("sha256"));
}

#[wasm_bindgen_test]
fn hash_components_rejects_unknown_signal() {
    let components = js_sys::Object::new();
    Reflect::set(&components, &"gyroscope".into(), &"x".into()).unwrap();
    assert!(sixfinger_wasm::hash_components(components.into(), None).is_err());
}

#[wasm_bindgen_test]
fn hash_components_rejects_unknown_digest() {
    let components = js_sys::Object::new();
    Reflect::set(&components, &"touch".into(), &"0_false".into()).unwrap();
    assert!(sixfinger_wasm::hash_components(components.clone().into(), Some("md5".into())).is_err());
    let hash = sixfinger_wasm::hash_components(components.into(), Some("rolling32".into())).unwrap();
    assert!(is_hash(&hash));
}

#[wasm_bindgen_test]
fn risk_labels() {
    assert_eq!(sixfinger_wasm::risk_level_label(10.0), "Low Risk");
    assert_eq!(sixfinger_wasm::risk_level_label(45.0), "Medium Risk");
    assert_eq!(sixfinger_wasm::risk_level_label(80.0), "High Risk (Bot Likely)");
}

#[wasm_bindgen_test]
async fn client_rejects_bad_hash_without_fetching() {
    let client = sixfinger_wasm::FingerprintClient::new(None, None);
    assert_eq!(client.api_url(), "http://localhost:8000");

    let rejection = client.risk_details("nope".into()).await.unwrap_err();
    let code = Reflect::get(&rejection, &"code".into()).unwrap();
    assert_eq!(code.as_f64(), Some(301.0));
    let retryable = Reflect::get(&rejection, &"is_retryable".into()).unwrap();
    assert_eq!(retryable.as_bool(), Some(false));
}

#[wasm_bindgen_test]
fn rejections_carry_user_message() {
    let components = Object::new();
    let rejection = sixfinger_wasm::hash_components(components.into(), Some("md5".into()))
        .unwrap_err();

    let code = Reflect::get(&rejection, &"code".into()).unwrap();
    assert_eq!(code.as_f64(), Some(800.0));
    let message = Reflect::get(&rejection, &"message".into()).unwrap();
    assert_eq!(message.as_string().as_deref(), Some("Configuration error: Unknown digest: md5"));
    let user_message = Reflect::get(&rejection, &"user_message".into()).unwrap();
    assert!(user_message.as_string().is_some_and(|m| !m.is_empty()));
}
