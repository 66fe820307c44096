//! Live browser host backed by `web-sys` and `js-sys`.
//!
//! Capability checks go through `Reflect` on the globals so that a missing
//! API reads as "absent" instead of trapping. Async probes race a
//! `gloo-timers` timeout so a promise that never settles cannot stall the
//! fingerprint.

use async_trait::async_trait;
use futures::future::{self, Either};
use gloo_timers::future::TimeoutFuture;
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AnalyserNode, AudioContext, CanvasRenderingContext2d, HtmlCanvasElement, OscillatorNode,
    OscillatorType, WebGlRenderingContext,
};

use super::{
    AudioGraph, BatteryStatus, Canvas2d, ConnectionInfo, HardwareInfo, HostCapabilities,
    NavigatorInfo, ScreenInfo, TimezoneInfo, TouchInfo, WebGlInfo,
};
use crate::config::DEFAULT_ASYNC_PROBE_TIMEOUT_MS;
use crate::error::{FingerprintError, Result};
use crate::signals::format_js_number;

// WEBGL_debug_renderer_info
const UNMASKED_VENDOR_WEBGL: u32 = 0x9245;
const UNMASKED_RENDERER_WEBGL: u32 = 0x9246;

const SCRIPT_PROCESSOR_BUFFER: u32 = 4096;

/// Get a property from the global scope.
fn get_global(prop: &str) -> JsValue {
    Reflect::get(&js_sys::global(), &JsValue::from_str(prop)).unwrap_or(JsValue::UNDEFINED)
}

fn get_prop(obj: &JsValue, prop: &str) -> JsValue {
    if obj.is_undefined() || obj.is_null() {
        return JsValue::UNDEFINED;
    }
    Reflect::get(obj, &JsValue::from_str(prop)).unwrap_or(JsValue::UNDEFINED)
}

fn is_present(value: &JsValue) -> bool {
    !value.is_undefined() && !value.is_null()
}

fn string_prop(obj: &JsValue, prop: &str) -> Option<String> {
    get_prop(obj, prop).as_string()
}

fn number_prop(obj: &JsValue, prop: &str) -> Option<f64> {
    get_prop(obj, prop).as_f64()
}

/// `String(value)` for the primitive shapes browser APIs return.
fn js_to_string(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(n) = value.as_f64() {
        return format_js_number(n);
    }
    if let Some(b) = value.as_bool() {
        return b.to_string();
    }
    if value.is_null() {
        return "null".to_string();
    }
    if value.is_undefined() {
        return "undefined".to_string();
    }
    value.unchecked_ref::<Object>().to_string().into()
}

/// Probe the live browser environment.
pub struct BrowserHost {
    async_timeout_ms: u32,
}

impl BrowserHost {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_ASYNC_PROBE_TIMEOUT_MS)
    }

    /// `0` waits on async probes indefinitely.
    pub fn with_timeout(async_timeout_ms: u32) -> Self {
        Self { async_timeout_ms }
    }

    fn window(&self) -> Result<web_sys::Window> {
        web_sys::window().ok_or_else(|| FingerprintError::Host("no window".into()))
    }

    fn create_canvas(&self) -> Result<HtmlCanvasElement> {
        let document = self
            .window()?
            .document()
            .ok_or_else(|| FingerprintError::Host("no document".into()))?;
        document
            .create_element("canvas")
            .map_err(|e| FingerprintError::js("createElement(canvas)", &e))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| FingerprintError::Host("canvas element has wrong type".into()))
    }

    async fn await_probe(&self, probe: &str, promise: Promise) -> Result<JsValue> {
        let pending = JsFuture::from(promise);
        if self.async_timeout_ms == 0 {
            return pending.await.map_err(|e| FingerprintError::js(probe, &e));
        }

        let timeout = TimeoutFuture::new(self.async_timeout_ms);
        match future::select(Box::pin(pending), Box::pin(timeout)).await {
            Either::Left((settled, _)) => settled.map_err(|e| FingerprintError::js(probe, &e)),
            Either::Right(_) => Err(FingerprintError::Timeout {
                probe: probe.to_string(),
                millis: self.async_timeout_ms,
            }),
        }
    }

    /// Call `obj[method]()` and return the promise, or `None` if there is no such method.
    fn call_promise_method(&self, obj: &JsValue, method: &str) -> Result<Option<Promise>> {
        let func = get_prop(obj, method);
        let func = match func.dyn_into::<Function>() {
            Ok(func) => func,
            Err(_) => return Ok(None),
        };
        let result = func
            .call0(obj)
            .map_err(|e| FingerprintError::js(method, &e))?;
        result
            .dyn_into::<Promise>()
            .map(Some)
            .map_err(|_| FingerprintError::Host(format!("{} did not return a promise", method)))
    }
}

impl Default for BrowserHost {
    fn default() -> Self {
        Self::new()
    }
}

struct BrowserCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2d for BrowserCanvas {
    fn set_size(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn set_font(&self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_text_baseline(&self, baseline: &str) {
        self.ctx.set_text_baseline(baseline);
    }

    fn set_fill_style(&self, style: &str) {
        self.ctx.set_fill_style_str(style);
    }

    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.fill_rect(x, y, width, height);
    }

    fn fill_text(&self, text: &str, x: f64, y: f64) -> Result<()> {
        self.ctx
            .fill_text(text, x, y)
            .map_err(|e| FingerprintError::js("fillText", &e))
    }

    fn measure_text(&self, text: &str) -> Result<f64> {
        self.ctx
            .measure_text(text)
            .map(|metrics| metrics.width())
            .map_err(|e| FingerprintError::js("measureText", &e))
    }

    fn to_data_url(&self) -> Result<String> {
        self.canvas
            .to_data_url()
            .map_err(|e| FingerprintError::js("toDataURL", &e))
    }
}

/// Probing graph over a live `AudioContext`.
///
/// Dropping it releases the context, so a graph abandoned halfway through
/// wiring is still closed.
struct BrowserAudioGraph {
    context: AudioContext,
    oscillator: Option<OscillatorNode>,
    analyser: Option<AnalyserNode>,
    released: bool,
}

impl BrowserAudioGraph {
    fn wire(&mut self) -> std::result::Result<(), JsValue> {
        let ctx = &self.context;
        let oscillator = ctx.create_oscillator()?;
        self.oscillator = Some(oscillator.clone());
        let analyser = ctx.create_analyser()?;
        self.analyser = Some(analyser.clone());
        let gain = ctx.create_gain()?;
        let processor = ctx
            .create_script_processor_with_buffer_size_and_number_of_input_channels_and_number_of_output_channels(
                SCRIPT_PROCESSOR_BUFFER,
                1,
                1,
            )?;

        // Muted: the graph must never be audible
        gain.gain().set_value(0.0);
        oscillator.set_type(OscillatorType::Triangle);
        oscillator.connect_with_audio_node(&analyser)?;
        analyser.connect_with_audio_node(&processor)?;
        processor.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&ctx.destination())?;

        oscillator.start_with_when(0.0)?;
        Ok(())
    }
}

impl AudioGraph for BrowserAudioGraph {
    fn sample_rate(&self) -> Result<f64> {
        Ok(f64::from(self.context.sample_rate()))
    }

    fn fft_size(&self) -> Result<u32> {
        self.analyser
            .as_ref()
            .map(|analyser| analyser.fft_size())
            .ok_or_else(|| FingerprintError::Host("analyser not wired".into()))
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(oscillator) = self.oscillator.take() {
            // Throws if never started; nothing else to undo then
            let _ = oscillator.stop();
        }
        if let Err(e) = self.context.close() {
            log::debug!("AudioContext.close failed: {:?}", e);
        }
    }
}

impl Drop for BrowserAudioGraph {
    fn drop(&mut self) {
        self.release();
    }
}

#[async_trait(?Send)]
impl HostCapabilities for BrowserHost {
    fn canvas_2d(&self) -> Result<Option<Box<dyn Canvas2d>>> {
        let canvas = self.create_canvas()?;
        let ctx = match canvas
            .get_context("2d")
            .map_err(|e| FingerprintError::js("getContext(2d)", &e))?
        {
            Some(ctx) => ctx,
            None => return Ok(None),
        };
        let ctx = ctx
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| FingerprintError::Host("2d context has wrong type".into()))?;
        Ok(Some(Box::new(BrowserCanvas { canvas, ctx })))
    }

    fn webgl(&self) -> Result<Option<WebGlInfo>> {
        let canvas = self.create_canvas()?;
        let mut context = None;
        for name in ["webgl", "experimental-webgl"] {
            context = canvas
                .get_context(name)
                .map_err(|e| FingerprintError::js("getContext(webgl)", &e))?;
            if context.is_some() {
                break;
            }
        }
        let gl = match context {
            Some(ctx) => ctx.unchecked_into::<WebGlRenderingContext>(),
            None => return Ok(None),
        };

        let debug_info = gl
            .get_extension("WEBGL_debug_renderer_info")
            .map_err(|e| FingerprintError::js("getExtension", &e))?;
        if debug_info.is_none() {
            return Ok(Some(WebGlInfo::default()));
        }

        let vendor = gl
            .get_parameter(UNMASKED_VENDOR_WEBGL)
            .map_err(|e| FingerprintError::js("getParameter(vendor)", &e))?;
        let renderer = gl
            .get_parameter(UNMASKED_RENDERER_WEBGL)
            .map_err(|e| FingerprintError::js("getParameter(renderer)", &e))?;
        Ok(Some(WebGlInfo {
            vendor: Some(js_to_string(&vendor)),
            renderer: Some(js_to_string(&renderer)),
        }))
    }

    fn audio_graph(&self) -> Result<Option<Box<dyn AudioGraph>>> {
        let mut ctor = get_global("AudioContext");
        if !is_present(&ctor) {
            ctor = get_global("webkitAudioContext");
        }
        let ctor = match ctor.dyn_into::<Function>() {
            Ok(ctor) => ctor,
            Err(_) => return Ok(None),
        };

        let context = Reflect::construct(&ctor, &Array::new())
            .map_err(|e| FingerprintError::js("new AudioContext", &e))?
            .unchecked_into::<AudioContext>();
        let mut graph = BrowserAudioGraph {
            context,
            oscillator: None,
            analyser: None,
            released: false,
        };
        graph
            .wire()
            .map_err(|e| FingerprintError::js("audio graph wiring", &e))?;
        Ok(Some(Box::new(graph)))
    }

    fn hardware(&self) -> HardwareInfo {
        let nav = get_global("navigator");
        HardwareInfo {
            hardware_concurrency: number_prop(&nav, "hardwareConcurrency"),
            device_memory: number_prop(&nav, "deviceMemory"),
        }
    }

    fn screen(&self) -> ScreenInfo {
        let screen = get_global("screen");
        let dim = |prop: &str| number_prop(&screen, prop).unwrap_or(0.0) as i32;
        ScreenInfo {
            width: dim("width"),
            height: dim("height"),
            avail_width: dim("availWidth"),
            avail_height: dim("availHeight"),
            color_depth: dim("colorDepth"),
        }
    }

    fn navigator(&self) -> NavigatorInfo {
        let nav = get_global("navigator");
        NavigatorInfo {
            user_agent: string_prop(&nav, "userAgent"),
            language: string_prop(&nav, "language"),
            platform: string_prop(&nav, "platform"),
        }
    }

    fn timezone(&self) -> TimezoneInfo {
        let format = js_sys::Intl::DateTimeFormat::new(&Array::new(), &Object::new());
        let options: JsValue = format.resolved_options().into();
        TimezoneInfo {
            name: string_prop(&options, "timeZone"),
            offset_minutes: js_sys::Date::new_0().get_timezone_offset() as i32,
        }
    }

    fn plugins(&self) -> Result<Vec<String>> {
        let plugins = get_prop(&get_global("navigator"), "plugins");
        if !is_present(&plugins) {
            return Ok(Vec::new());
        }
        Ok(Array::from(&plugins)
            .iter()
            .map(|plugin| string_prop(&plugin, "name").unwrap_or_default())
            .collect())
    }

    fn touch(&self) -> TouchInfo {
        let nav = get_global("navigator");
        TouchInfo {
            max_touch_points: number_prop(&nav, "maxTouchPoints").unwrap_or(0.0) as i32,
            touch_events: Reflect::has(&js_sys::global(), &JsValue::from_str("ontouchstart"))
                .unwrap_or(false),
        }
    }

    async fn battery(&self) -> Result<Option<BatteryStatus>> {
        let nav = get_global("navigator");
        let promise = match self.call_promise_method(&nav, "getBattery")? {
            Some(promise) => promise,
            None => return Ok(None),
        };
        let manager = self.await_probe("getBattery", promise).await?;
        Ok(Some(BatteryStatus {
            charging: get_prop(&manager, "charging").is_truthy(),
            level: number_prop(&manager, "level").unwrap_or(f64::NAN),
        }))
    }

    fn connection(&self) -> Result<Option<ConnectionInfo>> {
        let nav = get_global("navigator");
        let connection = ["connection", "mozConnection", "webkitConnection"]
            .iter()
            .map(|prop| get_prop(&nav, prop))
            .find(|value| value.is_truthy());
        Ok(connection.map(|conn| ConnectionInfo {
            effective_type: string_prop(&conn, "effectiveType"),
            downlink: number_prop(&conn, "downlink"),
            rtt: number_prop(&conn, "rtt"),
        }))
    }

    async fn media_device_kinds(&self) -> Result<Option<Vec<String>>> {
        let devices = get_prop(&get_global("navigator"), "mediaDevices");
        if !is_present(&devices) {
            return Ok(None);
        }
        let promise = match self.call_promise_method(&devices, "enumerateDevices")? {
            Some(promise) => promise,
            None => return Ok(None),
        };
        let list = self.await_probe("enumerateDevices", promise).await?;
        Ok(Some(
            Array::from(&list)
                .iter()
                .map(|device| string_prop(&device, "kind").unwrap_or_default())
                .collect(),
        ))
    }

    fn device_pixel_ratio(&self) -> Option<f64> {
        number_prop(&js_sys::global(), "devicePixelRatio")
    }

    fn do_not_track(&self) -> Option<String> {
        let nav = get_global("navigator");
        [
            get_prop(&nav, "doNotTrack"),
            get_prop(&nav, "msDoNotTrack"),
            get_global("doNotTrack"),
        ]
        .iter()
        .find(|value| value.is_truthy())
        .map(js_to_string)
    }
}
