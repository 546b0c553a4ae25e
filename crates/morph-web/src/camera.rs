//! Webcam acquisition: constraint cascade, single active stream, bounded
//! automatic retry and the device selector.

use crate::dom;
use crate::hands::VideoFrame;
use morph_core::camera::{
    constraint_cascade, device_label, select_device, RetryPolicy, StopTracks, StreamSlot,
    VideoConstraints,
};
use morph_core::{
    select_ready_source, AppState, CameraError, VIDEO_READY_POLL_MS, VIDEO_READY_TIMEOUT_MS,
};
use instant::{Duration, Instant};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// A live `MediaStream`; stopping it releases the device.
pub struct LiveStream(web::MediaStream);

impl StopTracks for LiveStream {
    fn stop_tracks(&self) {
        for track in self.0.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<web::MediaStreamTrack>() {
                track.stop();
            }
        }
    }
}

pub struct CameraController {
    pub capture: web::HtmlVideoElement,
    pub preview: Option<web::HtmlVideoElement>,
    pub select: Option<web::HtmlSelectElement>,
    pub status: Option<web::Element>,
    slot: StreamSlot<LiveStream>,
    retry: RetryPolicy,
    retry_timer: Option<i32>,
    state: Rc<RefCell<AppState>>,
}

pub type SharedCamera = Rc<RefCell<CameraController>>;

impl CameraController {
    pub fn new(
        capture: web::HtmlVideoElement,
        preview: Option<web::HtmlVideoElement>,
        select: Option<web::HtmlSelectElement>,
        status: Option<web::Element>,
        state: Rc<RefCell<AppState>>,
    ) -> Self {
        Self {
            capture,
            preview,
            select,
            status,
            slot: StreamSlot::default(),
            retry: RetryPolicy::default(),
            retry_timer: None,
            state,
        }
    }

    fn elements(&self) -> Vec<web::HtmlVideoElement> {
        std::iter::once(self.capture.clone())
            .chain(self.preview.clone())
            .collect()
    }

    fn set_status(&self, text: &str) {
        if let Some(el) = &self.status {
            dom::set_text(el, text);
        }
    }

    /// Release the active stream and detach it from both video elements.
    pub fn stop(&mut self) {
        self.slot.stop();
        for el in self.elements() {
            el.set_src_object(None);
        }
    }

    pub fn cancel_retry(&mut self) {
        if let Some(handle) = self.retry_timer.take() {
            dom::clear_timeout(handle);
        }
    }

    pub fn reset_retries(&mut self) {
        self.retry.reset();
    }

    /// Device for a restart: the selector's choice, else the active device.
    pub fn restart_device(&self) -> String {
        self.select
            .as_ref()
            .map(|s| s.value())
            .filter(|v| !v.is_empty())
            .or_else(|| self.state.borrow().active_device().map(str::to_string))
            .unwrap_or_default()
    }

    fn attach(&mut self, stream: web::MediaStream) {
        let stream = self.slot.attach(LiveStream(stream));
        for el in self.elements() {
            el.set_muted(true);
            _ = el.set_attribute("playsinline", "");
            el.set_src_object(Some(&stream.0));
        }
    }

    fn frame_sources(&self) -> Vec<VideoFrame> {
        self.preview
            .iter()
            .chain(std::iter::once(&self.capture))
            .cloned()
            .map(VideoFrame)
            .collect()
    }
}

fn media_devices() -> Result<web::MediaDevices, JsValue> {
    web::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .navigator()
        .media_devices()
}

fn constraints_to_js(c: &VideoConstraints) -> web::MediaStreamConstraints {
    fn ideal(v: u32) -> JsValue {
        let o = js_sys::Object::new();
        _ = js_sys::Reflect::set(&o, &"ideal".into(), &JsValue::from(v));
        o.into()
    }
    let video: JsValue = match c {
        VideoConstraints::ExactDevice(id) => {
            let exact = js_sys::Object::new();
            _ = js_sys::Reflect::set(&exact, &"exact".into(), &JsValue::from_str(id));
            let v = js_sys::Object::new();
            _ = js_sys::Reflect::set(&v, &"deviceId".into(), &exact);
            v.into()
        }
        VideoConstraints::FacingUser {
            ideal_width,
            ideal_height,
        } => {
            let v = js_sys::Object::new();
            _ = js_sys::Reflect::set(&v, &"facingMode".into(), &"user".into());
            _ = js_sys::Reflect::set(&v, &"width".into(), &ideal(*ideal_width));
            _ = js_sys::Reflect::set(&v, &"height".into(), &ideal(*ideal_height));
            v.into()
        }
        VideoConstraints::Ideal {
            ideal_width,
            ideal_height,
        } => {
            let v = js_sys::Object::new();
            _ = js_sys::Reflect::set(&v, &"width".into(), &ideal(*ideal_width));
            _ = js_sys::Reflect::set(&v, &"height".into(), &ideal(*ideal_height));
            v.into()
        }
        VideoConstraints::Any => JsValue::TRUE,
    };
    let all = js_sys::Object::new();
    _ = js_sys::Reflect::set(&all, &"video".into(), &video);
    _ = js_sys::Reflect::set(&all, &"audio".into(), &JsValue::FALSE);
    all.unchecked_into()
}

async fn try_constraints(c: &VideoConstraints) -> Option<web::MediaStream> {
    let attempt = async {
        let promise = media_devices()?.get_user_media_with_constraints(&constraints_to_js(c))?;
        JsFuture::from(promise).await
    };
    match attempt.await {
        Ok(stream) => stream.dyn_into::<web::MediaStream>().ok(),
        Err(e) => {
            log::warn!("[camera] constraints failed {:?}: {:?}", c, e);
            None
        }
    }
}

async fn video_inputs() -> Result<Vec<web::MediaDeviceInfo>, JsValue> {
    let list = JsFuture::from(media_devices()?.enumerate_devices()?).await?;
    let list: js_sys::Array = list.dyn_into()?;
    Ok(list
        .iter()
        .filter_map(|d| d.dyn_into::<web::MediaDeviceInfo>().ok())
        .filter(|d| d.kind() == web::MediaDeviceKind::Videoinput)
        .collect())
}

/// Walk the cascade, then fall back to the first enumerated camera by id.
async fn acquire_stream(preferred: &str) -> Result<web::MediaStream, CameraError> {
    let pref = Some(preferred).filter(|p| !p.is_empty());
    for c in constraint_cascade(pref) {
        if let Some(stream) = try_constraints(&c).await {
            return Ok(stream);
        }
    }
    if let Ok(devices) = video_inputs().await {
        if let Some(id) = devices
            .first()
            .map(|d| d.device_id())
            .filter(|id| !id.is_empty())
        {
            if let Some(stream) = try_constraints(&VideoConstraints::ExactDevice(id)).await {
                return Ok(stream);
            }
        }
    }
    Err(CameraError::NoStream)
}

async fn wait_for_metadata(video: &web::HtmlVideoElement) {
    // HAVE_METADATA
    if video.ready_state() >= 1 {
        return;
    }
    let target: web::EventTarget = video.clone().into();
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let opts = web::AddEventListenerOptions::new();
        opts.set_once(true);
        _ = target.add_event_listener_with_callback_and_add_event_listener_options(
            "loadedmetadata",
            &resolve,
            &opts,
        );
    });
    _ = JsFuture::from(promise).await;
}

async fn play(video: &web::HtmlVideoElement, which: &str) {
    match video.play() {
        Ok(p) => {
            if let Err(e) = JsFuture::from(p).await {
                log::warn!("[camera] play({}) failed: {:?}", which, e);
            }
        }
        Err(e) => log::warn!("[camera] play({}) failed: {:?}", which, e),
    }
}

/// Poll until a frame source is ready or the timeout elapses.
async fn wait_for_ready_source(camera: &SharedCamera) -> bool {
    let started = Instant::now();
    let timeout = Duration::from_millis(VIDEO_READY_TIMEOUT_MS as u64);
    while started.elapsed() < timeout {
        let sources = camera.borrow().frame_sources();
        let refs: Vec<&VideoFrame> = sources.iter().collect();
        if select_ready_source(&refs).is_some() {
            return true;
        }
        dom::sleep_ms(VIDEO_READY_POLL_MS).await;
    }
    false
}

fn track_device_id(stream: &web::MediaStream) -> Option<String> {
    let track = stream.get_video_tracks().get(0);
    let track = track.dyn_into::<web::MediaStreamTrack>().ok()?;
    let settings = track.get_settings();
    js_sys::Reflect::get(&settings, &"deviceId".into())
        .ok()
        .and_then(|v| v.as_string())
        .filter(|id| !id.is_empty())
}

/// Rebuild the `<select>` from the current video inputs.
pub async fn populate_device_list(camera: &SharedCamera) {
    let Some(select) = camera.borrow().select.clone() else {
        return;
    };
    let devices = match video_inputs().await {
        Ok(d) => d,
        Err(e) => {
            log::warn!("[camera] enumerateDevices failed: {:?}", e);
            return;
        }
    };
    let previous = select.value();
    select.set_inner_html("");
    let Some(document) = dom::window_document() else {
        return;
    };
    let mut ids = Vec::with_capacity(devices.len());
    for (idx, d) in devices.iter().enumerate() {
        let Ok(opt) = document.create_element("option") else {
            continue;
        };
        let Ok(opt) = opt.dyn_into::<web::HtmlOptionElement>() else {
            continue;
        };
        opt.set_value(&d.device_id());
        opt.set_text_content(Some(&device_label(&d.label(), idx)));
        _ = select.append_child(&opt);
        ids.push(d.device_id());
    }
    let current = camera.borrow().state.borrow().device_id.clone();
    if let Some(id) = select_device(&ids, Some(current.as_str()), Some(previous.as_str())) {
        select.set_value(id);
    }
}

/// One acquisition attempt. On failure a retry is scheduled while budget
/// remains; success resets the retry budget.
pub async fn start_camera(camera: SharedCamera, preferred: String) -> bool {
    camera.borrow().set_status("Requesting camera...");
    let stream = match acquire_stream(&preferred).await {
        Ok(s) => s,
        Err(e) => {
            log::warn!("[camera] getUserMedia failed: {}", e);
            on_camera_failure(&camera);
            return false;
        }
    };

    camera.borrow_mut().attach(stream.clone());
    let (capture, preview) = {
        let c = camera.borrow();
        (c.capture.clone(), c.preview.clone())
    };
    wait_for_metadata(&capture).await;
    play(&capture, "video").await;
    if let Some(p) = &preview {
        play(p, "preview").await;
    }
    // re-fit the landmark overlay to the now-sized preview
    if let Some(w) = web::window() {
        if let Ok(ev) = web::Event::new("resize") {
            _ = w.dispatch_event(&ev);
        }
    }
    if !wait_for_ready_source(&camera).await {
        log::warn!("[camera] no frames within {} ms", VIDEO_READY_TIMEOUT_MS);
    }

    {
        let mut c = camera.borrow_mut();
        c.state
            .borrow_mut()
            .record_active_device(track_device_id(&stream).as_deref(), &preferred);
        c.set_status(&format!(
            "Camera ready ({}x{})",
            capture.video_width(),
            capture.video_height()
        ));
        c.retry.reset();
    }
    let device = camera.borrow().state.borrow().device_id.clone();
    log::info!("[camera] ready, device {}", device);
    populate_device_list(&camera).await;
    true
}

fn on_camera_failure(camera: &SharedCamera) {
    let mut c = camera.borrow_mut();
    c.set_status("Camera unavailable. Click restart");
    c.cancel_retry();
    if let Some(delay) = c.retry.on_failure() {
        log::info!(
            "[camera] retry {} in {} ms",
            c.retry.attempts(),
            delay.as_millis()
        );
        let cam = camera.clone();
        c.retry_timer = dom::set_timeout(delay.as_millis() as u32, move || {
            cam.borrow_mut().retry_timer = None;
            spawn_camera(cam, String::new());
        });
    }
}

/// Fire-and-forget `start_camera`.
pub fn spawn_camera(camera: SharedCamera, preferred: String) {
    spawn_local(async move {
        start_camera(camera, preferred).await;
    });
}
