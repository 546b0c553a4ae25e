//! MediaPipe HandLandmarker interop. The page exposes `FilesetResolver` and
//! `HandLandmarker` from `@mediapipe/tasks-vision` as globals before the wasm
//! module starts.

use morph_core::{
    load_with_fallback, DetectError, DetectorOptions, FallbackError, FrameSource, HandLandmarks,
    Hands, Landmark, LandmarkDetector, LANDMARKS_PER_HAND, VISION_WASM_LOCATIONS,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[wasm_bindgen]
extern "C" {
    type FilesetResolver;

    #[wasm_bindgen(static_method_of = FilesetResolver, js_name = forVisionTasks, catch)]
    fn for_vision_tasks(base_path: &str) -> Result<js_sys::Promise, JsValue>;

    pub type HandLandmarker;

    #[wasm_bindgen(static_method_of = HandLandmarker, js_name = createFromOptions, catch)]
    fn create_from_options(fileset: &JsValue, options: &JsValue)
        -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, js_name = detectForVideo, catch)]
    fn detect_for_video(
        this: &HandLandmarker,
        video: &web::HtmlVideoElement,
        timestamp_ms: f64,
    ) -> Result<JsValue, JsValue>;
}

/// A `<video>` element viewed as a detector frame source.
#[derive(Clone)]
pub struct VideoFrame(pub web::HtmlVideoElement);

impl FrameSource for VideoFrame {
    fn ready_state(&self) -> u16 {
        self.0.ready_state()
    }
    fn frame_width(&self) -> u32 {
        self.0.video_width()
    }
    fn frame_height(&self) -> u32 {
        self.0.video_height()
    }
}

pub struct HandTracker {
    inner: HandLandmarker,
}

impl LandmarkDetector for HandTracker {
    type Source = VideoFrame;

    fn detect(&mut self, source: &VideoFrame, timestamp_ms: f64) -> Result<Hands, DetectError> {
        let result = self
            .inner
            .detect_for_video(&source.0, timestamp_ms)
            .map_err(|e| DetectError(format!("{:?}", e)))?;
        Ok(parse_hands(&result))
    }
}

fn set(obj: &js_sys::Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    js_sys::Reflect::set(obj, &JsValue::from_str(key), value).map(|_| ())
}

fn options_to_js(o: &DetectorOptions) -> Result<JsValue, JsValue> {
    let base = js_sys::Object::new();
    set(&base, "modelAssetPath", &JsValue::from_str(&o.model_asset_path))?;
    let opts = js_sys::Object::new();
    set(&opts, "baseOptions", &base)?;
    set(&opts, "runningMode", &JsValue::from_str(o.running_mode.as_str()))?;
    set(&opts, "numHands", &JsValue::from(o.num_hands))?;
    set(
        &opts,
        "minHandDetectionConfidence",
        &JsValue::from_f64(o.min_detection_confidence as f64),
    )?;
    set(
        &opts,
        "minHandPresenceConfidence",
        &JsValue::from_f64(o.min_presence_confidence as f64),
    )?;
    set(
        &opts,
        "minTrackingConfidence",
        &JsValue::from_f64(o.min_tracking_confidence as f64),
    )?;
    Ok(opts.into())
}

async fn load_from(base_path: &str, options: &JsValue) -> Result<HandTracker, JsValue> {
    let fileset = JsFuture::from(FilesetResolver::for_vision_tasks(base_path)?).await?;
    let landmarker = JsFuture::from(HandLandmarker::create_from_options(&fileset, options)?).await?;
    Ok(HandTracker {
        inner: landmarker.unchecked_into(),
    })
}

/// Load the landmarker, trying each WASM fileset location in turn. When every
/// location fails the last loader error is returned.
pub async fn load_hand_tracker(options: &DetectorOptions) -> anyhow::Result<HandTracker> {
    let js_options = options_to_js(options).map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let tracker = load_with_fallback(&VISION_WASM_LOCATIONS, |loc| {
        let loc = loc.to_string();
        let js_options = js_options.clone();
        async move { load_from(&loc, &js_options).await }
    })
    .await
    .map_err(|e| match e {
        FallbackError::NoLocations => anyhow::anyhow!("no wasm locations configured"),
        FallbackError::Exhausted { attempts, last } => {
            anyhow::anyhow!("hand model failed after {} attempts: {:?}", attempts, last)
        }
    })?;
    log::info!("[hands] model loaded");
    Ok(tracker)
}

fn coord(point: &JsValue, key: &str) -> f32 {
    js_sys::Reflect::get(point, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as f32
}

/// `{ landmarks: [[{x,y,z} x21], ...] }` into fixed-size hands. Hands with
/// fewer than 21 points are skipped.
fn parse_hands(result: &JsValue) -> Hands {
    let mut hands = Hands::new();
    let Ok(list) = js_sys::Reflect::get(result, &JsValue::from_str("landmarks")) else {
        return hands;
    };
    let Some(list) = list.dyn_ref::<js_sys::Array>() else {
        return hands;
    };
    for hand in list.iter() {
        let Some(points) = hand.dyn_ref::<js_sys::Array>() else {
            continue;
        };
        if points.length() < LANDMARKS_PER_HAND as u32 {
            continue;
        }
        let mut out: HandLandmarks = [Landmark::default(); LANDMARKS_PER_HAND];
        for (i, slot) in out.iter_mut().enumerate() {
            let p = points.get(i as u32);
            *slot = Landmark::new(coord(&p, "x"), coord(&p, "y"), coord(&p, "z"));
        }
        hands.push(out);
    }
    hands
}

/// The loaded landmarker (if any) plus a guard against overlapping loads.
#[derive(Clone, Default)]
pub struct DetectorSlot {
    pub tracker: Rc<RefCell<Option<HandTracker>>>,
    loading: Rc<Cell<bool>>,
}

impl DetectorSlot {
    pub fn is_loaded(&self) -> bool {
        self.tracker.borrow().is_some()
    }

    /// Load the model unless it is already loaded or a load is in flight.
    pub async fn ensure_loaded(&self, status: Option<&web::Element>) {
        if self.is_loaded() || self.loading.replace(true) {
            return;
        }
        let show = |text: &str| {
            if let Some(el) = status {
                crate::dom::set_text(el, text);
            }
        };
        show("Loading hand model...");
        match load_hand_tracker(&DetectorOptions::default()).await {
            Ok(tracker) => {
                *self.tracker.borrow_mut() = Some(tracker);
                show("Hand model loaded. Raise your hands.");
            }
            Err(e) => {
                log::error!("[hands] {:?}", e);
                show("Failed to load hand model");
            }
        }
        self.loading.set(false);
    }
}
