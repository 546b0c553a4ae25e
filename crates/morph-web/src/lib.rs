#![cfg(target_arch = "wasm32")]
use morph_core::{AppState, MonotonicTimestamps};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod camera;
mod dom;
mod events;
mod frame;
mod hands;
mod overlay;
mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("morph-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
            if let Some(el) = dom::window_document().and_then(|d| d.get_element_by_id("hand-status")) {
                el.set_text_content(Some(&format!("Init error: {}", e)));
            }
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = dom::require_element(&document, "app-canvas")?;
    let capture: web::HtmlVideoElement = dom::require_element(&document, "webcam")?;
    let preview = dom::element_by_id::<web::HtmlVideoElement>(&document, "camera-preview");
    let status = document.get_element_by_id("hand-status");
    let manual_group = dom::element_by_id::<web::HtmlElement>(&document, "manual-group");
    let select = dom::element_by_id::<web::HtmlSelectElement>(&document, "camera-select");
    let overlay = dom::element_by_id::<web::HtmlCanvasElement>(&document, "preview-overlay")
        .and_then(overlay::LandmarkOverlay::new);

    // Avoid grabbing a 2D context on the main canvas so WebGPU can acquire it
    events::wire_resize(
        &canvas,
        overlay
            .as_ref()
            .zip(preview.clone())
            .map(|(o, p)| (o.canvas().clone(), p.into())),
    );

    let state = {
        let mut rng = rand::thread_rng();
        let mut s = AppState::with_defaults(&mut rng);
        s.resize(canvas.width(), canvas.height());
        Rc::new(RefCell::new(s))
    };
    events::highlight_active_shape(&document, state.borrow().shape());

    let camera = Rc::new(RefCell::new(camera::CameraController::new(
        capture.clone(),
        preview.clone(),
        select,
        status.clone(),
        state.clone(),
    )));
    let detector = hands::DetectorSlot::default();

    events::wire_shape_buttons(&document, &state);
    events::wire_color_picker(&document, &state);
    events::wire_manual_slider(&document, &state);
    events::wire_fullscreen(&document);
    events::wire_restart(&document, &camera, &detector, status.clone());
    events::wire_device_select(&camera);
    if let Some(group) = &manual_group {
        dom::set_display(group, true);
    }

    // Render immediately in manual mode; camera and model arrive later
    let particle_count = state.borrow().particles.len();
    let gpu = frame::init_gpu(&canvas, particle_count).await;
    let sources = preview
        .into_iter()
        .chain(std::iter::once(capture))
        .map(hands::VideoFrame)
        .collect();
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        state: state.clone(),
        detector: detector.tracker.clone(),
        sources,
        timestamps: MonotonicTimestamps::default(),
        canvas: canvas.clone(),
        status: status.clone(),
        manual_group,
        overlay,
        gpu,
        surface_size: (canvas.width(), canvas.height()),
    }));
    frame::start_loop(frame_ctx);

    // Camera first, then the hand model whether or not the camera came up
    spawn_local(async move {
        let started = camera::start_camera(camera, String::new()).await;
        log::info!("[camera] initial start ok={}", started);
        detector.ensure_loaded(status.as_ref()).await;
    });
    Ok(())
}
