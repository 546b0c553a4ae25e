//! DOM control wiring: shape buttons, color picker, manual slider,
//! fullscreen, camera restart and device switching, resize.

use crate::camera::{self, SharedCamera};
use crate::dom;
use crate::hands::DetectorSlot;
use morph_core::{AppState, ShapeKind};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

fn shape_buttons(document: &web::Document) -> Vec<web::HtmlElement> {
    let Ok(list) = document.query_selector_all(".shape-btn") else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|n| n.dyn_into::<web::HtmlElement>().ok())
        .collect()
}

/// Toggle the `active` class so only the button for `shape` is highlighted.
pub fn highlight_active_shape(document: &web::Document, shape: ShapeKind) {
    for btn in shape_buttons(document) {
        let is_active = btn.dataset().get("shape").as_deref() == Some(shape.as_str());
        _ = btn.class_list().toggle_with_force("active", is_active);
    }
}

pub fn wire_shape_buttons(document: &web::Document, state: &Rc<RefCell<AppState>>) {
    for btn in shape_buttons(document) {
        let Some(name) = btn.dataset().get("shape") else {
            continue;
        };
        let state = state.clone();
        let doc = document.clone();
        dom::add_event_listener(&btn, "click", move |_| {
            let mut rng = rand::thread_rng();
            let result = state.borrow_mut().set_shape_by_name(&name, &mut rng);
            match result {
                Ok(shape) => highlight_active_shape(&doc, shape),
                Err(e) => log::warn!("[shape] {}", e),
            }
        });
    }
}

fn input_value(ev: &web::Event) -> Option<String> {
    ev.target()
        .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
        .map(|input| input.value())
}

pub fn wire_color_picker(document: &web::Document, state: &Rc<RefCell<AppState>>) {
    let Some(picker) = dom::element_by_id::<web::HtmlInputElement>(document, "color-picker") else {
        return;
    };
    let state = state.clone();
    let root = document
        .document_element()
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok());
    dom::add_event_listener(&picker, "input", move |ev| {
        let Some(value) = input_value(&ev) else {
            return;
        };
        match state.borrow_mut().set_color_hex(&value) {
            Ok(()) => {
                if let Some(root) = &root {
                    _ = root.style().set_property("--primary-color", &value);
                }
            }
            Err(e) => log::warn!("[color] ignoring {}", e),
        }
    });
}

pub fn wire_manual_slider(document: &web::Document, state: &Rc<RefCell<AppState>>) {
    let Some(slider) = dom::element_by_id::<web::HtmlInputElement>(document, "manual-spread") else {
        return;
    };
    state
        .borrow_mut()
        .control
        .set_manual_value(slider.value().parse().unwrap_or(0.0));
    let state = state.clone();
    dom::add_event_listener(&slider, "input", move |ev| {
        let value = input_value(&ev)
            .and_then(|v| v.parse::<f32>().ok())
            .unwrap_or(0.0);
        state.borrow_mut().control.set_manual_value(value);
    });
}

/// Exit fullscreen if active, otherwise request it on the canvas container.
fn toggle_fullscreen(document: &web::Document) {
    if document.fullscreen_element().is_some() {
        document.exit_fullscreen();
        return;
    }
    let target = document
        .get_element_by_id("canvas-container")
        .or_else(|| document.body().map(Into::into));
    if let Some(el) = target {
        if let Err(e) = el.request_fullscreen() {
            log::warn!("[ui] fullscreen request failed: {:?}", e);
        }
    }
}

pub fn wire_fullscreen(document: &web::Document) {
    let doc = document.clone();
    dom::add_click_listener(document, "fullscreen-btn", move || toggle_fullscreen(&doc));
}

/// Restart: stop the stream, reset retries, start with the selected device
/// and load the hand model if it never loaded.
pub fn wire_restart(
    document: &web::Document,
    camera: &SharedCamera,
    detector: &DetectorSlot,
    status: Option<web::Element>,
) {
    let camera = camera.clone();
    let detector = detector.clone();
    dom::add_click_listener(document, "restart-camera-btn", move || {
        let preferred = {
            let mut cam = camera.borrow_mut();
            cam.cancel_retry();
            cam.stop();
            cam.reset_retries();
            cam.restart_device()
        };
        log::info!("[camera] manual restart");
        let camera = camera.clone();
        let detector = detector.clone();
        let status = status.clone();
        spawn_local(async move {
            camera::start_camera(camera, preferred).await;
            if !detector.is_loaded() {
                detector.ensure_loaded(status.as_ref()).await;
            }
        });
    });
}

pub fn wire_device_select(camera: &SharedCamera) {
    let Some(select) = camera.borrow().select.clone() else {
        return;
    };
    let camera = camera.clone();
    dom::add_event_listener(&select.clone(), "change", move |_| {
        let device = select.value();
        camera.borrow_mut().cancel_retry();
        log::info!("[camera] switching to {}", device);
        camera::spawn_camera(camera.clone(), device);
    });
}

pub fn wire_resize(
    canvas: &web::HtmlCanvasElement,
    overlay: Option<(web::HtmlCanvasElement, web::Element)>,
) {
    let sync = {
        let canvas = canvas.clone();
        move || {
            dom::sync_canvas_backing_size(&canvas);
            if let Some((overlay, preview)) = &overlay {
                dom::sync_overlay_size(overlay, preview);
            }
        }
    };
    sync();
    if let Some(window) = web::window() {
        dom::add_event_listener(&window, "resize", move |_| sync());
    }
}
