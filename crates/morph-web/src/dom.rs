use morph_core::MAX_PIXEL_RATIO;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Look up an element by id and cast it to the expected type.
pub fn element_by_id<T: JsCast>(document: &web::Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

/// Like `element_by_id` but a missing element is an init error.
pub fn require_element<T: JsCast>(document: &web::Document, id: &str) -> anyhow::Result<T> {
    element_by_id(document, id).ok_or_else(|| anyhow::anyhow!("missing #{}", id))
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

pub fn add_event_listener(
    target: &web::EventTarget,
    event: &str,
    handler: impl FnMut(web::Event) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
    _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Device pixel ratio capped so large displays do not blow up fill rate.
#[inline]
pub fn pixel_ratio() -> f64 {
    web::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .clamp(1.0, MAX_PIXEL_RATIO)
}

/// Match a canvas' backing store to its CSS size times the pixel ratio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    let dpr = pixel_ratio();
    let rect = canvas.get_bounding_client_rect();
    let w_px = (rect.width() * dpr).round() as u32;
    let h_px = (rect.height() * dpr).round() as u32;
    canvas.set_width(w_px.max(1));
    canvas.set_height(h_px.max(1));
}

/// Size an overlay canvas to the on-screen rect of the element it covers.
pub fn sync_overlay_size(overlay: &web::HtmlCanvasElement, covered: &web::Element) {
    let dpr = pixel_ratio();
    let rect = covered.get_bounding_client_rect();
    overlay.set_width(((rect.width() * dpr).round() as u32).max(1));
    overlay.set_height(((rect.height() * dpr).round() as u32).max(1));
}

pub fn set_text(el: &web::Element, text: &str) {
    if el.text_content().as_deref() != Some(text) {
        el.set_text_content(Some(text));
    }
}

pub fn set_display(el: &web::HtmlElement, visible: bool) {
    _ = el
        .style()
        .set_property("display", if visible { "block" } else { "none" });
}

/// Schedule `f` once after `ms`. Returns the handle for `clear_timeout`.
pub fn set_timeout(ms: u32, f: impl FnOnce() + 'static) -> Option<i32> {
    let window = web::window()?;
    let closure = Closure::once(f);
    let handle = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            ms as i32,
        )
        .ok();
    closure.forget();
    handle
}

pub fn clear_timeout(handle: i32) {
    if let Some(w) = web::window() {
        w.clear_timeout_with_handle(handle);
    }
}

/// Resolve after `ms` milliseconds.
pub async fn sleep_ms(ms: u32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(w) = web::window() {
            _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32);
        }
    });
    _ = JsFuture::from(promise).await;
}

pub fn now_ms() -> f64 {
    web::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
