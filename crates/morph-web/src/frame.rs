use crate::dom;
use crate::hands::{HandTracker, VideoFrame};
use crate::overlay::LandmarkOverlay;
use crate::render;
use morph_core::{detect_frame, AppState, DetectionOutcome, MonotonicTimestamps};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub state: Rc<RefCell<AppState>>,
    pub detector: Rc<RefCell<Option<HandTracker>>>,
    /// Detection candidates in preference order: preview, then capture.
    pub sources: Vec<VideoFrame>,
    pub timestamps: MonotonicTimestamps,

    pub canvas: web::HtmlCanvasElement,
    pub status: Option<web::Element>,
    pub manual_group: Option<web::HtmlElement>,
    pub overlay: Option<LandmarkOverlay>,

    pub gpu: Option<render::GpuState<'a>>,
    pub surface_size: (u32, u32),
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let outcome = {
            let mut detector = self.detector.borrow_mut();
            let candidates: Vec<&VideoFrame> = self.sources.iter().collect();
            detect_frame(
                detector.as_mut(),
                &candidates,
                &mut self.timestamps,
                dom::now_ms(),
            )
        };
        match &outcome {
            DetectionOutcome::Hands(hands) => {
                if let Some(o) = &self.overlay {
                    o.draw(hands.first());
                }
            }
            DetectionOutcome::NoSource => self.resume_paused_capture(),
            _ => {}
        }

        let mut state = self.state.borrow_mut();
        let size = (self.canvas.width(), self.canvas.height());
        if size != self.surface_size {
            self.surface_size = size;
            state.resize(size.0, size.1);
        }
        let transform = state.frame(&outcome);

        if let Some(el) = &self.status {
            dom::set_text(el, &state.control.status_text());
        }
        if let Some(group) = &self.manual_group {
            dom::set_display(group, state.control.phase().manual_controls_visible());
        }

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(size.0, size.1);
            if let Err(e) = g.render(
                &state.camera,
                transform,
                state.color,
                state.particles.position_floats(),
            ) {
                match e {
                    wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => g.reconfigure(),
                    e => log::error!("render error: {:?}", e),
                }
            }
        }
    }

    fn resume_paused_capture(&self) {
        if let Some(capture) = self.sources.last() {
            let video = &capture.0;
            if video.paused() && video.src_object().is_some() {
                _ = video.play();
            }
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    particle_count: usize,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, particle_count).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
