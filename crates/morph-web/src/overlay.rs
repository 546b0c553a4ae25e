use morph_core::HandLandmarks;
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys as web;

const DOT_RADIUS: f64 = 3.0;
const DOT_FILL: &str = "rgba(255,0,85,0.9)";

/// Landmark dots drawn over the camera preview.
pub struct LandmarkOverlay {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl LandmarkOverlay {
    pub fn new(canvas: web::HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &web::HtmlCanvasElement {
        &self.canvas
    }

    /// Clear, then draw the first hand mirrored to match the preview.
    pub fn draw(&self, hand: Option<&HandLandmarks>) {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        self.ctx.clear_rect(0.0, 0.0, w, h);
        let Some(hand) = hand else {
            return;
        };
        self.ctx.save();
        _ = self.ctx.translate(w, 0.0);
        _ = self.ctx.scale(-1.0, 1.0);
        self.ctx.set_fill_style(&JsValue::from_str(DOT_FILL));
        for lm in hand {
            self.ctx.begin_path();
            _ = self
                .ctx
                .arc(lm.x as f64 * w, lm.y as f64 * h, DOT_RADIUS, 0.0, TAU);
            self.ctx.fill();
        }
        self.ctx.restore();
    }
}
