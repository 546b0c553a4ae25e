use glam::Vec3;

// Shared visual/tracking tuning constants used by both web and native frontends.

// Particle set
pub const PARTICLE_COUNT: usize = 30_000;
pub const INITIAL_JITTER: f32 = 0.01; // initial positions spread around the origin
pub const INITIAL_SHAPE_RADIUS: f32 = 0.8; // until the first fill computes the real one

// Morphing
pub const MORPH_SPEED: f32 = 0.1; // fraction of the remaining distance covered per frame
pub const BASE_SCALE: f32 = 0.45; // group scale at openness 0 before the openness boost
pub const SCALE_MIN: f32 = 0.9; // visual scale factor at openness 0
pub const SCALE_SPAN: f32 = 0.8; // added to the scale factor at openness 1
pub const ROTATION_STEP: f32 = 0.002; // radians about Y per frame
pub const MIN_GROUP_SCALE: f32 = 0.001; // floor for the spread-to-fill divisor

// Control signal
pub const OPEN_SMOOTH_ALPHA: f32 = 0.18; // new = (1-α)*old + α*raw
pub const BONE_LEN_EPSILON: f32 = 1e-6; // floor for the pip->mcp segment length

// Shapes
pub const FLOWER_PETALS: u32 = 7;
pub const FIREWORK_BURSTS: usize = 12;

// Hand landmark detector
pub const DETECTOR_NUM_HANDS: u32 = 2;
pub const DETECTOR_MIN_CONFIDENCE: f32 = 0.4;
pub const HAND_MODEL_URL: &str = "https://storage.googleapis.com/mediapipe-models/hand_landmarker/hand_landmarker/float16/1/hand_landmarker.task";
pub const VISION_WASM_LOCATIONS: [&str; 3] = [
    "https://cdn.jsdelivr.net/npm/@mediapipe/tasks-vision@0.10.22-rc.20250304/wasm",
    "https://cdn.jsdelivr.net/npm/@mediapipe/tasks-vision@0.10.22/wasm",
    "https://cdn.jsdelivr.net/npm/@mediapipe/tasks-vision@latest/wasm",
];

// Frame source readiness (HTMLMediaElement.HAVE_CURRENT_DATA)
pub const HAVE_CURRENT_DATA: u16 = 2;

// Camera acquisition
pub const MAX_CAMERA_RETRIES: u32 = 3;
pub const CAMERA_RETRY_BASE_MS: u32 = 1500; // delay = base * (attempt + 1)
pub const VIDEO_READY_TIMEOUT_MS: u32 = 3000;
pub const VIDEO_READY_POLL_MS: u32 = 50;
pub const IDEAL_CAPTURE_WIDTH: u32 = 1280;
pub const IDEAL_CAPTURE_HEIGHT: u32 = 720;

// Camera / rendering
pub const CAMERA_FOV_DEG: f32 = 60.0;
pub const CAMERA_Z: f32 = 2.5;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;
pub const POINT_SIZE: f32 = 0.08; // world units, attenuated by perspective
pub const POINT_OPACITY: f32 = 0.95;
pub const MAX_PIXEL_RATIO: f64 = 2.0;

// Color
pub const DEFAULT_COLOR_HEX: &str = "#ff0055";

#[inline]
pub fn camera_eye() -> Vec3 {
    Vec3::new(0.0, 0.0, CAMERA_Z)
}
