// Host-side sanity checks for tuning constants, colors and the shared camera.

use glam::Vec4;
use morph_core::*;

#[test]
fn tuning_constants_are_in_range() {
    assert!(PARTICLE_COUNT > 0);
    assert!(MORPH_SPEED > 0.0 && MORPH_SPEED <= 1.0);
    assert!(OPEN_SMOOTH_ALPHA > 0.0 && OPEN_SMOOTH_ALPHA <= 1.0);
    assert!(BASE_SCALE > 0.0);
    assert!(SCALE_MIN > 0.0 && SCALE_SPAN >= 0.0);
    assert!(DETECTOR_MIN_CONFIDENCE > 0.0 && DETECTOR_MIN_CONFIDENCE < 1.0);
    assert!(CAMERA_ZNEAR < CAMERA_Z && CAMERA_Z < CAMERA_ZFAR);
    assert!(MAX_PIXEL_RATIO >= 1.0);
    assert!(VIDEO_READY_POLL_MS < VIDEO_READY_TIMEOUT_MS);
}

#[test]
fn parses_long_and_short_hex() {
    assert_eq!(parse_hex_color("#ff0000"), Ok([1.0, 0.0, 0.0]));
    assert_eq!(parse_hex_color("#0F0"), Ok([0.0, 1.0, 0.0]));
    assert_eq!(parse_hex_color("  #000000 "), Ok([0.0, 0.0, 0.0]));
    let c = parse_hex_color(DEFAULT_COLOR_HEX).unwrap();
    assert_eq!(c[0], 1.0);
    assert_eq!(c[1], 0.0);
    assert!((c[2] - 85.0 / 255.0).abs() < 1e-6);
}

#[test]
fn rejects_malformed_colors() {
    assert!(matches!(
        parse_hex_color("ff0000"),
        Err(ColorParseError::MissingHash(_))
    ));
    assert!(matches!(
        parse_hex_color("#ff00"),
        Err(ColorParseError::BadLength(_))
    ));
    assert!(matches!(
        parse_hex_color("#gg0000"),
        Err(ColorParseError::BadDigit(_))
    ));
    for hex in PALETTE {
        assert!(parse_hex_color(hex).is_ok(), "{hex}");
    }
}

#[test]
fn viewport_half_matches_fov_at_eye_distance() {
    let mut camera = Camera::default();
    camera.set_viewport_size(800, 800);
    let expected = (CAMERA_FOV_DEG.to_radians() * 0.5).tan() * CAMERA_Z;
    assert!((camera.viewport_half(0.0) - expected).abs() < 1e-5);
    // closer groups see less of the frustum
    assert!(camera.viewport_half(1.0) < camera.viewport_half(0.0));
    // degenerate sizes do not divide by zero
    camera.set_viewport_size(0, 0);
    assert!(camera.viewport_half(0.0).is_finite());
}

#[test]
fn uniforms_carry_color_and_point_size() {
    let camera = Camera::default();
    let transform = GroupTransform {
        scale: 0.5,
        rotation_y: 0.0,
    };
    let u = ParticleUniforms::new(&camera, transform, [0.2, 0.4, 0.6]);
    assert_eq!(u.color, [0.2, 0.4, 0.6, POINT_OPACITY]);
    assert_eq!(u.params[0], POINT_SIZE);
    let model = glam::Mat4::from_cols_array_2d(&u.model);
    let p = model * Vec4::new(1.0, 0.0, 0.0, 1.0);
    assert!((p.x - 0.5).abs() < 1e-6);
    assert_eq!(std::mem::size_of::<ParticleUniforms>(), 4 * 16 * 3 + 4 * 4 * 2);
}

#[test]
fn shader_declares_both_entry_points() {
    assert!(PARTICLES_WGSL.contains("fn vs_main"));
    assert!(PARTICLES_WGSL.contains("fn fs_main"));
}
