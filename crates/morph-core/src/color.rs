use crate::error::ColorParseError;

/// Parse `#rrggbb` or `#rgb` into linear-ish 0..1 RGB (no gamma conversion).
pub fn parse_hex_color(s: &str) -> Result<[f32; 3], ColorParseError> {
    let s = s.trim();
    let hex = s
        .strip_prefix('#')
        .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorParseError::BadDigit(s.to_string()));
    }
    let channel = |digits: &str| -> Result<f32, ColorParseError> {
        u8::from_str_radix(digits, 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|_| ColorParseError::BadDigit(s.to_string()))
    };
    match hex.len() {
        6 => Ok([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?]),
        3 => {
            let expand = |i: usize| hex[i..i + 1].repeat(2);
            Ok([
                channel(&expand(0))?,
                channel(&expand(1))?,
                channel(&expand(2))?,
            ])
        }
        _ => Err(ColorParseError::BadLength(s.to_string())),
    }
}

/// Palette the native front-end cycles through with `C`.
pub const PALETTE: [&str; 6] = ["#ff0055", "#ffb400", "#00e5ff", "#7cff4f", "#b066ff", "#ffffff"];
