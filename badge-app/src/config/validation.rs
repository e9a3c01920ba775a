//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

use badge_compositor::IDENTIFIER_RANGE;

static RE_HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?[0-9A-Fa-f]{6}$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "BADGE_TINT_COLOR" | "BADGE_GRADIENT_END" => {
            if !RE_HEX_COLOR.is_match(value) {
                return Err("must be a hex color like #1A2B3C".into());
            }
        }
        "BADGE_TINT_ALPHA" => validate_int_range(value, 0, 255)?,
        "BADGE_BACKGROUND_STYLE" => {
            if value != "flat" && value != "gradient" {
                return Err("must be 'flat' or 'gradient'".into());
            }
        }
        "BADGE_FONT_PATH" => {
            if value.trim().is_empty() {
                return Err("font path must not be empty".into());
            }
        }
        _ => {}
    }
    Ok(())
}

/// Parse a `#RRGGBB` (or `RRGGBB`) color.
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    if !RE_HEX_COLOR.is_match(value) {
        return None;
    }
    let hex = value.trim_start_matches('#');
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Parse a badge number as typed by a user.
///
/// The compositor assumes this check already happened.
pub fn parse_identifier(value: &str) -> Result<u32, String> {
    let n: u32 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if !IDENTIFIER_RANGE.contains(&n) {
        return Err(format!(
            "must be between {} and {}",
            IDENTIFIER_RANGE.start(),
            IDENTIFIER_RANGE.end()
        ));
    }
    Ok(n)
}

fn validate_int_range(value: &str, min: i32, max: i32) -> Result<(), String> {
    let v: i32 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
