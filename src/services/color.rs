// Color Service
// Conversions between the hex, OKLCH and HSL token representations

use std::sync::OnceLock;

use palette::{FromColor, Hsl, Oklch, Srgb};
use regex::Regex;

const HEX_PATTERN: &str = r"(?i)^#([0-9a-f]{3}|[0-9a-f]{6})$";
const FUNCTION_PATTERN: &str = r"(?i)^(oklch|hsla?|rgba?)\(\s*([^)]*)\)$";
const FALLBACK_HEX: &str = "#000000";

static HEX_REGEX: OnceLock<Regex> = OnceLock::new();
static FUNCTION_REGEX: OnceLock<Regex> = OnceLock::new();

const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("lime", (0, 255, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("cyan", (0, 255, 255)),
    ("aqua", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
    ("fuchsia", (255, 0, 255)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("silver", (192, 192, 192)),
    ("maroon", (128, 0, 0)),
    ("olive", (128, 128, 0)),
    ("navy", (0, 0, 128)),
    ("purple", (128, 0, 128)),
    ("teal", (0, 128, 128)),
    ("orange", (255, 165, 0)),
    ("pink", (255, 192, 203)),
    ("brown", (165, 42, 42)),
    ("indigo", (75, 0, 130)),
    ("violet", (238, 130, 238)),
    ("gold", (255, 215, 0)),
    ("coral", (255, 127, 80)),
    ("salmon", (250, 128, 114)),
    ("crimson", (220, 20, 60)),
    ("slategray", (112, 128, 144)),
    ("whitesmoke", (245, 245, 245)),
    ("transparent", (0, 0, 0)),
];

fn hex_regex() -> &'static Regex {
    HEX_REGEX.get_or_init(|| Regex::new(HEX_PATTERN).expect("valid hex regex"))
}

fn function_regex() -> &'static Regex {
    FUNCTION_REGEX.get_or_init(|| Regex::new(FUNCTION_PATTERN).expect("valid color function regex"))
}

/// The single validity gate for hex input: `#rgb` or `#rrggbb`, any case,
/// surrounding whitespace ignored.
pub fn is_hex_color(value: &str) -> bool {
    hex_regex().is_match(value.trim())
}

/// Parse a 3 or 6 digit hex colour into 8-bit channels.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    if !is_hex_color(hex) {
        return None;
    }
    parse_hex_digits(hex.trim().trim_start_matches('#'))
}

/// `#rrggbb` to `oklch(L C H)` with four decimals per channel.
/// Returns `None` for anything that is not a hex colour.
pub fn hex_to_oklch(hex: &str) -> Option<String> {
    let (r, g, b) = hex_to_rgb(hex)?;
    let oklch: Oklch<f64> = Oklch::from_color(srgb_from_u8(r, g, b));

    let lightness = round_to(oklch.l, 4);
    let chroma = round_to(oklch.chroma, 4);
    // Hue is meaningless for greys
    let hue = if chroma == 0.0 {
        0.0
    } else {
        round_to(finite_or_zero(oklch.hue.into_positive_degrees()), 4)
    };

    Some(format!(
        "oklch({} {} {})",
        format_number(lightness),
        format_number(chroma),
        format_number(hue)
    ))
}

/// `#rrggbb` to `hsl(H S% L%)` with two decimals per channel.
pub fn hex_to_hsl(hex: &str) -> Option<String> {
    let (r, g, b) = hex_to_rgb(hex)?;
    let hsl: Hsl<palette::encoding::Srgb, f64> = Hsl::from_color(srgb_from_u8(r, g, b));

    let saturation = round_to(finite_or_zero(hsl.saturation) * 100.0, 2);
    let lightness = round_to(finite_or_zero(hsl.lightness) * 100.0, 2);
    let hue = if saturation == 0.0 {
        0.0
    } else {
        round_to(finite_or_zero(hsl.hue.into_positive_degrees()), 2)
    };

    Some(format!(
        "hsl({} {}% {}%)",
        format_number(hue),
        format_number(saturation),
        format_number(lightness)
    ))
}

/// Any supported CSS colour to `#rrggbb`. Never fails: unparseable input
/// renders as black so swatches always have something to show.
pub fn oklch_to_hex(value: &str) -> String {
    color_string_to_hex(value)
}

/// Same as [`oklch_to_hex`]; accepts hex, `oklch()`, `hsl()`, `rgb()` and
/// common named colours.
pub fn color_string_to_hex(value: &str) -> String {
    match parse_css_color(value) {
        Some(color) => format_hex(color),
        None => {
            log::debug!("Unparseable color value '{value}', using {FALLBACK_HEX}");
            FALLBACK_HEX.to_string()
        }
    }
}

/// Parse a CSS colour into gamut-clamped sRGB. Alpha is ignored.
pub fn parse_css_color(value: &str) -> Option<Srgb<f64>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(digits) = value.strip_prefix('#') {
        let (r, g, b) = parse_hex_digits(digits)?;
        return Some(srgb_from_u8(r, g, b));
    }

    let lower = value.to_ascii_lowercase();
    if let Some((_, (r, g, b))) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        return Some(srgb_from_u8(*r, *g, *b));
    }

    let captures = function_regex().captures(value)?;
    let function = captures.get(1)?.as_str().to_ascii_lowercase();
    let args = split_color_args(captures.get(2)?.as_str());
    if args.len() < 3 {
        return None;
    }

    let color: Srgb<f64> = match function.as_str() {
        "oklch" => {
            let lightness = parse_component(args[0], 1.0)?;
            let chroma = parse_component(args[1], 0.4)?;
            let hue = parse_hue(args[2])?;
            Srgb::from_color(Oklch::new(lightness, chroma, hue))
        }
        "hsl" | "hsla" => {
            let hue = parse_hue(args[0])?;
            let saturation = parse_component(args[1], 1.0)?;
            let lightness = parse_component(args[2], 1.0)?;
            let saturation = if args[1].ends_with('%') { saturation } else { saturation / 100.0 };
            let lightness = if args[2].ends_with('%') { lightness } else { lightness / 100.0 };
            let hsl: Hsl<palette::encoding::Srgb, f64> = Hsl::new(hue, saturation, lightness);
            Srgb::from_color(hsl)
        }
        _ => {
            let r = parse_component(args[0], 255.0)? / 255.0;
            let g = parse_component(args[1], 255.0)? / 255.0;
            let b = parse_component(args[2], 255.0)? / 255.0;
            Srgb::new(r, g, b)
        }
    };

    Some(clamp_srgb(color))
}

/// Round to `precision` decimals, normalising `-0`.
pub fn round_to(value: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Shortest decimal rendering of a number (`1`, `0.5`, `0.0375`).
pub fn format_number(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

fn parse_hex_digits(digits: &str) -> Option<(u8, u8, u8)> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expand = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v * 17);
    let pair = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        3 | 4 => Some((expand(&digits[0..1])?, expand(&digits[1..2])?, expand(&digits[2..3])?)),
        6 | 8 => Some((pair(&digits[0..2])?, pair(&digits[2..4])?, pair(&digits[4..6])?)),
        _ => None,
    }
}

fn split_color_args(raw: &str) -> Vec<&str> {
    raw.split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect()
}

/// A number, a percentage of `percent_scale`, or `none`.
fn parse_component(raw: &str, percent_scale: f64) -> Option<f64> {
    if raw.eq_ignore_ascii_case("none") {
        return Some(0.0);
    }
    let value = match raw.strip_suffix('%') {
        Some(number) => number.parse::<f64>().ok()? / 100.0 * percent_scale,
        None => raw.parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

fn parse_hue(raw: &str) -> Option<f64> {
    if raw.eq_ignore_ascii_case("none") {
        return Some(0.0);
    }
    let number = raw.strip_suffix("deg").unwrap_or(raw);
    let value = number.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

fn srgb_from_u8(r: u8, g: u8, b: u8) -> Srgb<f64> {
    Srgb::new(
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
    )
}

fn clamp_srgb(color: Srgb<f64>) -> Srgb<f64> {
    let clamp = |c: f64| if c.is_finite() { c.clamp(0.0, 1.0) } else { 0.0 };
    Srgb::new(clamp(color.red), clamp(color.green), clamp(color.blue))
}

fn format_hex(color: Srgb<f64>) -> String {
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(color.red),
        channel(color.green),
        channel(color.blue)
    )
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
