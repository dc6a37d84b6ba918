// Mode Conversion
// Derives a plausible opposite-mode palette by remapping OKLCH lightness and chroma

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{ThemeMode, ThemeTokens, ThemeVariable};
use crate::services::color::hex_to_oklch;

const OKLCH_PATTERN: &str = r"(?i)oklch\(([^)]+)\)";
const HEX_PATTERN: &str = r"(?i)^#([0-9a-f]{3,8})$";

const DARK_LIGHTNESS_FLOOR: f64 = 0.18;
const DARK_LIGHTNESS_RANGE: f64 = 0.7;
const LIGHT_LIGHTNESS_CEILING: f64 = 0.96;
const LIGHT_LIGHTNESS_RANGE: f64 = 0.6;
const DARK_CHROMA_MAX: f64 = 0.33;
const LIGHT_CHROMA_MAX: f64 = 0.4;

static OKLCH_REGEX: OnceLock<Regex> = OnceLock::new();
static HEX_REGEX: OnceLock<Regex> = OnceLock::new();

/// Lightness, chroma, hue
type OklchTuple = (f64, f64, f64);

/// Re-derive every colour token for `target`. Non-colour tokens and colours
/// that do not parse are passed through untouched. Hue is preserved.
///
/// This is not an inverse: light -> dark -> light does not restore the input.
pub fn convert_tokens_for_mode(tokens: &ThemeTokens, target: ThemeMode) -> ThemeTokens {
    let mut next = tokens.clone();

    for variable in ThemeVariable::color_variables() {
        let Some((lightness, chroma, hue)) = parse_oklch(tokens.get(variable)) else {
            log::debug!("Skipping {variable}: not an OKLCH or hex value");
            continue;
        };

        let next_lightness = transform_lightness(lightness, target);
        let next_chroma = transform_chroma(lightness, chroma, target);
        next.set(variable, format_oklch((next_lightness, next_chroma, hue)));
    }

    next
}

/// Accepts `oklch(L C H)` (commas, slashes and percentages tolerated) or a
/// hex colour.
pub fn parse_oklch(value: &str) -> Option<OklchTuple> {
    let oklch_regex = OKLCH_REGEX.get_or_init(|| Regex::new(OKLCH_PATTERN).unwrap());

    if let Some(captures) = oklch_regex.captures(value) {
        let parts: Vec<&str> = captures
            .get(1)?
            .as_str()
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .take(3)
            .collect();
        if parts.len() != 3 {
            return None;
        }

        let lightness = parse_channel(parts[0], 1.0)?;
        let chroma = parse_channel(parts[1], 0.4)?;
        let hue = parse_channel(parts[2], 1.0)?;
        return Some((lightness, chroma, hue));
    }

    let hex_regex = HEX_REGEX.get_or_init(|| Regex::new(HEX_PATTERN).unwrap());
    if hex_regex.is_match(value.trim()) {
        return parse_oklch(&hex_to_oklch(value)?);
    }

    None
}

pub fn transform_lightness(lightness: f64, target: ThemeMode) -> f64 {
    let lightness = clamp01(lightness);
    match target {
        ThemeMode::Dark => clamp01(DARK_LIGHTNESS_FLOOR + (1.0 - lightness) * DARK_LIGHTNESS_RANGE),
        ThemeMode::Light => {
            clamp01(LIGHT_LIGHTNESS_CEILING - (1.0 - lightness) * LIGHT_LIGHTNESS_RANGE)
        }
    }
}

pub fn transform_chroma(lightness: f64, chroma: f64, target: ThemeMode) -> f64 {
    let lightness = clamp01(lightness);
    let chroma = clamp01(chroma);
    match target {
        ThemeMode::Dark => {
            let factor = 0.75 - 0.25 * (1.0 - lightness);
            (chroma * factor).min(DARK_CHROMA_MAX)
        }
        ThemeMode::Light => {
            let mid_boost = 0.1 * (1.0 - (lightness - 0.5).abs() * 2.0);
            (chroma * (1.0 + mid_boost)).min(LIGHT_CHROMA_MAX)
        }
    }
}

fn format_oklch((lightness, chroma, hue): OklchTuple) -> String {
    format!("oklch({lightness:.3} {chroma:.3} {hue:.1})")
}

/// Strips units (`deg`) and scales percentages by `percent_scale`.
fn parse_channel(raw: &str, percent_scale: f64) -> Option<f64> {
    let is_percent = raw.ends_with('%');
    let raw = raw.strip_suffix("deg").unwrap_or(raw);
    let numeric: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
        .collect();
    let value = numeric.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if is_percent { value / 100.0 * percent_scale } else { value })
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lightness_of(value: &str) -> f64 {
        parse_oklch(value).unwrap().0
    }

    #[test]
    fn test_parse_oklch_variants() {
        assert_eq!(parse_oklch("oklch(0.5 0.1 200)"), Some((0.5, 0.1, 200.0)));
        assert_eq!(parse_oklch("oklch(0.5, 0.1, 200)"), Some((0.5, 0.1, 200.0)));
        assert_eq!(parse_oklch("oklch(1 0 0 / 10%)"), Some((1.0, 0.0, 0.0)));
        assert_eq!(parse_oklch("oklch(50% 0.1 120deg)"), Some((0.5, 0.1, 120.0)));
        assert_eq!(parse_oklch("oklch(0.7 0.05 45.5deg)"), Some((0.7, 0.05, 45.5)));
        assert_eq!(parse_oklch("oklch(0.5 0.1)"), None);
        assert_eq!(parse_oklch("hsl(0 0% 0%)"), None);
        assert_eq!(parse_oklch("0.25rem"), None);
        assert_eq!(parse_oklch("#ffffff"), Some((1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_dark_formula() {
        // L=1 -> 0.18, chroma factor 0.75
        assert_eq!(transform_lightness(1.0, ThemeMode::Dark), 0.18);
        assert!((transform_chroma(1.0, 0.2, ThemeMode::Dark) - 0.15).abs() < 1e-12);
        // L=0 -> 0.88, chroma factor 0.5
        assert!((transform_lightness(0.0, ThemeMode::Dark) - 0.88).abs() < 1e-12);
        assert!((transform_chroma(0.0, 0.2, ThemeMode::Dark) - 0.1).abs() < 1e-12);
        // capped
        assert_eq!(transform_chroma(1.0, 0.9, ThemeMode::Dark), 0.33);
    }

    #[test]
    fn test_light_formula() {
        assert_eq!(transform_lightness(1.0, ThemeMode::Light), 0.96);
        assert!((transform_lightness(0.0, ThemeMode::Light) - 0.36).abs() < 1e-12);
        // mid lightness gets the full 10% boost
        assert!((transform_chroma(0.5, 0.2, ThemeMode::Light) - 0.22).abs() < 1e-12);
        // extremes get none
        assert!((transform_chroma(1.0, 0.2, ThemeMode::Light) - 0.2).abs() < 1e-12);
        assert_eq!(transform_chroma(0.5, 0.39, ThemeMode::Light), 0.4);
    }

    #[test]
    fn test_lightness_bounds_hold_for_all_inputs() {
        for step in 0..=100 {
            let lightness = f64::from(step) / 100.0;
            let dark = transform_lightness(lightness, ThemeMode::Dark);
            let light = transform_lightness(lightness, ThemeMode::Light);
            assert!((0.18..=0.88 + 1e-12).contains(&dark), "{lightness} -> {dark}");
            assert!((0.36 - 1e-12..=0.96).contains(&light), "{lightness} -> {light}");
        }
        // out of range input is clamped first
        assert_eq!(transform_lightness(1.7, ThemeMode::Dark), 0.18);
        assert!((transform_lightness(-0.5, ThemeMode::Light) - 0.36).abs() < 1e-12);
    }

    #[test]
    fn test_convert_tokens_for_mode() {
        let light = ThemeTokens::default_for(ThemeMode::Light);
        let dark = convert_tokens_for_mode(&light, ThemeMode::Dark);

        // white background becomes a dark surface
        assert_eq!(dark.get(ThemeVariable::Background), "oklch(0.180 0.000 0.0)");
        // near-black foreground becomes light but never white
        let foreground = lightness_of(dark.get(ThemeVariable::Foreground));
        assert!(foreground > 0.7 && foreground <= 0.88);

        // hue is preserved
        let destructive = parse_oklch(dark.get(ThemeVariable::Destructive)).unwrap();
        assert!((destructive.2 - 27.3).abs() < 0.05);

        // non-colour tokens are untouched
        assert_eq!(dark.get(ThemeVariable::Radius), light.get(ThemeVariable::Radius));
        assert_eq!(dark.get(ThemeVariable::ShadowColor), light.get(ThemeVariable::ShadowColor));
        assert_eq!(dark.get(ThemeVariable::FontSans), light.get(ThemeVariable::FontSans));
    }

    #[test]
    fn test_unparseable_colors_pass_through() {
        let mut tokens = ThemeTokens::default_for(ThemeMode::Light);
        tokens.set(ThemeVariable::Primary, "var(--brand)");
        let converted = convert_tokens_for_mode(&tokens, ThemeMode::Dark);
        assert_eq!(converted.get(ThemeVariable::Primary), "var(--brand)");
    }

    #[test]
    fn test_hex_tokens_are_converted() {
        let mut tokens = ThemeTokens::default_for(ThemeMode::Light);
        tokens.set(ThemeVariable::Primary, "#ffffff");
        let converted = convert_tokens_for_mode(&tokens, ThemeMode::Dark);
        assert_eq!(converted.get(ThemeVariable::Primary), "oklch(0.180 0.000 0.0)");
    }

    #[test]
    fn test_degree_hues_are_converted() {
        let mut tokens = ThemeTokens::default_for(ThemeMode::Light);
        tokens.set(ThemeVariable::Primary, "oklch(1 0 120deg)");
        let converted = convert_tokens_for_mode(&tokens, ThemeMode::Dark);
        assert_eq!(converted.get(ThemeVariable::Primary), "oklch(0.180 0.000 120.0)");
    }

    #[test]
    fn test_round_trip_is_not_an_involution() {
        let light = ThemeTokens::default_for(ThemeMode::Light);
        let back = convert_tokens_for_mode(
            &convert_tokens_for_mode(&light, ThemeMode::Dark),
            ThemeMode::Light,
        );
        assert_ne!(back.get(ThemeVariable::Background), light.get(ThemeVariable::Background));
        // but the conversion itself is deterministic
        assert_eq!(
            convert_tokens_for_mode(&light, ThemeMode::Dark),
            convert_tokens_for_mode(&light, ThemeMode::Dark)
        );
    }
}
