// Shadow Service
// Expands the five shadow primitives and the shadow colour into the eight box-shadow presets

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{ShadowBaseValues, ShadowPreset, ShadowPresetValues, ThemeTokens, ThemeVariable};
use crate::services::color::{color_string_to_hex, format_number, hex_to_rgb};

const LEADING_FLOAT_PATTERN: &str = r"^\s*[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?";
const DEFAULT_OPACITY: f64 = 0.1;

static LEADING_FLOAT_REGEX: OnceLock<Regex> = OnceLock::new();

/// One layer of a preset, expressed relative to the base values.
/// Unset scales keep the base value.
#[derive(Debug, Clone, Copy)]
struct LayerRule {
    y_scale: f64,
    blur_scale: f64,
    zero_spread: bool,
    opacity_scale: f64,
}

const BASE_LAYER: LayerRule = LayerRule {
    y_scale: 1.0,
    blur_scale: 1.0,
    zero_spread: false,
    opacity_scale: 1.0,
};

const ZERO_SPREAD_LAYER: LayerRule = LayerRule {
    zero_spread: true,
    ..BASE_LAYER
};

const fn offset_layer(y_scale: f64, blur_scale: f64) -> LayerRule {
    LayerRule {
        y_scale,
        blur_scale,
        zero_spread: true,
        opacity_scale: 1.0,
    }
}

const fn faded_layer(opacity_scale: f64) -> LayerRule {
    LayerRule {
        opacity_scale,
        ..BASE_LAYER
    }
}

fn preset_layers(preset: ShadowPreset) -> &'static [LayerRule] {
    const TWO_XS: &[LayerRule] = &[faded_layer(0.5)];
    const SM: &[LayerRule] = &[BASE_LAYER, ZERO_SPREAD_LAYER];
    const MD: &[LayerRule] = &[BASE_LAYER, offset_layer(2.0, 2.0)];
    const LG: &[LayerRule] = &[BASE_LAYER, offset_layer(4.0, 3.0)];
    const XL: &[LayerRule] = &[BASE_LAYER, offset_layer(8.0, 5.0)];
    const TWO_XL: &[LayerRule] = &[faded_layer(2.5)];

    match preset {
        ShadowPreset::TwoXs | ShadowPreset::Xs => TWO_XS,
        ShadowPreset::Sm | ShadowPreset::Base => SM,
        ShadowPreset::Md => MD,
        ShadowPreset::Lg => LG,
        ShadowPreset::Xl => XL,
        ShadowPreset::TwoXl => TWO_XL,
    }
}

/// Build every preset from the base recipe. An invalid `hex_color` renders
/// black at the computed opacity.
pub fn build_shadow_presets(base: &ShadowBaseValues, hex_color: &str) -> ShadowPresetValues {
    ShadowPreset::ALL
        .into_iter()
        .map(|preset| {
            let layers: Vec<String> = preset_layers(preset)
                .iter()
                .map(|rule| format_layer(base, hex_color, rule))
                .collect();
            (preset, layers.join(", "))
        })
        .collect()
}

/// Read the primitives out of a token set. Values that do not start with a
/// number count as 0, except opacity which falls back to 0.1.
pub fn derive_shadow_base_values(tokens: &ThemeTokens) -> ShadowBaseValues {
    ShadowBaseValues {
        x: parse_leading_float(tokens.get(ThemeVariable::ShadowX)).unwrap_or(0.0),
        y: parse_leading_float(tokens.get(ThemeVariable::ShadowY)).unwrap_or(0.0),
        blur: parse_leading_float(tokens.get(ThemeVariable::ShadowBlur)).unwrap_or(0.0),
        spread: parse_leading_float(tokens.get(ThemeVariable::ShadowSpread)).unwrap_or(0.0),
        opacity: parse_leading_float(tokens.get(ThemeVariable::ShadowOpacity))
            .unwrap_or(DEFAULT_OPACITY),
    }
}

/// The preset strings currently stored in `tokens`.
pub fn shadow_preset_values(tokens: &ThemeTokens) -> ShadowPresetValues {
    ShadowPreset::ALL
        .into_iter()
        .map(|preset| (preset, tokens.get(preset.variable()).to_string()))
        .collect()
}

/// Recompute the stored presets from the stored primitives and shadow colour.
pub fn sync_shadow_presets(tokens: &mut ThemeTokens) {
    let base = derive_shadow_base_values(tokens);
    let hex = color_string_to_hex(tokens.get(ThemeVariable::ShadowColor));
    for (preset, value) in build_shadow_presets(&base, &hex) {
        tokens.set(preset.variable(), value);
    }
}

/// `parseFloat`-style: the longest numeric prefix, ignoring leading whitespace.
pub fn parse_leading_float(value: &str) -> Option<f64> {
    let regex = LEADING_FLOAT_REGEX.get_or_init(|| Regex::new(LEADING_FLOAT_PATTERN).unwrap());
    let matched = regex.find(value)?;
    matched
        .as_str()
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
}

fn format_layer(base: &ShadowBaseValues, hex_color: &str, rule: &LayerRule) -> String {
    let y = base.y * rule.y_scale;
    let blur = base.blur * rule.blur_scale;
    let spread = if rule.zero_spread { 0.0 } else { base.spread };
    let opacity = (base.opacity * rule.opacity_scale).clamp(0.0, 1.0);

    format!(
        "{}px {}px {}px {}px {}",
        format_number(base.x),
        format_number(y),
        format_number(blur),
        format_number(spread),
        rgba(hex_color, opacity)
    )
}

fn rgba(hex_color: &str, alpha: f64) -> String {
    let (r, g, b) = hex_to_rgb(hex_color).unwrap_or((0, 0, 0));
    format!("rgba({r}, {g}, {b}, {})", format_number(alpha))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThemeMode;

    fn base(x: f64, y: f64, blur: f64, spread: f64, opacity: f64) -> ShadowBaseValues {
        ShadowBaseValues {
            x,
            y,
            blur,
            spread,
            opacity,
        }
    }

    #[test]
    fn test_md_doubles_offset_and_blur() {
        let presets = build_shadow_presets(&base(0.0, 2.0, 4.0, 0.0, 0.1), "#000000");
        assert_eq!(
            presets[&ShadowPreset::Md],
            "0px 2px 4px 0px rgba(0, 0, 0, 0.1), 0px 4px 8px 0px rgba(0, 0, 0, 0.1)"
        );
    }

    #[test]
    fn test_layer_rules() {
        let presets = build_shadow_presets(&base(1.0, 2.0, 4.0, 3.0, 0.2), "#336699");

        assert_eq!(presets.len(), 8);
        assert_eq!(presets[&ShadowPreset::TwoXs], "1px 2px 4px 3px rgba(51, 102, 153, 0.1)");
        assert_eq!(presets[&ShadowPreset::Xs], presets[&ShadowPreset::TwoXs]);
        assert_eq!(
            presets[&ShadowPreset::Sm],
            "1px 2px 4px 3px rgba(51, 102, 153, 0.2), 1px 2px 4px 0px rgba(51, 102, 153, 0.2)"
        );
        assert_eq!(presets[&ShadowPreset::Base], presets[&ShadowPreset::Sm]);
        assert!(presets[&ShadowPreset::Lg].ends_with("1px 8px 12px 0px rgba(51, 102, 153, 0.2)"));
        assert!(presets[&ShadowPreset::Xl].ends_with("1px 16px 20px 0px rgba(51, 102, 153, 0.2)"));
        assert_eq!(presets[&ShadowPreset::TwoXl], "1px 2px 4px 3px rgba(51, 102, 153, 0.5)");
    }

    #[test]
    fn test_opacity_is_clamped() {
        let presets = build_shadow_presets(&base(0.0, 1.0, 3.0, 0.0, 0.8), "#000");
        assert!(presets[&ShadowPreset::TwoXl].ends_with("rgba(0, 0, 0, 1)"));

        let presets = build_shadow_presets(&base(0.0, 1.0, 3.0, 0.0, -0.4), "#000");
        assert!(presets[&ShadowPreset::Md].ends_with("rgba(0, 0, 0, 0)"));
    }

    #[test]
    fn test_invalid_color_falls_back_to_black() {
        let presets = build_shadow_presets(&base(0.0, 1.0, 3.0, 0.0, 0.1), "hsl(0 0% 0%)");
        assert_eq!(presets[&ShadowPreset::TwoXs], "0px 1px 3px 0px rgba(0, 0, 0, 0.05)");
    }

    #[test]
    fn test_derive_base_values() {
        let mut tokens = ThemeTokens::default_for(ThemeMode::Light);
        assert_eq!(derive_shadow_base_values(&tokens), base(0.0, 1.0, 3.0, 0.0, 0.1));

        tokens.set(ThemeVariable::ShadowX, "-2.5px");
        tokens.set(ThemeVariable::ShadowBlur, "wide");
        tokens.set(ThemeVariable::ShadowOpacity, "");
        let values = derive_shadow_base_values(&tokens);
        assert_eq!(values.x, -2.5);
        assert_eq!(values.blur, 0.0);
        assert_eq!(values.opacity, 0.1);
    }

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("12px"), Some(12.0));
        assert_eq!(parse_leading_float("  .5rem"), Some(0.5));
        assert_eq!(parse_leading_float("1e2"), Some(100.0));
        assert_eq!(parse_leading_float("px12"), None);
        assert_eq!(parse_leading_float(""), None);
    }

    #[test]
    fn test_default_presets_match_recipe() {
        for mode in ThemeMode::ALL {
            let defaults = ThemeTokens::default_for(mode);
            let mut synced = defaults.clone();
            sync_shadow_presets(&mut synced);
            assert_eq!(synced, defaults);
        }
    }

    #[test]
    fn test_sync_uses_shadow_color() {
        let mut tokens = ThemeTokens::default_for(ThemeMode::Light);
        tokens.set(ThemeVariable::ShadowColor, "hsl(0 100% 50%)");
        tokens.set(ThemeVariable::ShadowY, "2px");
        sync_shadow_presets(&mut tokens);

        let presets = shadow_preset_values(&tokens);
        assert_eq!(presets[&ShadowPreset::TwoXs], "0px 2px 3px 0px rgba(255, 0, 0, 0.05)");
    }
}
