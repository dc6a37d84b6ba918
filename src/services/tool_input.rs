// Tool Input
// Typed parse of the `updateThemeTokens` tool-call arguments produced by the model

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{ThemeMode, ThemeUpdateMarkerPayload, ThemeVariable, TokenCategory};
use crate::services::color::format_number;

const TOOL_HEX_PATTERN: &str = r"^#[0-9a-fA-F]{6}$";
const STEP_TOLERANCE: f64 = 1e-9;

static TOOL_HEX_REGEX: OnceLock<Regex> = OnceLock::new();

pub const SANS_FONT_STACKS: [&str; 12] = [
    r#""Inter", "Plus Jakarta Sans", "IBM Plex Sans", system-ui, -apple-system, sans-serif"#,
    r#""Plus Jakarta Sans", "Inter", "Manrope", sans-serif"#,
    r#""IBM Plex Sans", "Inter", "Roboto", sans-serif"#,
    r#""Manrope", "Inter", "Mulish", sans-serif"#,
    r#""Work Sans", "Inter", "Source Sans Pro", sans-serif"#,
    r#""Nunito", "Poppins", "Inter", sans-serif"#,
    r#""Poppins", "Montserrat", "Inter", sans-serif"#,
    r#""Montserrat", "Poppins", "Inter", sans-serif"#,
    r#""Roboto", "Inter", "Open Sans", sans-serif"#,
    r#""Open Sans", "Roboto", "Inter", sans-serif"#,
    r#""Source Sans Pro", "Inter", "Roboto", sans-serif"#,
    r#""Mulish", "Manrope", "Inter", sans-serif"#,
];

pub const SERIF_FONT_STACKS: [&str; 14] = [
    r#""Playfair Display", "Lora", "Merriweather", serif"#,
    r#""Merriweather", "Source Serif 4", "Lora", serif"#,
    r#""Lora", "Merriweather", "Libre Baskerville", serif"#,
    r#""Libre Baskerville", "Lora", "Merriweather", serif"#,
    r#""Source Serif 4", "Merriweather", "Lora", serif"#,
    r#""Spectral", "Source Serif 4", "Merriweather", serif"#,
    r#""Cormorant Garamond", "EB Garamond", "Lora", serif"#,
    r#""Bitter", "Merriweather", "Lora", serif"#,
    r#""Crimson Text", "Libre Baskerville", "Lora", serif"#,
    r#""PT Serif", "Merriweather", "Source Serif 4", serif"#,
    r#""EB Garamond", "Cormorant Garamond", "Lora", serif"#,
    r#""DM Serif Display", "Playfair Display", "Spectral", serif"#,
    r#""Vollkorn", "Merriweather", "Bitter", serif"#,
    r#""Literata", "Merriweather", "Lora", serif"#,
];

pub const MONO_FONT_STACKS: [&str; 14] = [
    r#""JetBrains Mono", "Fira Code", "Menlo", "Source Code Pro", monospace"#,
    r#""Fira Code", "JetBrains Mono", "Menlo", "Source Code Pro", monospace"#,
    r#""IBM Plex Mono", "JetBrains Mono", "Fira Code", "Menlo", monospace"#,
    r#""Source Code Pro", "JetBrains Mono", "Fira Code", monospace"#,
    r#""Inconsolata", "JetBrains Mono", "Fira Code", monospace"#,
    r#""Menlo", "JetBrains Mono", "Fira Code", "Consolas", monospace"#,
    r#""Consolas", "Menlo", "JetBrains Mono", monospace"#,
    r#""Courier Prime", "Inconsolata", "Roboto Mono", monospace"#,
    r#""Ubuntu Mono", "JetBrains Mono", "Fira Code", monospace"#,
    r#""Space Mono", "IBM Plex Mono", "JetBrains Mono", monospace"#,
    r#""Cascadia Code", "Fira Code", "JetBrains Mono", monospace"#,
    r#""Roboto Mono", "Source Code Pro", "JetBrains Mono", monospace"#,
    r#""PT Mono", "IBM Plex Mono", "JetBrains Mono", monospace"#,
    r#""Noto Mono", "Roboto Mono", "Source Code Pro", monospace"#,
];

/// Validation failures for tool-call arguments
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolInputError {
    #[error("Tool input must be a JSON object")]
    NotAnObject,

    #[error("Invalid targetMode: {0}")]
    InvalidMode(String),

    #[error("updates must be an object of token values")]
    InvalidUpdates,

    #[error("Unknown theme token: {0}")]
    UnknownVariable(String),

    #[error("{0} is derived from the shadow settings and cannot be set directly")]
    NotEditable(ThemeVariable),

    #[error("Invalid hex color for {variable}: {value}. Use 6-digit format like #123456")]
    InvalidColor { variable: ThemeVariable, value: String },

    #[error("Unsupported font stack for {variable}: {value}")]
    UnknownFontStack { variable: ThemeVariable, value: String },

    #[error("{variable} must be a finite number")]
    NotANumber { variable: ThemeVariable },

    #[error("{variable} must be between {min} and {max}, got {value}")]
    OutOfRange {
        variable: ThemeVariable,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{variable} must be a multiple of {step}, got {value}")]
    OffStep {
        variable: ThemeVariable,
        value: f64,
        step: f64,
    },
}

/// Slider bounds for a numeric token
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl NumericRange {
    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn for_variable(variable: ThemeVariable) -> Option<NumericRange> {
        match variable {
            ThemeVariable::Spacing => Some(Self::new(0.125, 1.0, 0.025)),
            ThemeVariable::Radius => Some(Self::new(0.0, 2.0, 0.05)),
            ThemeVariable::TrackingNormal => Some(Self::new(-0.05, 0.1, 0.025)),
            ThemeVariable::ShadowX | ThemeVariable::ShadowY | ThemeVariable::ShadowSpread => {
                Some(Self::new(-40.0, 40.0, 1.0))
            }
            ThemeVariable::ShadowBlur => Some(Self::new(0.0, 120.0, 1.0)),
            ThemeVariable::ShadowOpacity => Some(Self::new(0.0, 1.0, 0.05)),
            _ => None,
        }
    }

    fn check(&self, variable: ThemeVariable, value: f64) -> Result<(), ToolInputError> {
        if value < self.min - STEP_TOLERANCE || value > self.max + STEP_TOLERANCE {
            return Err(ToolInputError::OutOfRange {
                variable,
                value,
                min: self.min,
                max: self.max,
            });
        }
        let steps = (value - self.min) / self.step;
        if (steps - steps.round()).abs() > 1e-6 {
            return Err(ToolInputError::OffStep {
                variable,
                value,
                step: self.step,
            });
        }
        Ok(())
    }
}

/// One validated value from the tool call
#[derive(Debug, Clone, PartialEq)]
pub enum TokenUpdate {
    /// `#rrggbb`
    Hex(String),
    FontStack(String),
    Number(f64),
}

impl TokenUpdate {
    /// The literal carried in the marker: numbers gain their unit.
    pub fn to_marker_value(&self, variable: ThemeVariable) -> String {
        match self {
            TokenUpdate::Hex(hex) => hex.clone(),
            TokenUpdate::FontStack(stack) => stack.clone(),
            TokenUpdate::Number(number) => {
                let unit = match variable.category() {
                    TokenCategory::Length(unit) => unit.as_str(),
                    _ => "",
                };
                format!("{}{unit}", format_number(*number))
            }
        }
    }
}

/// Validated `{targetMode, updates}` arguments
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeUpdateArgs {
    pub target_mode: ThemeMode,
    pub updates: BTreeMap<ThemeVariable, TokenUpdate>,
}

impl ThemeUpdateArgs {
    pub fn from_value(input: &Value) -> Result<Self, ToolInputError> {
        let object = input.as_object().ok_or(ToolInputError::NotAnObject)?;

        let target_mode = match object.get("targetMode") {
            Some(Value::String(mode)) => {
                ThemeMode::from_name(mode).ok_or_else(|| ToolInputError::InvalidMode(mode.clone()))?
            }
            other => {
                return Err(ToolInputError::InvalidMode(
                    other.map(ToString::to_string).unwrap_or_else(|| "missing".to_string()),
                ))
            }
        };

        let updates = match object.get("updates") {
            Some(Value::Object(updates)) => parse_updates(updates)?,
            _ => return Err(ToolInputError::InvalidUpdates),
        };

        Ok(Self {
            target_mode,
            updates,
        })
    }

    pub fn update_count(&self) -> usize {
        self.updates.len()
    }

    /// What the tool reports back to the model.
    pub fn tool_result_message(&self) -> String {
        format!(
            "Validated {} theme token update(s) for the {} palette.",
            self.update_count(),
            self.target_mode.as_str()
        )
    }

    pub fn into_marker_payload(self, tool_call_id: impl Into<String>) -> ThemeUpdateMarkerPayload {
        let updates = self
            .updates
            .iter()
            .map(|(variable, update)| (*variable, Some(update.to_marker_value(*variable))))
            .collect();
        ThemeUpdateMarkerPayload {
            tool_call_id: tool_call_id.into(),
            target_mode: self.target_mode,
            updates,
        }
    }
}

fn parse_updates(
    updates: &Map<String, Value>,
) -> Result<BTreeMap<ThemeVariable, TokenUpdate>, ToolInputError> {
    let mut parsed = BTreeMap::new();
    for (name, value) in updates {
        let variable = ThemeVariable::from_name(name)
            .ok_or_else(|| ToolInputError::UnknownVariable(name.clone()))?;
        if !variable.is_editable() {
            return Err(ToolInputError::NotEditable(variable));
        }
        if value.is_null() {
            continue;
        }
        parsed.insert(variable, parse_update(variable, value)?);
    }
    Ok(parsed)
}

fn parse_update(variable: ThemeVariable, value: &Value) -> Result<TokenUpdate, ToolInputError> {
    match variable.category() {
        TokenCategory::Color | TokenCategory::ShadowColor => {
            let hex_regex = TOOL_HEX_REGEX.get_or_init(|| Regex::new(TOOL_HEX_PATTERN).unwrap());
            match value.as_str() {
                Some(hex) if hex_regex.is_match(hex) => Ok(TokenUpdate::Hex(hex.to_string())),
                _ => Err(ToolInputError::InvalidColor {
                    variable,
                    value: display_value(value),
                }),
            }
        }
        TokenCategory::Font => {
            let stacks: &[&str] = match variable {
                ThemeVariable::FontSerif => &SERIF_FONT_STACKS,
                ThemeVariable::FontMono => &MONO_FONT_STACKS,
                _ => &SANS_FONT_STACKS,
            };
            match value.as_str() {
                Some(stack) if stacks.contains(&stack) => Ok(TokenUpdate::FontStack(stack.to_string())),
                _ => Err(ToolInputError::UnknownFontStack {
                    variable,
                    value: display_value(value),
                }),
            }
        }
        TokenCategory::Length(_) | TokenCategory::Opacity => {
            let number = value
                .as_f64()
                .filter(|number| number.is_finite())
                .ok_or(ToolInputError::NotANumber { variable })?;
            if let Some(range) = NumericRange::for_variable(variable) {
                range.check(variable, number)?;
            }
            Ok(TokenUpdate::Number(number))
        }
        TokenCategory::ShadowPreset => Err(ToolInputError::NotEditable(variable)),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DEFAULT_FONT_MONO, DEFAULT_FONT_SANS, DEFAULT_FONT_SERIF};
    use serde_json::json;

    #[test]
    fn test_parses_valid_input() {
        let args = ThemeUpdateArgs::from_value(&json!({
            "targetMode": "dark",
            "updates": {
                "primary": "#3B82F6",
                "font-mono": MONO_FONT_STACKS[1],
                "radius": 0.5,
                "shadow-opacity": 0.15,
                "tracking-normal": -0.025,
                "accent": null
            }
        }))
        .unwrap();

        assert_eq!(args.target_mode, ThemeMode::Dark);
        assert_eq!(args.update_count(), 5);
        assert_eq!(args.updates[&ThemeVariable::Primary], TokenUpdate::Hex("#3B82F6".to_string()));
        assert_eq!(
            args.tool_result_message(),
            "Validated 5 theme token update(s) for the dark palette."
        );
    }

    #[test]
    fn test_marker_payload_carries_unit_strings() {
        let args = ThemeUpdateArgs::from_value(&json!({
            "targetMode": "light",
            "updates": {
                "radius": 0.5,
                "spacing": 0.3,
                "shadow-y": 2,
                "shadow-opacity": 0.15,
                "tracking-normal": 0.025,
                "shadow-color": "#112233"
            }
        }))
        .unwrap();

        let payload = args.into_marker_payload("call_7");
        assert_eq!(payload.tool_call_id, "call_7");
        assert_eq!(payload.target_mode, ThemeMode::Light);
        let value = |variable: ThemeVariable| payload.updates[&variable].as_deref();
        assert_eq!(value(ThemeVariable::Radius), Some("0.5rem"));
        assert_eq!(value(ThemeVariable::Spacing), Some("0.3rem"));
        assert_eq!(value(ThemeVariable::ShadowY), Some("2px"));
        assert_eq!(value(ThemeVariable::ShadowOpacity), Some("0.15"));
        assert_eq!(value(ThemeVariable::TrackingNormal), Some("0.025em"));
        assert_eq!(value(ThemeVariable::ShadowColor), Some("#112233"));
    }

    #[test]
    fn test_rejects_malformed_input() {
        let cases = [
            (json!("nope"), ToolInputError::NotAnObject),
            (
                json!({"targetMode": "sepia", "updates": {}}),
                ToolInputError::InvalidMode("sepia".to_string()),
            ),
            (json!({"targetMode": "light", "updates": []}), ToolInputError::InvalidUpdates),
            (
                json!({"targetMode": "light", "updates": {"glow": "#ffffff"}}),
                ToolInputError::UnknownVariable("glow".to_string()),
            ),
            (
                json!({"targetMode": "light", "updates": {"shadow-md": "0px 0px"}}),
                ToolInputError::NotEditable(ThemeVariable::ShadowMd),
            ),
            (
                json!({"targetMode": "light", "updates": {"primary": "#fff"}}),
                ToolInputError::InvalidColor {
                    variable: ThemeVariable::Primary,
                    value: "#fff".to_string(),
                },
            ),
            (
                json!({"targetMode": "light", "updates": {"font-sans": "Comic Sans"}}),
                ToolInputError::UnknownFontStack {
                    variable: ThemeVariable::FontSans,
                    value: "Comic Sans".to_string(),
                },
            ),
            (
                json!({"targetMode": "light", "updates": {"radius": "1rem"}}),
                ToolInputError::NotANumber {
                    variable: ThemeVariable::Radius,
                },
            ),
        ];

        for (input, expected) in cases {
            assert_eq!(ThemeUpdateArgs::from_value(&input), Err(expected), "{input}");
        }
        assert!(matches!(
            ThemeUpdateArgs::from_value(&json!({"updates": {}})),
            Err(ToolInputError::InvalidMode(_))
        ));
    }

    #[test]
    fn test_numeric_ranges_and_steps() {
        let check = |name: &str, value: f64| {
            ThemeUpdateArgs::from_value(&json!({
                "targetMode": "light",
                "updates": { name: value }
            }))
        };

        assert!(check("spacing", 0.125).is_ok());
        assert!(check("spacing", 1.0).is_ok());
        assert!(matches!(check("spacing", 0.1), Err(ToolInputError::OutOfRange { .. })));
        assert!(matches!(check("spacing", 0.13), Err(ToolInputError::OffStep { .. })));
        assert!(check("radius", 1.35).is_ok());
        assert!(matches!(check("radius", 2.05), Err(ToolInputError::OutOfRange { .. })));
        assert!(check("tracking-normal", -0.05).is_ok());
        assert!(check("shadow-x", -40.0).is_ok());
        assert!(matches!(check("shadow-blur", -1.0), Err(ToolInputError::OutOfRange { .. })));
        assert!(matches!(check("shadow-y", 1.5), Err(ToolInputError::OffStep { .. })));
        assert!(check("shadow-opacity", 0.35).is_ok());
    }

    #[test]
    fn test_default_fonts_are_enumerated() {
        assert!(SANS_FONT_STACKS.contains(&DEFAULT_FONT_SANS));
        assert!(SERIF_FONT_STACKS.contains(&DEFAULT_FONT_SERIF));
        assert!(MONO_FONT_STACKS.contains(&DEFAULT_FONT_MONO));
    }
}
