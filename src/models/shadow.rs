use std::collections::BTreeMap;

use serde::Serialize;

use super::theme::ThemeVariable;

/// The five numeric inputs of the shadow recipe
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowBaseValues {
    pub x: f64,
    pub y: f64,
    pub blur: f64,
    pub spread: f64,
    pub opacity: f64,
}

/// Named box-shadow tiers, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ShadowPreset {
    #[serde(rename = "shadow-2xs")]
    TwoXs,
    #[serde(rename = "shadow-xs")]
    Xs,
    #[serde(rename = "shadow-sm")]
    Sm,
    #[serde(rename = "shadow")]
    Base,
    #[serde(rename = "shadow-md")]
    Md,
    #[serde(rename = "shadow-lg")]
    Lg,
    #[serde(rename = "shadow-xl")]
    Xl,
    #[serde(rename = "shadow-2xl")]
    TwoXl,
}

impl ShadowPreset {
    pub const ALL: [ShadowPreset; 8] = [
        ShadowPreset::TwoXs,
        ShadowPreset::Xs,
        ShadowPreset::Sm,
        ShadowPreset::Base,
        ShadowPreset::Md,
        ShadowPreset::Lg,
        ShadowPreset::Xl,
        ShadowPreset::TwoXl,
    ];

    pub fn variable(&self) -> ThemeVariable {
        match self {
            ShadowPreset::TwoXs => ThemeVariable::Shadow2xs,
            ShadowPreset::Xs => ThemeVariable::ShadowXs,
            ShadowPreset::Sm => ThemeVariable::ShadowSm,
            ShadowPreset::Base => ThemeVariable::Shadow,
            ShadowPreset::Md => ThemeVariable::ShadowMd,
            ShadowPreset::Lg => ThemeVariable::ShadowLg,
            ShadowPreset::Xl => ThemeVariable::ShadowXl,
            ShadowPreset::TwoXl => ThemeVariable::Shadow2xl,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShadowPreset::TwoXs => "2XS",
            ShadowPreset::Xs => "XS",
            ShadowPreset::Sm => "SM",
            ShadowPreset::Base => "Base",
            ShadowPreset::Md => "MD",
            ShadowPreset::Lg => "LG",
            ShadowPreset::Xl => "XL",
            ShadowPreset::TwoXl => "2XL",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ShadowPreset::TwoXs => "Micro hairline hover.",
            ShadowPreset::Xs => "Subtle cards and chips.",
            ShadowPreset::Sm => "Default buttons and inputs.",
            ShadowPreset::Base => "Same as tailwind `shadow`.",
            ShadowPreset::Md => "Raised cards.",
            ShadowPreset::Lg => "Panels and sheets.",
            ShadowPreset::Xl => "Floating surfaces.",
            ShadowPreset::TwoXl => "Modals and overlays.",
        }
    }
}

/// Full CSS box-shadow string per preset
pub type ShadowPresetValues = BTreeMap<ShadowPreset, String>;
