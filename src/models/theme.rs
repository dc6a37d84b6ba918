use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::theme_defaults::{DARK_TOKENS, LIGHT_TOKENS};

// Theme mode: light or dark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 2] = [ThemeMode::Light, ThemeMode::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn opposite(&self) -> ThemeMode {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn from_name(name: &str) -> Option<ThemeMode> {
        match name {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }
}

/// Unit suffix carried by numeric tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Rem,
    Em,
    Px,
}

impl LengthUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            LengthUnit::Rem => "rem",
            LengthUnit::Em => "em",
            LengthUnit::Px => "px",
        }
    }
}

/// Syntax family of a token value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    /// Stored as `oklch(L C H)`, edited as hex
    Color,
    /// CSS font-family stack
    Font,
    /// Number followed by a fixed unit
    Length(LengthUnit),
    /// Bare decimal in [0, 1]
    Opacity,
    /// Stored as `hsl(H S% L%)`, edited as hex
    ShadowColor,
    /// Derived box-shadow string, never edited directly
    ShadowPreset,
}

/// Every design token the editor knows about. Serialized as the CSS custom
/// property name without the leading `--`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeVariable {
    Background,
    Foreground,
    Card,
    CardForeground,
    Popover,
    PopoverForeground,
    Primary,
    PrimaryForeground,
    Secondary,
    SecondaryForeground,
    Muted,
    MutedForeground,
    Accent,
    AccentForeground,
    Destructive,
    DestructiveForeground,
    Border,
    Input,
    Ring,
    #[serde(rename = "chart-1")]
    Chart1,
    #[serde(rename = "chart-2")]
    Chart2,
    #[serde(rename = "chart-3")]
    Chart3,
    #[serde(rename = "chart-4")]
    Chart4,
    #[serde(rename = "chart-5")]
    Chart5,
    Sidebar,
    SidebarForeground,
    SidebarPrimary,
    SidebarPrimaryForeground,
    SidebarAccent,
    SidebarAccentForeground,
    SidebarBorder,
    SidebarRing,
    FontSans,
    FontSerif,
    FontMono,
    Radius,
    ShadowX,
    ShadowY,
    ShadowBlur,
    ShadowSpread,
    ShadowOpacity,
    ShadowColor,
    TrackingNormal,
    Spacing,
    #[serde(rename = "shadow-2xs")]
    Shadow2xs,
    ShadowXs,
    ShadowSm,
    Shadow,
    ShadowMd,
    ShadowLg,
    ShadowXl,
    #[serde(rename = "shadow-2xl")]
    Shadow2xl,
}

impl ThemeVariable {
    pub const ALL: [ThemeVariable; 52] = [
        ThemeVariable::Background,
        ThemeVariable::Foreground,
        ThemeVariable::Card,
        ThemeVariable::CardForeground,
        ThemeVariable::Popover,
        ThemeVariable::PopoverForeground,
        ThemeVariable::Primary,
        ThemeVariable::PrimaryForeground,
        ThemeVariable::Secondary,
        ThemeVariable::SecondaryForeground,
        ThemeVariable::Muted,
        ThemeVariable::MutedForeground,
        ThemeVariable::Accent,
        ThemeVariable::AccentForeground,
        ThemeVariable::Destructive,
        ThemeVariable::DestructiveForeground,
        ThemeVariable::Border,
        ThemeVariable::Input,
        ThemeVariable::Ring,
        ThemeVariable::Chart1,
        ThemeVariable::Chart2,
        ThemeVariable::Chart3,
        ThemeVariable::Chart4,
        ThemeVariable::Chart5,
        ThemeVariable::Sidebar,
        ThemeVariable::SidebarForeground,
        ThemeVariable::SidebarPrimary,
        ThemeVariable::SidebarPrimaryForeground,
        ThemeVariable::SidebarAccent,
        ThemeVariable::SidebarAccentForeground,
        ThemeVariable::SidebarBorder,
        ThemeVariable::SidebarRing,
        ThemeVariable::FontSans,
        ThemeVariable::FontSerif,
        ThemeVariable::FontMono,
        ThemeVariable::Radius,
        ThemeVariable::ShadowX,
        ThemeVariable::ShadowY,
        ThemeVariable::ShadowBlur,
        ThemeVariable::ShadowSpread,
        ThemeVariable::ShadowOpacity,
        ThemeVariable::ShadowColor,
        ThemeVariable::TrackingNormal,
        ThemeVariable::Spacing,
        ThemeVariable::Shadow2xs,
        ThemeVariable::ShadowXs,
        ThemeVariable::ShadowSm,
        ThemeVariable::Shadow,
        ThemeVariable::ShadowMd,
        ThemeVariable::ShadowLg,
        ThemeVariable::ShadowXl,
        ThemeVariable::Shadow2xl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeVariable::Background => "background",
            ThemeVariable::Foreground => "foreground",
            ThemeVariable::Card => "card",
            ThemeVariable::CardForeground => "card-foreground",
            ThemeVariable::Popover => "popover",
            ThemeVariable::PopoverForeground => "popover-foreground",
            ThemeVariable::Primary => "primary",
            ThemeVariable::PrimaryForeground => "primary-foreground",
            ThemeVariable::Secondary => "secondary",
            ThemeVariable::SecondaryForeground => "secondary-foreground",
            ThemeVariable::Muted => "muted",
            ThemeVariable::MutedForeground => "muted-foreground",
            ThemeVariable::Accent => "accent",
            ThemeVariable::AccentForeground => "accent-foreground",
            ThemeVariable::Destructive => "destructive",
            ThemeVariable::DestructiveForeground => "destructive-foreground",
            ThemeVariable::Border => "border",
            ThemeVariable::Input => "input",
            ThemeVariable::Ring => "ring",
            ThemeVariable::Chart1 => "chart-1",
            ThemeVariable::Chart2 => "chart-2",
            ThemeVariable::Chart3 => "chart-3",
            ThemeVariable::Chart4 => "chart-4",
            ThemeVariable::Chart5 => "chart-5",
            ThemeVariable::Sidebar => "sidebar",
            ThemeVariable::SidebarForeground => "sidebar-foreground",
            ThemeVariable::SidebarPrimary => "sidebar-primary",
            ThemeVariable::SidebarPrimaryForeground => "sidebar-primary-foreground",
            ThemeVariable::SidebarAccent => "sidebar-accent",
            ThemeVariable::SidebarAccentForeground => "sidebar-accent-foreground",
            ThemeVariable::SidebarBorder => "sidebar-border",
            ThemeVariable::SidebarRing => "sidebar-ring",
            ThemeVariable::FontSans => "font-sans",
            ThemeVariable::FontSerif => "font-serif",
            ThemeVariable::FontMono => "font-mono",
            ThemeVariable::Radius => "radius",
            ThemeVariable::ShadowX => "shadow-x",
            ThemeVariable::ShadowY => "shadow-y",
            ThemeVariable::ShadowBlur => "shadow-blur",
            ThemeVariable::ShadowSpread => "shadow-spread",
            ThemeVariable::ShadowOpacity => "shadow-opacity",
            ThemeVariable::ShadowColor => "shadow-color",
            ThemeVariable::TrackingNormal => "tracking-normal",
            ThemeVariable::Spacing => "spacing",
            ThemeVariable::Shadow2xs => "shadow-2xs",
            ThemeVariable::ShadowXs => "shadow-xs",
            ThemeVariable::ShadowSm => "shadow-sm",
            ThemeVariable::Shadow => "shadow",
            ThemeVariable::ShadowMd => "shadow-md",
            ThemeVariable::ShadowLg => "shadow-lg",
            ThemeVariable::ShadowXl => "shadow-xl",
            ThemeVariable::Shadow2xl => "shadow-2xl",
        }
    }

    pub fn from_name(name: &str) -> Option<ThemeVariable> {
        ThemeVariable::ALL
            .iter()
            .copied()
            .find(|variable| variable.as_str() == name)
    }

    pub fn category(&self) -> TokenCategory {
        match self {
            ThemeVariable::FontSans | ThemeVariable::FontSerif | ThemeVariable::FontMono => {
                TokenCategory::Font
            }
            ThemeVariable::Radius | ThemeVariable::Spacing => {
                TokenCategory::Length(LengthUnit::Rem)
            }
            ThemeVariable::TrackingNormal => TokenCategory::Length(LengthUnit::Em),
            ThemeVariable::ShadowX
            | ThemeVariable::ShadowY
            | ThemeVariable::ShadowBlur
            | ThemeVariable::ShadowSpread => TokenCategory::Length(LengthUnit::Px),
            ThemeVariable::ShadowOpacity => TokenCategory::Opacity,
            ThemeVariable::ShadowColor => TokenCategory::ShadowColor,
            ThemeVariable::Shadow2xs
            | ThemeVariable::ShadowXs
            | ThemeVariable::ShadowSm
            | ThemeVariable::Shadow
            | ThemeVariable::ShadowMd
            | ThemeVariable::ShadowLg
            | ThemeVariable::ShadowXl
            | ThemeVariable::Shadow2xl => TokenCategory::ShadowPreset,
            _ => TokenCategory::Color,
        }
    }

    pub fn is_color(&self) -> bool {
        self.category() == TokenCategory::Color
    }

    /// Presets are derived from the shadow primitives and cannot be set directly.
    pub fn is_editable(&self) -> bool {
        self.category() != TokenCategory::ShadowPreset
    }

    /// True for the inputs of the shadow preset recipe.
    pub fn drives_shadow_presets(&self) -> bool {
        matches!(
            self,
            ThemeVariable::ShadowX
                | ThemeVariable::ShadowY
                | ThemeVariable::ShadowBlur
                | ThemeVariable::ShadowSpread
                | ThemeVariable::ShadowOpacity
                | ThemeVariable::ShadowColor
        )
    }

    pub fn color_variables() -> impl Iterator<Item = ThemeVariable> {
        ThemeVariable::ALL.into_iter().filter(ThemeVariable::is_color)
    }
}

impl std::fmt::Display for ThemeVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete token set for one mode. Every [`ThemeVariable`] has a value;
/// the only constructors are the compiled-in defaults and overlays onto an
/// existing complete set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ThemeTokens(BTreeMap<ThemeVariable, String>);

impl ThemeTokens {
    pub fn default_for(mode: ThemeMode) -> Self {
        let table = match mode {
            ThemeMode::Light => LIGHT_TOKENS,
            ThemeMode::Dark => DARK_TOKENS,
        };
        Self(
            table
                .iter()
                .map(|(variable, value)| (*variable, (*value).to_string()))
                .collect(),
        )
    }

    /// Overlay `partial` onto `fallback`. Later entries win.
    pub fn from_partial<I>(fallback: &ThemeTokens, partial: I) -> Self
    where
        I: IntoIterator<Item = (ThemeVariable, String)>,
    {
        let mut tokens = fallback.clone();
        tokens.merge(partial);
        tokens
    }

    pub fn get(&self, variable: ThemeVariable) -> &str {
        self.0.get(&variable).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, variable: ThemeVariable, value: impl Into<String>) {
        self.0.insert(variable, value.into());
    }

    /// Shallow last-writer-wins merge.
    pub fn merge<I>(&mut self, updates: I)
    where
        I: IntoIterator<Item = (ThemeVariable, String)>,
    {
        for (variable, value) in updates {
            self.0.insert(variable, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ThemeVariable, &str)> {
        self.0.iter().map(|(variable, value)| (*variable, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Light and dark token sets for the running session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeConfig {
    pub light: ThemeTokens,
    pub dark: ThemeTokens,
}

impl ThemeConfig {
    pub fn tokens(&self, mode: ThemeMode) -> &ThemeTokens {
        match mode {
            ThemeMode::Light => &self.light,
            ThemeMode::Dark => &self.dark,
        }
    }

    pub fn tokens_mut(&mut self, mode: ThemeMode) -> &mut ThemeTokens {
        match mode {
            ThemeMode::Light => &mut self.light,
            ThemeMode::Dark => &mut self.dark,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            light: ThemeTokens::default_for(ThemeMode::Light),
            dark: ThemeTokens::default_for(ThemeMode::Dark),
        }
    }
}
