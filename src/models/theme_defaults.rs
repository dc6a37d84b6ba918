// Compiled-in default theme (shadcn/ui neutral palette)

use super::theme::ThemeVariable::{self, *};

pub const DEFAULT_FONT_SANS: &str =
    r#""Inter", "Plus Jakarta Sans", "IBM Plex Sans", system-ui, -apple-system, sans-serif"#;
pub const DEFAULT_FONT_SERIF: &str = r#""Source Serif 4", "Merriweather", "Lora", serif"#;
pub const DEFAULT_FONT_MONO: &str =
    r#""JetBrains Mono", "Fira Code", "Menlo", "Source Code Pro", monospace"#;

// Presets for x=0 y=1 blur=3 spread=0 opacity=0.1 color=#000000
const SHADOW_2XS: &str = "0px 1px 3px 0px rgba(0, 0, 0, 0.05)";
const SHADOW_SM: &str = "0px 1px 3px 0px rgba(0, 0, 0, 0.1), 0px 1px 3px 0px rgba(0, 0, 0, 0.1)";
const SHADOW_MD: &str = "0px 1px 3px 0px rgba(0, 0, 0, 0.1), 0px 2px 6px 0px rgba(0, 0, 0, 0.1)";
const SHADOW_LG: &str = "0px 1px 3px 0px rgba(0, 0, 0, 0.1), 0px 4px 9px 0px rgba(0, 0, 0, 0.1)";
const SHADOW_XL: &str = "0px 1px 3px 0px rgba(0, 0, 0, 0.1), 0px 8px 15px 0px rgba(0, 0, 0, 0.1)";
const SHADOW_2XL: &str = "0px 1px 3px 0px rgba(0, 0, 0, 0.25)";

pub const LIGHT_TOKENS: &[(ThemeVariable, &str)] = &[
    (Background, "oklch(1 0 0)"),
    (Foreground, "oklch(0.145 0 0)"),
    (Card, "oklch(1 0 0)"),
    (CardForeground, "oklch(0.145 0 0)"),
    (Popover, "oklch(1 0 0)"),
    (PopoverForeground, "oklch(0.145 0 0)"),
    (Primary, "oklch(0.205 0 0)"),
    (PrimaryForeground, "oklch(0.985 0 0)"),
    (Secondary, "oklch(0.97 0 0)"),
    (SecondaryForeground, "oklch(0.205 0 0)"),
    (Muted, "oklch(0.97 0 0)"),
    (MutedForeground, "oklch(0.556 0 0)"),
    (Accent, "oklch(0.97 0 0)"),
    (AccentForeground, "oklch(0.205 0 0)"),
    (Destructive, "oklch(0.577 0.245 27.325)"),
    (DestructiveForeground, "oklch(0.985 0 0)"),
    (Border, "oklch(0.922 0 0)"),
    (Input, "oklch(0.922 0 0)"),
    (Ring, "oklch(0.708 0 0)"),
    (Chart1, "oklch(0.646 0.222 41.116)"),
    (Chart2, "oklch(0.6 0.118 184.704)"),
    (Chart3, "oklch(0.398 0.07 227.392)"),
    (Chart4, "oklch(0.828 0.189 84.429)"),
    (Chart5, "oklch(0.769 0.188 70.08)"),
    (Sidebar, "oklch(0.985 0 0)"),
    (SidebarForeground, "oklch(0.145 0 0)"),
    (SidebarPrimary, "oklch(0.205 0 0)"),
    (SidebarPrimaryForeground, "oklch(0.985 0 0)"),
    (SidebarAccent, "oklch(0.97 0 0)"),
    (SidebarAccentForeground, "oklch(0.205 0 0)"),
    (SidebarBorder, "oklch(0.922 0 0)"),
    (SidebarRing, "oklch(0.708 0 0)"),
    (FontSans, DEFAULT_FONT_SANS),
    (FontSerif, DEFAULT_FONT_SERIF),
    (FontMono, DEFAULT_FONT_MONO),
    (Radius, "0.625rem"),
    (ShadowX, "0px"),
    (ShadowY, "1px"),
    (ShadowBlur, "3px"),
    (ShadowSpread, "0px"),
    (ShadowOpacity, "0.1"),
    (ShadowColor, "hsl(0 0% 0%)"),
    (TrackingNormal, "0em"),
    (Spacing, "0.25rem"),
    (Shadow2xs, SHADOW_2XS),
    (ShadowXs, SHADOW_2XS),
    (ShadowSm, SHADOW_SM),
    (Shadow, SHADOW_SM),
    (ShadowMd, SHADOW_MD),
    (ShadowLg, SHADOW_LG),
    (ShadowXl, SHADOW_XL),
    (Shadow2xl, SHADOW_2XL),
];

pub const DARK_TOKENS: &[(ThemeVariable, &str)] = &[
    (Background, "oklch(0.145 0 0)"),
    (Foreground, "oklch(0.985 0 0)"),
    (Card, "oklch(0.205 0 0)"),
    (CardForeground, "oklch(0.985 0 0)"),
    (Popover, "oklch(0.205 0 0)"),
    (PopoverForeground, "oklch(0.985 0 0)"),
    (Primary, "oklch(0.922 0 0)"),
    (PrimaryForeground, "oklch(0.205 0 0)"),
    (Secondary, "oklch(0.269 0 0)"),
    (SecondaryForeground, "oklch(0.985 0 0)"),
    (Muted, "oklch(0.269 0 0)"),
    (MutedForeground, "oklch(0.708 0 0)"),
    (Accent, "oklch(0.269 0 0)"),
    (AccentForeground, "oklch(0.985 0 0)"),
    (Destructive, "oklch(0.704 0.191 22.216)"),
    (DestructiveForeground, "oklch(0.985 0 0)"),
    (Border, "oklch(0.275 0 0)"),
    (Input, "oklch(0.325 0 0)"),
    (Ring, "oklch(0.556 0 0)"),
    (Chart1, "oklch(0.488 0.243 264.376)"),
    (Chart2, "oklch(0.696 0.17 162.48)"),
    (Chart3, "oklch(0.769 0.188 70.08)"),
    (Chart4, "oklch(0.627 0.265 303.9)"),
    (Chart5, "oklch(0.645 0.246 16.439)"),
    (Sidebar, "oklch(0.205 0 0)"),
    (SidebarForeground, "oklch(0.985 0 0)"),
    (SidebarPrimary, "oklch(0.488 0.243 264.376)"),
    (SidebarPrimaryForeground, "oklch(0.985 0 0)"),
    (SidebarAccent, "oklch(0.269 0 0)"),
    (SidebarAccentForeground, "oklch(0.985 0 0)"),
    (SidebarBorder, "oklch(0.275 0 0)"),
    (SidebarRing, "oklch(0.439 0 0)"),
    (FontSans, DEFAULT_FONT_SANS),
    (FontSerif, DEFAULT_FONT_SERIF),
    (FontMono, DEFAULT_FONT_MONO),
    (Radius, "0.625rem"),
    (ShadowX, "0px"),
    (ShadowY, "1px"),
    (ShadowBlur, "3px"),
    (ShadowSpread, "0px"),
    (ShadowOpacity, "0.1"),
    (ShadowColor, "hsl(0 0% 0%)"),
    (TrackingNormal, "0em"),
    (Spacing, "0.25rem"),
    (Shadow2xs, SHADOW_2XS),
    (ShadowXs, SHADOW_2XS),
    (ShadowSm, SHADOW_SM),
    (Shadow, SHADOW_SM),
    (ShadowMd, SHADOW_MD),
    (ShadowLg, SHADOW_LG),
    (ShadowXl, SHADOW_XL),
    (Shadow2xl, SHADOW_2XL),
];
