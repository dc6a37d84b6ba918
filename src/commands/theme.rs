// Theme Commands
// Read and edit the session theme, import/export and prompt snapshots

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{ShadowBaseValues, ShadowPreset, ThemeConfig, ThemeMode, ThemeTokens, ThemeVariable};
use crate::services::{
    build_structured_prompt, convert_single_token_value, convert_theme_token_updates,
    derive_shadow_base_values, emit_event, export_theme_css, import_theme_css, is_hex_color,
    shadow_preset_values, swatches, EventSink, ThemeStore, THEME_CHANGED_EVENT,
};

/// Payload of the `theme_changed` event
#[derive(Debug, Clone, Serialize)]
pub struct ThemeChanged {
    pub mode: ThemeMode,
    pub tokens: ThemeTokens,
}

/// One shadow tier as shown in the shadow controls
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowPresetEntry {
    pub variable: ThemeVariable,
    pub label: &'static str,
    pub description: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowPresets {
    pub base: ShadowBaseValues,
    pub presets: Vec<ShadowPresetEntry>,
}

pub(crate) fn emit_theme_changed(store: &ThemeStore, events: &dyn EventSink, mode: ThemeMode) {
    emit_event(
        events,
        THEME_CHANGED_EVENT,
        &ThemeChanged {
            mode,
            tokens: store.get(mode),
        },
    );
}

fn parse_variable(name: &str) -> Result<ThemeVariable, String> {
    let variable =
        ThemeVariable::from_name(name).ok_or_else(|| format!("Unknown theme variable: {name}"))?;
    if !variable.is_editable() {
        return Err(format!("Theme variable {name} is derived and cannot be edited"));
    }
    Ok(variable)
}

pub fn get_theme_config(store: &ThemeStore) -> ThemeConfig {
    store.config()
}

pub fn get_theme_tokens(store: &ThemeStore, mode: ThemeMode) -> ThemeTokens {
    store.get(mode)
}

pub fn get_theme_swatches(store: &ThemeStore, mode: ThemeMode) -> BTreeMap<ThemeVariable, String> {
    swatches(&store.get(mode))
}

/// Manual edit of one mode. Values go through the same conversion as AI
/// updates; values that fail to convert are dropped.
pub fn update_theme_tokens(
    store: &ThemeStore,
    events: &dyn EventSink,
    mode: ThemeMode,
    updates: BTreeMap<String, Option<String>>,
) -> Result<ThemeTokens, String> {
    let parsed = updates
        .iter()
        .map(|(name, value)| Ok((parse_variable(name)?, value.as_deref())))
        .collect::<Result<Vec<_>, String>>()?;

    let converted = convert_theme_token_updates(parsed);
    if converted.is_empty() {
        return Ok(store.get(mode));
    }

    log::info!("Updating {} token(s) in {} palette", converted.len(), mode.as_str());
    let tokens = store.update(mode, |mut tokens| {
        tokens.merge(converted);
        tokens
    });
    emit_theme_changed(store, events, mode);
    Ok(tokens)
}

/// Write one value into both modes. Hex colours are converted first, any
/// other value is stored as given.
pub fn sync_token_across_modes(
    store: &ThemeStore,
    events: &dyn EventSink,
    variable: &str,
    value: &str,
) -> Result<ThemeConfig, String> {
    let variable = parse_variable(variable)?;
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("Missing value for {variable}"));
    }

    let stored = if is_hex_color(value) {
        convert_single_token_value(variable, value)
            .ok_or_else(|| format!("Invalid value for {variable}: {value}"))?
    } else {
        value.to_string()
    };

    store.sync_token_across_modes(variable, &stored);
    for mode in ThemeMode::ALL {
        emit_theme_changed(store, events, mode);
    }
    Ok(store.config())
}

pub fn derive_theme_mode(
    store: &ThemeStore,
    events: &dyn EventSink,
    source: ThemeMode,
    target: ThemeMode,
) -> Result<ThemeTokens, String> {
    if source == target {
        return Err(format!("Cannot derive the {} palette from itself", source.as_str()));
    }
    let tokens = store.derive_mode(source, target);
    emit_theme_changed(store, events, target);
    Ok(tokens)
}

pub fn reset_theme_config(store: &ThemeStore, events: &dyn EventSink) -> ThemeConfig {
    let config = store.reset();
    for mode in ThemeMode::ALL {
        emit_theme_changed(store, events, mode);
    }
    config
}

pub fn get_shadow_presets(store: &ThemeStore, mode: ThemeMode) -> ShadowPresets {
    let tokens = store.get(mode);
    let mut values = shadow_preset_values(&tokens);
    let presets = ShadowPreset::ALL
        .into_iter()
        .map(|preset| ShadowPresetEntry {
            variable: preset.variable(),
            label: preset.label(),
            description: preset.description(),
            value: values.remove(&preset).unwrap_or_default(),
        })
        .collect();

    ShadowPresets {
        base: derive_shadow_base_values(&tokens),
        presets,
    }
}

pub fn export_theme(store: &ThemeStore) -> String {
    export_theme_css(&store.config())
}

/// Replace both modes with the variables found in `css`. Missing variables
/// take their default value.
pub fn import_theme(
    store: &ThemeStore,
    events: &dyn EventSink,
    css: &str,
) -> Result<ThemeConfig, String> {
    let imported = import_theme_css(css, &ThemeConfig::default()).map_err(|e| e.to_string())?;
    for mode in ThemeMode::ALL {
        let tokens = imported.tokens(mode).clone();
        store.update(mode, |_| tokens);
        emit_theme_changed(store, events, mode);
    }
    log::info!("Imported theme CSS ({} bytes)", css.len());
    Ok(store.config())
}

pub fn build_theme_prompt(store: &ThemeStore, prompt: &str) -> Result<String, String> {
    if prompt.trim().is_empty() {
        return Err("Prompt is empty".to_string());
    }
    build_structured_prompt(prompt, &store.config())
}
