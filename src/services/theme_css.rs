// Theme CSS
// Export to and import from `:root { --token: value; }` / `.dark { ... }` snippets

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::models::{ThemeConfig, ThemeTokens, ThemeVariable};

const TOKEN_PATTERN: &str = r"--([\w-]+)\s*:\s*([^;]+);?";
const ROOT_BLOCK_PATTERN: &str = r"(?is):root\s*\{(.*?)\}";
const DARK_BLOCK_PATTERNS: [&str; 3] = [
    r"(?is)\.dark\s*\{(.*?)\}",
    r#"(?is)\[data-theme=['"]dark['"]\]\s*\{(.*?)\}"#,
    r"(?is)\.theme-dark\s*\{(.*?)\}",
];

static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
static ROOT_BLOCK_REGEX: OnceLock<Regex> = OnceLock::new();
static DARK_BLOCK_REGEXES: OnceLock<Vec<Regex>> = OnceLock::new();

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThemeImportError {
    #[error("Paste CSS variables before importing.")]
    Empty,

    #[error("No CSS variables detected. Ensure entries look like `--background: value;`.")]
    NoVariables,
}

/// Both modes as CSS custom properties, every variable in canonical order.
pub fn export_theme_css(config: &ThemeConfig) -> String {
    format!(
        ":root {{\n{}\n}}\n\n.dark {{\n{}\n}}",
        format_block(&config.light),
        format_block(&config.dark)
    )
}

fn format_block(tokens: &ThemeTokens) -> String {
    tokens
        .iter()
        .map(|(variable, value)| format!("  --{variable}: {value};"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a pasted snippet. Light tokens come from `:root {}` (or the whole
/// input when there is none); dark tokens from the first dark selector block.
/// Anything not mentioned keeps its value from `defaults`.
pub fn import_theme_css(input: &str, defaults: &ThemeConfig) -> Result<ThemeConfig, ThemeImportError> {
    if input.trim().is_empty() {
        return Err(ThemeImportError::Empty);
    }

    let root_regex = ROOT_BLOCK_REGEX.get_or_init(|| Regex::new(ROOT_BLOCK_PATTERN).unwrap());
    let dark_regexes = DARK_BLOCK_REGEXES.get_or_init(|| {
        DARK_BLOCK_PATTERNS
            .iter()
            .map(|pattern| Regex::new(pattern).unwrap())
            .collect()
    });

    let light_block = root_regex
        .captures(input)
        .and_then(|captures| captures.get(1))
        .map_or(input, |block| block.as_str());
    let dark_block = dark_regexes
        .iter()
        .find_map(|regex| regex.captures(input))
        .and_then(|captures| captures.get(1))
        .map(|block| block.as_str());

    let light = parse_tokens(light_block);
    let dark = dark_block.map(parse_tokens).unwrap_or_default();

    if light.is_empty() && dark.is_empty() {
        return Err(ThemeImportError::NoVariables);
    }

    log::info!(
        "Imported {} light and {} dark CSS variables",
        light.len(),
        dark.len()
    );

    Ok(ThemeConfig {
        light: ThemeTokens::from_partial(&defaults.light, light),
        dark: ThemeTokens::from_partial(&defaults.dark, dark),
    })
}

fn parse_tokens(block: &str) -> Vec<(ThemeVariable, String)> {
    let token_regex = TOKEN_REGEX.get_or_init(|| Regex::new(TOKEN_PATTERN).unwrap());
    token_regex
        .captures_iter(block)
        .filter_map(|captures| {
            let variable = ThemeVariable::from_name(captures[1].trim())?;
            Some((variable, captures[2].trim().to_string()))
        })
        .collect()
}
