// Prompt
// The user turn sent to the model: a JSON snapshot of both modes followed by the request

use crate::models::ThemeConfig;

pub fn build_structured_prompt(prompt: &str, config: &ThemeConfig) -> Result<String, String> {
    let light = serde_json::to_string_pretty(&config.light)
        .map_err(|e| format!("Failed to serialize light tokens: {e}"))?;
    let dark = serde_json::to_string_pretty(&config.dark)
        .map_err(|e| format!("Failed to serialize dark tokens: {e}"))?;

    Ok([
        "Current theme snapshot (JSON):",
        "Light mode tokens:",
        light.as_str(),
        "",
        "Dark mode tokens:",
        dark.as_str(),
        "",
        "User prompt:",
        prompt,
    ]
    .join("\n"))
}
