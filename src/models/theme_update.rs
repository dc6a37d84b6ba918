use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::theme::{ThemeMode, ThemeVariable};

/// Instruction carried inside a `[[THEME_UPDATE::...]]` marker.
///
/// `updates` values are hex strings for colours and literal CSS values for
/// everything else. A `None` value means the tool call mentioned the variable
/// without a value and is skipped on application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeUpdateMarkerPayload {
    pub tool_call_id: String,
    pub target_mode: ThemeMode,
    #[serde(serialize_with = "serialize_updates", deserialize_with = "deserialize_updates")]
    pub updates: BTreeMap<ThemeVariable, Option<String>>,
}

/// Reported once per applied tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeUpdateSummary {
    pub tool_call_id: String,
    pub target_mode: ThemeMode,
    pub tokens: Vec<ThemeVariable>,
}

// Valueless entries are left out of the JSON entirely.
fn serialize_updates<S>(
    updates: &BTreeMap<ThemeVariable, Option<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(
        updates
            .iter()
            .filter_map(|(variable, value)| Some((variable, value.as_deref()?))),
    )
}

// Unknown variable names are dropped rather than failing the whole payload.
// Bare numbers are kept as their decimal text.
fn deserialize_updates<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<ThemeVariable, Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    let updates = raw
        .into_iter()
        .filter_map(|(name, value)| {
            let variable = ThemeVariable::from_name(&name)?;
            let value = match value {
                Value::String(text) => Some(text),
                Value::Number(number) => Some(number.to_string()),
                Value::Null => None,
                _ => return None,
            };
            Some((variable, value))
        })
        .collect();
    Ok(updates)
}
