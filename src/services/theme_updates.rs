// Theme Updates
// Extracts marker payloads from assistant text and applies them to the token store

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::models::{
    ThemeTokens, ThemeUpdateMarkerPayload, ThemeUpdateSummary, ThemeVariable, TokenCategory,
};
use crate::services::color::{hex_to_hsl, hex_to_oklch, oklch_to_hex};
use crate::services::markers::{
    decode_theme_update_marker_payload, THEME_UPDATE_MARKER_PATTERN, THEME_UPDATE_MARKER_PREFIX,
};
use crate::services::theme_store::TokenStore;

static MARKER_REGEX: OnceLock<Regex> = OnceLock::new();

fn marker_regex() -> &'static Regex {
    MARKER_REGEX.get_or_init(|| Regex::new(THEME_UPDATE_MARKER_PATTERN).unwrap())
}

/// Display text with every marker removed, plus the payloads that decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedThemeUpdates {
    pub clean_text: String,
    pub payloads: Vec<ThemeUpdateMarkerPayload>,
}

/// Full scan of `text`. Every matched marker is removed from the clean text,
/// including markers whose payload fails to decode.
pub fn extract_theme_update_payloads(text: &str) -> ExtractedThemeUpdates {
    if text.is_empty() {
        return ExtractedThemeUpdates::default();
    }

    let mut payloads = Vec::new();
    let clean_text = marker_regex().replace_all(text, |captures: &regex::Captures<'_>| {
        if let Some(payload) = decode_theme_update_marker_payload(&captures[1]) {
            payloads.push(payload);
        }
        ""
    });

    ExtractedThemeUpdates {
        clean_text: clean_text.into_owned(),
        payloads,
    }
}

/// Convert one editor/tool value into its stored representation.
/// Colours go hex -> OKLCH, the shadow colour hex -> HSL, everything else is
/// kept literally. Preset variables are derived and never accepted.
pub fn convert_single_token_value(variable: ThemeVariable, value: &str) -> Option<String> {
    match variable.category() {
        TokenCategory::Color => hex_to_oklch(value.trim()),
        TokenCategory::ShadowColor => hex_to_hsl(value.trim()),
        TokenCategory::ShadowPreset => None,
        _ => Some(value.to_string()),
    }
}

/// Convert a partial update map. Empty values and failed conversions are
/// dropped; the keys of the result are exactly the variables that applied.
pub fn convert_theme_token_updates<'a, I>(updates: I) -> BTreeMap<ThemeVariable, String>
where
    I: IntoIterator<Item = (ThemeVariable, Option<&'a str>)>,
{
    updates
        .into_iter()
        .filter_map(|(variable, value)| {
            let value = value.filter(|value| !value.is_empty())?;
            match convert_single_token_value(variable, value) {
                Some(converted) => Some((variable, converted)),
                None => {
                    log::debug!("Dropping update for {variable}: cannot convert {value:?}");
                    None
                }
            }
        })
        .collect()
}

/// Apply `payload` to `store` unless its tool call id was already applied.
///
/// The id is recorded even when nothing converts; in that case no summary is
/// returned.
pub fn apply_theme_update_payload(
    payload: &ThemeUpdateMarkerPayload,
    store: &dyn TokenStore,
    applied_ids: &mut HashSet<String>,
) -> Option<ThemeUpdateSummary> {
    if !applied_ids.insert(payload.tool_call_id.clone()) {
        return None;
    }

    let converted = convert_theme_token_updates(
        payload
            .updates
            .iter()
            .map(|(variable, value)| (*variable, value.as_deref())),
    );
    if converted.is_empty() {
        log::debug!(
            "Theme update {} had no applicable tokens",
            payload.tool_call_id
        );
        return None;
    }

    let tokens: Vec<ThemeVariable> = converted.keys().copied().collect();
    store.update_tokens(payload.target_mode, &|mut current: ThemeTokens| {
        current.merge(converted.clone());
        current
    });

    log::info!(
        "Applied theme update {} to {} mode ({} tokens)",
        payload.tool_call_id,
        payload.target_mode.as_str(),
        tokens.len()
    );

    Some(ThemeUpdateSummary {
        tool_call_id: payload.tool_call_id.clone(),
        target_mode: payload.target_mode,
        tokens,
    })
}

/// Every colour token as `#rrggbb`, for colour pickers.
pub fn swatches(tokens: &ThemeTokens) -> BTreeMap<ThemeVariable, String> {
    ThemeVariable::color_variables()
        .map(|variable| (variable, oklch_to_hex(tokens.get(variable))))
        .collect()
}

/// Incremental equivalent of [`extract_theme_update_payloads`] over an
/// append-only buffer.
///
/// Text before the cursor is final: it holds no marker start that more input
/// could complete. Only the suffix after the cursor is scanned on each call.
#[derive(Debug, Default)]
pub struct MarkerScanner {
    consumed: usize,
    seen_len: usize,
    finalized: String,
    payloads: Vec<ThemeUpdateMarkerPayload>,
}

/// Result of one [`MarkerScanner::scan`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanUpdate {
    pub clean_text: String,
    /// Payloads first seen in this call
    pub new_payloads: Vec<ThemeUpdateMarkerPayload>,
}

impl MarkerScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Every payload decoded so far, in stream order.
    pub fn payloads(&self) -> &[ThemeUpdateMarkerPayload] {
        &self.payloads
    }

    pub fn scan(&mut self, buffer: &str) -> ScanUpdate {
        if buffer.len() < self.seen_len || !buffer.is_char_boundary(self.consumed) {
            log::debug!("Text stream buffer shrank, rescanning from the start");
            self.reset();
        }
        self.seen_len = buffer.len();

        let tail = &buffer[self.consumed..];
        let mut new_payloads = Vec::new();
        let mut last_end = 0;

        for captures in marker_regex().captures_iter(tail) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            self.finalized.push_str(&tail[last_end..whole.start()]);
            if let Some(payload) = decode_theme_update_marker_payload(&captures[1]) {
                new_payloads.push(payload);
            }
            last_end = whole.end();
        }

        let remaining = &tail[last_end..];
        let hold_from = remaining
            .match_indices('[')
            .map(|(index, _)| index)
            .find(|index| is_viable_marker_prefix(&remaining[*index..]))
            .unwrap_or(remaining.len());
        self.finalized.push_str(&remaining[..hold_from]);
        self.consumed += last_end + hold_from;

        self.payloads.extend(new_payloads.iter().cloned());

        ScanUpdate {
            clean_text: format!("{}{}", self.finalized, &buffer[self.consumed..]),
            new_payloads,
        }
    }
}

fn is_marker_body_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')
}

// True when more input could still turn `text` into a complete marker.
fn is_viable_marker_prefix(text: &str) -> bool {
    if text.len() <= THEME_UPDATE_MARKER_PREFIX.len() {
        return THEME_UPDATE_MARKER_PREFIX.starts_with(text);
    }
    let Some(rest) = text.strip_prefix(THEME_UPDATE_MARKER_PREFIX) else {
        return false;
    };
    let body = rest.strip_suffix(']').unwrap_or(rest);
    body.chars().all(is_marker_body_char)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThemeMode;
    use crate::services::markers::theme_update_marker;
    use crate::services::theme_store::ThemeStore;

    fn payload(id: &str, mode: ThemeMode, updates: &[(ThemeVariable, &str)]) -> ThemeUpdateMarkerPayload {
        ThemeUpdateMarkerPayload {
            tool_call_id: id.to_string(),
            target_mode: mode,
            updates: updates
                .iter()
                .map(|(variable, value)| (*variable, Some(value.to_string())))
                .collect(),
        }
    }

    fn primary_payload(id: &str) -> ThemeUpdateMarkerPayload {
        payload(id, ThemeMode::Light, &[(ThemeVariable::Primary, "#ff0000")])
    }

    #[test]
    fn test_extract_strips_markers() {
        let first = primary_payload("call_1");
        let second = payload("call_2", ThemeMode::Dark, &[(ThemeVariable::Radius, "1rem")]);
        let text = format!(
            "Here you go.{}\nAnd dark mode:{} Done.",
            theme_update_marker(&first).unwrap(),
            theme_update_marker(&second).unwrap()
        );

        let extracted = extract_theme_update_payloads(&text);
        assert_eq!(extracted.clean_text, "Here you go.\nAnd dark mode: Done.");
        assert_eq!(extracted.payloads, vec![first, second]);
    }

    #[test]
    fn test_extract_removes_undecodable_markers() {
        let extracted = extract_theme_update_payloads("a[[THEME_UPDATE::aGVsbG8=]]b");
        assert_eq!(extracted.clean_text, "ab");
        assert!(extracted.payloads.is_empty());

        assert_eq!(extract_theme_update_payloads(""), ExtractedThemeUpdates::default());
        let plain = extract_theme_update_payloads("no markers [[here]]");
        assert_eq!(plain.clean_text, "no markers [[here]]");
    }

    #[test]
    fn test_clean_text_never_contains_delimiters() {
        let marker = theme_update_marker(&primary_payload("call_1")).unwrap();
        let prose = ["", "Hello ", "**bold** ", "\n\n", "üñí "];
        for before in prose {
            for after in prose {
                let text = format!("{before}{marker}{after}{marker}");
                let extracted = extract_theme_update_payloads(&text);
                assert!(!extracted.clean_text.contains(THEME_UPDATE_MARKER_PREFIX));
                assert_eq!(extracted.clean_text, format!("{before}{after}"));
            }
        }
    }

    #[test]
    fn test_convert_routes_by_category() {
        let converted = convert_theme_token_updates([
            (ThemeVariable::Primary, Some(" #ffffff ")),
            (ThemeVariable::ShadowColor, Some("#000000")),
            (ThemeVariable::Radius, Some("0.5rem")),
            (ThemeVariable::Accent, Some("red")),
            (ThemeVariable::Muted, Some("")),
            (ThemeVariable::Ring, None),
            (ThemeVariable::ShadowMd, Some("0px 0px 0px 0px black")),
        ]);

        assert_eq!(
            converted,
            BTreeMap::from([
                (ThemeVariable::Primary, "oklch(1 0 0)".to_string()),
                (ThemeVariable::Radius, "0.5rem".to_string()),
                (ThemeVariable::ShadowColor, "hsl(0 0% 0%)".to_string()),
            ])
        );
    }

    #[test]
    fn test_apply_is_idempotent() {
        let store = ThemeStore::in_memory();
        let mut applied = HashSet::new();
        let update = primary_payload("call_1");

        let summary = apply_theme_update_payload(&update, &store, &mut applied).unwrap();
        assert_eq!(summary.tokens, vec![ThemeVariable::Primary]);
        assert_eq!(summary.target_mode, ThemeMode::Light);
        let after_first = store.config();

        // same id with different content is still a no-op
        let replay = payload("call_1", ThemeMode::Light, &[(ThemeVariable::Primary, "#00ff00")]);
        assert_eq!(apply_theme_update_payload(&replay, &store, &mut applied), None);
        assert_eq!(store.config(), after_first);
    }

    #[test]
    fn test_apply_without_valid_tokens_marks_id() {
        let store = ThemeStore::in_memory();
        let before = store.config();
        let mut applied = HashSet::new();
        let update = payload("call_9", ThemeMode::Dark, &[(ThemeVariable::Primary, "nope")]);

        assert_eq!(apply_theme_update_payload(&update, &store, &mut applied), None);
        assert!(applied.contains("call_9"));
        assert_eq!(store.config(), before);
    }

    #[test]
    fn test_apply_merges_partial_updates() {
        let store = ThemeStore::in_memory();
        let mut applied = HashSet::new();
        let update = payload(
            "call_2",
            ThemeMode::Dark,
            &[(ThemeVariable::Primary, "#ffffff"), (ThemeVariable::Accent, "#12")],
        );

        let summary = apply_theme_update_payload(&update, &store, &mut applied).unwrap();
        assert_eq!(summary.tokens, vec![ThemeVariable::Primary]);

        let dark = store.get(ThemeMode::Dark);
        assert_eq!(dark.get(ThemeVariable::Primary), "oklch(1 0 0)");
        assert_eq!(
            dark.get(ThemeVariable::Accent),
            ThemeTokens::default_for(ThemeMode::Dark).get(ThemeVariable::Accent)
        );
        // light mode untouched
        assert_eq!(store.get(ThemeMode::Light), ThemeTokens::default_for(ThemeMode::Light));
    }

    #[test]
    fn test_summary_tokens_use_canonical_order() {
        let store = ThemeStore::in_memory();
        let mut applied = HashSet::new();
        let update: ThemeUpdateMarkerPayload = serde_json::from_str(
            r##"{"toolCallId":"call_3","targetMode":"light","updates":{"radius":"1rem","primary":"#000000","background":"#ffffff"}}"##,
        )
        .unwrap();

        let summary = apply_theme_update_payload(&update, &store, &mut applied).unwrap();
        assert_eq!(
            summary.tokens,
            vec![ThemeVariable::Background, ThemeVariable::Primary, ThemeVariable::Radius]
        );
    }

    #[test]
    fn test_swatches_are_hex() {
        let swatches = swatches(&ThemeTokens::default_for(ThemeMode::Light));
        assert_eq!(swatches.len(), 32);
        assert_eq!(swatches[&ThemeVariable::Background], "#ffffff");
        assert!(swatches.values().all(|hex| hex.len() == 7 && hex.starts_with('#')));
    }

    #[test]
    fn test_split_marker_is_decoded_once() {
        let update = primary_payload("call_1");
        let text = format!("Before {} after", theme_update_marker(&update).unwrap());

        for split in 0..=text.len() {
            if !text.is_char_boundary(split) {
                continue;
            }
            let store = ThemeStore::in_memory();
            let mut applied = HashSet::new();
            let mut summaries = Vec::new();

            for buffer in [&text[..split], text.as_str()] {
                for payload in extract_theme_update_payloads(buffer).payloads {
                    assert_eq!(payload, update);
                    summaries.extend(apply_theme_update_payload(&payload, &store, &mut applied));
                }
            }
            assert_eq!(summaries.len(), 1, "split at {split}");
        }
    }

    #[test]
    fn test_scanner_matches_full_rescan() {
        let first = primary_payload("call_1");
        let second = payload("call_2", ThemeMode::Dark, &[(ThemeVariable::Spacing, "0.3rem")]);
        let text = format!(
            "Sure [[not a marker]] {}middle [[THEME_UPDATE::@@]] {}end [[THEME_UPD",
            theme_update_marker(&first).unwrap(),
            theme_update_marker(&second).unwrap()
        );

        for chunk_size in [1, 2, 3, 7, 16, text.len()] {
            let mut scanner = MarkerScanner::new();
            let mut seen = Vec::new();
            let mut end = 0;
            while end < text.len() {
                end = (end + chunk_size).min(text.len());
                let buffer = &text[..end];
                let update = scanner.scan(buffer);
                let full = extract_theme_update_payloads(buffer);

                assert_eq!(update.clean_text, full.clean_text, "chunk {chunk_size} at {end}");
                seen.extend(update.new_payloads);
                assert_eq!(scanner.payloads(), full.payloads.as_slice());
            }
            assert_eq!(seen, vec![first.clone(), second.clone()]);
        }
    }

    #[test]
    fn test_scanner_resets_when_buffer_shrinks() {
        let marker = theme_update_marker(&primary_payload("call_1")).unwrap();
        let mut scanner = MarkerScanner::new();

        let first = format!("long prefix text {marker}");
        assert_eq!(scanner.scan(&first).new_payloads.len(), 1);

        let update = scanner.scan("short");
        assert_eq!(update.clean_text, "short");
        assert!(scanner.payloads().is_empty());
    }

    #[test]
    fn test_viable_prefix() {
        assert!(is_viable_marker_prefix("["));
        assert!(is_viable_marker_prefix("[[THEME_UP"));
        assert!(is_viable_marker_prefix("[[THEME_UPDATE::abc+/="));
        assert!(is_viable_marker_prefix("[[THEME_UPDATE::abc]"));
        assert!(!is_viable_marker_prefix("[x"));
        assert!(!is_viable_marker_prefix("[[THEME_UPDATE::ab c"));
        assert!(!is_viable_marker_prefix("[[THEME_UPDATE::abc]x"));
    }
}
