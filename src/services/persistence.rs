// Theme Persistence
// One JSON file per mode under <data_dir>/theme/

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::models::{ThemeMode, ThemeTokens, ThemeVariable};

/// Bumped whenever the stored token layout changes; older files are ignored.
pub const THEME_STORAGE_VERSION: u64 = 1;

#[derive(Serialize)]
struct StoredTheme<'a> {
    version: u64,
    tokens: &'a ThemeTokens,
}

/// Reads and writes the persisted token set for each mode
#[derive(Debug, Clone)]
pub struct ThemePersistence {
    theme_dir: PathBuf,
}

impl ThemePersistence {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            theme_dir: data_dir.join("theme"),
        }
    }

    pub fn path_for(&self, mode: ThemeMode) -> PathBuf {
        self.theme_dir.join(format!("theme-{}.json", mode.as_str()))
    }

    /// Stored tokens overlaid onto `fallback`. A missing, unreadable or
    /// outdated file yields `fallback` unchanged.
    pub fn load(&self, mode: ThemeMode, fallback: &ThemeTokens) -> ThemeTokens {
        match self.read(mode, fallback) {
            Ok(Some(tokens)) => tokens,
            Ok(None) => fallback.clone(),
            Err(e) => {
                log::warn!("{e}; using default {} theme", mode.as_str());
                fallback.clone()
            }
        }
    }

    fn read(&self, mode: ThemeMode, fallback: &ThemeTokens) -> Result<Option<ThemeTokens>, String> {
        let path = self.path_for(mode);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse {}: {e}", path.display()))?;

        let version = value.get("version").and_then(Value::as_u64);
        if version != Some(THEME_STORAGE_VERSION) {
            return Err(format!(
                "Ignoring {}: unsupported version {version:?}",
                path.display()
            ));
        }

        let Some(stored) = value.get("tokens").and_then(Value::as_object) else {
            return Err(format!("Ignoring {}: missing tokens", path.display()));
        };

        let partial = stored.iter().filter_map(|(name, value)| {
            let variable = ThemeVariable::from_name(name)?;
            let value = value.as_str()?;
            Some((variable, value.to_string()))
        });

        Ok(Some(ThemeTokens::from_partial(fallback, partial)))
    }

    pub fn save(&self, mode: ThemeMode, tokens: &ThemeTokens) -> Result<(), String> {
        std::fs::create_dir_all(&self.theme_dir)
            .map_err(|e| format!("Failed to create theme directory: {e}"))?;

        let content = serde_json::to_string_pretty(&StoredTheme {
            version: THEME_STORAGE_VERSION,
            tokens,
        })
        .map_err(|e| format!("Failed to serialize {} theme: {e}", mode.as_str()))?;

        std::fs::write(self.path_for(mode), content)
            .map_err(|e| format!("Failed to write {} theme: {e}", mode.as_str()))
    }

    /// Remove both stored modes. Missing files are not an error.
    pub fn clear(&self) -> Result<(), String> {
        for mode in ThemeMode::ALL {
            let path = self.path_for(mode);
            if path.exists() {
                std::fs::remove_file(&path)
                    .map_err(|e| format!("Failed to remove {}: {e}", path.display()))?;
            }
        }
        Ok(())
    }
}
