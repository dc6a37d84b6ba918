// Theme Store
// The single authoritative light/dark token configuration for a session

use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use crate::models::{ThemeConfig, ThemeMode, ThemeTokens, ThemeVariable};
use crate::services::mode_conversion::convert_tokens_for_mode;
use crate::services::persistence::ThemePersistence;
use crate::services::shadows::sync_shadow_presets;

/// Read-modify-write access to per-mode token sets. The application of
/// streamed theme updates only depends on this seam.
pub trait TokenStore: Send + Sync {
    fn tokens(&self, mode: ThemeMode) -> ThemeTokens;

    /// Replace the tokens of `mode` with `updater(current)`.
    fn update_tokens(&self, mode: ThemeMode, updater: &dyn Fn(ThemeTokens) -> ThemeTokens);
}

/// Owns the [`ThemeConfig`] and persists every change.
pub struct ThemeStore {
    config: RwLock<ThemeConfig>,
    persistence: Option<ThemePersistence>,
}

impl ThemeStore {
    /// Defaults only, nothing is written to disk.
    pub fn in_memory() -> Self {
        Self {
            config: RwLock::new(ThemeConfig::default()),
            persistence: None,
        }
    }

    /// Load the stored theme from `data_dir`, falling back to defaults per mode.
    pub fn open(data_dir: PathBuf) -> Self {
        let persistence = ThemePersistence::new(data_dir);
        let mut config = ThemeConfig::default();
        for mode in ThemeMode::ALL {
            let mut tokens = persistence.load(mode, config.tokens(mode));
            sync_shadow_presets(&mut tokens);
            *config.tokens_mut(mode) = tokens;
        }
        log::info!("Theme loaded from {:?}", persistence.path_for(ThemeMode::Light).parent());

        Self {
            config: RwLock::new(config),
            persistence: Some(persistence),
        }
    }

    pub fn get(&self, mode: ThemeMode) -> ThemeTokens {
        self.read_config().tokens(mode).clone()
    }

    pub fn config(&self) -> ThemeConfig {
        self.read_config().clone()
    }

    /// Read-modify-write one mode. Shadow presets are re-derived when a
    /// shadow primitive or the shadow colour changed. Returns the new tokens.
    pub fn update<F>(&self, mode: ThemeMode, updater: F) -> ThemeTokens
    where
        F: FnOnce(ThemeTokens) -> ThemeTokens,
    {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let previous = config.tokens(mode).clone();
        let mut next = updater(previous.clone());

        let shadows_changed = ThemeVariable::ALL
            .into_iter()
            .filter(ThemeVariable::drives_shadow_presets)
            .any(|variable| previous.get(variable) != next.get(variable));
        if shadows_changed {
            sync_shadow_presets(&mut next);
        }

        if next != previous {
            *config.tokens_mut(mode) = next.clone();
            self.persist(mode, &next);
        }
        next
    }

    /// Write the same stored value into both modes.
    pub fn sync_token_across_modes(&self, variable: ThemeVariable, value: &str) {
        for mode in ThemeMode::ALL {
            self.update(mode, |mut tokens| {
                tokens.set(variable, value);
                tokens
            });
        }
    }

    /// Replace `target` with a palette derived from `source`.
    pub fn derive_mode(&self, source: ThemeMode, target: ThemeMode) -> ThemeTokens {
        let derived = convert_tokens_for_mode(&self.get(source), target);
        log::info!(
            "Deriving {} palette from {} palette",
            target.as_str(),
            source.as_str()
        );
        self.update(target, |_| derived)
    }

    /// Forget persisted state and restore the compiled-in defaults.
    pub fn reset(&self) -> ThemeConfig {
        if let Some(persistence) = &self.persistence {
            if let Err(e) = persistence.clear() {
                log::warn!("Failed to clear stored theme: {e}");
            }
        }

        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *config = ThemeConfig::default();
        log::info!("Theme reset to defaults");
        config.clone()
    }

    fn read_config(&self) -> std::sync::RwLockReadGuard<'_, ThemeConfig> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, mode: ThemeMode, tokens: &ThemeTokens) {
        if let Some(persistence) = &self.persistence {
            if let Err(e) = persistence.save(mode, tokens) {
                log::warn!("Failed to persist {} theme: {e}", mode.as_str());
            }
        }
    }
}

impl TokenStore for ThemeStore {
    fn tokens(&self, mode: ThemeMode) -> ThemeTokens {
        self.get(mode)
    }

    fn update_tokens(&self, mode: ThemeMode, updater: &dyn Fn(ThemeTokens) -> ThemeTokens) {
        self.update(mode, updater);
    }
}
