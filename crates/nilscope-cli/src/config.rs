//! Dashboard configuration file.
//!
//! Everything is optional; a missing field takes the same default a fresh
//! session would. Command-line flags are applied on top by the caller.

use anyhow::{anyhow, Result};
use nilscope_catalog::Catalog;
use nilscope_i18n::{Language, Localizer};
use nilscope_view::{EcosystemLayout, Tab, TimeRange, ViewState};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub language: Language,
    pub tab: Tab,
    /// Catalog bundle to load instead of the compiled-in demo data.
    pub catalog: Option<PathBuf>,
    /// Directory of `<code>.json` translation overrides.
    pub locales_dir: Option<PathBuf>,
    pub ecosystem_layout: EcosystemLayout,
    pub time_range: TimeRange,
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read config {}: {e}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| anyhow!("invalid config {}: {e}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// `path` if given, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn load_catalog(&self) -> Result<Catalog> {
        let catalog = match &self.catalog {
            Some(path) => Catalog::from_path(path)
                .map_err(|e| anyhow!("failed to load catalog {}: {e}", path.display()))?,
            None => Catalog::bundled()?,
        };
        Ok(catalog)
    }

    pub fn load_localizer(&self) -> Result<Localizer> {
        let mut localizer = Localizer::bundled()?;
        if let Some(dir) = &self.locales_dir {
            let applied = localizer.load_overrides(dir)?;
            tracing::info!(dir = %dir.display(), applied, "translation overrides loaded");
        }
        localizer.set_language(self.language);
        Ok(localizer)
    }

    /// Initial view-state for a new session.
    pub fn initial_state(&self) -> ViewState {
        let mut state = ViewState::with_tab(self.tab);
        state.ecosystem_layout = self.ecosystem_layout;
        state.time_range = self.time_range;
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();
        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.initial_state(), ViewState::default());
    }

    #[test]
    fn fields_use_display_labels() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"language": "ja", "tab": "Ecosystem", "ecosystem_layout": "diagram", "time_range": "30D"}}"#
        )
        .unwrap();
        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.language, Language::Ja);
        let state = config.initial_state();
        assert_eq!(state.tab, Tab::Ecosystem);
        assert_eq!(state.ecosystem_layout, EcosystemLayout::Diagram);
        assert_eq!(state.time_range, TimeRange::ThirtyDays);
        assert_eq!(config.load_localizer().unwrap().language(), Language::Ja);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"theme": "dark"}}"#).unwrap();
        assert!(DashboardConfig::load(file.path()).is_err());
    }

    #[test]
    fn catalog_path_overrides_bundled_data() {
        let mut catalog = tempfile::NamedTempFile::new().unwrap();
        write!(catalog, r#"{{"nodes": [], "projects": []}}"#).unwrap();
        let config = DashboardConfig {
            catalog: Some(catalog.path().to_path_buf()),
            ..DashboardConfig::default()
        };
        assert!(config.load_catalog().unwrap().is_empty());
        assert!(!DashboardConfig::default().load_catalog().unwrap().is_empty());
    }

    #[test]
    fn locale_overrides_are_merged() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("de.json"), r#"{"nav.dashboard": "Übersicht"}"#).unwrap();
        let config = DashboardConfig {
            language: Language::De,
            locales_dir: Some(dir.path().to_path_buf()),
            ..DashboardConfig::default()
        };
        let localizer = config.load_localizer().unwrap();
        assert_eq!(localizer.translate("nav.dashboard"), "Übersicht");
        assert_eq!(localizer.translate("nav.ecosystem"), "Ökosystem");
    }
}
