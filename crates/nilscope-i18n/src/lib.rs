//! nilscope localization
//!
//! A fixed set of six UI languages, one flat key → text table per language,
//! and a [`Localizer`] holding the active language.
//!
//! Lookup never fails: a key missing from the active table (or mapped to an
//! empty string) resolves to the key itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
    #[error("unknown language `{0}` (expected en|es|fr|de|ja|zh)")]
    UnknownLanguage(String),

    #[error("malformed translation table for `{language}`: {source}")]
    Json {
        language: Language,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Languages
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
    Ja,
    Zh,
}

impl Language {
    /// Selector order.
    pub const ALL: [Language; 6] = [
        Language::En,
        Language::Es,
        Language::Fr,
        Language::De,
        Language::Ja,
        Language::Zh,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
            Self::Ja => "ja",
            Self::Zh => "zh",
        }
    }

    /// Name of the language in itself, as shown in the selector.
    pub fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Español",
            Self::Fr => "Français",
            Self::De => "Deutsch",
            Self::Ja => "日本語",
            Self::Zh => "中文",
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            Self::En => "🇺🇸",
            Self::Es => "🇪🇸",
            Self::Fr => "🇫🇷",
            Self::De => "🇩🇪",
            Self::Ja => "🇯🇵",
            Self::Zh => "🇨🇳",
        }
    }

    /// Case-insensitive; region suffixes are ignored (`fr-CA` → `fr`).
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        Self::ALL.into_iter().find(|l| l.code() == lang)
    }

    fn bundled_json(self) -> &'static str {
        match self {
            Self::En => include_str!("../locales/en.json"),
            Self::Es => include_str!("../locales/es.json"),
            Self::Fr => include_str!("../locales/fr.json"),
            Self::De => include_str!("../locales/de.json"),
            Self::Ja => include_str!("../locales/ja.json"),
            Self::Zh => include_str!("../locales/zh.json"),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| LocaleError::UnknownLanguage(s.to_string()))
    }
}

// ============================================================================
// Tables
// ============================================================================

/// Flat key → text table for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationTable {
    entries: BTreeMap<String, String>,
}

impl TranslationTable {
    pub fn from_json(language: Language, text: &str) -> Result<Self, LocaleError> {
        serde_json::from_str(text).map_err(|source| LocaleError::Json { language, source })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    /// Entries of `other` replace entries with the same key.
    pub fn merge(&mut self, other: TranslationTable) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// ============================================================================
// Localizer
// ============================================================================

/// Active language plus one table per language.
///
/// Switching language swaps which table lookups read from; nothing else is
/// recomputed.
#[derive(Debug, Clone)]
pub struct Localizer {
    language: Language,
    tables: BTreeMap<Language, TranslationTable>,
}

impl Localizer {
    /// Localizer over the compiled-in tables, starting in `en`.
    pub fn bundled() -> Result<Self, LocaleError> {
        let mut tables = BTreeMap::new();
        for language in Language::ALL {
            tables.insert(
                language,
                TranslationTable::from_json(language, language.bundled_json())?,
            );
        }
        Ok(Self {
            language: Language::default(),
            tables,
        })
    }

    /// Localizer over caller-supplied tables. Languages without a table
    /// translate every key to itself.
    pub fn with_tables(tables: BTreeMap<Language, TranslationTable>) -> Self {
        Self {
            language: Language::default(),
            tables,
        }
    }

    /// Merge `<dir>/<code>.json` over the current table for every language
    /// that has such a file. Returns how many files were applied.
    pub fn load_overrides(&mut self, dir: &Path) -> Result<usize, LocaleError> {
        let mut applied = 0;
        for language in Language::ALL {
            let path = dir.join(format!("{}.json", language.code()));
            if !path.is_file() {
                continue;
            }
            let text = std::fs::read_to_string(&path)?;
            let table = TranslationTable::from_json(language, &text)?;
            tracing::debug!(
                language = %language,
                entries = table.len(),
                path = %path.display(),
                "applying translation overrides"
            );
            self.tables.entry(language).or_default().merge(table);
            applied += 1;
        }
        Ok(applied)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        if language != self.language {
            tracing::debug!(from = %self.language, to = %language, "language changed");
        }
        self.language = language;
    }

    /// Look `key` up in the active table; a miss returns `key` verbatim.
    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        match self
            .tables
            .get(&self.language)
            .and_then(|table| table.get(key))
        {
            Some(text) if !text.is_empty() => text,
            _ => {
                tracing::trace!(key, language = %self.language, "translation miss");
                key
            }
        }
    }

    /// The active language's table (empty if none was supplied).
    pub fn active_table(&self) -> &TranslationTable {
        static EMPTY: TranslationTable = TranslationTable {
            entries: BTreeMap::new(),
        };
        self.tables.get(&self.language).unwrap_or(&EMPTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_bundled_table_parses_with_the_same_keys() {
        let mut localizer = Localizer::bundled().unwrap();
        let en_keys: Vec<String> = localizer
            .active_table()
            .iter()
            .map(|(k, _)| k.to_string())
            .collect();
        assert!(!en_keys.is_empty());

        for language in Language::ALL {
            localizer.set_language(language);
            let keys: Vec<&str> = localizer.active_table().iter().map(|(k, _)| k).collect();
            assert_eq!(keys, en_keys, "key set for {language} differs from en");
        }
    }

    #[test]
    fn french_dashboard_title() {
        let mut localizer = Localizer::bundled().unwrap();
        localizer.set_language(Language::Fr);
        assert_eq!(localizer.translate("nav.dashboard"), "Tableau de Bord");
    }

    #[test]
    fn unknown_key_falls_back_to_itself_in_every_language() {
        let mut localizer = Localizer::bundled().unwrap();
        for language in Language::ALL {
            localizer.set_language(language);
            assert_eq!(localizer.translate("made.up.key"), "made.up.key");
        }
    }

    #[test]
    fn empty_text_counts_as_a_miss() {
        let mut table = TranslationTable::default();
        table.insert("nav.dashboard", "");
        let localizer = Localizer::with_tables([(Language::En, table)].into());
        assert_eq!(localizer.translate("nav.dashboard"), "nav.dashboard");
    }

    #[test]
    fn language_without_a_table_translates_to_keys() {
        let mut localizer = Localizer::with_tables(BTreeMap::new());
        localizer.set_language(Language::Ja);
        assert!(localizer.active_table().is_empty());
        assert_eq!(localizer.translate("nav.allNodes"), "nav.allNodes");
    }

    #[test]
    fn parse_accepts_case_and_region_suffixes() {
        assert_eq!(Language::parse("FR"), Some(Language::Fr));
        assert_eq!(Language::parse("fr-CA"), Some(Language::Fr));
        assert_eq!(Language::parse("zh_Hans"), Some(Language::Zh));
        assert_eq!(Language::parse("pt"), None);
        assert!("xx".parse::<Language>().is_err());
    }
}
