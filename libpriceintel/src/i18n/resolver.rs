//! Active-locale state and key resolution

use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::Result;
use crate::i18n::catalog::{interpolate, CatalogSet};
use crate::i18n::detect::LanguageDetector;
use crate::i18n::store::PreferenceStore;
use crate::i18n::Locale;

/// Preference store key holding the chosen locale
pub const LOCALE_PREFERENCE_KEY: &str = "locale";

/// Where the initial locale came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocaleSource {
    Stored,
    Environment,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub locale: Locale,
    pub source: LocaleSource,
}

/// Pick the startup locale
///
/// Precedence: a stored preference naming a supported locale, then the first
/// supported entry of the environment's preferred languages, then `default`.
/// An unreadable store is logged and skipped rather than failing startup.
pub fn detect_initial_locale(
    store: &dyn PreferenceStore,
    detector: &dyn LanguageDetector,
    default: Locale,
) -> Detection {
    match store.get(LOCALE_PREFERENCE_KEY) {
        Ok(Some(stored)) => match stored.parse::<Locale>() {
            Ok(locale) => {
                return Detection {
                    locale,
                    source: LocaleSource::Stored,
                }
            }
            Err(_) => tracing::warn!(value = %stored, "Ignoring unsupported stored locale"),
        },
        Ok(None) => {}
        Err(e) => tracing::warn!("Could not read locale preference: {}", e),
    }

    let preferred = detector.preferred_languages();
    if let Some(locale) = preferred.iter().find_map(|tag| Locale::from_tag(tag)) {
        return Detection {
            locale,
            source: LocaleSource::Environment,
        };
    }

    Detection {
        locale: default,
        source: LocaleSource::Default,
    }
}

/// The single locale context handed to every consumer
///
/// Clones are handles to the same state, so a locale change through one
/// clone is visible through all of them.
#[derive(Clone)]
pub struct LocaleResolver {
    catalogs: Arc<CatalogSet>,
    store: Arc<dyn PreferenceStore>,
    current: Arc<RwLock<Locale>>,
    detection: Detection,
}

impl LocaleResolver {
    /// Create the context, choosing the initial locale via `detect_initial_locale`
    pub fn new(
        catalogs: Arc<CatalogSet>,
        store: Arc<dyn PreferenceStore>,
        detector: &dyn LanguageDetector,
    ) -> Self {
        let detection = detect_initial_locale(store.as_ref(), detector, catalogs.default_locale());
        tracing::debug!(locale = %detection.locale, source = ?detection.source, "Initial locale selected");

        Self {
            catalogs,
            store,
            current: Arc::new(RwLock::new(detection.locale)),
            detection,
        }
    }

    pub fn current_locale(&self) -> Locale {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// How the startup locale was chosen
    pub fn detection(&self) -> Detection {
        self.detection
    }

    pub fn default_locale(&self) -> Locale {
        self.catalogs.default_locale()
    }

    pub fn catalogs(&self) -> &CatalogSet {
        &self.catalogs
    }

    pub fn supported_locales(&self) -> &'static [Locale] {
        &Locale::ALL
    }

    /// Display text for `key` in the active locale
    ///
    /// Falls back to the default locale, then to `key` itself. Never fails.
    pub fn resolve(&self, key: &str) -> String {
        self.resolve_in(self.current_locale(), key)
    }

    /// `resolve` for an explicit locale, without touching the active one
    pub fn resolve_in(&self, locale: Locale, key: &str) -> String {
        match self.catalogs.lookup(locale, key) {
            Some(text) => text.to_string(),
            None => {
                tracing::debug!(key, locale = %locale, "Missing translation");
                key.to_string()
            }
        }
    }

    /// `resolve` followed by `{{name}}` substitution
    pub fn resolve_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        interpolate(&self.resolve(key), args)
    }

    /// Switch the active locale and persist it
    ///
    /// Unsupported identifiers fail with `LocaleError::Unsupported` and leave
    /// the active locale unchanged. The preference is written before the
    /// in-memory switch, so a failed write also leaves it unchanged.
    pub fn set_locale(&self, identifier: &str) -> Result<Locale> {
        let locale: Locale = identifier.parse()?;
        self.switch_to(locale)?;
        Ok(locale)
    }

    pub fn switch_to(&self, locale: Locale) -> Result<()> {
        self.store.set(LOCALE_PREFERENCE_KEY, locale.code())?;

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let previous = *current;
        *current = locale;
        tracing::info!(from = %previous, to = %locale, "Locale changed");
        Ok(())
    }
}

impl std::fmt::Debug for LocaleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleResolver")
            .field("current", &self.current_locale())
            .field("default", &self.default_locale())
            .field("detection", &self.detection)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LocaleError, PriceIntelError};
    use crate::i18n::detect::StaticLanguageDetector;
    use crate::i18n::store::MemoryPreferenceStore;

    fn resolver(store: MemoryPreferenceStore, langs: &[&str]) -> LocaleResolver {
        LocaleResolver::new(
            Arc::new(CatalogSet::builtin().unwrap()),
            Arc::new(store),
            &StaticLanguageDetector::new(langs.iter().copied()),
        )
    }

    #[test]
    fn test_stored_preference_wins() {
        let store = MemoryPreferenceStore::with_value(LOCALE_PREFERENCE_KEY, "zh");
        let detector = StaticLanguageDetector::new(["fr", "en"]);

        let detection = detect_initial_locale(&store, &detector, Locale::En);
        assert_eq!(detection.locale, Locale::Zh);
        assert_eq!(detection.source, LocaleSource::Stored);
    }

    #[test]
    fn test_environment_used_without_preference() {
        let store = MemoryPreferenceStore::new();
        let detector = StaticLanguageDetector::new(["fr-FR", "es-MX", "en"]);

        let detection = detect_initial_locale(&store, &detector, Locale::En);
        assert_eq!(detection.locale, Locale::Es);
        assert_eq!(detection.source, LocaleSource::Environment);
    }

    #[test]
    fn test_unsupported_stored_preference_is_skipped() {
        let store = MemoryPreferenceStore::with_value(LOCALE_PREFERENCE_KEY, "de");
        let detector = StaticLanguageDetector::new(["zh-CN"]);

        let detection = detect_initial_locale(&store, &detector, Locale::En);
        assert_eq!(detection.locale, Locale::Zh);
        assert_eq!(detection.source, LocaleSource::Environment);
    }

    #[test]
    fn test_default_when_nothing_matches() {
        let store = MemoryPreferenceStore::new();
        let detector = StaticLanguageDetector::new(["fr", "de"]);

        let detection = detect_initial_locale(&store, &detector, Locale::Es);
        assert_eq!(detection.locale, Locale::Es);
        assert_eq!(detection.source, LocaleSource::Default);
    }

    #[test]
    fn test_resolve_active_locale() {
        let resolver = resolver(MemoryPreferenceStore::new(), &["es"]);
        assert_eq!(resolver.current_locale(), Locale::Es);
        assert_eq!(resolver.resolve("nav.pricing"), "Precios");
    }

    #[test]
    fn test_resolve_unknown_key_returns_key() {
        let resolver = resolver(MemoryPreferenceStore::new(), &[]);
        assert_eq!(resolver.resolve("does.not.exist"), "does.not.exist");
    }

    #[test]
    fn test_resolve_with_interpolation() {
        let resolver = resolver(MemoryPreferenceStore::new(), &["en"]);
        assert_eq!(
            resolver.resolve_with("wizard.purchase.success", &[("plan", "Professional")]),
            "Welcome to Professional! Your subscription is now active."
        );
    }

    #[test]
    fn test_set_locale_persists() {
        let store = MemoryPreferenceStore::new();
        let resolver = resolver(store.clone(), &["en"]);

        assert_eq!(resolver.set_locale("zh").unwrap(), Locale::Zh);
        assert_eq!(resolver.current_locale(), Locale::Zh);
        assert_eq!(
            store.get(LOCALE_PREFERENCE_KEY).unwrap().as_deref(),
            Some("zh")
        );
        assert_eq!(resolver.resolve("nav.home"), "首页");
    }

    #[test]
    fn test_set_locale_unsupported_leaves_state() {
        let store = MemoryPreferenceStore::new();
        let resolver = resolver(store.clone(), &["es"]);

        let result = resolver.set_locale("fr");
        match result {
            Err(PriceIntelError::Locale(LocaleError::Unsupported(id))) => assert_eq!(id, "fr"),
            other => panic!("Expected Unsupported error, got {:?}", other),
        }
        assert_eq!(resolver.current_locale(), Locale::Es);
        assert_eq!(store.get(LOCALE_PREFERENCE_KEY).unwrap(), None);
    }

    #[test]
    fn test_clones_share_active_locale() {
        let resolver = resolver(MemoryPreferenceStore::new(), &["en"]);
        let view = resolver.clone();

        resolver.set_locale("es").unwrap();
        assert_eq!(view.current_locale(), Locale::Es);
    }
}
