//! Integration tests for locale resolution
//!
//! Exercises catalogs, detection, persistence and fallback together through
//! the public API.

use std::collections::HashMap;
use std::sync::Arc;

use libpriceintel::i18n::{
    Catalog, CatalogSet, FilePreferenceStore, Locale, LocaleResolver, LocaleSource,
    MemoryPreferenceStore, PreferenceStore, StaticLanguageDetector, LOCALE_PREFERENCE_KEY,
};
use libpriceintel::PriceIntelError;
use tempfile::TempDir;

fn builtin_resolver(store: Arc<dyn PreferenceStore>, langs: &[&str]) -> LocaleResolver {
    LocaleResolver::new(
        Arc::new(CatalogSet::builtin().unwrap()),
        store,
        &StaticLanguageDetector::new(langs.iter().copied()),
    )
}

#[test]
fn test_every_default_key_resolves_in_every_locale() {
    let catalogs = CatalogSet::builtin().unwrap();
    let default = catalogs.get(Locale::En).unwrap();
    let resolver = builtin_resolver(Arc::new(MemoryPreferenceStore::new()), &[]);

    for locale in Locale::ALL {
        let own = catalogs.get(locale).unwrap();
        for key in default.keys() {
            let resolved = resolver.resolve_in(locale, key);
            let expected = own.get(key).or_else(|| default.get(key)).unwrap();
            assert_eq!(resolved, expected, "key {} in {}", key, locale);
        }
    }
}

#[test]
fn test_builtin_catalogs_are_complete() {
    let catalogs = CatalogSet::builtin().unwrap();
    for (locale, missing) in catalogs.coverage_report() {
        assert!(missing.is_empty(), "{} is missing {:?}", locale, missing);
    }
}

#[test]
fn test_missing_key_falls_back_to_default_locale() {
    let en = Catalog::new(
        Locale::En,
        HashMap::from([
            ("nav.home".to_string(), "Home".to_string()),
            ("nav.demo".to_string(), "Demo".to_string()),
        ]),
    );
    let es = Catalog::new(
        Locale::Es,
        HashMap::from([("nav.home".to_string(), "Inicio".to_string())]),
    );
    let catalogs = CatalogSet::new(Locale::En, [en, es]).unwrap();
    assert_eq!(catalogs.missing_keys(Locale::Es), vec!["nav.demo".to_string()]);

    let resolver = LocaleResolver::new(
        Arc::new(catalogs),
        Arc::new(MemoryPreferenceStore::new()),
        &StaticLanguageDetector::new(["es"]),
    );

    assert_eq!(resolver.resolve("nav.home"), "Inicio");
    assert_eq!(resolver.resolve("nav.demo"), "Demo");
    assert_eq!(resolver.resolve("nav.unknown"), "nav.unknown");
}

#[test]
fn test_stored_zh_beats_environment() {
    let store = Arc::new(MemoryPreferenceStore::with_value(LOCALE_PREFERENCE_KEY, "zh"));
    let resolver = builtin_resolver(store, &["fr", "en"]);

    assert_eq!(resolver.current_locale(), Locale::Zh);
    assert_eq!(resolver.detection().source, LocaleSource::Stored);
}

#[test]
fn test_unsupported_set_locale_keeps_current() {
    let store = Arc::new(MemoryPreferenceStore::new());
    let resolver = builtin_resolver(store.clone(), &["en"]);

    for bad in ["fr", "", "english", "zh-TW"] {
        let result = resolver.set_locale(bad);
        assert!(matches!(result, Err(PriceIntelError::Locale(_))), "{:?}", bad);
        assert_eq!(resolver.current_locale(), Locale::En);
    }
    assert_eq!(store.get(LOCALE_PREFERENCE_KEY).unwrap(), None);
}

#[test]
fn test_file_store_round_trip_across_sessions() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("prefs.toml");

    {
        let store = Arc::new(FilePreferenceStore::open(&path).unwrap());
        let resolver = builtin_resolver(store, &["en"]);
        resolver.set_locale("ES").unwrap();
    }

    let store = Arc::new(FilePreferenceStore::open(&path).unwrap());
    let resolver = builtin_resolver(store, &["zh"]);
    assert_eq!(resolver.current_locale(), Locale::Es);
    assert_eq!(resolver.resolve("nav.pricing"), "Precios");
}

#[test]
fn test_corrupted_preference_file_falls_back_to_environment() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("prefs.toml");
    std::fs::write(&path, "locale = [not toml").unwrap();

    let store = Arc::new(FilePreferenceStore::open(&path).unwrap());
    let resolver = builtin_resolver(store, &["zh-CN"]);
    assert_eq!(resolver.current_locale(), Locale::Zh);
    assert_eq!(resolver.detection().source, LocaleSource::Environment);
}

#[test]
fn test_catalog_dir_overrides_one_locale() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("es.json"),
        r#"{ "nav.home": "Portada" }"#,
    )
    .unwrap();

    let catalogs = CatalogSet::load_dir(temp_dir.path()).unwrap();
    let resolver = LocaleResolver::new(
        Arc::new(catalogs),
        Arc::new(MemoryPreferenceStore::new()),
        &StaticLanguageDetector::new(["es"]),
    );

    assert_eq!(resolver.resolve("nav.home"), "Portada");
    // Keys absent from the override fall back to English
    assert_eq!(resolver.resolve("nav.pricing"), "Pricing");
    assert_eq!(resolver.resolve_in(Locale::Zh, "nav.home"), "首页");
}
