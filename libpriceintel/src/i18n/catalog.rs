//! Translation catalogs
//!
//! A catalog is a flat key -> string map for one locale. Catalogs are parsed
//! once at startup and never mutated afterwards; `CatalogSet` is shared
//! behind an `Arc` by every consumer.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::{LocaleError, Result};
use crate::i18n::Locale;

const BUILTIN_EN: &str = include_str!("../../locales/en.json");
const BUILTIN_ES: &str = include_str!("../../locales/es.json");
const BUILTIN_ZH: &str = include_str!("../../locales/zh.json");

#[derive(Debug, Clone)]
pub struct Catalog {
    locale: Locale,
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn new(locale: Locale, entries: HashMap<String, String>) -> Self {
        Self { locale, entries }
    }

    /// Parse a flat JSON object of string values
    pub fn from_json(locale: Locale, json: &str) -> Result<Self> {
        let entries: HashMap<String, String> = serde_json::from_str(json).map_err(|e| {
            LocaleError::Catalog(format!("{} catalog is not a flat string map: {}", locale, e))
        })?;
        Ok(Self::new(locale, entries))
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Every loaded catalog plus the locale used as fallback
#[derive(Debug, Clone)]
pub struct CatalogSet {
    default: Locale,
    catalogs: HashMap<Locale, Catalog>,
}

impl CatalogSet {
    /// Build a set from explicit catalogs
    ///
    /// Fails when the default locale has no catalog, since fallback would
    /// have nothing to fall back to.
    pub fn new(default: Locale, catalogs: impl IntoIterator<Item = Catalog>) -> Result<Self> {
        let catalogs: HashMap<Locale, Catalog> =
            catalogs.into_iter().map(|c| (c.locale(), c)).collect();
        if !catalogs.contains_key(&default) {
            return Err(LocaleError::Catalog(format!(
                "no catalog for default locale '{}'",
                default
            ))
            .into());
        }
        Ok(Self { default, catalogs })
    }

    /// The catalogs compiled into the library
    pub fn builtin() -> Result<Self> {
        Self::new(
            Locale::En,
            [
                Catalog::from_json(Locale::En, BUILTIN_EN)?,
                Catalog::from_json(Locale::Es, BUILTIN_ES)?,
                Catalog::from_json(Locale::Zh, BUILTIN_ZH)?,
            ],
        )
    }

    /// Load `<code>.json` files from `dir`
    ///
    /// Locales without a file keep their built-in catalog.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let builtin = Self::builtin()?;
        let mut catalogs = builtin.catalogs;

        for locale in Locale::ALL {
            let path = dir.join(format!("{}.json", locale.code()));
            if !path.exists() {
                continue;
            }
            let content = std::fs::read_to_string(&path).map_err(|e| {
                LocaleError::Catalog(format!("Failed to read {}: {}", path.display(), e))
            })?;
            let catalog = Catalog::from_json(locale, &content)?;
            tracing::debug!(locale = %locale, entries = catalog.len(), path = %path.display(), "Loaded catalog override");
            catalogs.insert(locale, catalog);
        }

        Ok(Self {
            default: builtin.default,
            catalogs,
        })
    }

    /// Use another loaded locale as the fallback
    pub fn with_default(self, default: Locale) -> Result<Self> {
        Self::new(default, self.catalogs.into_values())
    }

    pub fn default_locale(&self) -> Locale {
        self.default
    }

    pub fn get(&self, locale: Locale) -> Option<&Catalog> {
        self.catalogs.get(&locale)
    }

    /// Locales that have a catalog, in `Locale::ALL` order
    pub fn locales(&self) -> Vec<Locale> {
        Locale::ALL
            .into_iter()
            .filter(|l| self.catalogs.contains_key(l))
            .collect()
    }

    /// Look up `key` in `locale`, then in the default catalog
    pub fn lookup(&self, locale: Locale, key: &str) -> Option<&str> {
        self.get(locale)
            .and_then(|c| c.get(key))
            .or_else(|| self.get(self.default).and_then(|c| c.get(key)))
    }

    /// Keys of the default catalog that `locale` does not define, sorted
    pub fn missing_keys(&self, locale: Locale) -> Vec<String> {
        let Some(reference) = self.get(self.default) else {
            return Vec::new();
        };
        let target = self.get(locale);
        let mut missing: Vec<String> = reference
            .keys()
            .filter(|k| !target.is_some_and(|c| c.contains(k)))
            .map(str::to_string)
            .collect();
        missing.sort();
        missing
    }

    /// Missing keys for every non-default locale
    pub fn coverage_report(&self) -> BTreeMap<Locale, Vec<String>> {
        Locale::ALL
            .into_iter()
            .filter(|l| *l != self.default)
            .map(|l| (l, self.missing_keys(l)))
            .collect()
    }
}

/// Substitute `{{name}}` placeholders
///
/// Whitespace inside the braces is ignored. Placeholders with no matching
/// argument are left as written so the gap stays visible.
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = after[..end].trim();
                match args.iter().find(|(k, _)| *k == name) {
                    Some((_, value)) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn catalog(locale: Locale, pairs: &[(&str, &str)]) -> Catalog {
        Catalog::new(
            locale,
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_builtin_catalogs_load() {
        let set = CatalogSet::builtin().unwrap();
        assert_eq!(set.default_locale(), Locale::En);
        assert_eq!(set.locales(), Locale::ALL.to_vec());
        assert_eq!(set.lookup(Locale::Es, "nav.home"), Some("Inicio"));
        assert_eq!(set.lookup(Locale::Zh, "nav.home"), Some("首页"));
    }

    #[test]
    fn test_builtin_catalogs_are_complete() {
        let set = CatalogSet::builtin().unwrap();
        for (locale, missing) in set.coverage_report() {
            assert!(missing.is_empty(), "{} is missing {:?}", locale, missing);
        }
    }

    #[test]
    fn test_lookup_falls_back_to_default() {
        let set = CatalogSet::new(
            Locale::En,
            [
                catalog(Locale::En, &[("a", "A"), ("b", "B")]),
                catalog(Locale::Es, &[("a", "Á")]),
            ],
        )
        .unwrap();

        assert_eq!(set.lookup(Locale::Es, "a"), Some("Á"));
        assert_eq!(set.lookup(Locale::Es, "b"), Some("B"));
        // No zh catalog at all still falls back
        assert_eq!(set.lookup(Locale::Zh, "a"), Some("A"));
        assert_eq!(set.lookup(Locale::Es, "c"), None);
    }

    #[test]
    fn test_missing_keys_sorted() {
        let set = CatalogSet::new(
            Locale::En,
            [
                catalog(Locale::En, &[("z", "Z"), ("a", "A"), ("m", "M")]),
                catalog(Locale::Zh, &[("m", "M")]),
            ],
        )
        .unwrap();

        assert_eq!(set.missing_keys(Locale::Zh), vec!["a", "z"]);
        assert_eq!(set.missing_keys(Locale::Es), vec!["a", "m", "z"]);
        assert!(set.missing_keys(Locale::En).is_empty());
    }

    #[test]
    fn test_new_requires_default_catalog() {
        let result = CatalogSet::new(Locale::Es, [catalog(Locale::En, &[("a", "A")])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json_rejects_nested_values() {
        let result = Catalog::from_json(Locale::En, r#"{"nav": {"home": "Home"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_dir_overrides_single_locale() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("es.json"),
            r#"{"nav.home": "Portada"}"#,
        )
        .unwrap();

        let set = CatalogSet::load_dir(temp_dir.path()).unwrap();
        assert_eq!(set.lookup(Locale::Es, "nav.home"), Some("Portada"));
        // Key absent from the override falls back to English
        assert_eq!(set.lookup(Locale::Es, "nav.pricing"), Some("Pricing"));
        // Untouched locale keeps its built-in catalog
        assert_eq!(set.lookup(Locale::Zh, "nav.home"), Some("首页"));
        assert!(!set.missing_keys(Locale::Es).is_empty());
    }

    #[test]
    fn test_with_default_switches_fallback() {
        let set = CatalogSet::new(
            Locale::En,
            [
                catalog(Locale::En, &[("a", "A")]),
                catalog(Locale::Es, &[("a", "Á"), ("b", "Bé")]),
            ],
        )
        .unwrap()
        .with_default(Locale::Es)
        .unwrap();

        assert_eq!(set.lookup(Locale::En, "b"), Some("Bé"));
    }

    #[test]
    fn test_interpolate() {
        assert_eq!(
            interpolate("Welcome to {{plan}}!", &[("plan", "Starter")]),
            "Welcome to Starter!"
        );
        assert_eq!(
            interpolate("{{ a }}+{{b}}={{c}}", &[("a", "1"), ("b", "2")]),
            "1+2={{c}}"
        );
        assert_eq!(interpolate("no placeholders", &[]), "no placeholders");
        assert_eq!(interpolate("dangling {{open", &[("open", "x")]), "dangling {{open");
    }
}
