//! Internationalization
//!
//! - `Locale`: the supported languages
//! - `CatalogSet`: static key -> string catalogs, one per locale
//! - `PreferenceStore` / `LanguageDetector`: the collaborators used to pick
//!   and remember the active locale
//! - `LocaleResolver`: the explicitly owned context that resolves keys for
//!   the active locale and switches it
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use libpriceintel::i18n::{CatalogSet, FilePreferenceStore, LocaleResolver, SystemLanguageDetector};
//!
//! # fn example() -> libpriceintel::Result<()> {
//! let store = FilePreferenceStore::open("/tmp/priceintel-prefs.toml")?;
//! let resolver = LocaleResolver::new(
//!     Arc::new(CatalogSet::builtin()?),
//!     Arc::new(store),
//!     &SystemLanguageDetector::new(),
//! );
//!
//! println!("{}", resolver.resolve("hero.title"));
//! resolver.set_locale("es")?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod detect;
pub mod locale;
pub mod resolver;
pub mod store;

pub use catalog::{interpolate, Catalog, CatalogSet};
pub use detect::{
    languages_from, merge_languages, LanguageDetector, StaticLanguageDetector,
    SystemLanguageDetector,
};
pub use locale::Locale;
pub use resolver::{detect_initial_locale, Detection, LocaleResolver, LocaleSource, LOCALE_PREFERENCE_KEY};
pub use store::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
