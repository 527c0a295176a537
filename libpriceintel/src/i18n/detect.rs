//! Environment language preference detection

/// Source of the user's preferred languages, most preferred first
pub trait LanguageDetector: Send + Sync {
    fn preferred_languages(&self) -> Vec<String>;
}

/// Languages of the current user as reported by the process and the OS
///
/// The POSIX locale variables come first: every entry of `LANGUAGE` (colon
/// separated), then `LC_ALL`, `LC_MESSAGES` and `LANG`. The OS preference
/// list from `sys_locale` follows, which is the only source on Windows and
/// in macOS GUI sessions. `C` and `POSIX` carry no language and are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLanguageDetector;

impl SystemLanguageDetector {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageDetector for SystemLanguageDetector {
    fn preferred_languages(&self) -> Vec<String> {
        merge_languages(
            languages_from(|name| std::env::var(name).ok()),
            sys_locale::get_locales(),
        )
    }
}

/// Collect preferred languages through an arbitrary variable lookup
pub fn languages_from<F>(lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut tags: Vec<String> = Vec::new();

    let language_list = lookup("LANGUAGE").unwrap_or_default();
    let singles = ["LC_ALL", "LC_MESSAGES", "LANG"]
        .into_iter()
        .filter_map(&lookup);

    let candidates = language_list
        .split(':')
        .map(str::to_string)
        .chain(singles)
        .collect::<Vec<_>>();

    for raw in candidates {
        push_tag(&mut tags, &raw);
    }

    tags
}

/// Append `system` after `primary`, dropping duplicates and non-languages
pub fn merge_languages<I>(primary: Vec<String>, system: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut tags = Vec::with_capacity(primary.len());
    for raw in primary.into_iter().chain(system) {
        push_tag(&mut tags, &raw);
    }
    tags
}

fn push_tag(tags: &mut Vec<String>, raw: &str) {
    let tag = raw.trim();
    if tag.is_empty() || tag == "C" || tag == "POSIX" || tag.starts_with("C.") {
        return;
    }
    if !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
    }
}

/// A fixed list, for tests and explicit overrides
#[derive(Debug, Clone, Default)]
pub struct StaticLanguageDetector {
    languages: Vec<String>,
}

impl StaticLanguageDetector {
    pub fn new<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
        }
    }
}

impl LanguageDetector for StaticLanguageDetector {
    fn preferred_languages(&self) -> Vec<String> {
        self.languages.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_language_list_comes_first() {
        let langs = languages_from(lookup(&[
            ("LANGUAGE", "fr:es_ES"),
            ("LANG", "zh_CN.UTF-8"),
        ]));
        assert_eq!(langs, vec!["fr", "es_ES", "zh_CN.UTF-8"]);
    }

    #[test]
    fn test_precedence_of_single_variables() {
        let langs = languages_from(lookup(&[
            ("LANG", "en_US.UTF-8"),
            ("LC_MESSAGES", "es_ES.UTF-8"),
            ("LC_ALL", "zh_TW.UTF-8"),
        ]));
        assert_eq!(langs, vec!["zh_TW.UTF-8", "es_ES.UTF-8", "en_US.UTF-8"]);
    }

    #[test]
    fn test_skips_c_locale_and_duplicates() {
        let langs = languages_from(lookup(&[
            ("LANGUAGE", ":en:"),
            ("LC_ALL", "C"),
            ("LC_MESSAGES", "C.UTF-8"),
            ("LANG", "en"),
        ]));
        assert_eq!(langs, vec!["en"]);
    }

    #[test]
    fn test_empty_environment() {
        assert!(languages_from(lookup(&[])).is_empty());
    }

    #[test]
    fn test_os_languages_follow_environment() {
        let langs = merge_languages(
            vec!["es_ES.UTF-8".to_string()],
            vec!["zh-CN".to_string(), "es_ES.UTF-8".to_string(), "C".to_string()],
        );
        assert_eq!(langs, vec!["es_ES.UTF-8", "zh-CN"]);
    }

    #[test]
    fn test_os_languages_used_without_environment() {
        let langs = merge_languages(
            languages_from(lookup(&[])),
            vec!["es-ES".to_string(), "en-US".to_string()],
        );
        assert_eq!(langs, vec!["es-ES", "en-US"]);
    }

    #[test]
    fn test_system_detector_skips_non_languages() {
        let langs = SystemLanguageDetector::new().preferred_languages();
        assert!(langs.iter().all(|l| !l.trim().is_empty() && l != "C" && l != "POSIX"));
    }

    #[test]
    fn test_static_detector() {
        let detector = StaticLanguageDetector::new(["fr", "en"]);
        assert_eq!(detector.preferred_languages(), vec!["fr", "en"]);
    }
}
