use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

static RESEARCH_QUALIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\(research\)\s*$").expect("valid qualifier regex"));
static NON_ALNUM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid alnum regex"));
static UNSAFE_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/:*?"<>|]+"#).expect("valid filename regex"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Sanitizes an arbitrary string for safe filesystem use.
pub fn sanitize_filename(name: &str) -> String {
    let trimmed = name.trim();
    let replaced = UNSAFE_FILENAME_CHARS.replace_all(trimmed, "_");
    WHITESPACE_RUN.replace_all(&replaced, "_").into_owned()
}

/// Builds a stable slug from the final URL path segment, percent-decoded.
pub fn slug_from_url(url: &str) -> String {
    let path = Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string());
    let segment = path.rsplit('/').next().unwrap_or("");
    let decoded = percent_decode_str(segment).decode_utf8_lossy().into_owned();
    sanitize_filename(&decoded)
}

/// Derives a stable internal name when the page provides none.
///
/// With a title: strip a trailing `(research)` qualifier, lowercase, and
/// collapse everything outside `[a-z0-9]` to single underscores. An empty
/// result (or no title) falls through to the URL slug, lowercased.
///
/// Deterministic by construction: the crawler's failure path and the
/// resolver's unknown-link path must name the same URL identically.
pub fn fallback_name_from_title(title: Option<&str>, url: &str) -> String {
    if let Some(title) = title {
        let cleaned = RESEARCH_QUALIFIER.replace(title, "");
        let cleaned = cleaned.trim().to_lowercase();
        let cleaned = NON_ALNUM_RUN.replace_all(&cleaned, "_");
        let cleaned = cleaned.trim_matches('_');
        if !cleaned.is_empty() {
            return cleaned.to_string();
        }
    }

    slug_from_url(url).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_replaces_unsafe_chars() {
        assert_eq!(sanitize_filename(r#"a/b\c:d*e?f"g<h>i|j"#), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn test_sanitize_filename_collapses_whitespace() {
        assert_eq!(sanitize_filename("  Steam   power  "), "Steam_power");
    }

    #[test]
    fn test_slug_from_url_takes_last_segment() {
        assert_eq!(
            slug_from_url("https://wiki.factorio.com/Electronics_(research)"),
            "Electronics_(research)"
        );
    }

    #[test]
    fn test_slug_from_url_percent_decodes() {
        assert_eq!(
            slug_from_url("https://wiki.factorio.com/Uranium%20processing"),
            "Uranium_processing"
        );
    }

    #[test]
    fn test_fallback_from_title_strips_qualifier() {
        assert_eq!(
            fallback_name_from_title(Some("Electronics (research)"), "https://x/ignored"),
            "electronics"
        );
    }

    #[test]
    fn test_fallback_from_title_collapses_punctuation() {
        assert_eq!(
            fallback_name_from_title(Some("Kovarex enrichment process"), "https://x/ignored"),
            "kovarex_enrichment_process"
        );
        assert_eq!(
            fallback_name_from_title(Some("Logistics 2"), "https://x/ignored"),
            "logistics_2"
        );
    }

    #[test]
    fn test_fallback_empty_title_uses_slug() {
        assert_eq!(
            fallback_name_from_title(Some("   "), "https://wiki.factorio.com/Steam_power_(research)"),
            "steam_power_(research)"
        );
        assert_eq!(
            fallback_name_from_title(None, "https://wiki.factorio.com/Steam_power_(research)"),
            "steam_power_(research)"
        );
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let a = fallback_name_from_title(Some("Advanced circuit"), "https://x/Advanced_circuit");
        for _ in 0..3 {
            assert_eq!(
                fallback_name_from_title(Some("Advanced circuit"), "https://x/Advanced_circuit"),
                a
            );
        }
    }
}
