use url::Url;

use crate::{UrlError, UrlResult};

/// Normalizes a research URL to a stable absolute form.
///
/// Relative inputs are joined against `base`. The result keeps scheme,
/// host (and explicit port) and path only; query and fragment are dropped,
/// and spaces in the path (literal or percent-encoded) become underscores,
/// the wiki's canonical separator.
///
/// # Examples
///
/// ```
/// use techtrawl::url::normalize_research_url;
/// use url::Url;
///
/// let base = Url::parse("https://wiki.factorio.com").unwrap();
/// let url = normalize_research_url(&base, "/Electronics_(research)").unwrap();
/// assert_eq!(url, "https://wiki.factorio.com/Electronics_(research)");
/// ```
pub fn normalize_research_url(base: &Url, url: &str) -> UrlResult<String> {
    if url.is_empty() {
        return Err(UrlError::Empty);
    }

    let parsed = if url.starts_with("http://") || url.starts_with("https://") {
        Url::parse(url).map_err(|e| UrlError::Parse(e.to_string()))?
    } else {
        base.join(url).map_err(|e| UrlError::Parse(e.to_string()))?
    };

    let host = parsed
        .host_str()
        .ok_or_else(|| UrlError::MissingHost(url.to_string()))?;

    // Keep explicit ports; Url::port() already hides scheme defaults
    let authority = match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    let path = parsed.path().replace("%20", "_").replace(' ', "_");

    Ok(format!("{}://{}{}", parsed.scheme(), authority, path))
}

/// Returns true if a site-relative href points at a research page.
pub fn is_research_href(href: &str) -> bool {
    href.starts_with('/') && href.ends_with("_(research)")
}
