//! URL helpers for Listing-Harvester
//!
//! Category display names are derived from category URLs, and pagination
//! targets found in listing markup are resolved against the page they were
//! found on.

use url::Url;

/// Derives the display name of a category from its listing URL
///
/// The name is the last non-empty path segment (query and fragment are not
/// part of the path). A URL without any path segment falls back to its host,
/// and an unparseable string to its trailing `/`-separated piece.
///
/// # Examples
///
/// ```
/// use listing_harvester::url::category_display_name;
///
/// assert_eq!(
///     category_display_name("https://shop.example.com/gp/bestsellers/kitchen/ref=zg_bs_nav_kitchen_0"),
///     "ref=zg_bs_nav_kitchen_0"
/// );
/// assert_eq!(category_display_name("https://shop.example.com/deals/"), "deals");
/// assert_eq!(category_display_name("https://shop.example.com/"), "shop.example.com");
/// ```
pub fn category_display_name(category_url: &str) -> String {
    match Url::parse(category_url) {
        Ok(url) => {
            let segment = url
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                .map(str::to_string);

            segment
                .or_else(|| url.host_str().map(str::to_string))
                .unwrap_or_else(|| category_url.to_string())
        }
        Err(_) => category_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(category_url)
            .to_string(),
    }
}

/// Resolves a link href to an absolute http(s) URL
///
/// Returns None if the link cannot be followed:
/// - empty or fragment-only hrefs
/// - `javascript:` pseudo links (commonly used by disabled controls)
/// - invalid URLs or non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
