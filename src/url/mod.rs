//! URL helpers for result-link handling
//!
//! Search engines rarely hand out target URLs directly. This module unwraps
//! redirect links, keeps only absolute http(s) targets, and trims them to a
//! stable form so the content stage can deduplicate on the string.

mod clean;

pub use clean::{clean_link, is_absolute_http, unwrap_redirect};

use ::url::Url;

/// Extracts the lowercase host from a URL
///
/// Returns `None` for URLs without a host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use topic_spider::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Google.com/search").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.google.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
