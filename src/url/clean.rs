/// Returns true if the link starts with an absolute http(s) scheme
pub fn is_absolute_http(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}

/// Pulls the real target out of a search-engine redirect link
///
/// The query string is taken as everything after the last `?` and decoded,
/// so `/url?q=https%3A%2F%2Fexample.com%2F&sa=U` yields
/// `https://example.com/`. Returns `None` when the parameter is absent or
/// does not hold an absolute http(s) URL.
///
/// # Examples
///
/// ```
/// use topic_spider::url::unwrap_redirect;
///
/// let href = "//duckduckgo.com/l/?uddg=https%3A%2F%2Fdocs.rs%2Ftokio&rut=abc";
/// assert_eq!(unwrap_redirect(href, "uddg"), Some("https://docs.rs/tokio".to_string()));
/// ```
pub fn unwrap_redirect(href: &str, param: &str) -> Option<String> {
    let query = href.rsplit_once('?').map_or(href, |(_, query)| query);

    ::url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
        .filter(|target| is_absolute_http(target))
}

/// Reduces a result link to the form used for deduplication
///
/// Drops the fragment and trailing slashes. Non-absolute links are rejected.
///
/// # Examples
///
/// ```
/// use topic_spider::url::clean_link;
///
/// assert_eq!(clean_link("https://example.com/post/#intro"), Some("https://example.com/post".to_string()));
/// assert_eq!(clean_link("/relative/path"), None);
/// ```
pub fn clean_link(link: &str) -> Option<String> {
    let link = link.trim();
    if !is_absolute_http(link) {
        return None;
    }

    let without_fragment = link.split_once('#').map_or(link, |(head, _)| head);
    Some(without_fragment.trim_end_matches('/').to_string())
}
