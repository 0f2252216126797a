//! Search engine identities and query templating
//!
//! Each configured engine contributes one discovery task per crawl. The
//! engine identity is resolved once, when the task is created, and decides
//! which result-link rule the parser applies to the fetched page.

use crate::config::SearchEngineEntry;
use crate::url::extract_domain;
use crate::SpiderError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Placeholder substituted with the encoded query
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Supported search engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    Google,
    Bing,
    DuckDuckGo,
}

/// How result links are laid out on an engine's results page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultLinkRule {
    /// CSS selector matching result anchors
    pub selector: &'static str,

    /// Query parameter holding the real target when results go through a redirect
    pub redirect_param: Option<&'static str>,
}

impl SearchEngine {
    pub fn all() -> [Self; 3] {
        [Self::Google, Self::Bing, Self::DuckDuckGo]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Bing => "bing",
            Self::DuckDuckGo => "duckduckgo",
        }
    }

    pub fn link_rule(&self) -> ResultLinkRule {
        match self {
            Self::Google => ResultLinkRule {
                selector: "h3.r > a:first-of-type",
                redirect_param: Some("q"),
            },
            Self::Bing => ResultLinkRule {
                selector: "li.b_algo h2 a",
                redirect_param: None,
            },
            Self::DuckDuckGo => ResultLinkRule {
                selector: "a.result__a",
                redirect_param: Some("uddg"),
            },
        }
    }

    /// Infers the engine from a URL's host
    ///
    /// Uses the label just left of the top-level domain, so
    /// `www.google.com` and `google.co` both resolve to Google.
    ///
    /// # Examples
    ///
    /// ```
    /// use topic_spider::SearchEngine;
    /// use url::Url;
    ///
    /// let url = Url::parse("https://www.google.com/search?q=rust").unwrap();
    /// assert_eq!(SearchEngine::from_url(&url), Some(SearchEngine::Google));
    /// ```
    pub fn from_url(url: &Url) -> Option<Self> {
        let host = extract_domain(url)?;
        let mut labels = host.rsplit('.');
        labels.next()?;
        labels.next()?.parse().ok()
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|engine| engine.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown search engine '{}'", s))
    }
}

/// Form-encodes a query the way search engines expect (spaces become `+`)
pub fn encode_query(query: &str) -> String {
    url::form_urlencoded::byte_serialize(query.as_bytes()).collect()
}

/// Substitutes an encoded query into a template and checks the result
fn render_template(template: &str, encoded_query: &str) -> Result<Url, String> {
    if !template.contains(QUERY_PLACEHOLDER) {
        return Err(format!("template must contain {}", QUERY_PLACEHOLDER));
    }

    let rendered = template.replace(QUERY_PLACEHOLDER, encoded_query);
    let url = Url::parse(&rendered).map_err(|e| e.to_string())?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }

    Ok(url)
}

/// Resolves the identity of a configured engine
///
/// An explicit `engine` wins; otherwise the template host decides.
pub fn resolve_engine(entry: &SearchEngineEntry) -> Result<SearchEngine, SpiderError> {
    if let Some(engine) = entry.engine {
        return Ok(engine);
    }

    let probe = render_template(&entry.url, "probe").map_err(|message| {
        SpiderError::InvalidQueryTemplate {
            engine: entry.url.clone(),
            message,
        }
    })?;

    SearchEngine::from_url(&probe).ok_or_else(|| SpiderError::InvalidQueryTemplate {
        engine: entry.url.clone(),
        message: "cannot infer search engine from host; set `engine` explicitly".to_string(),
    })
}

/// Builds the discovery URL for one engine and query
///
/// # Returns
///
/// * `Ok((SearchEngine, String))` - The engine identity and its results-page URL
/// * `Err(SpiderError)` - The template is unusable
pub fn discovery_url(
    entry: &SearchEngineEntry,
    query: &str,
) -> Result<(SearchEngine, String), SpiderError> {
    let engine = resolve_engine(entry)?;
    let url = render_template(&entry.url, &encode_query(query)).map_err(|message| {
        SpiderError::InvalidQueryTemplate {
            engine: engine.to_string(),
            message,
        }
    })?;

    Ok((engine, url.to_string()))
}
