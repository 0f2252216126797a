//! HTML extraction for both crawl stages
//!
//! This module provides the `Parser` capability:
//! - Result links from a search-engine results page, using the engine's rule
//! - Flattened plain text from a content page (paragraphs and headings)

use crate::engine::SearchEngine;
use crate::url::{clean_link, unwrap_redirect};
use crate::ParseError;
use scraper::{ElementRef, Html, Selector};

/// Elements whose text makes up a page's corpus text
const TEXT_SELECTOR: &str = "p, h1, h2, h3, h4, h5, h6";

/// Extracts links or text from raw HTML
pub trait Parser: Send + Sync {
    /// Returns the result links on an engine's results page
    fn extract_links(&self, engine: SearchEngine, html: &str) -> Result<Vec<String>, ParseError>;

    /// Returns the page text; an empty string means the page had none
    fn extract_text(&self, html: &str) -> Result<String, ParseError>;
}

/// `Parser` built on the `scraper` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl Parser for HtmlParser {
    /// Extracts result links according to the engine's [`ResultLinkRule`]
    ///
    /// # Link Extraction Rules
    ///
    /// - Only anchors matching the engine's selector are considered
    /// - Redirect links are unwrapped to their target parameter; anchors
    ///   without it are skipped
    /// - Targets must be absolute http(s) URLs
    /// - Fragments and trailing slashes are removed
    ///
    /// [`ResultLinkRule`]: crate::engine::ResultLinkRule
    fn extract_links(&self, engine: SearchEngine, html: &str) -> Result<Vec<String>, ParseError> {
        let rule = engine.link_rule();
        let selector = compile(rule.selector)?;
        let document = Html::parse_document(html);

        let links = document
            .select(&selector)
            .filter_map(|anchor| anchor.value().attr("href"))
            .filter_map(|href| match rule.redirect_param {
                Some(param) => unwrap_redirect(href, param),
                None => Some(href.to_string()),
            })
            .filter_map(|target| clean_link(&target))
            .collect();

        Ok(links)
    }

    /// Flattens paragraph and heading text in document order
    ///
    /// # Example
    ///
    /// ```
    /// use topic_spider::crawler::{HtmlParser, Parser};
    ///
    /// let html = "<h1> Title </h1><div>skipped</div><p>Body <b>text</b></p>";
    /// assert_eq!(HtmlParser.extract_text(html).unwrap(), "Title Body text");
    /// ```
    fn extract_text(&self, html: &str) -> Result<String, ParseError> {
        let selector = compile(TEXT_SELECTOR)?;
        let document = Html::parse_document(html);

        let text = document
            .select(&selector)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(text)
    }
}

fn compile(selector: &str) -> Result<Selector, ParseError> {
    Selector::parse(selector).map_err(|e| ParseError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Joins an element's words with single spaces, whatever whitespace the markup used
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
