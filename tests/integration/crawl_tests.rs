//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for both a search engine and the
//! sites it links to, and run the full crawl cycle end-to-end over HTTP.

use topic_spider::config::{
    Config, CrawlerConfig, OutputConfig, SearchEngineEntry, UserAgentConfig,
};
use topic_spider::output::{read_corpus_json, write_corpus_json};
use topic_spider::{crawl, SearchEngine};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration querying a single mock search engine
fn create_test_config(engine: SearchEngine, template: String) -> Config {
    Config {
        crawler: CrawlerConfig {
            discovery_workers: 2,
            content_workers: 4,
            discovery_fetch_timeout: 2_000,
            content_fetch_timeout: 500,
            discovery_drain_timeout: 10_000,
            content_drain_timeout: 10_000,
            max_results: 100,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestSpider".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig::default(),
        search_engines: vec![SearchEngineEntry {
            engine: Some(engine),
            url: template,
        }],
    }
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(format!("<html><body>{}</body></html>", body))
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

/// Mounts a Google-style results page whose result links go through `/url?q=`
async fn mount_google_results(server: &MockServer, query: &str, targets: &[String]) {
    let results: String = targets
        .iter()
        .map(|target| {
            format!(
                r#"<div class="g"><h3 class="r"><a href="/url?q={}&amp;sa=U">Result</a></h3></div>"#,
                target
            )
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", query))
        .respond_with(html_page(&format!(
            r#"{}<a href="/preferences">Settings</a>"#,
            results
        )))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_through_google_results() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_google_results(
        &server,
        "async rust",
        &[
            format!("{}/a", base),
            format!("{}/b/", base),
            format!("{}/a#section", base),
        ],
    )
    .await;

    mount_page(&server, "/a", "<h1>Futures</h1><p>Futures are lazy.</p>").await;
    mount_page(&server, "/b", "<p>Tasks are <em>cheap</em>.</p><div>nav</div>").await;

    let config = create_test_config(SearchEngine::Google, format!("{}/search?q={{query}}", base));
    let outcome = crawl(&config, "async rust", 10).await.unwrap();

    let mut corpus = outcome.corpus.clone();
    corpus.sort_by(|a, b| a.url.cmp(&b.url));

    assert_eq!(corpus.len(), 2);
    assert_eq!(corpus[0].url, format!("{}/a", base));
    assert_eq!(corpus[0].text, "Futures Futures are lazy.");
    assert_eq!(corpus[1].url, format!("{}/b", base));
    assert_eq!(corpus[1].text, "Tasks are cheap .");

    assert_eq!(outcome.processed_count, 2);
    assert_eq!(outcome.fetched_count, 3);
    assert!(outcome.discovery_drained);
    assert!(outcome.content_drained);
}

#[tokio::test]
async fn test_bing_results_and_failing_pages() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html_page(&format!(
            r#"<ol>
                <li class="b_algo"><h2><a href="{base}/ok">Ok</a></h2></li>
                <li class="b_algo"><h2><a href="{base}/missing">Missing</a></h2></li>
                <li class="b_algo"><h2><a href="/relative">Relative</a></h2></li>
                <li class="b_ad"><h2><a href="{base}/ad">Ad</a></h2></li>
            </ol>"#,
            base = base
        )))
        .mount(&server)
        .await;

    mount_page(&server, "/ok", "<p>kept</p>").await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ad"))
        .respond_with(html_page("<p>ad</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(SearchEngine::Bing, format!("{}/search?q={{query}}", base));
    let outcome = crawl(&config, "rust", 10).await.unwrap();

    assert_eq!(outcome.corpus.len(), 1);
    assert_eq!(outcome.corpus[0].url, format!("{}/ok", base));
    assert_eq!(outcome.corpus[0].text, "kept");
    assert_eq!(outcome.processed_count, 2);
    assert_eq!(outcome.fetched_count, 3);
}

#[tokio::test]
async fn test_slow_pages_time_out() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_google_results(
        &server,
        "rust",
        &[format!("{}/fast", base), format!("{}/slow", base)],
    )
    .await;

    mount_page(&server, "/fast", "<p>fast</p>").await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page("<p>slow</p>").set_delay(std::time::Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = create_test_config(SearchEngine::Google, format!("{}/search?q={{query}}", base));
    let outcome = crawl(&config, "rust", 10).await.unwrap();

    assert_eq!(outcome.corpus.len(), 1);
    assert_eq!(outcome.corpus[0].text, "fast");
    assert_eq!(outcome.processed_count, 2);
    assert!(outcome.content_drained);
}

#[tokio::test]
async fn test_search_engine_down_yields_empty_corpus() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = create_test_config(
        SearchEngine::Google,
        format!("{}/search?q={{query}}", server.uri()),
    );
    let outcome = crawl(&config, "rust", 10).await.unwrap();

    assert!(outcome.corpus.is_empty());
    assert_eq!(outcome.fetched_count, 0);
    assert_eq!(outcome.processed_count, 0);
}

#[tokio::test]
async fn test_corpus_export_after_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_google_results(&server, "rust", &[format!("{}/a", base)]).await;
    mount_page(&server, "/a", "<p>exported text</p>").await;

    let config = create_test_config(SearchEngine::Google, format!("{}/search?q={{query}}", base));
    let outcome = crawl(&config, "rust", 10).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let corpus_path = dir.path().join("corpus.json");
    write_corpus_json(&outcome.corpus, &corpus_path).unwrap();

    let restored = read_corpus_json(&corpus_path).unwrap();
    assert_eq!(restored, outcome.corpus);
    assert_eq!(restored[0].text, "exported text");
}
