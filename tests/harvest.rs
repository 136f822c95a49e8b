use linkedin_harvest::config::Config;
use linkedin_harvest::export::export_rows;
use linkedin_harvest::harvest::{Harvester, ResultRow};
use linkedin_harvest::search::SearchSource;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.http.bing_base_url = server.uri();
    config.http.jobs_base_url = server.uri();
    config.http.pause_min_ms = 0;
    config.http.pause_max_ms = 0;
    config.http.fetch_pause_min_ms = 0;
    config.http.fetch_pause_max_ms = 0;
    config.http.retry_attempts = 1;
    config.http.retry_min_wait = 0;
    config.http.retry_max_wait = 0;
    config.http.request_timeout = 5;
    config
}

fn results_page(uri: &str, slugs: &[&str], has_next: bool) -> String {
    let items: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<li class="b_algo"><h2><a href="{}/linkedin.com/posts/{}">{}</a></h2></li>"#,
                uri, slug, slug
            )
        })
        .collect();
    let next = if has_next {
        r#"<a class="sb_pagN" href="/search?first=11" title="Next page">Next</a>"#
    } else {
        ""
    };
    format!(
        r#"<html><body><ol id="b_results">{}<li class="b_algo"><h2><a href="https://example.com/x">off-site</a></h2></li></ol>{}</body></html>"#,
        items, next
    )
}

fn post_page(title: &str, description: &str) -> String {
    format!(
        r#"<html><head><title>{}</title><meta property="og:description" content="{}"></head>
           <body><a data-tracking-control-name="public_post_feed-actor-name">Jane Doe</a></body></html>"#,
        title, description
    )
}

async fn mount_search(server: &MockServer) {
    let uri = server.uri();
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("first", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(results_page(&uri, &["a", "b"], true)),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("first", "11"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(results_page(&uri, &["b", "c"], false)),
        )
        .mount(server)
        .await;
}

async fn mount_post(server: &MockServer, slug: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/linkedin.com/posts/{}", slug)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn bing_harvest_walks_pages_dedups_and_keeps_failures() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    mount_post(&server, "a", post_page("Rust at Acme", "We ship Rust")).await;
    mount_post(&server, "b", post_page("Go at Initech", "We ship Go")).await;
    Mock::given(method("GET"))
        .and(path("/linkedin.com/posts/c"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let harvester = Harvester::from_config(&config).unwrap();
    let rows = harvester.run(&["rust", "rust "]).await.unwrap();

    let uri = server.uri();
    let urls: Vec<&str> = rows.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/linkedin.com/posts/a", uri),
            format!("{}/linkedin.com/posts/b", uri),
            format!("{}/linkedin.com/posts/c", uri),
        ]
    );

    assert_eq!(rows[0].keyword, "rust");
    assert_eq!(rows[0].title, "Rust at Acme");
    assert_eq!(rows[0].snippet, "We ship Rust");
    assert_eq!(rows[0].company, "Jane Doe");
    assert!(rows[0].error.is_empty());
    assert!(rows[2].title.is_empty());
    assert!(rows[2].error.contains("500"));
}

#[tokio::test]
async fn include_filter_and_per_keyword_limit() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    mount_post(&server, "a", post_page("Rust at Acme", "We ship Rust")).await;
    mount_post(&server, "b", post_page("Go at Initech", "We ship Go")).await;

    let mut config = test_config(&server);
    config.per_keyword = 2;
    config.include = vec!["RUST".to_string()];
    let harvester = Harvester::from_config(&config).unwrap();
    let rows = harvester.run(&["backend"]).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Rust at Acme");
}

#[tokio::test]
async fn failed_search_page_becomes_error_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let harvester = Harvester::from_config(&test_config(&server)).unwrap();
    let rows = harvester.run(&["ai"]).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].keyword, "ai");
    assert!(rows[0].url.contains("/search?q="));
    assert!(rows[0].error.contains("429"));
}

#[tokio::test]
async fn cookie_session_sends_csrf_headers() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    for slug in ["a", "b", "c"] {
        Mock::given(method("GET"))
            .and(path(format!("/linkedin.com/posts/{}", slug)))
            .and(header("csrf-token", "ajax:7"))
            .and(header("x-restli-protocol-version", "2.0.0"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(post_page("Signed in", "ok")),
            )
            .mount(&server)
            .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let cookies = dir.path().join("cookies.json");
    std::fs::write(
        &cookies,
        r#"[{"name": "li_at", "value": "tok", "domain": ".linkedin.com"},
            {"name": "JSESSIONID", "value": "\"ajax:7\""}]"#,
    )
    .unwrap();

    let mut config = test_config(&server);
    config.cookies = cookies.display().to_string();
    let harvester = Harvester::from_config(&config).unwrap();
    let rows = harvester.run(&["rust"]).await.unwrap();

    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.error.is_empty() && r.title == "Signed in"));
}

#[tokio::test]
async fn broken_cookie_file_falls_back_to_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cookies = dir.path().join("cookies.json");
    std::fs::write(&cookies, "\"not a cookie list\"").unwrap();

    let mut config = test_config(&server);
    config.cookies = cookies.display().to_string();
    let harvester = Harvester::from_config(&config).unwrap();
    let rows = harvester.run(&["rust"]).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].error,
        "Failed to load cookies: Cookie error: Unsupported cookies.json format"
    );
}

const JOBS_PAGE: &str = r#"
<li><div class="base-card">
  <a class="base-card__full-link" href="https://www.linkedin.com/jobs/view/1?trk=x"></a>
  <h3 class="base-search-card__title">Rust Engineer</h3>
  <h4 class="base-search-card__subtitle">Acme</h4>
  <div class="base-search-card__metadata"><span>Berlin</span></div>
</div></li>
<li><div class="base-card">
  <a class="base-card__full-link" href="https://www.linkedin.com/jobs/view/2?trk=y"></a>
  <h3 class="base-search-card__title">Senior Rust Engineer</h3>
  <h4 class="base-search-card__subtitle">Initech</h4>
</div></li>"#;

#[tokio::test]
async fn jobs_source_reads_cards_until_empty_page() {
    let server = MockServer::start().await;
    let listing = "/jobs-guest/jobs/api/seeMoreJobPostings/search";
    Mock::given(method("GET"))
        .and(path(listing))
        .and(query_param("start", "0"))
        .and(query_param("keywords", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_string(JOBS_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(listing))
        .and(query_param("start", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.source = SearchSource::Jobs;
    config.exclude = vec!["senior".to_string()];
    let harvester = Harvester::from_config(&config).unwrap();
    let rows = harvester.run(&["rust"]).await.unwrap();

    assert_eq!(
        rows,
        vec![ResultRow {
            keyword: "rust".to_string(),
            title: "Rust Engineer".to_string(),
            company: "Acme".to_string(),
            url: "https://www.linkedin.com/jobs/view/1".to_string(),
            snippet: "Berlin".to_string(),
            error: String::new(),
        }]
    );

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results.csv");
    export_rows(&rows, &out).unwrap();
    let csv = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        csv,
        "keyword,title,company,url,snippet,error\nrust,Rust Engineer,Acme,https://www.linkedin.com/jobs/view/1,Berlin,\n"
    );
}

#[tokio::test]
async fn bing_discovery_stops_at_max_pages() {
    let server = MockServer::start().await;
    let uri = server.uri();
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&uri, &["a"], true)))
        .expect(3)
        .mount(&server)
        .await;
    mount_post(&server, "a", post_page("Rust at Acme", "We ship Rust")).await;

    let mut config = test_config(&server);
    config.per_keyword = 50;
    config.max_pages = 3;
    let harvester = Harvester::from_config(&config).unwrap();
    let rows = harvester.run(&["rust"]).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Rust at Acme");
}

#[tokio::test]
async fn search_page_is_retried_before_becoming_an_error_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.http.retry_attempts = 3;
    let harvester = Harvester::from_config(&config).unwrap();
    let rows = harvester.run(&["rust"]).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert!(rows[0].error.contains("500"));
}

fn listing_of(count: usize) -> String {
    (0..count)
        .map(|i| {
            format!(
                r#"<li><div class="base-card">
                  <a class="base-card__full-link" href="/jobs/view/{i}?trk=guest"></a>
                  <h3 class="base-search-card__title">Job {i}</h3>
                </div></li>"#
            )
        })
        .collect()
}

#[tokio::test]
async fn jobs_listing_stops_at_max_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs-guest/jobs/api/seeMoreJobPostings/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_of(2)))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.source = SearchSource::Jobs;
    config.per_keyword = 50;
    config.max_pages = 2;
    let harvester = Harvester::from_config(&config).unwrap();
    let rows = harvester.run(&["rust"]).await.unwrap();

    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn jobs_listing_truncates_to_per_keyword_and_resolves_relative_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs-guest/jobs/api/seeMoreJobPostings/search"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_of(25)))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.source = SearchSource::Jobs;
    config.per_keyword = 3;
    let harvester = Harvester::from_config(&config).unwrap();
    let rows = harvester.run(&["rust"]).await.unwrap();

    let urls: Vec<String> = rows.iter().map(|r| r.url.clone()).collect();
    let uri = server.uri();
    assert_eq!(
        urls,
        vec![
            format!("{}/jobs/view/0", uri),
            format!("{}/jobs/view/1", uri),
            format!("{}/jobs/view/2", uri),
        ]
    );
}
