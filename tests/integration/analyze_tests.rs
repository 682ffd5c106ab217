//! Integration tests for the analyzer
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch, scan, probe and classify cycle end-to-end.

use std::time::Duration;
use sumi_lens::analyzer::Analyzer;
use sumi_lens::config::{AnalyzerConfig, Config, UserAgentConfig};
use sumi_lens::{analyze, AnalysisError, LensError};
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts
fn create_test_config() -> Config {
    Config {
        analyzer: AnalyzerConfig {
            probe_timeout_ms: 300,
            overall_timeout_ms: 5_000,
            ..AnalyzerConfig::default()
        },
        user_agent: UserAgentConfig::default(),
    }
}

/// Mounts an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts an image of `size` bytes at `route`
async fn mount_image(server: &MockServer, route: &str, size: usize) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0u8; size])
                .insert_header("content-type", "application/octet-stream"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_analysis_single_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/dir/page",
        format!(
            r##"<html><head><title>Home</title></head><body>
            <img src="/img/a.png">
            <img src="b.png">
            <img src="{base}/img/c.jpg">
            <img src="/img/missing.svg">
            <img src="/img/slow.svg">
            <img src="/img/logo">
            <a href="/a">A</a>
            <a href="{base}/b">B</a>
            <a href="/a">A again</a>
            <a href="https://other.com/d">D</a>
            <a href="#frag">Frag</a>
            <a href="javascript:void(0)">JS</a>
            </body></html>"##,
            base = base_url
        ),
    )
    .await;

    mount_image(&mock_server, "/img/a.png", 1000).await;
    mount_image(&mock_server, "/dir/b.png", 500).await;
    mount_image(&mock_server, "/img/c.jpg", 2048).await;
    mount_image(&mock_server, "/img/logo", 64).await;

    Mock::given(method("GET"))
        .and(path("/img/missing.svg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/img/slow.svg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0u8; 4096])
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let report = analyze(&config, &format!("{}/dir/page", base_url))
        .await
        .expect("Analysis failed");

    // Counts reflect every image regardless of probe outcome
    assert_eq!(report.image_types["png"].count, 2);
    assert_eq!(report.image_types["jpg"].count, 1);
    assert_eq!(report.image_types["svg"].count, 2);
    assert_eq!(report.image_types["unknown"].count, 1);
    assert_eq!(report.image_urls.len(), 6);

    // Failed and timed-out probes contribute nothing
    assert_eq!(report.image_types["png"].size, 1500);
    assert_eq!(report.image_types["jpg"].size, 2048);
    assert_eq!(report.image_types["svg"].size, 0);
    assert_eq!(report.image_types["unknown"].size, 64);

    assert_eq!(
        report.image_types["png"].urls,
        vec![
            format!("{}/img/a.png", base_url),
            format!("{}/dir/b.png", base_url)
        ]
    );

    assert_eq!(
        report.internal_links,
        vec![format!("{}/a", base_url), format!("{}/b", base_url)]
    );
    assert_eq!(report.external_links, vec!["https://other.com/d".to_string()]);
}

#[tokio::test]
async fn test_browser_user_agent_sent() {
    let mock_server = MockServer::start().await;
    let mut config = create_test_config();
    config.user_agent.value = "Mozilla/5.0 (X11; Linux x86_64) SumiLensTest/1.0".to_string();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", config.user_agent.value.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = analyze(&config, &format!("{}/", mock_server.uri()))
        .await
        .expect("Analysis failed");

    assert!(report.image_types.is_empty());
    assert!(report.internal_links.is_empty());
}

#[tokio::test]
async fn test_empty_url_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = analyze(&create_test_config(), "   ").await;

    assert!(matches!(
        result,
        Err(LensError::Analysis(AnalysisError::MissingInput))
    ));
    mock_server.verify().await;
}

#[tokio::test]
async fn test_http_error_status_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let analyzer = Analyzer::new(&create_test_config()).unwrap();
    let result = analyzer
        .analyze(&format!("{}/gone", mock_server.uri()))
        .await;

    match result {
        Err(err @ AnalysisError::UpstreamHttp { .. }) => {
            assert_eq!(err.status_code(), 404);
            assert_eq!(err.message(), "Failed to fetch URL (Status: 404)");
        }
        other => panic!("expected UpstreamHttp, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config();
    config.analyzer.overall_timeout_ms = 300;
    config.analyzer.probe_timeout_ms = 100;

    let analyzer = Analyzer::new(&config).unwrap();
    let result = analyzer
        .analyze(&format!("{}/slow", mock_server.uri()))
        .await;

    match result {
        Err(err @ AnalysisError::UpstreamTimeout { .. }) => {
            assert_eq!(err.status_code(), 408);
        }
        other => panic!("expected UpstreamTimeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_closed_port_is_unreachable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let analyzer = Analyzer::new(&create_test_config()).unwrap();
    let result = analyzer
        .analyze(&format!("http://127.0.0.1:{}/", port))
        .await;

    match result {
        Err(err @ AnalysisError::UpstreamUnreachable { .. }) => {
            assert_eq!(err.status_code(), 503);
            assert!(err.details().is_some());
        }
        other => panic!("expected UpstreamUnreachable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_link_cap_end_to_end() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
            <a href="/1">1</a><a href="/2">2</a><a href="/3">3</a>
            <a href="/4">4</a><a href="/5">5</a>
            <a href="https://other.com/x">x</a>
            <a href="https://other.org/y">y</a>
            <a href="https://other.net/z">z</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    let mut config = create_test_config();
    config.analyzer.max_links_per_category = Some(2);

    let base_url = mock_server.uri();
    let report = analyze(&config, &format!("{}/", base_url))
        .await
        .expect("Analysis failed");

    assert_eq!(
        report.internal_links,
        vec![format!("{}/1", base_url), format!("{}/2", base_url)]
    );
    assert_eq!(
        report.external_links,
        vec!["https://other.com/x".to_string(), "https://other.org/y".to_string()]
    );
}

#[tokio::test]
async fn test_probe_failure_isolated_between_buckets() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<html><body><img src="/ok.png"><img src="/bad.gif"></body></html>"#.to_string(),
    )
    .await;
    mount_image(&mock_server, "/ok.png", 321).await;

    Mock::given(method("GET"))
        .and(path("/bad.gif"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let report = analyze(&create_test_config(), &format!("{}/", mock_server.uri()))
        .await
        .expect("Analysis failed");

    assert_eq!(report.image_types["png"].count, 1);
    assert_eq!(report.image_types["png"].size, 321);
    assert_eq!(report.image_types["gif"].count, 1);
    assert_eq!(report.image_types["gif"].size, 0);
}

/// Serves a page of `count` images whose responses all hang for seconds
async fn mount_slow_gallery(server: &MockServer, count: usize) {
    let html: String = (0..count)
        .map(|i| format!(r#"<img src="/img/{}.png">"#, i))
        .collect();
    mount_page(server, "/", format!("<html><body>{}</body></html>", html)).await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/img/\d+\.png$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0u8; 256])
                .set_delay(Duration::from_secs(3)),
        )
        .mount(server)
        .await;
}

/// A probe timeout six times shorter than the overall bound
fn slow_gallery_config(max_concurrent_probes: Option<usize>) -> Config {
    let mut config = create_test_config();
    config.analyzer.probe_timeout_ms = 100;
    config.analyzer.overall_timeout_ms = 600;
    config.analyzer.max_concurrent_probes = max_concurrent_probes;
    config
}

#[tokio::test]
async fn test_many_timed_out_images_still_report() {
    let mock_server = MockServer::start().await;
    mount_slow_gallery(&mock_server, 200).await;

    let report = analyze(&slow_gallery_config(None), &format!("{}/", mock_server.uri()))
        .await
        .expect("Analysis failed");

    assert_eq!(report.image_types["png"].count, 200);
    assert_eq!(report.image_types["png"].size, 0);
    assert_eq!(report.image_urls.len(), 200);
}

#[tokio::test]
async fn test_bounded_probe_concurrency_still_reports() {
    let mock_server = MockServer::start().await;
    mount_slow_gallery(&mock_server, 200).await;

    // 13 rounds of 100ms probes outlast the 600ms bound
    let started = std::time::Instant::now();
    let report = analyze(&slow_gallery_config(Some(16)), &format!("{}/", mock_server.uri()))
        .await
        .expect("Analysis failed");

    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(report.image_types["png"].count, 200);
    assert_eq!(report.image_types["png"].size, 0);
}

#[tokio::test]
async fn test_unusable_user_agent_reported_as_local_failure() {
    let mut config = create_test_config();
    config.user_agent.value = "SumiLens\u{0}Test".to_string();

    match Analyzer::new(&config) {
        Err(err @ AnalysisError::LocalProcessing { .. }) => {
            assert_eq!(err.status_code(), 500);
            assert!(err.details().unwrap().contains("HTTP client"));
        }
        Err(other) => panic!("expected LocalProcessing, got {:?}", other),
        Ok(_) => panic!("expected the client build to fail"),
    }

    let result = analyze(&config, "https://example.com/").await;
    assert!(matches!(result, Err(LensError::Config(_))));
}
