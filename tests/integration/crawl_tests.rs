//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::io::Write;
use std::sync::{Arc, Mutex};
use sumi_blc::config::Config;
use sumi_blc::crawler::{run_crawl, Coordinator, CrawlReport, TableLevel};
use sumi_blc::output::{write_report, CrawlStatistics};
use sumi_blc::{BlcError, Status};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Progress sink the test can read back after the crawl
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

/// Mounts an HTML page for GET requests
async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

/// Mounts a HEAD response for a path
async fn mount_head(server: &MockServer, page: &str, status: u16) {
    Mock::given(method("HEAD"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

async fn crawl(server: &MockServer, config: Config) -> CrawlReport {
    Coordinator::new(config, &server.uri())
        .unwrap()
        .with_progress(Box::new(std::io::sink()))
        .run()
        .await
        .unwrap()
}

/// Paths of GET requests the server received, in order
async fn get_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.method.to_string() == "GET")
        .map(|request| request.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;

    // Same machine, different hostname: the crawler compares hostnames only
    let other_url = format!(
        "http://localhost:{}/",
        url::Url::parse(&other.uri()).unwrap().port().unwrap()
    );

    mount_page(
        &site,
        "/",
        &format!(
            r#"<html><body>
            <a href="/about">About</a>
            <a href="mailto:x@y.test">Mail</a>
            <a href="{}">Other</a>
            </body></html>"#,
            other_url
        ),
    )
    .await;
    mount_page(&site, "/about", "<html><body><p>About us</p></body></html>").await;
    Mock::given(method("HEAD"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&other)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&other)
        .await;

    let report = crawl(&site, Config::default()).await;

    assert_eq!(report.pages_crawled, 2);
    assert_eq!(report.requests_issued, 2);

    let statuses: Vec<Status> = report.links.iter().map(|link| link.status).collect();
    assert_eq!(
        statuses,
        vec![Status::Http(200), Status::Mailto, Status::Http(404)]
    );
    assert_eq!(report.links[0].target.resolved.path(), "/about");
    assert_eq!(report.links[2].target.resolved.as_str(), other_url);

    let mut out = Vec::new();
    write_report(&report, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!(
            "[{}/] {} - HTTP 404\ntotal links: 3\n",
            site.uri(),
            other_url
        )
    );

    let stats = CrawlStatistics::from_report(&report);
    assert_eq!(stats.internal_links, 1);
    assert_eq!(stats.external_links, 2);
    assert_eq!(stats.broken_links, 1);
}

#[tokio::test]
async fn test_pages_crawled_in_bfs_order() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/a">A</a><a href="/b">B</a>"#).await;
    mount_page(&server, "/a", r#"<a href="/c">C</a>"#).await;
    mount_page(&server, "/b", r#"<a href="/d">D</a>"#).await;
    mount_page(&server, "/c", "<p>leaf</p>").await;
    mount_page(&server, "/d", "<p>leaf</p>").await;
    for page in ["/a", "/b", "/c", "/d"] {
        mount_head(&server, page, 200).await;
    }

    let progress = SharedBuffer::default();
    let report = Coordinator::new(Config::default(), &server.uri())
        .unwrap()
        .with_progress(Box::new(progress.clone()))
        .run()
        .await
        .unwrap();

    assert_eq!(report.pages_crawled, 5);
    assert!(!report.has_broken_links());
    assert_eq!(get_paths(&server).await, vec!["/", "/a", "/b", "/c", "/d"]);

    let base = server.uri();
    assert_eq!(
        progress.contents(),
        format!(
            "[1]: Crawling {base}/\n\
             [2]: Crawling {base}/a\n\
             [2]: Crawling {base}/b\n\
             [2]: Crawling {base}/c\n\
             [1]: Crawling {base}/d\n"
        )
    );
}

#[tokio::test]
async fn test_each_page_fetched_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r##"<a href="/">Home</a><a href="/a">A</a><a href="/a">A again</a><a href="/a#top">A top</a>"##,
            "text/html",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="/">Home</a><a href="/a">Self</a>"#, "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_head(&server, "/", 200).await;
    mount_head(&server, "/a", 200).await;

    let report = crawl(&server, Config::default()).await;

    assert_eq!(report.pages_crawled, 2);
    assert_eq!(report.links.len(), 6);
    // One HEAD for "/" and one for "/a", fragments included
    assert_eq!(report.requests_issued, 2);
}

#[tokio::test]
async fn test_shared_target_checked_once() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/a">A</a><a href="/shared">Shared</a>"#).await;
    mount_page(&server, "/a", r#"<a href="/shared">Shared</a>"#).await;
    mount_page(&server, "/shared", "<p>shared</p>").await;
    mount_head(&server, "/a", 200).await;
    Mock::given(method("HEAD"))
        .and(path("/shared"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let report = crawl(&server, Config::default()).await;

    assert_eq!(report.links.len(), 3);
    assert_eq!(report.requests_issued, 2);

    // The cached link is returned unchanged
    assert_eq!(report.links[1], report.links[2]);
    assert_eq!(report.links[2].status, Status::Http(403));
    assert_eq!(report.broken_links().count(), 2);
}

#[tokio::test]
async fn test_malformed_link_is_dropped() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="%%%invalid%%%">Bad</a><a href="">Empty</a><a href="/ok">OK</a>"#,
    )
    .await;
    mount_page(&server, "/ok", "<p>ok</p>").await;
    mount_head(&server, "/ok", 200).await;

    let report = crawl(&server, Config::default()).await;

    assert_eq!(report.pages_crawled, 2);
    assert_eq!(report.links.len(), 1);
    assert_eq!(report.links[0].target.resolved.path(), "/ok");
}

#[tokio::test]
async fn test_page_fetch_failures_do_not_abort() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/error">Error</a><a href="/file.pdf">PDF</a><a href="/ok">OK</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/file.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"<a href="/never">x</a>"#, "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "<p>ok</p>").await;
    mount_head(&server, "/error", 500).await;
    mount_head(&server, "/file.pdf", 200).await;
    mount_head(&server, "/ok", 200).await;
    Mock::given(path("/never"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = crawl(&server, Config::default()).await;

    assert_eq!(report.pages_crawled, 4);
    assert_eq!(report.links.len(), 3);

    let broken: Vec<_> = report.broken_links().collect();
    assert_eq!(broken.len(), 1);
    assert_eq!(broken[0].target.resolved.path(), "/error");
    assert_eq!(broken[0].status.label(), "Unknown");
}

#[tokio::test]
async fn test_special_schemes_not_checked() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="tel:+15550100">Call</a><a href="mailto:x@y.test">Mail</a>"#,
    )
    .await;

    let report = crawl(&server, Config::default()).await;

    assert_eq!(report.requests_issued, 0);
    assert_eq!(report.links.len(), 2);
    assert_eq!(report.links[0].status, Status::Phone);
    assert_eq!(report.links[1].status, Status::Mailto);
    assert!(!report.has_broken_links());
    assert_eq!(get_paths(&server).await, vec!["/"]);
}

#[tokio::test]
async fn test_element_table_levels() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<img src="/logo.png"><a href="/x">X</a>"#).await;
    mount_page(&server, "/x", "<p>x</p>").await;
    mount_head(&server, "/x", 200).await;
    mount_head(&server, "/logo.png", 404).await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut anchors = Config::default();
    anchors.crawler.element_table = TableLevel::Anchors;
    let report = crawl(&server, anchors).await;
    assert_eq!(report.links.len(), 1);
    assert!(!report.has_broken_links());

    let report = crawl(&server, Config::default()).await;
    assert_eq!(report.links.len(), 2);
    assert_eq!(report.links[0].status, Status::Http(404));
    assert_eq!(report.links[0].target.resolved.path(), "/logo.png");
}

#[tokio::test]
async fn test_unreachable_target_is_invalid() {
    let server = MockServer::start().await;

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    mount_page(
        &server,
        "/",
        &format!(r#"<a href="http://localhost:{}/down">Down</a>"#, port),
    )
    .await;

    let report = crawl(&server, Config::default()).await;

    assert_eq!(report.links.len(), 1);
    assert_eq!(report.links[0].status, Status::Invalid);
    assert!(report.has_broken_links());
}

#[tokio::test]
async fn test_invalid_seed_is_fatal() {
    let result = run_crawl(Config::default(), "not a url").await;
    assert!(matches!(result, Err(BlcError::InvalidSeed { .. })));
}

#[tokio::test]
async fn test_redirected_seed_page_fetched_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/home"))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/home",
        r#"<a href="/home">Home</a><a href="ftp://127.0.0.1/x">FTP</a>"#,
    )
    .await;
    mount_head(&server, "/home", 200).await;

    let report = crawl(&server, Config::default()).await;

    assert_eq!(get_paths(&server).await, vec!["/", "/home"]);
    assert_eq!(report.pages_crawled, 1);
    assert_eq!(report.links.len(), 2);
    assert_eq!(report.links[1].status, Status::Invalid);
}

#[tokio::test]
async fn test_seed_with_malformed_escape_is_fatal() {
    let server = MockServer::start().await;
    let result = run_crawl(Config::default(), &format!("{}/docs%zz", server.uri())).await;
    assert!(matches!(result, Err(BlcError::InvalidSeed { .. })));
    assert!(get_paths(&server).await.is_empty());
}
