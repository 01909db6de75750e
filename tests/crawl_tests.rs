//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the directory site and run the
//! full crawl cycle end-to-end against CSV tables in a temporary directory.

use people_sweep::config::{Config, LoaderConfig, SiteConfig, TablesConfig};
use people_sweep::crawler::{run_crawl, PageKind};
use people_sweep::table::{CsvTableStore, TableError, TableStore};
use people_sweep::{SearchKey, SweepError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at `server` with tables in `dir`
fn create_test_config(server: &MockServer, dir: &Path) -> Config {
    Config {
        tables: TablesConfig {
            cities: dir.join("cities.csv"),
            last_names: dir.join("last_names.csv"),
            searches: dir.join("searches.csv"),
            results: dir.join("results.csv"),
        },
        site: SiteConfig {
            base_url: format!("{}/name/", server.uri()),
        },
        loader: LoaderConfig {
            user_agent: "TestSweep/1.0".to_string(),
            settle_delay: 0,
        },
    }
}

fn write_reference_tables(dir: &Path, zip_codes: &[&str], last_names: &[&str]) {
    fs::write(
        dir.join("cities.csv"),
        format!("City,Zip Code\n{}", rows(zip_codes, |z| format!("Somewhere,{}", z))),
    )
    .unwrap();
    fs::write(
        dir.join("last_names.csv"),
        format!("Last Name\n{}", rows(last_names, |n| n.to_string())),
    )
    .unwrap();
}

fn rows(values: &[&str], line: impl Fn(&str) -> String) -> String {
    values.iter().map(|v| format!("{}\n", line(v))).collect()
}

fn listing(exact_matches: u32, links: &[&str]) -> String {
    let items: String = links
        .iter()
        .map(|href| {
            format!(
                r#"<li itemscope class="card has_phone"><a class="clickstream-link" href="{}">Match</a></li>"#,
                href
            )
        })
        .collect();
    format!(
        r#"<html><head><title>Results</title></head><body>
        <div class="logo-wrapper"><a href="/">Directory</a></div>
        <div class="serp-results"><h1>{}&nbsp;exact matches</h1></div>
        <ul>{}</ul></body></html>"#,
        exact_matches, items
    )
}

fn person(name: &str, street: &str, phones: &[&str]) -> String {
    let numbers: String = phones
        .iter()
        .map(|p| format!(r#"<a data-gaevent="phone_number">{}</a><p>Carrier</p>"#, p))
        .collect();
    format!(
        r#"<html><body><div class="person detail">
        <h2 class="name">{}</h2>
        <p class="address-primary">{}</p>
        <p class="address-location">Los Angeles, CA 90001</p>
        <div class="tel">{}</div>
        </div></body></html>"#,
        name, street, numbers
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_search() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write_reference_tables(dir.path(), &["90001"], &["Smith"]);

    mount_page(
        &server,
        "/name/Smith/90001",
        listing(12, &["/person/ann", "/person/bob"]),
    )
    .await;
    mount_page(&server, "/name/Smith/90001/2", listing(12, &["/person/cy"])).await;
    mount_page(
        &server,
        "/person/ann",
        person("Ann Smith", "1 Elm St", &["(213) 555-0001", "(213) 555-0002"]),
    )
    .await;
    mount_page(&server, "/person/bob", person("Bob Smith", "2 Elm St", &[])).await;
    mount_page(
        &server,
        "/person/cy",
        person("Cy Smith, Jr.", "3 Elm St", &["(213) 555-0003"]),
    )
    .await;

    let config = create_test_config(&server, dir.path());
    let summary = run_crawl(&config, None).await.unwrap();

    assert_eq!(summary.searches_completed, 1);
    assert_eq!(summary.pages_fetched, 5);
    assert_eq!(summary.results_added, 3);
    assert!(summary.exhausted);

    let store = CsvTableStore::new(config.tables.clone());

    let worklist = store.load_worklist().unwrap();
    assert_eq!(worklist.len(), 1);
    assert_eq!(worklist[0].key, SearchKey::new("90001", "Smith"));
    assert!(worklist[0].completed_at > 0);

    let results = store.load_results().unwrap();
    let found: Vec<_> = results
        .iter()
        .map(|r| (r.full_name.as_str(), r.phone.as_str()))
        .collect();
    assert_eq!(
        found,
        [
            ("Ann Smith", "(213) 555-0001"),
            ("Ann Smith", "(213) 555-0002"),
            ("Cy Smith, Jr.", "(213) 555-0003"),
        ]
    );
    assert!(results.iter().all(|r| r.zip_code == "90001" && r.last_name == "Smith"));
    assert!(results.iter().all(|r| r.city == "Los Angeles" && r.state == "CA"));

    let searches_text = fs::read_to_string(dir.path().join("searches.csv")).unwrap();
    assert!(searches_text.starts_with("Timestamp,Zip Code,Last Name\n"));

    let results_text = fs::read_to_string(dir.path().join("results.csv")).unwrap();
    assert!(results_text.contains("\"Cy Smith, Jr.\""));
}

#[tokio::test]
async fn test_resume_skips_completed_searches() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write_reference_tables(dir.path(), &["90001", "90002"], &["Smith"]);
    fs::write(
        dir.path().join("searches.csv"),
        "Timestamp,Zip Code,Last Name\n1400000000000,90002,Smith\n",
    )
    .unwrap();

    // Only the pending search may be requested
    mount_page(&server, "/name/Smith/90001", listing(0, &[])).await;

    let config = create_test_config(&server, dir.path());
    let summary = run_crawl(&config, None).await.unwrap();

    assert_eq!(summary.searches_completed, 1);
    assert_eq!(summary.pages_fetched, 1);

    let worklist = CsvTableStore::new(config.tables.clone())
        .load_worklist()
        .unwrap();
    assert_eq!(worklist.len(), 2);
    assert_eq!(worklist[0].key, SearchKey::new("90001", "Smith"));
    assert!(worklist[0].completed_at > 1_400_000_000_000);
    assert_eq!(worklist[1].key, SearchKey::new("90002", "Smith"));
    assert_eq!(worklist[1].completed_at, 1_400_000_000_000);

    // A second run has nothing left to fetch
    let summary = run_crawl(&config, None).await.unwrap();
    assert_eq!(summary.pages_fetched, 0);
}

#[tokio::test]
async fn test_search_limit_leaves_rest_pending() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write_reference_tables(dir.path(), &["90001"], &["Adams", "Baker"]);

    mount_page(&server, "/name/Adams/90001", listing(0, &[])).await;

    let config = create_test_config(&server, dir.path());
    let summary = run_crawl(&config, Some(1)).await.unwrap();

    assert_eq!(summary.searches_completed, 1);
    assert!(!summary.exhausted);

    let worklist = CsvTableStore::new(config.tables.clone())
        .load_worklist()
        .unwrap();
    assert_eq!(worklist.len(), 2);
    assert_eq!(worklist[0].key, SearchKey::new("90001", "Adams"));
    assert!(!worklist[0].is_pending());
    assert_eq!(worklist[1].key, SearchKey::new("90001", "Baker"));
    assert!(worklist[1].is_pending());
}

#[tokio::test]
async fn test_unexpected_page_aborts_without_checkpoint() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write_reference_tables(dir.path(), &["90001"], &["Smith", "Jones"]);

    // Jones is the worklist tail and is searched first
    mount_page(
        &server,
        "/name/Jones/90001",
        "<html><body><h1>Please verify you are human</h1></body></html>".to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/name/Smith/90001"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(0, &[])))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, dir.path());
    let err = run_crawl(&config, None).await.unwrap_err();

    assert!(matches!(
        err,
        SweepError::UnexpectedPage {
            kind: PageKind::Index,
            ..
        }
    ));
    assert!(!dir.path().join("searches.csv").exists());
    assert!(!dir.path().join("results.csv").exists());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_missing_column_fails_before_crawling() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write_reference_tables(dir.path(), &["90001"], &["Smith"]);
    fs::write(dir.path().join("last_names.csv"), "Surname\nSmith\n").unwrap();

    let config = create_test_config(&server, dir.path());
    let err = run_crawl(&config, None).await.unwrap_err();

    match err {
        SweepError::Table(TableError::MissingColumn { column, .. }) => {
            assert_eq!(column, "Last Name")
        }
        other => panic!("unexpected error: {}", other),
    }

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_empty_reference_table_is_rejected() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write_reference_tables(dir.path(), &[], &["Smith"]);

    let config = create_test_config(&server, dir.path());
    let err = run_crawl(&config, None).await.unwrap_err();

    assert!(matches!(err, SweepError::Table(TableError::Empty { .. })));
}
