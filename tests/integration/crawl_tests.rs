//! End-to-end tests of a single session

use crate::common::{cell, create_test_config, mount_page, read_output};
use site_prospector::crawler::Coordinator;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_session_writes_header_and_rows() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/alpha",
        r#"<a href="mailto:contact@alpha.fr">Mail</a>
        <p>Tel: 04 50 00 00 00</p>
        <a href="https://www.linkedin.com/company/alpha-loisirs">LinkedIn</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let alpha = format!("{}/alpha", server.uri());
    let gone = format!("{}/gone", server.uri());
    let config = create_test_config(&dir, &[[&alpha, "", ""], [&gone, "", ""]]);

    let mut coordinator = Coordinator::new(config.clone(), None, false).unwrap();
    let report = coordinator.run(10).await.unwrap();
    coordinator.save().unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.new_emails, 1);
    assert_eq!(report.new_phones, 1);

    let output = read_output(&config);
    assert_eq!(&output.header[..3], &["website", "email", "phone"]);
    assert_eq!(output.header, coordinator.header());
    assert_eq!(output.rows.len(), 2);

    assert_eq!(cell(&output, 0, "website"), alpha);
    assert_eq!(cell(&output, 0, "emails"), "contact@alpha.fr");
    assert_eq!(cell(&output, 0, "phone_numbers"), "+33450000000");
    assert!(cell(&output, 0, "linkedin_urls").contains("alpha-loisirs"));

    assert_eq!(cell(&output, 1, "website"), gone);
    assert!(output.rows[1][3..].iter().all(String::is_empty));

    let log = fs::read_to_string(config.output.log_path()).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with(&format!("{} , success , ", alpha)));
    assert!(lines[1].starts_with(&format!("{} , error , ", gone)));
}

#[tokio::test]
async fn test_unreachable_and_malformed_rows_are_recorded() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(
        &dir,
        &[
            ["http://127.0.0.1:1/", "", ""],
            ["not a url", "", ""],
            ["", "", ""],
        ],
    );

    let mut coordinator = Coordinator::new(config.clone(), None, false).unwrap();
    let report = coordinator.run(10).await.unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.failed, 3);
    assert_eq!(coordinator.state().last_completed_index, 2);

    let output = read_output(&config);
    assert_eq!(output.rows.len(), 3);
    assert_eq!(cell(&output, 1, "website"), "not a url");
    for row in &output.rows {
        assert!(row[3..].iter().all(String::is_empty));
    }
}

#[tokio::test]
async fn test_timeout_is_a_failure_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("contact@slow.fr")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let slow = format!("{}/slow", server.uri());
    let mut config = create_test_config(&dir, &[[&slow, "", ""]]);
    config.crawler.timeout_secs = 1;

    let mut coordinator = Coordinator::new(config.clone(), None, false).unwrap();
    let report = coordinator.run(10).await.unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(cell(&read_output(&config), 0, "emails"), "");
}

#[tokio::test]
async fn test_dedup_across_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "/alpha", "<p>contact@shared.fr</p>").await;
    mount_page(
        &server,
        "/beta",
        "<p>contact@shared.fr</p><p>info@beta.fr</p><p>contact@shared.fr</p>",
    )
    .await;

    let dir = TempDir::new().unwrap();
    let alpha = format!("{}/alpha", server.uri());
    let beta = format!("{}/beta", server.uri());
    let config = create_test_config(&dir, &[[&alpha, "", ""], [&beta, "", ""]]);

    let mut coordinator = Coordinator::new(config.clone(), None, false).unwrap();
    coordinator.run(10).await.unwrap();

    let output = read_output(&config);
    assert_eq!(cell(&output, 0, "emails"), "contact@shared.fr");
    assert_eq!(cell(&output, 1, "emails"), "info@beta.fr");
    assert!(coordinator.state().ledger.contains("emails", "contact@shared.fr"));
}

#[tokio::test]
async fn test_seeded_contacts_are_not_reported() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/alpha",
        "<p>contact@alpha.fr</p><p>sales@alpha.fr</p><p>Tel: 04 50 00 00 00</p>",
    )
    .await;

    let dir = TempDir::new().unwrap();
    let alpha = format!("{}/alpha", server.uri());
    let config = create_test_config(
        &dir,
        &[[&alpha, "contact@alpha.fr", "04.50.00.00.00"]],
    );

    let mut coordinator = Coordinator::new(config.clone(), None, false).unwrap();
    let report = coordinator.run(10).await.unwrap();

    assert_eq!(report.new_emails, 1);
    assert_eq!(report.new_phones, 0);

    let output = read_output(&config);
    assert_eq!(cell(&output, 0, "emails"), "sales@alpha.fr");
    assert_eq!(cell(&output, 0, "phone_numbers"), "");
    // Input cells are copied through untouched
    assert_eq!(cell(&output, 0, "email"), "contact@alpha.fr");
}

#[tokio::test]
async fn test_dedup_disabled_reports_everything() {
    let server = MockServer::start().await;
    mount_page(&server, "/alpha", "<p>contact@shared.fr</p>").await;
    mount_page(&server, "/beta", "<p>contact@shared.fr</p>").await;

    let dir = TempDir::new().unwrap();
    let alpha = format!("{}/alpha", server.uri());
    let beta = format!("{}/beta", server.uri());
    let mut config = create_test_config(
        &dir,
        &[[&alpha, "contact@shared.fr", ""], [&beta, "", ""]],
    );
    config.dedup.enabled = false;

    let mut coordinator = Coordinator::new(config.clone(), None, false).unwrap();
    coordinator.run(10).await.unwrap();

    let output = read_output(&config);
    assert_eq!(cell(&output, 0, "emails"), "contact@shared.fr");
    assert_eq!(cell(&output, 1, "emails"), "contact@shared.fr");
}

#[tokio::test]
async fn test_business_signals_are_extracted() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/shop",
        r#"<h1>Location de vélo et VTT</h1>
        <p>Votre vélo électrique, votre vélo de route.</p>
        <p>Cours de ski</p>
        <script src="https://fareharbor.com/embeds/api/v1/"></script>"#,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let shop = format!("{}/shop", server.uri());
    let config = create_test_config(&dir, &[[&shop, "", ""]]);

    let mut coordinator = Coordinator::new(config.clone(), None, false).unwrap();
    coordinator.run(10).await.unwrap();

    let output = read_output(&config);
    assert_eq!(cell(&output, 0, "renting_keywords"), "Location");
    assert_eq!(cell(&output, 0, "most_likely_industry"), "bike");
    assert_eq!(cell(&output, 0, "software_name"), "FareHarbor");
}
