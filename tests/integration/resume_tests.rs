//! Tests for resuming across sessions

use crate::common::{cell, create_test_config, mount_page, read_output};
use site_prospector::config::Config;
use site_prospector::crawler::Coordinator;
use std::fs;
use tempfile::TempDir;
use wiremock::MockServer;

/// Three pages: row 1 and row 2 share an email
async fn start_sites() -> (MockServer, Vec<String>) {
    let server = MockServer::start().await;
    mount_page(&server, "/one", "<p>one@one.fr</p>").await;
    mount_page(&server, "/two", "<p>team@shared.fr</p><p>Tel: 06 12 34 56 78</p>").await;
    mount_page(&server, "/three", "<p>team@shared.fr</p><p>three@three.fr</p>").await;

    let sites = ["one", "two", "three"]
        .iter()
        .map(|route| format!("{}/{}", server.uri(), route))
        .collect();
    (server, sites)
}

fn config_for(dir: &TempDir, sites: &[String]) -> Config {
    let rows: Vec<[&str; 3]> = sites.iter().map(|s| [s.as_str(), "", ""]).collect();
    create_test_config(dir, &rows)
}

async fn run_session(config: &Config, limit: usize) -> usize {
    let mut coordinator = Coordinator::new(config.clone(), None, false).unwrap();
    let report = coordinator.run(limit).await.unwrap();
    coordinator.save().unwrap();
    report.processed
}

#[tokio::test]
async fn test_resume_continues_at_next_row() {
    let (_server, sites) = start_sites().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &sites);

    assert_eq!(run_session(&config, 2).await, 2);
    assert_eq!(run_session(&config, 10).await, 1);

    let output = read_output(&config);
    assert_eq!(output.rows.len(), 3);
    for (index, site) in sites.iter().enumerate() {
        assert_eq!(cell(&output, index, "website"), site);
    }

    // Header written once: no data row repeats it
    assert!(output.rows.iter().all(|row| row[0] != "website"));

    // The ledger survived the restart
    assert_eq!(cell(&output, 1, "emails"), "team@shared.fr");
    assert_eq!(cell(&output, 2, "emails"), "three@three.fr");
}

#[tokio::test]
async fn test_second_run_appends_nothing() {
    let (_server, sites) = start_sites().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &sites);

    assert_eq!(run_session(&config, 10).await, 3);
    let first = fs::read_to_string(config.output.data_path()).unwrap();

    assert_eq!(run_session(&config, 10).await, 0);
    let second = fs::read_to_string(config.output.data_path()).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_batched_sessions_match_single_session() {
    let (_server, sites) = start_sites().await;

    let single_dir = TempDir::new().unwrap();
    let single = config_for(&single_dir, &sites);
    run_session(&single, 100).await;

    let batched_dir = TempDir::new().unwrap();
    let batched = config_for(&batched_dir, &sites);
    for _ in 0..3 {
        assert_eq!(run_session(&batched, 1).await, 1);
    }

    assert_eq!(read_output(&single), read_output(&batched));
}

#[tokio::test]
async fn test_rows_written_after_last_checkpoint_are_not_repeated() {
    let (_server, sites) = start_sites().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &sites);
    let checkpoint = config.output.checkpoint_path();

    run_session(&config, 1).await;
    let after_first_row = fs::read_to_string(&checkpoint).unwrap();

    // Row two reaches the output, then the checkpoint rolls back as if
    // the process died before saving it
    run_session(&config, 1).await;
    fs::write(&checkpoint, after_first_row).unwrap();

    let mut coordinator = Coordinator::new(config.clone(), None, false).unwrap();
    assert_eq!(coordinator.state().last_completed_index, 1);
    assert!(coordinator
        .state()
        .ledger
        .contains("emails", "team@shared.fr"));

    let report = coordinator.run(10).await.unwrap();
    assert_eq!(report.processed, 1);

    let output = read_output(&config);
    assert_eq!(output.rows.len(), 3);
    assert_eq!(cell(&output, 1, "phone_numbers"), "+33612345678");
    assert_eq!(cell(&output, 2, "emails"), "three@three.fr");
}

#[tokio::test]
async fn test_missing_checkpoint_is_rebuilt_from_output() {
    let (_server, sites) = start_sites().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &sites);

    run_session(&config, 2).await;
    fs::remove_file(config.output.checkpoint_path()).unwrap();

    assert_eq!(run_session(&config, 10).await, 1);

    let output = read_output(&config);
    assert_eq!(output.rows.len(), 3);
    assert_eq!(cell(&output, 2, "emails"), "three@three.fr");
}

#[tokio::test]
async fn test_deleted_output_rows_are_crawled_again() {
    let (_server, sites) = start_sites().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &sites);

    run_session(&config, 2).await;
    fs::remove_file(config.output.data_path()).unwrap();

    let mut coordinator = Coordinator::new(config.clone(), None, false).unwrap();
    assert!(coordinator.state().is_fresh());
    assert_eq!(coordinator.run(10).await.unwrap().processed, 3);
    assert_eq!(coordinator.state().last_completed_index, 2);

    let output = read_output(&config);
    assert_eq!(output.rows.len(), 3);
    for (index, site) in sites.iter().enumerate() {
        assert_eq!(cell(&output, index, "website"), site);
    }

    // The ledger still knows what the lost rows reported
    assert_eq!(cell(&output, 0, "emails"), "");
    assert_eq!(cell(&output, 1, "emails"), "");
    assert_eq!(cell(&output, 2, "emails"), "three@three.fr");
}

#[tokio::test]
async fn test_corrupt_checkpoint_is_set_aside() {
    let (_server, sites) = start_sites().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &sites);
    let checkpoint = config.output.checkpoint_path();

    run_session(&config, 2).await;
    fs::write(&checkpoint, "{ this is not a checkpoint").unwrap();

    let coordinator = Coordinator::new(config.clone(), None, false).unwrap();
    assert_eq!(coordinator.state().last_completed_index, 1);

    let mut quarantined = checkpoint.clone().into_os_string();
    quarantined.push(".corrupt");
    assert!(std::path::Path::new(&quarantined).exists());
}

#[tokio::test]
async fn test_fresh_start_discards_progress() {
    let (_server, sites) = start_sites().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &sites);

    run_session(&config, 10).await;

    let mut coordinator = Coordinator::new(config.clone(), None, true).unwrap();
    assert!(coordinator.state().is_fresh());
    assert_eq!(coordinator.run(10).await.unwrap().processed, 3);

    let output = read_output(&config);
    assert_eq!(output.rows.len(), 3);
    assert_eq!(cell(&output, 1, "emails"), "team@shared.fr");
}

#[tokio::test]
async fn test_checkpoint_settings_win_on_resume() {
    let (_server, sites) = start_sites().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &sites);

    run_session(&config, 1).await;

    let mut changed = config.clone();
    changed.crawler.timeout_secs = 30;
    let coordinator = Coordinator::new(changed, Some("other".to_string()), false).unwrap();

    assert_eq!(coordinator.settings().crawler.timeout_secs, 2);
}
