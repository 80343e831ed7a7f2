//! Shared fixtures for the integration tests

use site_prospector::config::{
    Config, CrawlerConfig, DedupConfig, InputConfig, OutputConfig, UserAgentConfig,
};
use site_prospector::output::{read_data_rows, OutputRows};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Writes `website,email,phone` rows to `sites.csv` and builds a config around it
pub fn create_test_config(dir: &TempDir, rows: &[[&str; 3]]) -> Config {
    let input_path = dir.path().join("sites.csv");
    let mut writer = csv::Writer::from_path(&input_path).expect("Failed to create input");
    writer
        .write_record(["website", "email", "phone"])
        .expect("Failed to write header");
    for row in rows {
        writer.write_record(row).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush input");

    Config {
        input: InputConfig {
            path: input_path.display().to_string(),
            website_column: "website".to_string(),
            email_column: "email".to_string(),
            phone_column: "phone".to_string(),
        },
        output: OutputConfig {
            directory: dir.path().join("run").display().to_string(),
            ..Default::default()
        },
        crawler: CrawlerConfig {
            timeout_secs: 2,
            ..Default::default()
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: None,
        },
        dedup: DedupConfig::default(),
    }
}

/// Serves `body` wrapped in a minimal HTML document at `route`
pub async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(
                    "<html><head><title>Test</title></head><body>\n{}\n</body></html>",
                    body
                ))
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

pub fn read_output(config: &Config) -> OutputRows {
    read_data_rows(&config.output.data_path()).expect("Failed to read output")
}

/// Cell of data row `row` under `column`
pub fn cell<'a>(rows: &'a OutputRows, row: usize, column: &str) -> &'a str {
    let position = rows
        .header
        .iter()
        .position(|h| h == column)
        .unwrap_or_else(|| panic!("no column {}", column));
    &rows.rows[row][position]
}
