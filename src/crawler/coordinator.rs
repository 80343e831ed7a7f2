//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates one session:
//! - Loading the checkpoint or building a fresh state
//! - Reconciling the checkpoint with rows already in the output file
//! - Fetching each pending row, extracting, deduplicating, writing
//! - Advancing and saving the checkpoint after every recorded row

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::pacer::Pacer;
use crate::extract::{render_set, CombinedRecord, Pipeline};
use crate::input::{InputDataset, InputRecord};
use crate::output::{read_data_rows, CrawlLog, CsvOutput, SessionReport};
use crate::state::{CrawlState, DedupLedger, RowState, TRACKED_FIELDS};
use crate::storage::{open_store, CheckpointStore, JsonCheckpointStore};
use crate::ProspectorError;
use reqwest::Client;
use std::path::Path;
use std::time::Instant;

/// Main crawler coordinator structure
pub struct Coordinator {
    state: CrawlState,
    store: JsonCheckpointStore,
    dataset: InputDataset,
    pipeline: Pipeline,
    client: Client,
    pacer: Pacer,
    output: CsvOutput,
    log: CrawlLog,
    header: Vec<String>,
}

/// What one row produced, before it is committed
struct RowOutcome {
    state: RowState,
    fields: Vec<String>,
    ledger: Option<DedupLedger>,
    new_emails: usize,
    new_phones: usize,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - Settings loaded from the config file
    /// * `config_hash` - Hash of the config file, stored with a fresh state
    /// * `fresh` - Discard the checkpoint and truncate the output file
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run a session
    /// * `Err(ProspectorError)` - Configuration or I/O failure before any fetch
    pub fn new(
        config: Config,
        config_hash: Option<String>,
        fresh: bool,
    ) -> Result<Self, ProspectorError> {
        let store = open_store(&config.output.checkpoint_path());

        let restored = if fresh {
            tracing::info!("Starting fresh: clearing checkpoint and output");
            store.clear()?;
            CsvOutput::truncate(&config.output.data_path())?;
            None
        } else {
            store.load()?
        };

        let dataset;
        let mut state = match restored {
            Some(state) => {
                if config_hash.is_some() && state.config_hash != config_hash {
                    tracing::warn!(
                        "Config file changed since the checkpoint was created; resuming with the checkpoint's settings"
                    );
                }
                tracing::info!(
                    "Resuming after row {} ({} emails, {} phone numbers known)",
                    state.last_completed_index,
                    state.ledger.email_count(),
                    state.ledger.phone_count()
                );
                dataset = InputDataset::open(
                    &state.settings.input,
                    state.settings.dedup.seeds_from_input(),
                )?;
                state
            }
            None => {
                let mut state = CrawlState::fresh(config, config_hash);
                dataset = InputDataset::open(
                    &state.settings.input,
                    state.settings.dedup.seeds_from_input(),
                )?;
                if state.settings.dedup.seeds_from_input() {
                    let (emails, phones) = dataset.seed_values();
                    state.ledger.seed(emails, phones);
                    tracing::info!(
                        "Seeded ledger with {} emails and {} phone numbers from {}",
                        state.ledger.email_count(),
                        state.ledger.phone_count(),
                        dataset.path().display()
                    );
                }
                state
            }
        };

        let pipeline = Pipeline::standard()?;
        let header: Vec<String> = dataset
            .header()
            .iter()
            .chain(pipeline.headers())
            .cloned()
            .collect();

        let data_path = state.settings.output.data_path();
        let caught_up = reconcile_with_output(&mut state, &data_path, &header)?;
        if caught_up > 0 {
            tracing::warn!(
                "Output already held {} row(s) past the checkpoint; resuming after row {}",
                caught_up,
                state.last_completed_index
            );
        }

        let client = build_http_client(&state.settings)?;
        let pacer = Pacer::from_config(&state.settings.crawler);
        let output = CsvOutput::open(&data_path)?;
        let log = CrawlLog::open(&state.settings.output.log_path())?;

        Ok(Self {
            state,
            store,
            dataset,
            pipeline,
            client,
            pacer,
            output,
            log,
            header,
        })
    }

    /// Runs one session of at most `limit` rows
    ///
    /// Rows recorded by an earlier session are skipped. Fetch failures are
    /// recorded like successes, with empty fields, and count toward `limit`.
    pub async fn run(&mut self, limit: usize) -> Result<SessionReport, ProspectorError> {
        let start_time = Instant::now();
        let mut report = SessionReport {
            skipped: self.state.rows_recorded().min(self.dataset.len()),
            ..Default::default()
        };

        if self.output.is_empty()? {
            self.output.write_header(&self.header)?;
        } else {
            self.output.expect_width(self.header.len());
        }

        tracing::info!(
            "Starting session: {} of {} rows pending, limit {}",
            self.dataset.len() - report.skipped,
            self.dataset.len(),
            limit
        );

        for index in 0..self.dataset.len() {
            if report.processed >= limit {
                break;
            }
            if self.state.is_recorded(index) {
                continue;
            }

            let record = self.dataset.records()[index].clone();
            let outcome = self.process_row(&record).await?;

            match outcome.state {
                RowState::Succeeded => report.succeeded += 1,
                _ => report.failed += 1,
            }
            report.new_emails += outcome.new_emails;
            report.new_phones += outcome.new_phones;

            self.commit_row(&record, outcome)?;
            report.processed += 1;

            self.pacer.pause().await;
        }

        report.last_completed_index = self.state.last_completed_index;
        report.remaining = self
            .dataset
            .len()
            .saturating_sub(self.state.rows_recorded());
        report.elapsed = start_time.elapsed();

        tracing::info!(
            "Session finished: {} rows processed ({} failed) in {:?}",
            report.processed,
            report.failed,
            report.elapsed
        );

        Ok(report)
    }

    /// Fetches and extracts one row without touching any durable state
    async fn process_row(&self, record: &InputRecord) -> Result<RowOutcome, ProspectorError> {
        let row = RowState::Pending.transition(RowState::Fetching)?;
        let website = self.dataset.website(record);
        tracing::debug!("[{}] Fetching {}", record.index, website);

        match fetch_url(&self.client, website).await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                tracing::debug!(
                    "[{}] {} answered {} ({} bytes)",
                    record.index,
                    final_url,
                    status_code,
                    body.len()
                );
                let extracted = self.pipeline.extract(&body)?;
                Ok(self.render(row.transition(RowState::Succeeded)?, &extracted))
            }
            FetchResult::Failed(failure) => {
                tracing::warn!("[{}] {} failed: {}", record.index, website, failure);
                Ok(RowOutcome {
                    state: row.transition(RowState::FetchFailed)?,
                    fields: vec![String::new(); self.pipeline.headers().len()],
                    ledger: None,
                    new_emails: 0,
                    new_phones: 0,
                })
            }
        }
    }

    /// Renders every field, routing tracked fields through a copy of the ledger
    ///
    /// The copy replaces the real ledger only once the row is on disk.
    fn render(&self, state: RowState, extracted: &CombinedRecord) -> RowOutcome {
        let mut ledger = self.state.ledger.clone();
        let mut outcome = RowOutcome {
            state,
            fields: Vec::with_capacity(extracted.len()),
            ledger: None,
            new_emails: 0,
            new_phones: 0,
        };

        for (field, values) in extracted.iter() {
            let emitted = ledger.reconcile(field, values);
            match field {
                "emails" => outcome.new_emails = emitted.len(),
                "phone_numbers" => outcome.new_phones = emitted.len(),
                _ => {}
            }
            outcome.fields.push(render_set(&emitted));
        }

        outcome.ledger = Some(ledger);
        outcome
    }

    /// Appends the row, logs it, then advances and saves the checkpoint
    fn commit_row(
        &mut self,
        record: &InputRecord,
        outcome: RowOutcome,
    ) -> Result<(), ProspectorError> {
        let website = self.dataset.website(record).to_string();
        let log_outcome = outcome.state.outcome().unwrap_or("error");

        let mut cells = record.cells.clone();
        cells.extend(outcome.fields);
        self.output.write_row(&cells)?;

        if let Some(ledger) = outcome.ledger {
            self.state.ledger = ledger;
        }
        self.state.advance_to(record.index);
        self.store.save(&self.state)?;
        let row = outcome.state.transition(RowState::Recorded)?;
        debug_assert!(row.is_terminal());

        self.log.record(&website, log_outcome)?;
        tracing::info!("[{}] {} - {} ({})", record.index, website, log_outcome, row);

        Ok(())
    }

    /// Persists the current state to the checkpoint store
    pub fn save(&self) -> Result<(), ProspectorError> {
        self.store.save(&self.state)?;
        tracing::debug!(
            "Checkpoint saved at row {} to {}",
            self.state.last_completed_index,
            self.store.path().display()
        );
        Ok(())
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Settings in effect for this session (the checkpoint's when resuming)
    pub fn settings(&self) -> &Config {
        &self.state.settings
    }

    /// Output header: input columns followed by the pipeline fields
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn dataset(&self) -> &InputDataset {
        &self.dataset
    }
}

/// Lines the checkpoint up with the rows present in the output file
///
/// Rows past `last_completed_index` were appended by a session that stopped
/// before saving. Their emitted contacts go back into the ledger, which is
/// exactly what reconciling them did the first time. Returns how many rows
/// were caught up.
///
/// When the output holds fewer rows than the checkpoint (file deleted or cut
/// short), the checkpoint moves back and the missing rows are fetched again.
/// The ledger keeps what it learned from them, so contacts they reported
/// the first time are not reported again.
fn reconcile_with_output(
    state: &mut CrawlState,
    data_path: &Path,
    header: &[String],
) -> Result<usize, ProspectorError> {
    let written = read_data_rows(data_path)?;
    if !written.header.is_empty() && written.header != header {
        tracing::warn!(
            "Header of {} does not match the current columns",
            data_path.display()
        );
    }

    let recorded = state.rows_recorded();
    if written.rows.len() < recorded {
        tracing::warn!(
            "{} holds {} row(s) but the checkpoint records {}; those rows will be fetched again",
            data_path.display(),
            written.rows.len(),
            recorded
        );
        state.rewind_to_rows(written.rows.len());
        return Ok(0);
    }
    if written.rows.len() == recorded {
        return Ok(0);
    }

    for field in TRACKED_FIELDS {
        let values: Vec<String> = written
            .column_from(field, recorded)
            .into_iter()
            .flat_map(|cell| cell.split(", "))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();
        state.ledger.absorb(field, values);
    }

    state.advance_to(written.rows.len() - 1);
    Ok(written.rows.len() - recorded)
}

/// Runs a complete session with default options
///
/// Loads or creates the state, processes up to the configured limit, and
/// saves the checkpoint whether or not the session succeeded.
///
/// # Example
///
/// ```no_run
/// use site_prospector::config::load_config;
/// use site_prospector::crawler::run_session;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let report = run_session(config).await?;
/// println!("{} rows processed", report.processed);
/// # Ok(())
/// # }
/// ```
pub async fn run_session(config: Config) -> Result<SessionReport, ProspectorError> {
    let limit = config.crawler.limit;
    let mut coordinator = Coordinator::new(config, None, false)?;
    let result = coordinator.run(limit).await;
    coordinator.save()?;
    result
}
