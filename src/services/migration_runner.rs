use crate::config::MigrationConfig;
use crate::domain::offering::RawOfferingRecord;
use crate::error::{MigrationError, Result};
use crate::services::backend::DirectoryBackend;
use crate::services::directory_client::DirectoryClient;
use crate::services::http_backend::HttpDirectoryBackend;
use crate::services::reconciler::{RowOutcome, RowReconciler};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};

const EXPECTED_HEADERS: [&str; 3] = [
    "Universidade / Instituto",
    "Faculdade / Unidade Orgânica",
    "Curso",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rows: usize,
    pub skipped: usize,
    pub linked: usize,
    pub already_linked: usize,
    pub abandoned: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &Result<RowOutcome>) {
        self.rows += 1;
        match outcome {
            Ok(RowOutcome::Skipped) => self.skipped += 1,
            Ok(RowOutcome::Linked) => self.linked += 1,
            Ok(RowOutcome::AlreadyLinked) => self.already_linked += 1,
            Ok(RowOutcome::Abandoned(_)) => self.abandoned += 1,
            Err(_) => self.failed += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows: {} linked, {} already linked, {} skipped, {} abandoned, {} failed",
            self.rows, self.linked, self.already_linked, self.skipped, self.abandoned, self.failed
        )
    }
}

pub struct MigrationRunner<B: DirectoryBackend> {
    reconciler: RowReconciler<B>,
    config: MigrationConfig,
}

impl MigrationRunner<HttpDirectoryBackend> {
    pub fn new(config: MigrationConfig) -> Self {
        let backend = HttpDirectoryBackend::new(&config.base_url);
        Self::with_backend(backend, config)
    }
}

impl<B: DirectoryBackend> MigrationRunner<B> {
    pub fn with_backend(backend: B, config: MigrationConfig) -> Self {
        let client = DirectoryClient::new(backend, &config);
        MigrationRunner {
            reconciler: RowReconciler::new(client),
            config,
        }
    }

    pub fn reconciler(&self) -> &RowReconciler<B> {
        &self.reconciler
    }

    /// Migrates the file named by the configuration.
    pub async fn run(&self) -> Result<RunSummary> {
        self.process_file(&self.config.csv_path).await
    }

    pub async fn process_file(&self, filepath: &str) -> Result<RunSummary> {
        let rows = self.load_rows(filepath)?;
        log::info!("Loaded {} rows from {}", rows.len(), filepath);
        Ok(self.process_rows(&rows).await)
    }

    pub fn load_rows(&self, filepath: &str) -> Result<Vec<RawOfferingRecord>> {
        let file = File::open(filepath).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MigrationError::FileNotFound(filepath.to_string()),
            _ => MigrationError::IoError(e),
        })?;
        self.read_rows(BufReader::new(file))
    }

    /// Reads every record up front; nothing is reconciled until the input is fully parsed.
    pub fn read_rows<R: Read>(&self, reader: R) -> Result<Vec<RawOfferingRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for expected in EXPECTED_HEADERS {
            if !headers.iter().any(|h| h == expected) {
                log::warn!("Column {:?} missing from input, its cells read as empty", expected);
            }
        }

        let mut rows = Vec::new();
        for result in csv_reader.deserialize::<RawOfferingRecord>() {
            match result {
                Ok(record) => rows.push(record),
                Err(e) => {
                    if self.config.skip_malformed {
                        log::warn!("Skipping malformed row: {}", e);
                    } else {
                        return Err(MigrationError::CsvError(e));
                    }
                }
            }
        }

        Ok(rows)
    }

    /// Reconciles rows one after another. A failing row is logged and the batch goes on.
    pub async fn process_rows(&self, rows: &[RawOfferingRecord]) -> RunSummary {
        let mut summary = RunSummary::default();

        for (index, row) in rows.iter().enumerate() {
            let row_number = index + 1;
            let outcome = self.reconciler.reconcile(row).await;

            match &outcome {
                Ok(RowOutcome::Skipped) => {
                    log::debug!("Row {} skipped: incomplete or without sub-unit", row_number)
                }
                Ok(RowOutcome::Abandoned(reason)) => {
                    log::warn!("Row {} abandoned ({})", row_number, reason)
                }
                Ok(_) => {}
                Err(e) => log::error!("Failed to process row {}: {}", row_number, e),
            }

            summary.record(&outcome);
        }

        log::info!("Migration finished: {}", summary);
        summary
    }
}
