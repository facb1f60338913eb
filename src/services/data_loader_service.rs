use crate::data::csv_tokenizer::{clean_source_text, drop_blank_rows, parse_csv};
use crate::data::data_source::DataSource;
use crate::data::datatable::StatTable;
use crate::data::source_catalog::{MappingError, Selection, SourceCatalog};
use crate::state::events::BackgroundEvent;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// What a load produced. Every variant is something the UI can show;
/// none of them is fatal.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(StatTable),
    /// The source exists but holds no usable rows
    Empty,
    MappingFailed(MappingError),
    FetchFailed(String),
}

/// Service responsible for turning a selection into a StatTable.
/// Resolves the file, fetches it, and runs the parse pipeline.
#[derive(Clone)]
pub struct DataLoaderService {
    source: Arc<dyn DataSource>,
    catalog: SourceCatalog,
}

impl DataLoaderService {
    pub fn new(source: Arc<dyn DataSource>, catalog: SourceCatalog) -> Self {
        Self { source, catalog }
    }

    pub fn describe_source(&self) -> String {
        self.source.describe()
    }

    /// Load the table for a selection, synchronously
    pub fn load(&self, selection: &Selection) -> LoadOutcome {
        let file = match self.catalog.resolve(selection) {
            Ok(file) => file,
            Err(e) => {
                error!("{}", e);
                return LoadOutcome::MappingFailed(e);
            }
        };

        info!("Loading {} for {}", file, selection);
        let start = Instant::now();

        let text = match self.source.fetch_text(file) {
            Ok(text) => text,
            Err(e) => {
                error!("CSV load failed for {}: {:#}", file, e);
                return LoadOutcome::FetchFailed(format!("{:#}", e));
            }
        };

        let outcome = Self::parse_table(file, &text);
        match &outcome {
            LoadOutcome::Loaded(table) => {
                info!(
                    "Loaded {} ({} rows, {} columns) in {} ms",
                    file,
                    table.row_count(),
                    table.column_count(),
                    start.elapsed().as_millis()
                );
                debug!("{}", table.debug_dump());
            }
            _ => warn!("{} has no usable rows", file),
        }
        outcome
    }

    /// Run the parse pipeline on fetched text
    pub fn parse_table(name: &str, text: &str) -> LoadOutcome {
        let grid = drop_blank_rows(parse_csv(clean_source_text(text)));
        match StatTable::from_grid(name, grid) {
            Some(table) => LoadOutcome::Loaded(table),
            None => LoadOutcome::Empty,
        }
    }

    /// Load on a worker thread; the result is sent back tagged with its
    /// generation so a superseded load can be told apart from the latest one.
    pub fn spawn_load(&self, generation: u64, selection: Selection, tx: Sender<BackgroundEvent>) {
        let service = self.clone();
        thread::spawn(move || {
            let outcome = service.load(&selection);
            if tx
                .send(BackgroundEvent::TableLoaded {
                    generation,
                    outcome,
                })
                .is_err()
            {
                debug!("Load {} finished after the receiver closed", generation);
            }
        });
    }
}
