use std::sync::Arc;
use tracing::{debug, info};

use crate::data::data_view::{compute_view, DataView, SortState};
use crate::data::datatable::StatTable;
use crate::data::source_catalog::Selection;
use crate::services::data_loader_service::LoadOutcome;
use crate::state::events::{StateCommand, StateEvent};

/// What the table area is currently showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    Loading,
    Ready,
    MappingError,
    LoadFailed(String),
    Empty,
}

/// Selection, table and view settings for one render
#[derive(Debug, Clone)]
pub struct AppState {
    selection: Selection,
    table: Arc<StatTable>,
    sort: SortState,
    search: String,
    status: TableStatus,
    /// Generation of the most recently issued load
    generation: u64,
}

/// The result of applying an event: the next state and what to do next
#[derive(Debug)]
pub struct Transition {
    pub state: AppState,
    pub command: Option<StateCommand>,
}

impl Transition {
    fn stay(state: AppState) -> Self {
        Self {
            state,
            command: None,
        }
    }
}

impl AppState {
    pub fn new(selection: Selection) -> Self {
        Self {
            selection,
            table: Arc::new(StatTable::empty()),
            sort: SortState::default(),
            search: String::new(),
            status: TableStatus::Loading,
            generation: 0,
        }
    }

    /// Initial state plus the load for the starting selection
    pub fn start(selection: Selection) -> Transition {
        Self::new(selection).apply(StateEvent::Reload)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn table(&self) -> &StatTable {
        &self.table
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn status(&self) -> &TableStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply one event, producing the next state
    pub fn apply(&self, event: StateEvent) -> Transition {
        match event {
            StateEvent::SelectCategory(category) => self.reselect(Selection {
                category,
                ..self.selection
            }),
            StateEvent::SelectRole(role) => self.reselect(Selection {
                role,
                ..self.selection
            }),
            StateEvent::SelectLeague(league) => self.reselect(Selection {
                league,
                ..self.selection
            }),
            StateEvent::SelectMode(mode) => self.reselect(Selection {
                mode,
                ..self.selection
            }),
            StateEvent::Reload => self.reselect(self.selection),
            StateEvent::SortBy(key) => {
                if !self.table.has_header(&key) {
                    debug!("Ignoring sort on unknown header '{}'", key);
                    return Transition::stay(self.clone());
                }
                Transition::stay(Self {
                    sort: self.sort.toggled(&key),
                    ..self.clone()
                })
            }
            StateEvent::SearchChanged(search) => Transition::stay(Self {
                search,
                ..self.clone()
            }),
            StateEvent::TableLoaded {
                generation,
                outcome,
            } => self.install(generation, outcome),
        }
    }

    fn reselect(&self, selection: Selection) -> Transition {
        let generation = self.generation + 1;
        info!("Selection {} (load {})", selection, generation);
        Transition {
            state: Self {
                selection,
                status: TableStatus::Loading,
                generation,
                ..self.clone()
            },
            command: Some(StateCommand::Load {
                generation,
                selection,
            }),
        }
    }

    fn install(&self, generation: u64, outcome: LoadOutcome) -> Transition {
        if generation != self.generation {
            debug!(
                "Discarding stale load {} (latest is {})",
                generation, self.generation
            );
            return Transition::stay(self.clone());
        }

        let (table, status) = match outcome {
            LoadOutcome::Loaded(table) => (table, TableStatus::Ready),
            LoadOutcome::Empty => (StatTable::empty(), TableStatus::Empty),
            LoadOutcome::MappingFailed(_) => (StatTable::empty(), TableStatus::MappingError),
            LoadOutcome::FetchFailed(reason) => {
                (StatTable::empty(), TableStatus::LoadFailed(reason))
            }
        };

        // A new table invalidates the previous sort key
        Transition::stay(Self {
            table: Arc::new(table),
            sort: SortState::default(),
            status,
            ..self.clone()
        })
    }

    /// Title line, e.g. `NL • Starting Pitcher • Saber (Empty Data)`
    pub fn title(&self) -> String {
        let base = format!(
            "{} • {} • {}",
            self.selection.league.code(),
            self.selection.kind_label(),
            self.selection.mode.label()
        );
        match self.status {
            TableStatus::MappingError => format!("{} (Mapping Error)", base),
            TableStatus::Empty => format!("{} (Empty Data)", base),
            TableStatus::LoadFailed(_) => format!("{} (Data load failed)", base),
            TableStatus::Loading | TableStatus::Ready => base,
        }
    }

    /// Sorted and filtered rows for rendering
    pub fn view(&self) -> DataView {
        compute_view(self.table.clone(), &self.sort, &self.search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::csv_tokenizer::parse_csv;
    use crate::data::source_catalog::{Category, League, PitcherRole, StatMode};

    fn loaded(csv: &str) -> LoadOutcome {
        LoadOutcome::Loaded(StatTable::from_grid("t", parse_csv(csv)).unwrap())
    }

    fn ready(csv: &str) -> AppState {
        let start = AppState::start(Selection::default());
        let generation = start.state.generation();
        start
            .state
            .apply(StateEvent::TableLoaded {
                generation,
                outcome: loaded(csv),
            })
            .state
    }

    #[test]
    fn test_start_issues_first_load() {
        let t = AppState::start(Selection::default());
        assert_eq!(t.state.status(), &TableStatus::Loading);
        assert_eq!(
            t.command,
            Some(StateCommand::Load {
                generation: 1,
                selection: Selection::default()
            })
        );
    }

    #[test]
    fn test_selection_change_bumps_generation() {
        let state = ready("Player\nKim");
        let t = state.apply(StateEvent::SelectLeague(League::AL));
        assert_eq!(t.state.generation(), state.generation() + 1);
        assert_eq!(t.state.selection().league, League::AL);
        assert!(matches!(t.command, Some(StateCommand::Load { .. })));
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let state = AppState::start(Selection::default()).state;
        let newer = state.apply(StateEvent::SelectMode(StatMode::Saber)).state;

        let after_stale = newer
            .apply(StateEvent::TableLoaded {
                generation: state.generation(),
                outcome: loaded("Player\nOld"),
            })
            .state;
        assert_eq!(after_stale.status(), &TableStatus::Loading);
        assert!(after_stale.table().is_empty());

        let after_fresh = after_stale
            .apply(StateEvent::TableLoaded {
                generation: newer.generation(),
                outcome: loaded("Player\nNew"),
            })
            .state;
        assert_eq!(after_fresh.status(), &TableStatus::Ready);
        assert_eq!(after_fresh.table().row(0).unwrap().display("Player"), "New");
    }

    #[test]
    fn test_new_table_resets_sort() {
        let state = ready("Player,HR\nKim,1")
            .apply(StateEvent::SortBy("HR".to_string()))
            .state;
        assert_eq!(state.sort().key.as_deref(), Some("HR"));

        let reloading = state.apply(StateEvent::Reload).state;
        let reloaded = reloading
            .apply(StateEvent::TableLoaded {
                generation: reloading.generation(),
                outcome: loaded("Player,HR\nKim,1"),
            })
            .state;
        assert_eq!(reloaded.sort(), &SortState::default());
    }

    #[test]
    fn test_sort_on_unknown_header_is_ignored() {
        let state = ready("Player,HR\nKim,1")
            .apply(StateEvent::SortBy("ERA".to_string()))
            .state;
        assert_eq!(state.sort().key, None);
    }

    #[test]
    fn test_search_does_not_mutate_previous_state() {
        let state = ready("Player\nKim\nLee");
        let searched = state
            .apply(StateEvent::SearchChanged("lee".to_string()))
            .state;
        assert_eq!(state.search(), "");
        assert_eq!(state.view().row_count(), 2);
        assert_eq!(searched.view().row_count(), 1);
    }

    #[test]
    fn test_titles() {
        let state = ready("Player\nKim");
        assert_eq!(state.title(), "NL • Batter • Classic");

        let pitcher = state
            .apply(StateEvent::SelectCategory(Category::Pitcher))
            .state
            .apply(StateEvent::SelectRole(PitcherRole::Relief))
            .state;
        let failed = pitcher
            .apply(StateEvent::TableLoaded {
                generation: pitcher.generation(),
                outcome: LoadOutcome::FetchFailed("404".to_string()),
            })
            .state;
        assert_eq!(failed.title(), "NL • Relief Pitcher • Classic (Data load failed)");
        assert!(failed.table().is_empty());

        let empty = failed
            .apply(StateEvent::Reload)
            .state;
        let empty = empty
            .apply(StateEvent::TableLoaded {
                generation: empty.generation(),
                outcome: LoadOutcome::Empty,
            })
            .state;
        assert_eq!(empty.title(), "NL • Relief Pitcher • Classic (Empty Data)");
    }
}
