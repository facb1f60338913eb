//! State events and the commands transitions hand back

use crate::api::post_board::Post;
use crate::data::source_catalog::{Category, League, PitcherRole, Selection, StatMode};
use crate::services::data_loader_service::LoadOutcome;

/// Events that can trigger a state transition
#[derive(Debug)]
pub enum StateEvent {
    SelectCategory(Category),
    SelectRole(PitcherRole),
    SelectLeague(League),
    SelectMode(StatMode),

    /// Reload the current selection
    Reload,

    /// Header activated for sorting
    SortBy(String),

    /// Search input changed
    SearchChanged(String),

    /// A table load finished
    TableLoaded { generation: u64, outcome: LoadOutcome },
}

/// Side effects a transition asks the event loop to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateCommand {
    Load { generation: u64, selection: Selection },
}

/// Results posted back to the event loop by worker threads
#[derive(Debug)]
pub enum BackgroundEvent {
    TableLoaded { generation: u64, outcome: LoadOutcome },
    PostsFetched(Result<Vec<Post>, String>),
    PostCreated(Result<String, String>),
}
