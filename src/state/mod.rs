//! Application state
//!
//! `AppState` is a plain value: each event produces a new state plus an
//! optional command, and rendering reads from whichever state is current.

pub mod app_state;
pub mod events;

pub use app_state::{AppState, TableStatus, Transition};
pub use events::{BackgroundEvent, StateCommand, StateEvent};
