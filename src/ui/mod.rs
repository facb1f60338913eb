//! Terminal UI: event loop in `tui_app`, drawing in `tui_renderer`

pub mod tui_app;
pub mod tui_renderer;

pub use tui_app::{run_tui_app, TuiApp};
