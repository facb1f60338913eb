pub mod api;
pub mod config;
pub mod data;
pub mod drafts;
pub mod services;
pub mod state;
pub mod table_display;
pub mod ui;
pub mod utils;
