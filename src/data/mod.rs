//! Data layer for the stat tables
//!
//! Raw CSV text flows through the tokenizer and cell coercion into a
//! StatTable; DataView filters and sorts it without touching the rows.

// Parsing pipeline
pub mod coercion;
pub mod csv_tokenizer;
pub mod name_column;

// Table model and views
pub mod data_view;
pub mod datatable;
pub mod datavalue_compare;

// Sources and sinks
pub mod data_exporter;
pub mod data_source;
pub mod source_catalog;
