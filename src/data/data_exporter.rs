use crate::data::coercion::CellValue;
use crate::data::data_view::DataView;
use anyhow::{anyhow, Result};
use chrono::Local;
use serde_json::{Map, Value};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the current view (visible rows, view order) to disk
pub struct DataExporter;

impl DataExporter {
    /// Timestamped default file name, e.g. `NL_classic_full_20240501_101500.csv`
    pub fn default_file_name(view: &DataView, extension: &str) -> PathBuf {
        let stem = Path::new(&view.source().name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("statboard");
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("{}_{}.{}", stem, timestamp, extension))
    }

    /// Export by file extension (`.csv` or `.json`)
    pub fn export_view(view: &DataView, path: &Path) -> Result<String> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::export_view_to_csv(view, path),
            Some(ext) if ext.eq_ignore_ascii_case("json") => {
                Self::export_view_to_json(view, path)
            }
            _ => Err(anyhow!(
                "Unsupported export format for {}. Use .csv or .json",
                path.display()
            )),
        }
    }

    pub fn export_view_to_csv(view: &DataView, path: &Path) -> Result<String> {
        if view.row_count() == 0 {
            return Err(anyhow!("No data to export"));
        }

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(view.headers())?;
        for row in view.display_rows() {
            writer.write_record(&row)?;
        }
        writer.flush()?;

        info!("Exported {} rows to {}", view.row_count(), path.display());
        Ok(format!(
            "Exported {} rows to CSV file: {}",
            view.row_count(),
            path.display()
        ))
    }

    pub fn export_view_to_json(view: &DataView, path: &Path) -> Result<String> {
        if view.row_count() == 0 {
            return Err(anyhow!("No data to export"));
        }

        let headers = view.headers();
        let records: Vec<Value> = view
            .rows()
            .map(|row| -> Result<Value, serde_json::Error> {
                let mut obj = Map::new();
                for header in headers {
                    let value = match row.get(header) {
                        Some(cell @ CellValue::Numeric(_)) => serde_json::to_value(cell)?,
                        Some(CellValue::Text(s)) => Value::String(s.clone()),
                        None => Value::String(String::new()),
                    };
                    obj.insert(header.clone(), value);
                }
                Ok(Value::Object(obj))
            })
            .collect::<Result<_, _>>()?;

        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, &records)?;

        info!("Exported {} rows to {}", records.len(), path.display());
        Ok(format!(
            "Exported {} rows to JSON file: {}",
            records.len(),
            path.display()
        ))
    }
}
