use crate::data::coercion::{coerce, CellValue};
use crate::data::csv_tokenizer::Grid;
use crate::data::name_column::guess_name_column;
use std::collections::HashMap;

/// One player row: header name to typed value.
///
/// Duplicate headers collide here; the last column carrying a header wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatRow {
    values: HashMap<String, CellValue>,
}

impl StatRow {
    /// Zip one grid row against the headers, coercing each cell.
    /// Missing trailing cells coerce from empty text; extra cells are dropped.
    pub fn from_cells(headers: &[String], cells: &[String]) -> Self {
        let mut values = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            let raw = cells.get(idx).map(String::as_str).unwrap_or("");
            values.insert(header.clone(), coerce(raw));
        }
        Self { values }
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.values.get(header)
    }

    /// Display text for a header, empty when missing
    pub fn display(&self, header: &str) -> String {
        self.get(header).map(|v| v.to_string()).unwrap_or_default()
    }
}

/// Headers and rows for the current data source
#[derive(Debug, Clone, Default)]
pub struct StatTable {
    pub name: String,
    headers: Vec<String>,
    rows: Vec<StatRow>,
    name_column: Option<String>,
}

impl StatTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<StatRow>) -> Self {
        let name_column = guess_name_column(&headers).map(str::to_string);
        Self {
            name: name.into(),
            headers,
            rows,
            name_column,
        }
    }

    /// An empty table, used for mapping errors and failed loads
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from a grid whose first row is the header row.
    /// Returns `None` for an empty grid.
    pub fn from_grid(name: impl Into<String>, grid: Grid) -> Option<Self> {
        let mut rows = grid.into_iter();
        let headers: Vec<String> = rows.next()?.iter().map(|h| h.trim().to_string()).collect();
        let data = rows
            .map(|cells| StatRow::from_cells(&headers, &cells))
            .collect();
        Some(Self::new(name, headers, data))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[StatRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&StatRow> {
        self.rows.get(index)
    }

    pub fn has_header(&self, header: &str) -> bool {
        self.headers.iter().any(|h| h == header)
    }

    /// The header guessed to hold player names, if any
    pub fn name_column(&self) -> Option<&str> {
        self.name_column.as_deref()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Short multi-line summary for the log
    pub fn debug_dump(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("StatTable: {}\n", self.name));
        output.push_str(&format!(
            "Rows: {} | Columns: {} | Name column: {}\n",
            self.row_count(),
            self.column_count(),
            self.name_column().unwrap_or("-")
        ));
        for (idx, row) in self.rows.iter().take(3).enumerate() {
            let cells: Vec<String> = self.headers.iter().map(|h| row.display(h)).collect();
            output.push_str(&format!("  [{}]: {}\n", idx, cells.join(", ")));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::csv_tokenizer::parse_csv;

    #[test]
    fn test_from_grid() {
        let table = StatTable::from_grid("t", parse_csv(" Player ,HR,AVG\nKim,12,.301\n")).unwrap();
        assert_eq!(table.headers(), &["Player", "HR", "AVG"]);
        assert_eq!(table.row_count(), 1);
        let row = table.row(0).unwrap();
        assert_eq!(row.get("HR"), Some(&CellValue::Numeric(12.0)));
        assert_eq!(row.get("AVG"), Some(&CellValue::Text(".301".to_string())));
        assert_eq!(table.name_column(), Some("Player"));
    }

    #[test]
    fn test_empty_grid_is_none() {
        assert!(StatTable::from_grid("t", Vec::new()).is_none());
    }

    #[test]
    fn test_header_only_grid_has_no_rows() {
        let table = StatTable::from_grid("t", parse_csv("Player,HR")).unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_short_rows_fill_with_empty_text() {
        let table = StatTable::from_grid("t", parse_csv("Player,HR,RBI\nKim,3")).unwrap();
        let row = table.row(0).unwrap();
        assert_eq!(row.get("RBI"), Some(&CellValue::Text(String::new())));
    }

    #[test]
    fn test_extra_cells_are_dropped() {
        let table = StatTable::from_grid("t", parse_csv("Player\nKim,3,4")).unwrap();
        assert_eq!(table.row(0).unwrap().display("Player"), "Kim");
        assert!(table.row(0).unwrap().get("3").is_none());
    }

    #[test]
    fn test_duplicate_headers_last_column_wins() {
        let table = StatTable::from_grid("t", parse_csv("Player,HR,HR\nKim,1,2")).unwrap();
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row(0).unwrap().get("HR"), Some(&CellValue::Numeric(2.0)));
    }
}
