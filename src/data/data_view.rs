use std::sync::Arc;

use crate::data::datatable::{StatRow, StatTable};
use crate::data::datavalue_compare::compare_cells;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Which header the view is sorted by, if any
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: Some(key.into()),
            direction,
        }
    }

    /// Header click: the same key flips direction, a new key starts ascending
    pub fn toggled(&self, key: &str) -> Self {
        if self.key.as_deref() == Some(key) {
            Self {
                key: self.key.clone(),
                direction: self.direction.flipped(),
            }
        } else {
            Self::by(key, SortDirection::Ascending)
        }
    }

    pub fn direction_for(&self, header: &str) -> Option<SortDirection> {
        (self.key.as_deref() == Some(header)).then_some(self.direction)
    }
}

/// A filtered and sorted view over a StatTable.
/// The table itself is never modified; the view only reorders row indices.
#[derive(Clone)]
pub struct DataView {
    source: Arc<StatTable>,
    visible_rows: Vec<usize>,
}

impl DataView {
    /// Create a new view showing all rows in table order
    pub fn new(source: Arc<StatTable>) -> Self {
        let visible_rows = (0..source.row_count()).collect();
        Self {
            source,
            visible_rows,
        }
    }

    /// Keep rows whose name column contains the search text, ignoring case.
    /// Without a name column the search is ignored.
    pub fn filter_by_name(mut self, search: &str) -> Self {
        let needle = search.trim().to_lowercase();
        if needle.is_empty() {
            return self;
        }
        let Some(name_column) = self.source.name_column() else {
            return self;
        };

        let source = &self.source;
        self.visible_rows.retain(|&idx| {
            source
                .row(idx)
                .and_then(|row| row.get(name_column))
                .map(|value| value.as_text().to_lowercase().contains(&needle))
                .unwrap_or(false)
        });
        self
    }

    /// Stable sort by the sort key; equal keys keep their current order
    pub fn sort_by(mut self, sort: &SortState) -> Self {
        let Some(key) = sort.key.as_deref() else {
            return self;
        };

        let source = &self.source;
        self.visible_rows.sort_by(|&a, &b| {
            let val_a = source.row(a).and_then(|r| r.get(key));
            let val_b = source.row(b).and_then(|r| r.get(key));
            let cmp = compare_cells(val_a, val_b);
            match sort.direction {
                SortDirection::Ascending => cmp,
                SortDirection::Descending => cmp.reverse(),
            }
        });
        self
    }

    pub fn row_count(&self) -> usize {
        self.visible_rows.len()
    }

    pub fn headers(&self) -> &[String] {
        self.source.headers()
    }

    pub fn get_row(&self, index: usize) -> Option<&StatRow> {
        let row_idx = *self.visible_rows.get(index)?;
        self.source.row(row_idx)
    }

    pub fn rows(&self) -> impl Iterator<Item = &StatRow> {
        self.visible_rows
            .iter()
            .filter_map(move |&idx| self.source.row(idx))
    }

    /// Display strings for every visible row, in header order
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        let headers = self.headers();
        self.rows()
            .map(|row| headers.iter().map(|h| row.display(h)).collect())
            .collect()
    }

    pub fn source(&self) -> &StatTable {
        &self.source
    }

    /// Indices into the source table, in view order
    pub fn visible_row_indices(&self) -> &[usize] {
        &self.visible_rows
    }
}

/// Filter then sort: the full view computation for one render
pub fn compute_view(table: Arc<StatTable>, sort: &SortState, search: &str) -> DataView {
    DataView::new(table).filter_by_name(search).sort_by(sort)
}
