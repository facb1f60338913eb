use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use crossterm::style::Stylize;

use crate::api::post_board::{format_when, Post};
use crate::config::config::IconConfig;
use crate::data::data_view::{DataView, SortDirection, SortState};

/// Header label with its sort indicator, e.g. `HR ↓`
pub fn header_label(header: &str, sort: &SortState, icons: &IconConfig) -> String {
    let icon = match sort.direction_for(header) {
        None => &icons.unsorted,
        Some(SortDirection::Ascending) => &icons.ascending,
        Some(SortDirection::Descending) => &icons.descending,
    };
    format!("{} {}", header, icon)
}

pub fn build_view_table(view: &DataView, sort: &SortState, icons: &IconConfig) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let headers: Vec<Cell> = view
        .headers()
        .iter()
        .map(|h| Cell::new(header_label(h, sort, icons)).add_attribute(Attribute::Bold))
        .collect();
    table.set_header(headers);

    for row in view.rows() {
        let cells: Vec<Cell> = view
            .headers()
            .iter()
            .map(|header| match row.get(header) {
                Some(value) if value.is_numeric() => {
                    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
                }
                Some(value) => Cell::new(value.to_string()),
                None => Cell::new(""),
            })
            .collect();
        table.add_row(cells);
    }

    table
}

pub fn display_view(title: &str, view: &DataView, sort: &SortState, icons: &IconConfig) {
    println!("{}", title.bold());

    if view.headers().is_empty() {
        println!("{}", "No data to show.".yellow());
        return;
    }

    println!("{}", build_view_table(view, sort, icons));
    println!(
        "\n{}",
        format!("{} of {} players", view.row_count(), view.source().row_count()).green()
    );
}

pub fn display_posts(posts: &[Post]) {
    if posts.is_empty() {
        println!("{}", "No columns have been posted yet.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("When").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Body").add_attribute(Attribute::Bold),
    ]);

    for post in posts {
        table.add_row(vec![
            Cell::new(format_when(&post.when)),
            Cell::new(&post.title),
            Cell::new(&post.body),
        ]);
    }

    println!("{table}");
    println!("\n{}", format!("{} posts", posts.len()).green());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::csv_tokenizer::parse_csv;
    use crate::data::datatable::StatTable;
    use std::sync::Arc;

    #[test]
    fn test_header_labels() {
        let icons = IconConfig::default();
        let sort = SortState::by("HR", SortDirection::Descending);
        assert_eq!(header_label("HR", &sort, &icons), "HR ↓");
        assert_eq!(header_label("AVG", &sort, &icons), "AVG ↕");

        let ascii = IconConfig::simple();
        let sort = SortState::by("AVG", SortDirection::Ascending);
        assert_eq!(header_label("AVG", &sort, &ascii), "AVG ^");
    }

    #[test]
    fn test_view_table_contains_rows() {
        let table = StatTable::from_grid("t", parse_csv("Player,HR\nKim,12\nLee,7")).unwrap();
        let view = DataView::new(Arc::new(table));
        let rendered = build_view_table(&view, &SortState::default(), &IconConfig::simple())
            .to_string();

        assert!(rendered.contains("Player -"));
        assert!(rendered.contains("Kim"));
        assert!(rendered.contains("12"));
    }
}
