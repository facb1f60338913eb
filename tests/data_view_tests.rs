#[cfg(test)]
mod tests {
    use statboard::data::coercion::{coerce, CellValue};
    use statboard::data::csv_tokenizer::{parse_csv, Grid};
    use statboard::data::data_view::{compute_view, DataView, SortDirection, SortState};
    use statboard::data::datatable::StatTable;
    use statboard::data::name_column::guess_name_column;
    use std::sync::Arc;

    fn table(csv: &str) -> Arc<StatTable> {
        Arc::new(StatTable::from_grid("test", parse_csv(csv)).expect("non-empty grid"))
    }

    fn column(view: &DataView, header: &str) -> Vec<String> {
        view.rows().map(|row| row.display(header)).collect()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tokenizer_round_trip_without_quotes() {
        let words = ["Kim", "Lee", "3.5", "45%", "", "New York", "선수", "-2"];
        for width in 1..5 {
            for height in 1..6 {
                let grid: Grid = (0..height)
                    .map(|r| {
                        (0..width)
                            .map(|c| words[(r * 3 + c * 5 + width) % words.len()].to_string())
                            .collect::<Vec<_>>()
                    })
                    .map(|mut row| {
                        // A row that is a single empty cell has no text to survive the join
                        if row.iter().all(String::is_empty) {
                            row[0] = "x".to_string();
                        }
                        row
                    })
                    .collect();

                let text = grid
                    .iter()
                    .map(|row| row.join(","))
                    .collect::<Vec<_>>()
                    .join("\n");

                assert_eq!(parse_csv(&text), grid, "width {} height {}", width, height);
            }
        }
    }

    #[test]
    fn test_quoted_field_round_trips() {
        let original = "a, b\nHe said \"hi\"";
        let text = format!("Note,Id\n\"{}\",1", original.replace('"', "\"\""));

        let grid = parse_csv(&text);
        assert_eq!(grid[1][0], original);
        assert_eq!(grid[1][1], "1");
    }

    #[test]
    fn test_coercion_cases() {
        assert_eq!(coerce("45.2%"), CellValue::Numeric(45.2));
        assert_eq!(coerce("-3"), CellValue::Numeric(-3.0));
        assert_eq!(coerce("3.1.4"), CellValue::Text("3.1.4".to_string()));
        assert_eq!(coerce(""), CellValue::Text(String::new()));
    }

    #[test]
    fn test_name_column_heuristic() {
        assert_eq!(
            guess_name_column(&headers(&["Team", "Player", "AVG"])),
            Some("Player")
        );
        assert_eq!(
            guess_name_column(&headers(&["Team", "선수", "AVG"])),
            Some("선수")
        );
        assert_eq!(guess_name_column(&headers(&["Team", "AVG"])), None);
    }

    #[test]
    fn test_sort_is_stable() {
        let view = compute_view(
            table("k,idx\n1,0\n1,1\n2,2"),
            &SortState::by("k", SortDirection::Ascending),
            "",
        );
        assert_eq!(column(&view, "idx"), vec!["0", "1", "2"]);
    }

    #[test]
    fn test_stable_sort_descending_keeps_tie_order() {
        let view = compute_view(
            table("k,idx\n1,0\n2,1\n1,2"),
            &SortState::by("k", SortDirection::Descending),
            "",
        );
        assert_eq!(column(&view, "idx"), vec!["1", "0", "2"]);
    }

    #[test]
    fn test_search_without_name_column_is_noop() {
        let source = table("Team,HR\nLAD,200\nSD,150");
        let view = compute_view(source.clone(), &SortState::default(), "zzz");
        assert_eq!(view.row_count(), source.row_count());
    }

    #[test]
    fn test_search_is_case_insensitive_and_trimmed() {
        let view = compute_view(
            table("Player,HR\nMarcus Kim,3\nOwen Lee,5\nKim Dunn,9"),
            &SortState::default(),
            "  kim ",
        );
        assert_eq!(column(&view, "Player"), vec!["Marcus Kim", "Kim Dunn"]);
    }

    #[test]
    fn test_numeric_aware_text_order() {
        let view = compute_view(
            table("Player\nPlayer 10\nPlayer 9"),
            &SortState::by("Player", SortDirection::Ascending),
            "",
        );
        assert_eq!(column(&view, "Player"), vec!["Player 9", "Player 10"]);
    }

    #[test]
    fn test_accented_names_sort_with_their_base_letter() {
        let source = table("Player\nBell\nÁlvarez\nMurphy\nMuñoz\nPeña\nPena");

        let ascending = compute_view(
            source.clone(),
            &SortState::by("Player", SortDirection::Ascending),
            "",
        );
        assert_eq!(
            column(&ascending, "Player"),
            vec!["Álvarez", "Bell", "Muñoz", "Murphy", "Pena", "Peña"]
        );

        let descending = compute_view(
            source,
            &SortState::by("Player", SortDirection::Descending),
            "",
        );
        assert_eq!(
            column(&descending, "Player"),
            vec!["Peña", "Pena", "Murphy", "Muñoz", "Bell", "Álvarez"]
        );
    }

    #[test]
    fn test_numbers_sort_numerically() {
        let view = compute_view(
            table("Player,ERA\nA,10.5\nB,2.25\nC,-1"),
            &SortState::by("ERA", SortDirection::Ascending),
            "",
        );
        assert_eq!(column(&view, "Player"), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_sort_toggle_cycle() {
        let source = table("Player,HR\nKim,12\nLee,7\nPark,30\nCho,7");

        let first = SortState::default().toggled("HR");
        let second = first.toggled("HR");
        let third = second.toggled("HR");

        assert_eq!(first.direction, SortDirection::Ascending);
        assert_eq!(second.direction, SortDirection::Descending);
        assert_eq!(third, first);

        let ascending = column(&compute_view(source.clone(), &first, ""), "Player");
        let descending = column(&compute_view(source.clone(), &second, ""), "Player");
        let again = column(&compute_view(source, &third, ""), "Player");

        assert_eq!(ascending, vec!["Lee", "Cho", "Kim", "Park"]);
        assert_eq!(descending, vec!["Park", "Kim", "Lee", "Cho"]);
        assert_eq!(again, ascending);
    }

    #[test]
    fn test_switching_key_starts_ascending() {
        let sort = SortState::by("HR", SortDirection::Descending).toggled("AVG");
        assert_eq!(sort.key.as_deref(), Some("AVG"));
        assert_eq!(sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_filter_then_sort() {
        let view = compute_view(
            table("Player,HR\nKim A,12\nLee,7\nKim B,30"),
            &SortState::by("HR", SortDirection::Descending),
            "kim",
        );
        assert_eq!(column(&view, "Player"), vec!["Kim B", "Kim A"]);
        assert_eq!(view.source().row_count(), 3);
    }
}
