//! Hand-rolled CSV tokenizer for the stat tables.
//!
//! The stat files are small and come from spreadsheet exports, so the
//! tokenizer is deliberately forgiving: an unterminated quote is closed at
//! end of input instead of failing, and carriage returns are dropped
//! wherever they appear outside quotes.

/// Raw parse output: rows of untyped text cells.
pub type Grid = Vec<Vec<String>>;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Tokenize CSV text into a grid of cells.
///
/// Quoted fields may contain commas and line feeds; a doubled quote inside a
/// quoted field is a literal quote.
pub fn parse_csv(text: &str) -> Grid {
    let mut rows: Grid = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    cell.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => cell.push(ch),
            }
        } else {
            match ch {
                '"' => in_quotes = true,
                ',' => row.push(std::mem::take(&mut cell)),
                '\n' => {
                    row.push(std::mem::take(&mut cell));
                    rows.push(std::mem::take(&mut row));
                }
                '\r' => {}
                _ => cell.push(ch),
            }
        }
    }

    if !cell.is_empty() || in_quotes || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }

    rows
}

/// Strip a leading byte-order mark and surrounding whitespace from fetched text.
pub fn clean_source_text(text: &str) -> &str {
    text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text).trim()
}

/// Remove rows that carry no data: empty rows and rows whose cells are all blank.
pub fn drop_blank_rows(grid: Grid) -> Grid {
    grid.into_iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect()
}
