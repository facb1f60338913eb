use crate::data::coercion::CellValue;
use std::cmp::Ordering;
use std::iter::Peekable;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Compare two cells for sorting.
///
/// Two numbers compare numerically. Anything else, including a number
/// against text, compares the text forms with [`natural_cmp`]. A missing
/// value compares as empty text.
pub fn compare_cells(a: Option<&CellValue>, b: Option<&CellValue>) -> Ordering {
    match (a, b) {
        (Some(CellValue::Numeric(x)), Some(CellValue::Numeric(y))) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        _ => {
            let left = a.map(CellValue::as_text).unwrap_or_default();
            let right = b.map(CellValue::as_text).unwrap_or_default();
            natural_cmp(&left, &right)
        }
    }
}

/// Collation-style text ordering with numeric digit runs.
///
/// Strings are compared in three passes over their NFD decomposition:
/// base letters with accents and case ignored, then accents, then case
/// (lowercase first). Digit runs compare by numeric value in every pass, so
/// `"Player 9"` sorts before `"Player 10"` and `"Álvarez"` before `"Bell"`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    [Strength::Base, Strength::Accent, Strength::Case]
        .into_iter()
        .map(|strength| {
            compare_chunks(
                &collation_key(a, strength),
                &collation_key(b, strength),
                strength,
            )
        })
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strength {
    Base,
    Accent,
    Case,
}

fn collation_key(s: &str, strength: Strength) -> Vec<char> {
    match strength {
        Strength::Base => s.nfd().filter(|c| !is_combining_mark(*c)).map(fold).collect(),
        Strength::Accent => s.nfd().map(fold).collect(),
        Strength::Case => s.nfd().collect(),
    }
}

fn compare_chunks(a: &[char], b: &[char], strength: Strength) -> Ordering {
    let mut left = a.iter().copied().peekable();
    let mut right = b.iter().copied().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let run_a = take_digits(&mut left);
                let run_b = take_digits(&mut right);
                let ord = compare_digit_runs(&run_a, &run_b);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                left.next();
                right.next();
                let ord = match strength {
                    Strength::Case => case_rank(x).cmp(&case_rank(y)).then(x.cmp(&y)),
                    _ => x.cmp(&y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<impl Iterator<Item = char>>) -> String {
    let mut run = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trim = a.trim_start_matches('0');
    let b_trim = b.trim_start_matches('0');
    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

// Lowercase sorts before uppercase when the letters are otherwise equal
fn case_rank(c: char) -> u8 {
    if c.is_uppercase() {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_numeric_comparison() {
        assert_eq!(
            compare_cells(Some(&CellValue::Numeric(9.0)), Some(&CellValue::Numeric(10.0))),
            Ordering::Less
        );
        assert_eq!(
            compare_cells(Some(&CellValue::Numeric(-1.5)), Some(&CellValue::Numeric(-1.5))),
            Ordering::Equal
        );
    }

    #[test]
    fn test_natural_text_comparison() {
        assert_eq!(natural_cmp("Player 9", "Player 10"), Ordering::Less);
        assert_eq!(natural_cmp("Player 10", "Player 9"), Ordering::Greater);
        assert_eq!(natural_cmp("a2b", "a2c"), Ordering::Less);
        assert_eq!(natural_cmp("007", "7"), Ordering::Equal);
    }

    #[test]
    fn test_case_folding() {
        assert_eq!(natural_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(natural_cmp("a", "A"), Ordering::Less);
        assert_eq!(natural_cmp("Kim", "kim"), Ordering::Greater);
    }

    #[test]
    fn test_accents_sort_with_their_base_letter() {
        assert_eq!(natural_cmp("Álvarez", "Bell"), Ordering::Less);
        assert_eq!(natural_cmp("Muñoz", "Murphy"), Ordering::Less);
        assert_eq!(natural_cmp("Acuña", "Adams"), Ordering::Less);
    }

    #[test]
    fn test_accent_breaks_ties_before_case() {
        assert_eq!(natural_cmp("Pena", "Peña"), Ordering::Less);
        assert_eq!(natural_cmp("peña", "Pena"), Ordering::Greater);
        assert_eq!(natural_cmp("Peña", "Peña"), Ordering::Equal);
    }

    #[test]
    fn test_precomposed_and_decomposed_are_equal() {
        assert_eq!(natural_cmp("Pe\u{f1}a", "Pen\u{303}a"), Ordering::Equal);
    }

    #[test]
    fn test_mixed_number_and_text_compare_as_text() {
        // "10" vs "9a": digit runs 10 > 9
        assert_eq!(
            compare_cells(Some(&CellValue::Numeric(10.0)), Some(&text("9a"))),
            Ordering::Greater
        );
    }

    #[test]
    fn test_missing_value_is_empty_text() {
        assert_eq!(compare_cells(None, Some(&text("a"))), Ordering::Less);
        assert_eq!(compare_cells(None, Some(&text(""))), Ordering::Equal);
        assert_eq!(compare_cells(None, None), Ordering::Equal);
    }
}
