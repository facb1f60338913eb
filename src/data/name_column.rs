use regex::Regex;
use std::sync::LazyLock;

/// Header spellings checked first, in priority order
const KNOWN_NAME_HEADERS: [&str; 6] = ["Name", "Player", "PLAYER", "Player Name", "선수", "이름"];

static NAME_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)player|name|선수|이름").unwrap());

/// Guess which header holds the player's display name.
///
/// An exact (case-sensitive) match against the known spellings wins; failing
/// that, the first header containing a name-like fragment in any case.
pub fn guess_name_column(headers: &[String]) -> Option<&str> {
    for known in KNOWN_NAME_HEADERS {
        if let Some(header) = headers.iter().find(|h| h.as_str() == known) {
            return Some(header.as_str());
        }
    }

    headers
        .iter()
        .find(|h| NAME_FRAGMENT.is_match(h))
        .map(|h| h.as_str())
}
