/// Rewrite a user query into the boolean query-parser syntax.
///
/// Every term is required unless marked otherwise:
///
/// - `+term` and `-term` are passed through (require / exclude),
/// - `~term` loses its marker and becomes optional,
/// - a bare `term` gets a `+`.
///
/// ```
/// use scriptorium::query::translate_query;
///
/// assert_eq!(translate_query("foo -bar ~baz"), "+foo -bar baz");
/// ```
pub fn translate_query(raw: &str) -> String {
    raw.split_whitespace()
        .filter_map(translate_term)
        .collect::<Vec<_>>()
        .join(" ")
}

fn translate_term(term: &str) -> Option<String> {
    if term.starts_with(['+', '-']) {
        Some(term.to_string())
    } else if let Some(optional) = term.strip_prefix('~') {
        // A lone `~` has nothing left to search for.
        (!optional.is_empty()).then(|| optional.to_string())
    } else {
        Some(format!("+{term}"))
    }
}
