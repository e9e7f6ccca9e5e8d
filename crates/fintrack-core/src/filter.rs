//! Client-side search filtering for lists that are already in memory

/// Normalize search input: trimmed and lower-cased
pub fn normalize_search(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Keep the items whose extracted text contains `term`, case-insensitively
///
/// A blank `term` keeps every item. Order is preserved and the input is not
/// touched.
pub fn filter_items<'a, T, F, S>(items: &'a [T], term: &str, extract: F) -> Vec<&'a T>
where
    F: Fn(&T) -> S,
    S: AsRef<str>,
{
    if term.trim().is_empty() {
        return items.iter().collect();
    }

    let needle = normalize_search(term);
    items
        .iter()
        .filter(|item| extract(*item).as_ref().to_lowercase().contains(&needle))
        .collect()
}
