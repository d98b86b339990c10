/// Case-insensitive substring search over a row's text columns.
/// An empty (or whitespace-only) query matches every row.
pub fn matches_query<'a, I>(haystacks: I, query: &str) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    haystacks
        .into_iter()
        .any(|h| h.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::matches_query;

    #[test]
    fn empty_query_matches() {
        assert!(matches_query(["anything"], "   "));
        assert!(matches_query(std::iter::empty::<&str>(), ""));
    }

    #[test]
    fn matches_any_column_ignoring_case() {
        assert!(matches_query(["Jane Doe", "jane@example.com"], "EXAMPLE"));
        assert!(!matches_query(["Jane Doe", "jane@example.com"], "bob"));
    }
}
