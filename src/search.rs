/// The query to send for the raw text field contents, or `None` when there is nothing to search.
pub fn submitted_query(raw: &str) -> Option<&str> {
    let query = raw.trim();
    (!query.is_empty()).then_some(query)
}
