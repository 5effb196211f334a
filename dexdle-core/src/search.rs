use dexdle_types::SpeciesMatch;

/// True when a query has something to search for.
pub fn is_searchable(query: &str) -> bool {
    !query.trim().is_empty()
}

/// Case-insensitive substring search over species names, in list order.
pub fn search_species<S: AsRef<str>>(names: &[S], query: &str, limit: usize) -> Vec<SpeciesMatch> {
    if !is_searchable(query) {
        return Vec::new();
    }

    let needle = query.trim().to_lowercase();
    names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| name.to_lowercase().contains(&needle))
        .take(limit)
        .map(|name| SpeciesMatch {
            name: name.to_string(),
        })
        .collect()
}
