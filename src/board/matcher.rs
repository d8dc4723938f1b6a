/// Checks if a board host matches a provider host pattern
///
/// Patterns are either exact hosts (`jobs.lever.co`) or wildcards
/// (`*.lever.co`). A wildcard matches the bare domain and any subdomain.
/// Comparison ignores ASCII case and a trailing root dot on the host.
///
/// # Examples
///
/// ```
/// use ats_postings::board::matches_host;
///
/// assert!(matches_host("*.greenhouse.io", "boards.greenhouse.io"));
/// assert!(matches_host("*.greenhouse.io", "job-boards.greenhouse.io"));
/// assert!(matches_host("jobs.lever.co", "JOBS.LEVER.CO"));
/// assert!(!matches_host("*.lever.co", "notlever.co"));
/// ```
pub fn matches_host(pattern: &str, host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();

    match pattern.strip_prefix("*.") {
        Some(base) => host == base || host.ends_with(&format!(".{}", base)),
        None => host == pattern,
    }
}
