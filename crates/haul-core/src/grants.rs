//! Read-grant principal list handling.

/// Trim principal IDs and drop blanks and repeats, keeping first-seen order.
pub fn filter_principals<S: AsRef<str>>(ids: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let trimmed = id.as_ref().trim();
        if trimmed.is_empty() || out.iter().any(|seen| seen == trimmed) {
            continue;
        }
        out.push(trimmed.to_string());
    }
    out
}
