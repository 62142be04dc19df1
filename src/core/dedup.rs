//! Email normalization and de-duplication.
//!
//! One pass over the raw cell values of the selected column: normalize,
//! drop duplicates against a running set, log every discard, then group the
//! kept addresses by domain. Each call owns its own state; nothing survives
//! between runs.

use crate::domain::model::DedupReport;
use chrono::{DateTime, Local};
use std::collections::HashSet;

/// Trim surrounding whitespace and lower-case. Equality after this step is
/// the duplicate criterion; no address-syntax validation is applied.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Substring after the first `@`, or `""` when there is none. Addresses
/// without an `@` therefore sort ahead of every real domain.
pub fn domain_of(email: &str) -> &str {
    email.split_once('@').map(|(_, domain)| domain).unwrap_or("")
}

/// De-duplicate `values` in source order, keeping the first occurrence of
/// each normalized address. The log starts with a header carrying
/// `started_at`; apart from that timestamp the result is a pure function
/// of the input sequence.
pub fn dedupe<S: AsRef<str>>(values: &[S], started_at: DateTime<Local>) -> DedupReport {
    let mut seen = HashSet::new();
    let mut unique_emails = Vec::new();
    let mut log_entries = vec![format!(
        "Extraction report - {}",
        started_at.format("%Y-%m-%d %H:%M")
    )];

    for value in values {
        let clean = normalize(value.as_ref());
        if seen.contains(&clean) {
            log_entries.push(format!("DUPLICATE: {}", clean));
        } else {
            seen.insert(clean.clone());
            unique_emails.push(clean);
        }
    }

    // Group by domain, then alphabetical within the domain. Entries
    // without an `@` carry an empty domain and end up first.
    unique_emails.sort_by(|a, b| domain_of(a).cmp(domain_of(b)).then_with(|| a.cmp(b)));

    DedupReport {
        unique_count: unique_emails.len(),
        duplicate_count: log_entries.len() - 1,
        unique_emails,
        log_entries,
    }
}
