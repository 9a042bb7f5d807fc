//! Filter / sort / paginate engine for client pages
//!
//! The pipeline order is part of the contract: filter first, then sort, then
//! slice. Sorting after filtering keeps page boundaries stable as the filter
//! changes, and the ordering of results — most recently updated first — is
//! what the UI promises, not any particular complexity class.
//!
//! Matching is case-insensitive and trim-tolerant. Phone matching compares
//! digits only, so `"0300-1234567"` matches a query of `"3001234"`; ID
//! matching falls back to digit comparison so a bare `"7"` finds `"n-7"`.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use stitchbook_core::ClientRecord;

/// Which field(s) a query is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Match name, phone, or ID (logical OR)
    #[default]
    All,
    /// Substring match on the name
    Name,
    /// Digit-substring match on the phone
    Phone,
    /// Substring or digit-substring match on the ID
    Id,
}

/// Parameters for a paged query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Index of the first record to return, post-filter and post-sort
    #[serde(default)]
    pub offset: usize,
    /// Maximum number of records to return
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Free-text query; empty (after trim) matches everything
    #[serde(default)]
    pub query: String,
    /// Field(s) to match against
    #[serde(default)]
    pub mode: FilterMode,
}

fn default_limit() -> usize {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
            query: String::new(),
            mode: FilterMode::All,
        }
    }
}

impl PageRequest {
    /// Request matching `query` under `mode`, with default paging.
    pub fn filtered(query: impl Into<String>, mode: FilterMode) -> Self {
        Self {
            query: query.into(),
            mode,
            ..Self::default()
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    /// The records in this page, most recently updated first
    pub items: Vec<ClientRecord>,
    /// Post-filter total across all pages
    pub total: usize,
    /// True when records remain beyond this page
    pub has_more: bool,
    /// Echo of the request offset
    pub offset: usize,
    /// Echo of the request limit
    pub limit: usize,
}

/// Run the filter → sort → slice pipeline over a full record set.
pub fn run_query(records: Vec<ClientRecord>, req: &PageRequest) -> PageResult {
    let q = norm(&req.query);

    let mut filtered: Vec<ClientRecord> = if q.is_empty() {
        records
    } else {
        records
            .into_iter()
            .filter(|c| matches(c, &q, req.mode))
            .collect()
    };

    // Newest first by updated_at, then created_at, then name ascending
    filtered.sort_by_cached_key(|c| {
        (
            Reverse(parse_timestamp(&c.updated_at)),
            Reverse(parse_timestamp(&c.created_at)),
            c.name.to_lowercase(),
        )
    });

    let total = filtered.len();
    let items: Vec<ClientRecord> = filtered
        .into_iter()
        .skip(req.offset)
        .take(req.limit)
        .collect();
    let has_more = req.offset + items.len() < total;

    PageResult {
        items,
        total,
        has_more,
        offset: req.offset,
        limit: req.limit,
    }
}

fn norm(s: &str) -> String {
    s.trim().to_lowercase()
}

fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

// Raw substring on the lowercased ID, with a digit-only fallback so a bare
// number matches the `n-<k>` form without its prefix.
fn id_matches(id: &str, q: &str) -> bool {
    let id_norm = norm(id);
    if id_norm.contains(q) {
        return true;
    }
    let q_digits = digits(q);
    let id_digits = digits(&id_norm);
    !q_digits.is_empty() && !id_digits.is_empty() && id_digits.contains(&q_digits)
}

fn matches(record: &ClientRecord, q: &str, mode: FilterMode) -> bool {
    let name_matches = || norm(&record.name).contains(q);
    let phone_matches = || {
        let q_digits = digits(q);
        // A query with no digits matches no phone at all, by design
        !q_digits.is_empty() && digits(record.phone.as_deref().unwrap_or("")).contains(&q_digits)
    };

    match mode {
        FilterMode::Name => name_matches(),
        FilterMode::Phone => phone_matches(),
        FilterMode::Id => id_matches(&record.id, q),
        FilterMode::All => name_matches() || phone_matches() || id_matches(&record.id, q),
    }
}

// Unparsable timestamps sort as epoch zero, i.e. to the end under
// newest-first ordering.
fn parse_timestamp(s: &str) -> i64 {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}
