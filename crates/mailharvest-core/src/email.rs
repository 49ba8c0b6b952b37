use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

/// Characters that may appear inside an email address. Anything outside
/// this set acts as a separator between candidate tokens, so a cell like
/// `"x@y.com, z@w.org"` or `"a@b.com / c@d.net"` splits cleanly.
fn candidate_splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._%+@-]+").expect("splitter regex"))
}

/// Permissive shape check: `local@label.label`, with at least one dot in
/// the domain. Deliberately not full RFC 5322; this is a harvesting
/// filter, not a validator.
fn email_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$").expect("email regex")
    })
}

/// Splits raw cell values on maximal runs of non-email characters and
/// flattens the non-empty fragments into one candidate sequence.
pub fn split_candidates(cells: &[String]) -> Vec<String> {
    let splitter = candidate_splitter();
    let mut out = Vec::new();
    for cell in cells {
        for fragment in splitter.split(cell) {
            let trimmed = fragment.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
        }
    }
    out
}

/// Whether the entire token matches the email shape (anchored match).
pub fn is_valid_email(token: &str) -> bool {
    email_shape().is_match(token)
}

pub fn normalize_email(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}

/// The running aggregate of harvested addresses. Case-insensitive
/// deduplication falls out of normalizing before insert; ascending order
/// falls out of the BTreeSet.
#[derive(Debug, Default)]
pub struct EmailSet {
    addresses: BTreeSet<String>,
}

impl EmailSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.addresses.contains(address)
    }

    /// Runs the full extraction pipeline over raw cell values: split on
    /// non-email characters, keep tokens that match the email shape,
    /// lower-case, union into the set. Tokens that fail the shape check
    /// are dropped without comment.
    pub fn extend_from_cells(&mut self, cells: &[String]) {
        for token in split_candidates(cells) {
            if !is_valid_email(&token) {
                continue;
            }
            if let Some(address) = normalize_email(&token) {
                self.addresses.insert(address);
            }
        }
    }

    /// Ascending-sorted single-column rows, one address per row.
    pub fn into_sorted_rows(self) -> Vec<Vec<String>> {
        self.addresses
            .into_iter()
            .map(|address| vec![address])
            .collect()
    }
}
