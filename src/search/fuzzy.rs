//! Fuzzy ranking of geocoder hits against what the user typed.
//!
//! Nominatim already filters by relevance; this only reorders so that the
//! hit whose name reads like the query comes first. Candidates that do not
//! match at all are kept, after the matching ones, in their original order.

use crate::models::Location;

const EXACT: u32 = 1000;
const PREFIX: u32 = 800;
const WORD_PREFIX: u32 = 600;
const SUBSTRING: u32 = 400;
const SUBSEQUENCE: u32 = 200;

/// Lowercase, drop punctuation, collapse whitespace.
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            folded.extend(c.to_lowercase());
        } else {
            folded.push(' ');
        }
    }
    folded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Score `candidate` against `query`. `None` means no match.
pub fn score(query: &str, candidate: &str) -> Option<u32> {
    let query = normalize(query);
    let candidate = normalize(candidate);
    if query.is_empty() || candidate.is_empty() {
        return None;
    }

    if candidate == query {
        return Some(EXACT);
    }
    if candidate.starts_with(&query) {
        return Some(PREFIX);
    }
    if candidate.split(' ').any(|word| word.starts_with(&query)) {
        return Some(WORD_PREFIX);
    }
    if candidate.contains(&query) {
        return Some(SUBSTRING);
    }
    subsequence_gaps(&query, &candidate)
        .map(|gaps| SUBSEQUENCE.saturating_sub(gaps).max(1))
}

/// Number of skipped candidate characters if every query character appears
/// in order, ignoring spaces in the query.
fn subsequence_gaps(query: &str, candidate: &str) -> Option<u32> {
    let mut needle = query.chars().filter(|c| *c != ' ').peekable();
    let mut gaps = 0u32;
    let mut started = false;

    for c in candidate.chars() {
        match needle.peek() {
            None => break,
            Some(&n) if n == c => {
                needle.next();
                started = true;
            }
            Some(_) if started => gaps += 1,
            Some(_) => {}
        }
    }

    needle.peek().is_none().then_some(gaps)
}

fn best_score(query: &str, location: &Location) -> Option<u32> {
    let by_name = score(query, &location.name);
    // Matches on city/state only count for less than a name match.
    let by_label = score(query, &location.label()).map(|s| s / 2);
    by_name.max(by_label)
}

/// Reorder `locations` by how well they match `query`. Stable.
pub fn rank(query: &str, locations: Vec<Location>) -> Vec<Location> {
    let mut scored: Vec<(Option<u32>, Location)> = locations
        .into_iter()
        .map(|location| (best_score(query, &location), location))
        .collect();

    // `Option` orders `None` first, so reverse for best-first.
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, location)| location).collect()
}
