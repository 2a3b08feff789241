/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Citation invocation parser.
//!
//! An invocation is a compact, human-written description of one citation
//! event. Items are separated by `;`, and each item is `id [kind locator]`:
//!
//! ```text
//! Book1 p. 103; Book2 chapter 2; Article § 10
//! ```
//!
//! The parse is lenient. Anything that does not fit the shape degrades to a
//! bare item carrying only the id; nothing here ever fails.

use crate::citation::{CitationItem, Cluster};
use crate::locator::LocatorKind;

/// Parse each raw invocation into a cluster, preserving input order.
pub fn parse_invocations<S: AsRef<str>>(inputs: &[S]) -> Vec<Cluster> {
    inputs
        .iter()
        .map(|input| parse_invocation(input.as_ref()))
        .collect()
}

/// Parse one invocation. The cluster always holds one item per `;`-separated
/// segment, empty segments included.
pub fn parse_invocation(input: &str) -> Cluster {
    input.split(';').map(parse_item).collect()
}

fn parse_item(segment: &str) -> CitationItem {
    let mut tokens = segment.split_whitespace();
    let id = tokens.next().unwrap_or_default();

    // The kind and the locator are only attached as a pair.
    match (tokens.next().and_then(LocatorKind::from_token), tokens.next()) {
        (Some(label), Some(value)) => CitationItem::with_locator(id, label, value),
        _ => CitationItem::new(id),
    }
}
