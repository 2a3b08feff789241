/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Citation requests handed to the citation engine.

use serde::{Deserialize, Serialize};

use crate::locator::LocatorKind;

/// One citation event: the items of a single footnote or in-text citation,
/// in the order they were written.
pub type Cluster = Vec<CitationItem>;

/// A pinpoint within a cited work, e.g. page 103.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Locator {
    pub label: LocatorKind,
    #[serde(rename = "locator")]
    pub value: String,
}

/// A single reference to cite, optionally with a locator.
///
/// Serializes to the flat `{id, label?, locator?}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CitationItem {
    /// The reference ID (citekey).
    pub id: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub locator: Option<Locator>,
}

impl CitationItem {
    /// Create an item without a locator.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            locator: None,
        }
    }

    /// Create an item pinned to a location within the work.
    pub fn with_locator(
        id: impl Into<String>,
        label: LocatorKind,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            locator: Some(Locator {
                label,
                value: value.into(),
            }),
        }
    }

    pub fn label(&self) -> Option<LocatorKind> {
        self.locator.as_ref().map(|l| l.label)
    }

    pub fn locator_value(&self) -> Option<&str> {
        self.locator.as_ref().map(|l| l.value.as_str())
    }
}
