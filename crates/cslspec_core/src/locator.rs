/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Locator vocabulary.
//!
//! Maps the abbreviations people write in citation invocations ("p.",
//! "fig.", "§") to the canonical locator kinds citation engines understand
//! ("page", "figure", "paragraph"), and back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical locator kinds for pinpoint citations.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum LocatorKind {
    Book,
    Chapter,
    Column,
    Figure,
    Folio,
    Line,
    Note,
    Number,
    Opus,
    Page,
    Paragraph,
    Part,
    Section,
    #[serde(rename = "sub verbo")]
    SubVerbo,
    Verse,
    Volume,
}

/// Abbreviation table. Lookups are exact and case-sensitive.
const ABBREVIATIONS: &[(&str, LocatorKind)] = &[
    ("bk.", LocatorKind::Book),
    ("bks.", LocatorKind::Book),
    ("chap.", LocatorKind::Chapter),
    ("chaps.", LocatorKind::Chapter),
    ("col.", LocatorKind::Column),
    ("cols.", LocatorKind::Column),
    ("fig.", LocatorKind::Figure),
    ("figs.", LocatorKind::Figure),
    ("fol.", LocatorKind::Folio),
    ("fols.", LocatorKind::Folio),
    ("no.", LocatorKind::Number),
    ("Os.", LocatorKind::Number),
    ("l.", LocatorKind::Line),
    ("ll.", LocatorKind::Line),
    ("n.", LocatorKind::Note),
    ("nn.", LocatorKind::Note),
    ("op.", LocatorKind::Opus),
    ("opp.", LocatorKind::Opus),
    ("p", LocatorKind::Page),
    ("p.", LocatorKind::Page),
    ("pp.", LocatorKind::Page),
    ("para.", LocatorKind::Paragraph),
    ("paras.", LocatorKind::Paragraph),
    ("¶", LocatorKind::Paragraph),
    ("¶¶", LocatorKind::Paragraph),
    ("§", LocatorKind::Paragraph),
    ("§§", LocatorKind::Paragraph),
    ("pt.", LocatorKind::Part),
    ("pts.", LocatorKind::Part),
    ("sec.", LocatorKind::Section),
    ("secs.", LocatorKind::Section),
    ("s.v.", LocatorKind::SubVerbo),
    ("s.vv.", LocatorKind::SubVerbo),
    ("v.", LocatorKind::Verse),
    ("vv.", LocatorKind::Verse),
    ("vol.", LocatorKind::Volume),
    ("vols.", LocatorKind::Volume),
];

impl LocatorKind {
    pub const ALL: [LocatorKind; 16] = [
        LocatorKind::Book,
        LocatorKind::Chapter,
        LocatorKind::Column,
        LocatorKind::Figure,
        LocatorKind::Folio,
        LocatorKind::Line,
        LocatorKind::Note,
        LocatorKind::Number,
        LocatorKind::Opus,
        LocatorKind::Page,
        LocatorKind::Paragraph,
        LocatorKind::Part,
        LocatorKind::Section,
        LocatorKind::SubVerbo,
        LocatorKind::Verse,
        LocatorKind::Volume,
    ];

    /// The canonical name, as written in CSL ("page", "sub verbo").
    pub fn as_str(&self) -> &'static str {
        match self {
            LocatorKind::Book => "book",
            LocatorKind::Chapter => "chapter",
            LocatorKind::Column => "column",
            LocatorKind::Figure => "figure",
            LocatorKind::Folio => "folio",
            LocatorKind::Line => "line",
            LocatorKind::Note => "note",
            LocatorKind::Number => "number",
            LocatorKind::Opus => "opus",
            LocatorKind::Page => "page",
            LocatorKind::Paragraph => "paragraph",
            LocatorKind::Part => "part",
            LocatorKind::Section => "section",
            LocatorKind::SubVerbo => "sub verbo",
            LocatorKind::Verse => "verse",
            LocatorKind::Volume => "volume",
        }
    }

    /// Look up a kind by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Look up a kind by abbreviation ("p.", "figs.", "§§").
    pub fn from_abbreviation(abbreviation: &str) -> Option<Self> {
        ABBREVIATIONS
            .iter()
            .find(|(abbr, _)| *abbr == abbreviation)
            .map(|(_, kind)| *kind)
    }

    /// Resolve the kind token of an invocation: an abbreviation first,
    /// otherwise a canonical name.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::from_abbreviation(token).or_else(|| Self::from_name(token))
    }

    /// All abbreviations that resolve to this kind, in table order.
    pub fn abbreviations(&self) -> Vec<&'static str> {
        ABBREVIATIONS
            .iter()
            .filter(|(_, kind)| kind == self)
            .map(|(abbr, _)| *abbr)
            .collect()
    }
}

impl fmt::Display for LocatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown locator kind: {0}")]
pub struct UnknownLocatorKind(pub String);

impl FromStr for LocatorKind {
    type Err = UnknownLocatorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownLocatorKind(s.to_string()))
    }
}
