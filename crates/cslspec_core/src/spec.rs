/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Declarative test specifications.
//!
//! A specification is a test case that may additionally hold a list of
//! nested `tests`. Nested cases inherit missing fields from the root, one
//! level deep:
//!
//! | field          | resolved value                     |
//! |----------------|------------------------------------|
//! | `style`        | case value, else root value        |
//! | `lang`         | case value, else root value        |
//! | `input`        | case value, else root value, else empty |
//! | `citations`    | case value, else root value        |
//! | `bibliography` | case value, else root value        |
//! | `name`         | case value only                    |
//!
//! Arrays are never merged: a case either brings its own list or takes the
//! root's list whole.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// One test case as written in a specification file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TestCase {
    /// Label used when reporting this case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Style file path, or inline style text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Raw citation invocations, one per citation event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Vec<String>>,
    /// Expected citation output, one entry per invocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<String>>,
    /// Expected bibliography entries, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bibliography: Option<Vec<String>>,
}

/// A specification document: a root case plus optional nested cases.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Specification {
    #[serde(flatten)]
    pub root: TestCase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Vec<TestCase>>,
}

/// A test case with inheritance applied, ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCase {
    pub name: Option<String>,
    pub style: Option<String>,
    pub lang: Option<String>,
    pub input: Vec<String>,
    pub citations: Option<Vec<String>>,
    pub bibliography: Option<Vec<String>>,
}

impl ResolvedCase {
    /// Whether the case declares any expected output at all.
    pub fn has_expectations(&self) -> bool {
        self.citations.is_some() || self.bibliography.is_some()
    }
}

fn inherit<T: Clone>(own: &Option<T>, root: &Option<T>) -> Option<T> {
    own.as_ref().or(root.as_ref()).cloned()
}

impl Specification {
    /// True when the document sets no field at all.
    pub fn is_empty(&self) -> bool {
        self.root == TestCase::default() && self.tests.is_none()
    }

    /// Flatten the specification into its executable cases, in document
    /// order. Without `tests`, the root itself is the only case.
    pub fn resolve(&self) -> Vec<ResolvedCase> {
        let root = &self.root;
        let cases = match &self.tests {
            Some(tests) => tests.as_slice(),
            None => std::slice::from_ref(root),
        };

        cases
            .iter()
            .map(|case| ResolvedCase {
                name: case.name.clone(),
                style: inherit(&case.style, &root.style),
                lang: inherit(&case.lang, &root.lang),
                input: inherit(&case.input, &root.input).unwrap_or_default(),
                citations: inherit(&case.citations, &root.citations),
                bibliography: inherit(&case.bibliography, &root.bibliography),
            })
            .collect()
    }

    /// Make relative style paths relative to `dir` instead of the working
    /// directory. Inline style text is left alone.
    pub fn rebase_styles(&mut self, dir: &Path) {
        rebase_style(&mut self.root, dir);
        for case in self.tests.iter_mut().flatten() {
            rebase_style(case, dir);
        }
    }
}

/// Inline styles are XML documents; everything else is a path.
pub fn is_inline_style(style: &str) -> bool {
    style.trim_start().starts_with('<')
}

fn rebase_style(case: &mut TestCase, dir: &Path) {
    if let Some(style) = case.style.as_mut() {
        if !is_inline_style(style) && Path::new(style.as_str()).is_relative() {
            *style = dir.join(style.as_str()).to_string_lossy().into_owned();
        }
    }
}
