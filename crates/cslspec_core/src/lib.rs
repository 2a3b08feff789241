/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! CSL Spec Core
//!
//! Data model for declarative citation-style tests: the locator vocabulary,
//! the compact citation invocation syntax, and specification documents with
//! their one-level default inheritance.
//!
//! # Example
//!
//! ```rust
//! use cslspec_core::{parse_invocations, LocatorKind, Specification};
//!
//! let spec: Specification = serde_yaml::from_str(r#"
//! style: minimal.csl
//! input: ["Book1"]
//! tests:
//!   - input: ["Book1 p. 103; Book2"]
//!     citations: ["Smith 2024a 103; Smith 2024b."]
//! "#).unwrap();
//!
//! let cases = spec.resolve();
//! assert_eq!(cases[0].style.as_deref(), Some("minimal.csl"));
//!
//! let clusters = parse_invocations(&cases[0].input);
//! assert_eq!(clusters[0].len(), 2);
//! assert_eq!(clusters[0][0].label(), Some(LocatorKind::Page));
//! ```

pub mod citation;
pub mod io;
pub mod locator;
pub mod parser;
pub mod reference;
pub mod spec;

pub use citation::{CitationItem, Cluster, Locator};
pub use io::{load_references, load_specification, LoadError};
pub use locator::LocatorKind;
pub use parser::{parse_invocation, parse_invocations};
pub use reference::Reference;
pub use spec::{ResolvedCase, Specification, TestCase};
