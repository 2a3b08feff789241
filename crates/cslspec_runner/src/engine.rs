/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! The citation engine contract.
//!
//! The runner never formats anything itself. It drives an engine that owns
//! all style semantics, including the citation history that ibid. handling
//! and year-suffix disambiguation depend on.

use cslspec_core::{CitationItem, Reference};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The style resource does not exist. Recoverable per test case.
    #[error("style not found: {0}")]
    StyleNotFound(String),
    /// A cited id was never registered. Recoverable per citation.
    #[error("item '{0}' not registered, pass it to register_items() first")]
    UnregisteredItem(String),
    #[error("citation engine failure: {0}")]
    Failure(String),
    #[error("failed to start citation engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("citation engine protocol error: {0}")]
    Protocol(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A stateful citation formatter.
///
/// One instance renders one sequence of citations; output depends on every
/// `cite` call made before it.
pub trait CitationEngine {
    /// Load a style from a path or inline style text.
    fn load_style(&mut self, style: &str, lang: &str) -> Result<(), EngineError>;

    /// Make references citable. Re-registering an id replaces the earlier
    /// reference.
    fn register_items(&mut self, items: &[Reference]) -> Result<(), EngineError>;

    /// Append one formatted cluster to the citation history.
    fn cite(&mut self, items: &[CitationItem]) -> Result<(), EngineError>;

    /// Every formatted cluster so far, in call order.
    fn citations(&mut self) -> Result<Vec<String>, EngineError>;

    /// Bibliography entries for all cited references, in the engine's own
    /// sort order.
    fn bibliography(&mut self) -> Result<Vec<String>, EngineError>;
}

/// Creates a fresh engine for each test case, so citation history never
/// leaks from one case into the next.
pub trait EngineFactory {
    type Engine: CitationEngine;

    fn create(&self) -> Result<Self::Engine, EngineError>;
}

impl<E, F> EngineFactory for F
where
    E: CitationEngine,
    F: Fn() -> Result<E, EngineError>,
{
    type Engine = E;

    fn create(&self) -> Result<E, EngineError> {
        self()
    }
}
