/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! CSL Spec Runner
//!
//! Runs declarative style tests against a citation engine and reports which
//! expectations held. The engine is anything implementing
//! [`CitationEngine`]; the bundled [`ProcessEngine`] drives an engine living
//! in a child process.

pub mod bridge;
pub mod diff;
pub mod engine;
pub mod runner;

pub use bridge::{BridgeCommand, ProcessEngine};
pub use diff::{char_diff, render_plain, DiffSpan, SpanKind};
pub use engine::{CitationEngine, EngineError, EngineFactory};
pub use runner::{run, CaseOutcome, FailureRecord, RunCounts, RunReport, Runner, Tally};
