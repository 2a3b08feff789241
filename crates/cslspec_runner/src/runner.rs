/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Test execution.
//!
//! Each resolved case runs against its own engine instance:
//!
//! 1. No style: record an error, make no engine calls.
//! 2. Load the style. A missing style is recorded; other failures are fatal.
//! 3. Register the references.
//! 4. No expectations: record an error, issue no citations.
//! 5. Cite each cluster in input order. An unregistered id is recorded and
//!    only that cluster is skipped.
//! 6. Compare citations position by position.
//! 7. Compare the bibliography as a whole.
//!
//! Only the recoverable engine conditions become failure records. Anything
//! else ends the run with `Err`.

use std::ops::AddAssign;

use cslspec_core::{parse_invocations, Reference, ResolvedCase, Specification};
use serde::Serialize;
use tracing::{debug, warn};

use crate::engine::{CitationEngine, EngineError, EngineFactory};

pub const DEFAULT_LANG: &str = "en";

/// Why a case did not fully pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FailureRecord {
    /// Setup or data problem: no style, missing style file, no expectations,
    /// unregistered reference.
    Error { message: String },
    /// One cluster rendered differently than expected.
    Citation {
        index: usize,
        expected: String,
        actual: String,
    },
    /// The bibliography differs; both sides as bulleted lists.
    Bibliography { expected: String, actual: String },
}

impl FailureRecord {
    pub fn error(message: impl Into<String>) -> Self {
        FailureRecord::Error {
            message: message.into(),
        }
    }
}

/// Passed and failed comparisons of one kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    fn record(&mut self, matched: bool) {
        if matched {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, other: Self) {
        self.passed += other.passed;
        self.failed += other.failed;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounts {
    pub citations: Tally,
    pub bibliography: Tally,
}

impl AddAssign for RunCounts {
    fn add_assign(&mut self, other: Self) {
        self.citations += other.citations;
        self.bibliography += other.bibliography;
    }
}

/// The result of one test case.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaseOutcome {
    /// Position of the case in the specification, from 0.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub counts: RunCounts,
    pub failures: Vec<FailureRecord>,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The result of running a whole specification.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub cases: Vec<CaseOutcome>,
}

impl RunReport {
    /// True when no case produced a failure record.
    pub fn passed(&self) -> bool {
        self.cases.iter().all(CaseOutcome::passed)
    }

    /// Counts accumulated over all cases.
    pub fn counts(&self) -> RunCounts {
        let mut counts = RunCounts::default();
        for case in &self.cases {
            counts += case.counts;
        }
        counts
    }

    pub fn failures(&self) -> impl Iterator<Item = &FailureRecord> {
        self.cases.iter().flat_map(|case| case.failures.iter())
    }
}

/// Runs specifications against engines from a factory.
pub struct Runner<F> {
    factory: F,
    default_lang: String,
}

impl<F: EngineFactory> Runner<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            default_lang: DEFAULT_LANG.to_string(),
        }
    }

    /// Language used by cases that set none, at any level.
    pub fn with_default_lang(mut self, lang: impl Into<String>) -> Self {
        self.default_lang = lang.into();
        self
    }

    /// Run every case of `spec` in order.
    pub fn run(
        &self,
        spec: &Specification,
        references: &[Reference],
    ) -> Result<RunReport, EngineError> {
        let mut report = RunReport::default();
        for (index, case) in spec.resolve().iter().enumerate() {
            report.cases.push(self.run_case(index, case, references)?);
        }
        Ok(report)
    }

    /// Run a single resolved case on a fresh engine.
    pub fn run_case(
        &self,
        index: usize,
        case: &ResolvedCase,
        references: &[Reference],
    ) -> Result<CaseOutcome, EngineError> {
        let mut outcome = CaseOutcome {
            index,
            name: case.name.clone(),
            ..Default::default()
        };

        let Some(style) = case.style.as_deref() else {
            outcome
                .failures
                .push(FailureRecord::error("no style specified for this test case"));
            return Ok(outcome);
        };
        let lang = case.lang.as_deref().unwrap_or(&self.default_lang);
        debug!(case = index, style, lang, "running test case");

        let mut engine = self.factory.create()?;
        match engine.load_style(style, lang) {
            Ok(()) => {}
            Err(err @ EngineError::StyleNotFound(_)) => {
                outcome.failures.push(FailureRecord::error(err.to_string()));
                return Ok(outcome);
            }
            Err(err) => return Err(err),
        }

        engine.register_items(references)?;

        if !case.has_expectations() {
            outcome
                .failures
                .push(FailureRecord::error("no expected output specified"));
            return Ok(outcome);
        }

        cite_all(&mut engine, case, &mut outcome)?;

        if let Some(expected) = &case.citations {
            compare_citations(expected, &engine.citations()?, &mut outcome);
        }
        if let Some(expected) = &case.bibliography {
            compare_bibliography(expected, &engine.bibliography()?, &mut outcome);
        }

        Ok(outcome)
    }
}

/// Run a specification with the default language.
pub fn run<F: EngineFactory>(
    spec: &Specification,
    references: &[Reference],
    factory: F,
) -> Result<RunReport, EngineError> {
    Runner::new(factory).run(spec, references)
}

fn cite_all<E: CitationEngine>(
    engine: &mut E,
    case: &ResolvedCase,
    outcome: &mut CaseOutcome,
) -> Result<(), EngineError> {
    // Order matters: the engine's disambiguation depends on call history.
    for (cluster_index, cluster) in parse_invocations(&case.input).iter().enumerate() {
        debug!(cluster = cluster_index, items = cluster.len(), "citing");
        match engine.cite(cluster) {
            Ok(()) => {}
            Err(err @ EngineError::UnregisteredItem(_)) => {
                outcome.failures.push(FailureRecord::error(err.to_string()));
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

/// Compare positionally; entries past the shorter list are not compared.
fn compare_citations(expected: &[String], actual: &[String], outcome: &mut CaseOutcome) {
    if expected.len() != actual.len() {
        warn!(
            case = outcome.index,
            expected = expected.len(),
            actual = actual.len(),
            "citation count differs, comparing common positions only"
        );
    }

    for (index, (expected, actual)) in expected.iter().zip(actual).enumerate() {
        let matched = expected == actual;
        outcome.counts.citations.record(matched);
        if !matched {
            outcome.failures.push(FailureRecord::Citation {
                index,
                expected: expected.clone(),
                actual: actual.clone(),
            });
        }
    }
}

/// The bibliography passes or fails as one unit.
fn compare_bibliography(expected: &[String], actual: &[String], outcome: &mut CaseOutcome) {
    let matched = expected == actual;
    outcome.counts.bibliography.record(matched);
    if !matched {
        outcome.failures.push(FailureRecord::Bibliography {
            expected: bulleted(expected),
            actual: bulleted(actual),
        });
    }
}

fn bulleted(entries: &[String]) -> String {
    entries
        .iter()
        .map(|entry| format!("- {}", entry))
        .collect::<Vec<_>>()
        .join("\n")
}
