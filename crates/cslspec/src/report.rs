/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Human-readable and JSON rendering of run reports.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use colored::Colorize;
use cslspec_runner::{
    char_diff, render_plain, CaseOutcome, FailureRecord, RunCounts, RunReport, SpanKind,
    Tally,
};
use serde::Serialize;

/// Outcome of one specification file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub passed: bool,
    pub counts: RunCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub cases: Vec<CaseOutcome>,
}

impl FileReport {
    pub fn from_run(path: &Path, report: RunReport) -> Self {
        Self {
            path: path.to_path_buf(),
            passed: report.passed(),
            counts: report.counts(),
            error: None,
            cases: report.cases,
        }
    }

    /// A file that could not be loaded.
    pub fn from_error(path: &Path, error: String) -> Self {
        Self {
            path: path.to_path_buf(),
            passed: false,
            counts: RunCounts::default(),
            error: Some(error),
            cases: Vec::new(),
        }
    }
}

fn tally(label: &str, tally: &Tally) -> String {
    format!("{} {}/{}", label, tally.passed, tally.total())
}

fn case_label(case: &CaseOutcome) -> String {
    match &case.name {
        Some(name) => format!("case {} ({})", case.index + 1, name),
        None => format!("case {}", case.index + 1),
    }
}

/// Character diff: removed text red, inserted text green. Falls back to
/// `[-removed-]{+inserted+}` markers when colors are off.
pub fn colored_diff(expected: &str, actual: &str) -> String {
    let spans = char_diff(expected, actual);
    if !colored::control::SHOULD_COLORIZE.should_colorize() {
        return render_plain(&spans);
    }

    let mut out = String::new();
    for span in spans {
        let text = match span.kind {
            SpanKind::Equal => span.text.normal(),
            SpanKind::Delete => span.text.red().strikethrough(),
            SpanKind::Insert => span.text.green().underline(),
        };
        let _ = write!(out, "{}", text);
    }
    out
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_failure(out: &mut String, failure: &FailureRecord) {
    match failure {
        FailureRecord::Error { message } => {
            let _ = writeln!(out, "    {} {}", "error:".red().bold(), message);
        }
        FailureRecord::Citation {
            index,
            expected,
            actual,
        } => {
            let _ = writeln!(out, "    {}", format!("citation {}:", index + 1).bold());
            let _ = writeln!(out, "      expected: {}", expected);
            let _ = writeln!(out, "      actual:   {}", actual);
            let _ = writeln!(out, "      diff:     {}", colored_diff(expected, actual));
        }
        FailureRecord::Bibliography { expected, actual } => {
            let _ = writeln!(out, "    {}", "bibliography:".bold());
            let _ = writeln!(out, "      expected:\n{}", indent(expected, "        "));
            let _ = writeln!(out, "      actual:\n{}", indent(actual, "        "));
            let _ = writeln!(
                out,
                "      diff:\n{}",
                indent(&colored_diff(expected, actual), "        ")
            );
        }
    }
}

/// Render one file's results for the terminal.
pub fn render_file(file: &FileReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", file.path.display().to_string().bold());

    if let Some(error) = &file.error {
        let _ = writeln!(out, "  {} {}", "❌".red(), error);
        return out;
    }

    for case in &file.cases {
        let mark = if case.passed() {
            "✅".green()
        } else {
            "❌".red()
        };
        let mut parts = Vec::new();
        if case.counts.citations.total() > 0 {
            parts.push(tally("citations", &case.counts.citations));
        }
        if case.counts.bibliography.total() > 0 {
            parts.push(tally("bibliography", &case.counts.bibliography));
        }
        let summary = if parts.is_empty() {
            String::new()
        } else {
            format!(": {}", parts.join(", "))
        };
        let _ = writeln!(out, "  {} {}{}", mark, case_label(case), summary);
        for failure in &case.failures {
            render_failure(&mut out, failure);
        }
    }

    out
}

/// Render the closing summary across all files.
pub fn render_summary(files: &[FileReport]) -> String {
    let mut counts = RunCounts::default();
    for file in files {
        counts += file.counts;
    }
    let failed_files = files.iter().filter(|f| !f.passed).count();

    let status = if failed_files == 0 {
        "PASSED".green().bold()
    } else {
        "FAILED".red().bold()
    };
    format!(
        "{}: {} of {} files passed; {}, {}\n",
        status,
        files.len() - failed_files,
        files.len(),
        tally("citations", &counts.citations),
        tally("bibliography", &counts.bibliography),
    )
}
