/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Citation engine running in a child process.
//!
//! The child speaks newline-delimited JSON: one request object per line on
//! stdin, one response object per line on stdout. Its stderr is passed
//! through to the user. Every engine instance owns its own child, so a test
//! case always starts from an empty citation history.
//!
//! Requests carry a `command` tag:
//!
//! ```text
//! {"command":"load-style","style":"<style ...>","lang":"en"}
//! {"command":"register-items","items":[{"id":"Book1",...}]}
//! {"command":"cite","items":[{"id":"Book1","label":"page","locator":"103"}],"note-index":1}
//! {"command":"citations"}
//! {"command":"bibliography"}
//! ```
//!
//! Responses are `{"status":"ok","result":...}` or
//! `{"status":"error","kind":"style-not-found"|"unregistered-item"|"failure","message":"...","id":"..."}`.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::LazyLock;

use cslspec_core::spec::is_inline_style;
use cslspec_core::{CitationItem, Reference};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::engine::{CitationEngine, EngineError, EngineFactory};

static ENTRY_WRAPPER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)^<div class="csl-entry">(.*)</div>$"#).expect("entry pattern is valid")
});

#[derive(Debug, Serialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
enum Request<'a> {
    LoadStyle {
        style: &'a str,
        lang: &'a str,
    },
    RegisterItems {
        items: &'a [Reference],
    },
    Cite {
        items: &'a [CitationItem],
        #[serde(rename = "note-index")]
        note_index: usize,
    },
    Citations,
    Bibliography,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Response {
    Ok {
        #[serde(default)]
        result: Value,
    },
    Error {
        kind: ErrorKind,
        #[serde(default)]
        message: String,
        #[serde(default)]
        id: Option<String>,
    },
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
enum ErrorKind {
    StyleNotFound,
    UnregisteredItem,
    #[serde(other)]
    Failure,
}

impl Response {
    fn into_result(self) -> Result<Value, EngineError> {
        match self {
            Response::Ok { result } => Ok(result),
            Response::Error { kind, message, id } => Err(match kind {
                ErrorKind::StyleNotFound => EngineError::StyleNotFound(message),
                ErrorKind::UnregisteredItem => EngineError::UnregisteredItem(id.unwrap_or(message)),
                ErrorKind::Failure => EngineError::Failure(message),
            }),
        }
    }
}

/// The command line that starts an engine process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl BridgeCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl EngineFactory for BridgeCommand {
    type Engine = ProcessEngine;

    fn create(&self) -> Result<ProcessEngine, EngineError> {
        ProcessEngine::spawn(self)
    }
}

/// A citation engine backed by a child process.
pub struct ProcessEngine {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    /// Ids registered with this instance.
    registered: HashSet<String>,
    cited: usize,
}

impl ProcessEngine {
    pub fn spawn(command: &BridgeCommand) -> Result<Self, EngineError> {
        debug!(program = %command.program, args = ?command.args, "starting citation engine");
        let spawn_error = |source| EngineError::Spawn {
            program: command.program.clone(),
            source,
        };

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(spawn_error)?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(EngineError::Protocol(
                "engine process has no stdio pipes".to_string(),
            ));
        };

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            registered: HashSet::new(),
            cited: 0,
        })
    }

    fn call(&mut self, request: &Request<'_>) -> Result<Value, EngineError> {
        let mut line =
            serde_json::to_string(request).map_err(|e| EngineError::Protocol(e.to_string()))?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes())?;
        self.stdin.flush()?;

        let mut reply = String::new();
        if self.stdout.read_line(&mut reply)? == 0 {
            return Err(EngineError::Protocol(
                "engine process closed its output".to_string(),
            ));
        }
        let response: Response = serde_json::from_str(reply.trim_end())
            .map_err(|e| EngineError::Protocol(format!("invalid response: {}", e)))?;
        response.into_result()
    }

    fn call_for_strings(&mut self, request: &Request<'_>) -> Result<Vec<String>, EngineError> {
        let result = self.call(request)?;
        serde_json::from_value(result)
            .map_err(|e| EngineError::Protocol(format!("expected a list of strings: {}", e)))
    }
}

impl CitationEngine for ProcessEngine {
    fn load_style(&mut self, style: &str, lang: &str) -> Result<(), EngineError> {
        let text = if is_inline_style(style) {
            Cow::Borrowed(style)
        } else {
            match fs::read_to_string(style) {
                Ok(text) => Cow::Owned(text),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(EngineError::StyleNotFound(format!("{}: {}", style, e)));
                }
                Err(e) => return Err(e.into()),
            }
        };

        self.call(&Request::LoadStyle { style: &text, lang })?;
        Ok(())
    }

    fn register_items(&mut self, items: &[Reference]) -> Result<(), EngineError> {
        for item in items {
            if let Some(id) = item.id() {
                self.registered.insert(id.to_string());
            }
        }
        self.call(&Request::RegisterItems { items })?;
        Ok(())
    }

    fn cite(&mut self, items: &[CitationItem]) -> Result<(), EngineError> {
        if let Some(missing) = items
            .iter()
            .find(|item| !self.registered.contains(&item.id))
        {
            return Err(EngineError::UnregisteredItem(missing.id.clone()));
        }

        self.call(&Request::Cite {
            items,
            note_index: self.cited + 1,
        })?;
        self.cited += 1;
        Ok(())
    }

    fn citations(&mut self) -> Result<Vec<String>, EngineError> {
        self.call_for_strings(&Request::Citations)
    }

    fn bibliography(&mut self) -> Result<Vec<String>, EngineError> {
        let entries = self.call_for_strings(&Request::Bibliography)?;
        Ok(entries.iter().map(|entry| unwrap_entry(entry)).collect())
    }
}

impl Drop for ProcessEngine {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Trim an entry and strip an HTML `csl-entry` wrapper if present.
pub fn unwrap_entry(entry: &str) -> String {
    let entry = entry.trim();
    match ENTRY_WRAPPER.captures(entry) {
        Some(caps) => caps[1].to_string(),
        None => entry.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cslspec_core::LocatorKind;
    use serde_json::json;

    #[test]
    fn test_requests_are_tagged() {
        let items = [CitationItem::with_locator("Book1", LocatorKind::Page, "103")];
        let request = Request::Cite {
            items: &items,
            note_index: 1,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "command": "cite",
                "items": [{"id": "Book1", "label": "page", "locator": "103"}],
                "note-index": 1
            })
        );
        assert_eq!(
            serde_json::to_value(Request::Citations).unwrap(),
            json!({"command": "citations"})
        );
        assert_eq!(
            serde_json::to_value(Request::LoadStyle {
                style: "<style/>",
                lang: "de-DE"
            })
            .unwrap(),
            json!({"command": "load-style", "style": "<style/>", "lang": "de-DE"})
        );
    }

    #[test]
    fn test_ok_response() {
        let response: Response =
            serde_json::from_str(r#"{"status":"ok","result":["Smith 2024."]}"#).unwrap();
        assert_eq!(response.into_result().unwrap(), json!(["Smith 2024."]));

        let response: Response = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert_eq!(response.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn test_error_responses_map_to_conditions() {
        let response: Response = serde_json::from_str(
            r#"{"status":"error","kind":"unregistered-item","message":"nope","id":"Book9"}"#,
        )
        .unwrap();
        assert!(matches!(
            response.into_result(),
            Err(EngineError::UnregisteredItem(id)) if id == "Book9"
        ));

        let response: Response = serde_json::from_str(
            r#"{"status":"error","kind":"style-not-found","message":"missing.csl"}"#,
        )
        .unwrap();
        assert!(matches!(
            response.into_result(),
            Err(EngineError::StyleNotFound(msg)) if msg == "missing.csl"
        ));

        let response: Response =
            serde_json::from_str(r#"{"status":"error","kind":"exploded","message":"boom"}"#)
                .unwrap();
        assert!(matches!(response.into_result(), Err(EngineError::Failure(_))));
    }

    #[test]
    fn test_unwrap_entry() {
        assert_eq!(
            unwrap_entry("  <div class=\"csl-entry\">John Smith, <i>Book1</i>, 2024a.</div>\n"),
            "John Smith, <i>Book1</i>, 2024a."
        );
        assert_eq!(unwrap_entry("Jane Doe, Article1, 1990.\n"), "Jane Doe, Article1, 1990.");
    }

    #[test]
    fn test_missing_program_fails_to_spawn() {
        let command = BridgeCommand::new("/nonexistent/cslspec-engine", vec![]);
        assert!(matches!(
            command.create(),
            Err(EngineError::Spawn { .. })
        ));
    }
}
