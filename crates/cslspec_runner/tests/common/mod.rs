/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use cslspec_core::{CitationItem, Reference, Specification, TestCase};
use cslspec_runner::{CitationEngine, EngineError};

/// Everything a fake engine was asked to do, across all instances.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create,
    LoadStyle { style: String, lang: String },
    Register(Vec<String>),
    Cite(Vec<String>),
    Citations,
    Bibliography,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

/// Canned behaviour shared by every engine a factory creates.
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Styles that do not exist.
    pub missing_styles: Vec<String>,
    /// Returned from `citations()` instead of the rendered history.
    pub citations: Option<Vec<String>>,
    /// Returned from `bibliography()` instead of the rendered entries.
    pub bibliography: Option<Vec<String>>,
    /// Ids whose citation makes the engine fail outright.
    pub explode_on: Option<String>,
}

/// An in-memory engine. A cluster renders as its ids (with locators)
/// joined by "; " and closed with "."; the bibliography lists the titles of
/// cited references in first-cited order.
pub struct FakeEngine {
    log: CallLog,
    script: Script,
    registered: HashMap<String, Reference>,
    history: Vec<String>,
    cited: Vec<String>,
}

impl FakeEngine {
    pub fn new(log: CallLog, script: Script) -> Self {
        log.borrow_mut().push(Call::Create);
        Self {
            log,
            script,
            registered: HashMap::new(),
            history: Vec::new(),
            cited: Vec::new(),
        }
    }
}

fn render(items: &[CitationItem]) -> String {
    let parts: Vec<String> = items
        .iter()
        .map(|item| match item.locator_value() {
            Some(locator) => format!("{} {}", item.id, locator),
            None => item.id.clone(),
        })
        .collect();
    format!("{}.", parts.join("; "))
}

impl CitationEngine for FakeEngine {
    fn load_style(&mut self, style: &str, lang: &str) -> Result<(), EngineError> {
        self.log.borrow_mut().push(Call::LoadStyle {
            style: style.to_string(),
            lang: lang.to_string(),
        });
        if self.script.missing_styles.iter().any(|s| s == style) {
            return Err(EngineError::StyleNotFound(format!("{}: no such file", style)));
        }
        Ok(())
    }

    fn register_items(&mut self, items: &[Reference]) -> Result<(), EngineError> {
        let ids: Vec<String> = items
            .iter()
            .filter_map(|r| r.id().map(str::to_string))
            .collect();
        for item in items {
            if let Some(id) = item.id() {
                self.registered.insert(id.to_string(), item.clone());
            }
        }
        self.log.borrow_mut().push(Call::Register(ids));
        Ok(())
    }

    fn cite(&mut self, items: &[CitationItem]) -> Result<(), EngineError> {
        let ids: Vec<String> = items.iter().map(|item| item.id.clone()).collect();
        self.log.borrow_mut().push(Call::Cite(ids.clone()));

        if let Some(id) = ids.iter().find(|id| !self.registered.contains_key(*id)) {
            return Err(EngineError::UnregisteredItem(id.clone()));
        }
        if ids.iter().any(|id| Some(id) == self.script.explode_on.as_ref()) {
            return Err(EngineError::Failure("engine crashed".to_string()));
        }
        for id in ids {
            if !self.cited.contains(&id) {
                self.cited.push(id);
            }
        }
        self.history.push(render(items));
        Ok(())
    }

    fn citations(&mut self) -> Result<Vec<String>, EngineError> {
        self.log.borrow_mut().push(Call::Citations);
        Ok(self
            .script
            .citations
            .clone()
            .unwrap_or_else(|| self.history.clone()))
    }

    fn bibliography(&mut self) -> Result<Vec<String>, EngineError> {
        self.log.borrow_mut().push(Call::Bibliography);
        if let Some(entries) = &self.script.bibliography {
            return Ok(entries.clone());
        }
        Ok(self
            .cited
            .iter()
            .map(|id| {
                self.registered[id]
                    .fields()
                    .get("title")
                    .and_then(|t| t.as_str())
                    .unwrap_or(id)
                    .to_string()
            })
            .collect())
    }
}

/// A factory closure producing fake engines that share one call log.
pub fn factory(
    log: &CallLog,
    script: Script,
) -> impl Fn() -> Result<FakeEngine, EngineError> {
    let log = log.clone();
    move || Ok(FakeEngine::new(log.clone(), script.clone()))
}

pub fn new_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn cite_calls(log: &CallLog) -> Vec<Vec<String>> {
    log.borrow()
        .iter()
        .filter_map(|call| match call {
            Call::Cite(ids) => Some(ids.clone()),
            _ => None,
        })
        .collect()
}

pub fn count(log: &CallLog, wanted: &Call) -> usize {
    log.borrow().iter().filter(|call| *call == wanted).count()
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Create a reference for a book.
pub fn make_book(id: &str, family: &str, year: i32, title: &str) -> Reference {
    Reference::from_value(serde_json::json!({
        "id": id,
        "type": "book",
        "author": [{"family": family}],
        "title": title,
        "issued": {"date-parts": [[year]]}
    }))
    .expect("reference is an object")
}

pub fn references() -> Vec<Reference> {
    vec![
        make_book("Book1", "Smith", 2024, "Book1"),
        make_book("Book2", "Smith", 2024, "Book2"),
        make_book("Article1", "Doe", 1990, "Article1"),
    ]
}

/// A single-case specification with a style and the given input.
pub fn spec_with(input: &[&str], citations: Option<&[&str]>, bibliography: Option<&[&str]>) -> Specification {
    Specification {
        root: TestCase {
            style: Some("minimal.csl".to_string()),
            input: Some(strings(input)),
            citations: citations.map(strings),
            bibliography: bibliography.map(strings),
            ..Default::default()
        },
        tests: None,
    }
}
