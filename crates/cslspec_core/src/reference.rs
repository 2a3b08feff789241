/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Bibliographic references.
//!
//! References are passed through to the citation engine untouched, so they
//! are kept as raw CSL-JSON objects. The only field the harness relies on is
//! `id`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A CSL-JSON reference object.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Reference(Map<String, Value>);

impl Reference {
    /// Wrap a JSON object. Returns `None` for anything that is not an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// The reference ID, if it is present and a string.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.0.insert("id".to_string(), Value::String(id.into()));
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}
