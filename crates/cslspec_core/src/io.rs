/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::reference::Reference;
use crate::spec::Specification;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} parse error: {1}")]
    ParseError(String, String),
    #[error("reference at position {0} has no string id")]
    MissingId(usize),
    #[error("{0} is not a test specification: it sets none of style, lang, input, citations, bibliography or tests")]
    NotASpecification(String),
}

fn read(path: &Path) -> Result<Vec<u8>, LoadError> {
    fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

/// Load a test specification from a YAML or JSON file.
///
/// Relative style paths in the file are resolved against the file's own
/// directory.
pub fn load_specification(path: &Path) -> Result<Specification, LoadError> {
    let bytes = read(path)?;

    let mut spec: Specification = if is_json(path) {
        // Check for syntax errors first
        let _: Value = serde_json::from_slice(&bytes)
            .map_err(|e| LoadError::ParseError("JSON".to_string(), e.to_string()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| LoadError::ParseError("JSON".to_string(), e.to_string()))?
    } else {
        let content = String::from_utf8_lossy(&bytes);
        let _: serde_yaml::Value = serde_yaml::from_str(&content)
            .map_err(|e| LoadError::ParseError("YAML".to_string(), e.to_string()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| LoadError::ParseError("YAML".to_string(), e.to_string()))?
    };

    // Unknown keys are ignored, so any data file parses as an empty spec.
    if spec.is_empty() {
        return Err(LoadError::NotASpecification(path.display().to_string()));
    }

    if let Some(dir) = path.parent() {
        spec.rebase_styles(dir);
    }
    Ok(spec)
}

/// The shapes a reference file may take.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReferenceDocument {
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

/// Load references from a file given its path.
///
/// Accepts a CSL-JSON array, a YAML list, or a map keyed by reference id
/// (the key fills in a missing `id`). File order is preserved.
pub fn load_references(path: &Path) -> Result<Vec<Reference>, LoadError> {
    let bytes = read(path)?;

    let document: ReferenceDocument = if is_json(path) {
        let _: Value = serde_json::from_slice(&bytes)
            .map_err(|e| LoadError::ParseError("JSON".to_string(), e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|_| not_a_collection())?
    } else {
        let content = String::from_utf8_lossy(&bytes);
        let _: serde_yaml::Value = serde_yaml::from_str(&content)
            .map_err(|e| LoadError::ParseError("YAML".to_string(), e.to_string()))?;
        serde_yaml::from_str(&content).map_err(|_| not_a_collection())?
    };

    references_from_document(document)
}

fn not_a_collection() -> LoadError {
    LoadError::ParseError(
        "references".to_string(),
        "expected a list or a map of references".to_string(),
    )
}

/// Build references from an already parsed document.
pub fn references_from_document(document: ReferenceDocument) -> Result<Vec<Reference>, LoadError> {
    let mut references = Vec::new();

    match document {
        ReferenceDocument::List(items) => {
            for (index, item) in items.into_iter().enumerate() {
                let reference = Reference::from_value(item)
                    .filter(|r| r.id().is_some())
                    .ok_or(LoadError::MissingId(index))?;
                references.push(reference);
            }
        }
        ReferenceDocument::Map(map) => {
            for (index, (key, item)) in map.into_iter().enumerate() {
                let mut reference = Reference::from_value(item).ok_or_else(|| {
                    LoadError::ParseError(
                        "references".to_string(),
                        format!("entry '{}' is not an object", key),
                    )
                })?;
                if reference.id().is_none() {
                    if reference.fields().contains_key("id") {
                        return Err(LoadError::MissingId(index));
                    }
                    reference.set_id(key);
                }
                references.push(reference);
            }
        }
    }

    Ok(references)
}
