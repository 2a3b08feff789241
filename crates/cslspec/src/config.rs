/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project settings, read from `cslspec.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// References file, relative to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<PathBuf>,

    #[serde(default = "default_lang")]
    pub lang: String,

    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_engine_command")]
    pub command: String,

    #[serde(default = "default_engine_args")]
    pub args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            references: None,
            lang: default_lang(),
            engine: EngineConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: default_engine_command(),
            args: default_engine_args(),
        }
    }
}

fn default_lang() -> String {
    cslspec_runner::runner::DEFAULT_LANG.to_string()
}

fn default_engine_command() -> String {
    "node".to_string()
}

fn default_engine_args() -> Vec<String> {
    vec!["bridge/citeproc-bridge.mjs".to_string()]
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {:?}", path))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {:?}", path))?;

        if let (Some(references), Some(dir)) = (config.references.as_mut(), path.parent()) {
            if references.is_relative() {
                *references = dir.join(&*references);
            }
        }
        Ok(config)
    }

    pub fn load_from_project() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new(""))
    }

    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        for name in ["cslspec.toml", ".cslspec.toml"] {
            let path = dir.join(name);
            if path.exists() {
                return Ok(Some(Self::load(&path)?));
            }
        }

        Ok(None)
    }
}
