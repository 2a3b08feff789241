/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cslspec", version)]
#[command(about = "Conformance tests for citation styles")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: cslspec.toml or .cslspec.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(about = "Run test specifications against a citation engine")]
    Test {
        /// Specification files, or directories to search for them
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// References file (CSL-JSON or YAML)
        #[arg(short, long)]
        references: Option<PathBuf>,

        /// Program that runs the citation engine
        #[arg(long)]
        engine: Option<String>,

        /// Argument passed to the engine program (repeatable)
        #[arg(long = "engine-arg", allow_hyphen_values = true)]
        engine_args: Vec<String>,

        /// Language for cases that do not set one
        #[arg(long)]
        lang: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    #[command(about = "Show how citation invocations are parsed")]
    Parse {
        /// Invocations such as "Book1 p. 103; Book2"
        #[arg(required = true)]
        inputs: Vec<String>,
    },

    #[command(about = "List locator kinds and their abbreviations")]
    Locators,

    #[command(about = "Generate shell completion scripts")]
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_test_command() {
        let cli = Cli::try_parse_from([
            "cslspec",
            "test",
            "specs/",
            "extra.yaml",
            "-r",
            "refs.json",
            "--engine",
            "node",
            "--engine-arg",
            "bridge.mjs",
            "--engine-arg",
            "--locales=locales",
            "--no-color",
        ])
        .unwrap();
        match cli.command {
            Command::Test {
                paths,
                references,
                engine,
                engine_args,
                no_color,
                json,
                ..
            } => {
                assert_eq!(paths, vec![PathBuf::from("specs/"), PathBuf::from("extra.yaml")]);
                assert_eq!(references, Some(PathBuf::from("refs.json")));
                assert_eq!(engine.as_deref(), Some("node"));
                assert_eq!(engine_args, vec!["bridge.mjs", "--locales=locales"]);
                assert!(no_color);
                assert!(!json);
            }
            _ => panic!("expected test command"),
        }
    }

    #[test]
    fn test_requires_a_path() {
        assert!(Cli::try_parse_from(["cslspec", "test"]).is_err());
    }
}
