/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

mod cli;
mod config;
mod report;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::Config;
use cslspec_core::{
    load_references, load_specification, parse_invocations, LocatorKind, Reference,
};
use cslspec_runner::{BridgeCommand, EngineFactory, Runner};
use report::FileReport;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walkdir::WalkDir;

const SPEC_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match execute(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether everything that ran passed.
fn execute(cli: Cli) -> Result<bool> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_from_project()?.unwrap_or_default(),
    };

    match cli.command {
        Command::Test {
            paths,
            references,
            engine,
            engine_args,
            lang,
            json,
            no_color,
        } => {
            if no_color || json || !std::io::stdout().is_terminal() {
                colored::control::set_override(false);
            }

            let references_path = references
                .or_else(|| config.references.clone())
                .context("no references file; pass --references or set `references` in cslspec.toml")?;
            let references = load_references(&references_path)
                .with_context(|| format!("failed to load references from {:?}", references_path))?;

            let command = engine_command(&config, engine, engine_args);
            let runner = Runner::new(command).with_default_lang(lang.unwrap_or(config.lang));

            // A references file kept beside the specs is data, not a spec.
            let skip = references_path.canonicalize().ok();
            let files = collect_spec_files(&paths, skip.as_deref())?;
            if files.is_empty() {
                bail!("no specification files found");
            }

            let reports = run_files(&runner, &files, &references, json)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                print!("{}", report::render_summary(&reports));
            }

            Ok(reports.iter().all(|r| r.passed))
        }

        Command::Parse { inputs } => {
            let clusters = parse_invocations(&inputs);
            println!("{}", serde_json::to_string_pretty(&clusters)?);
            Ok(true)
        }

        Command::Locators => {
            for kind in LocatorKind::ALL {
                println!("{:<10} {}", kind.as_str(), kind.abbreviations().join(" "));
            }
            Ok(true)
        }

        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "cslspec", &mut std::io::stdout());
            Ok(true)
        }
    }
}

/// Run each file in turn. Load errors are recorded and the run moves on;
/// an engine failure stops it. In JSON mode the reports gathered so far are
/// printed before the error is returned.
fn run_files<F: EngineFactory>(
    runner: &Runner<F>,
    files: &[PathBuf],
    references: &[Reference],
    json: bool,
) -> Result<Vec<FileReport>> {
    let mut reports = Vec::new();
    for path in files {
        debug!(path = %path.display(), "loading specification");
        let report = match load_specification(path) {
            Ok(spec) => match runner.run(&spec, references) {
                Ok(run) => FileReport::from_run(path, run),
                Err(e) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&reports)?);
                    }
                    return Err(anyhow::Error::new(e)
                        .context(format!("citation engine failed on {:?}", path)));
                }
            },
            Err(e) => FileReport::from_error(path, e.to_string()),
        };
        if !json {
            print!("{}", report::render_file(&report));
        }
        reports.push(report);
    }
    Ok(reports)
}

/// Command-line engine settings win over the config file. Engine arguments
/// given without a program apply to the configured program.
fn engine_command(config: &Config, engine: Option<String>, engine_args: Vec<String>) -> BridgeCommand {
    match engine {
        Some(program) => BridgeCommand::new(program, engine_args),
        None if !engine_args.is_empty() => {
            BridgeCommand::new(config.engine.command.clone(), engine_args)
        }
        None => BridgeCommand::new(config.engine.command.clone(), config.engine.args.clone()),
    }
}

fn is_spec_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SPEC_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Expand directories into the specification files they contain, sorted,
/// leaving out `skip`. Plain file arguments are kept as given.
fn collect_spec_files(paths: &[PathBuf], skip: Option<&Path>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_spec_file(e.path()))
                .filter(|e| skip.is_none() || e.path().canonicalize().ok().as_deref() != skip)
                .map(|e| e.path().to_path_buf())
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}
