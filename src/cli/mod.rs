// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Command-line front end.
//!
//! Every subcommand reads at most one document, drives the [`DiagramStore`] and prints a single
//! text result. [`execute`] does the work without touching the filesystem; [`run`] wires it to
//! files and stdout.

pub mod args;
pub mod config;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use log::{debug, info};
use thiserror::Error;

pub use args::{Args, Command};
pub use config::{load_config, ConfigError};

use crate::config::AppConfig;
use crate::format::{document_schema, export_document, import_document, FormatError};
use crate::layout::layout_diagram;
use crate::model::samples::{sample_diagram, sample_diagram_with_branching};
use crate::model::ParseEdgeKindError;
use crate::ops::{ConnectError, EditError};
use crate::store::DiagramStore;
use crate::validate::ValidationMode;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid connection.default_edge_type: {0}")]
    EdgeType(#[from] ParseEdgeKindError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("cannot connect: {0}")]
    Connect(#[from] ConnectError),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("this command needs an input document")]
    MissingInput,
}

/// What a command printed, and whether it should exit with a failure status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub text: String,
    pub failed: bool,
}

impl Output {
    fn success(text: String) -> Self {
        Self { text, failed: false }
    }
}

/// Runs `command` against the already-read `source` document.
pub fn execute(
    command: &Command,
    source: Option<&str>,
    config: &AppConfig,
) -> Result<Output, CliError> {
    let options = config.store_options()?;
    match command {
        Command::Sample { branching } => {
            let diagram =
                if *branching { sample_diagram_with_branching() } else { sample_diagram() };
            Ok(Output::success(export_document(&diagram)?))
        }
        Command::Schema => Ok(Output::success(serde_json::to_string_pretty(&document_schema())?)),
        Command::Layout { .. } => {
            let diagram = import_document(source.ok_or(CliError::MissingInput)?)?;
            let layout = layout_diagram(&diagram, config.layout());
            Ok(Output::success(serde_json::to_string_pretty(&layout)?))
        }
        Command::Check { strict, .. } => {
            let mut store = DiagramStore::with_options(options);
            store.import_json(source.ok_or(CliError::MissingInput)?)?;
            if *strict {
                store.set_validation_mode(ValidationMode::Strict);
            }
            let errors = store.validation_errors();
            info!(errors = errors.len(); "document checked");
            if errors.is_empty() {
                return Ok(Output::success("ok".to_owned()));
            }
            let text = errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n");
            Ok(Output { text, failed: true })
        }
        Command::Connect { from, to, edge_type, descriptor, .. } => {
            let mut store = DiagramStore::with_options(options);
            store.import_json(source.ok_or(CliError::MissingInput)?)?;
            store.check_connection(from, to)?;
            store.start_connection(from);
            let edge_id = store
                .complete_connection(to, *edge_type, descriptor.clone())
                .ok_or_else(|| ConnectError::UnknownNode { node_id: to.clone() })?;
            debug!(edge_id:% = edge_id; "edge added");
            Ok(Output::success(store.export_json()?))
        }
        Command::Nest { action, block, .. } => {
            let mut store = DiagramStore::with_options(options);
            store.import_json(source.ok_or(CliError::MissingInput)?)?;
            store.nest_action_in_block(action, block)?;
            Ok(Output::success(store.export_json()?))
        }
    }
}

/// Loads configuration and input, runs the command and prints its output.
pub fn run(args: &Args) -> Result<ExitCode, CliError> {
    let config = load_config(args.config.as_deref())?;
    let source = match args.command.input() {
        Some(path) => {
            debug!(path:% = path.display(); "reading document");
            let text = fs::read_to_string(path)
                .map_err(|source| CliError::Io { path: path.clone(), source })?;
            Some(text)
        }
        None => None,
    };

    let output = execute(&args.command, source.as_deref(), &config)?;
    println!("{}", output.text);
    Ok(if output.failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
