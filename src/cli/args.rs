// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::model::EdgeKind;

/// Inspect and edit service journey documents.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Validate a document; exits with status 1 when any error is reported
    Check {
        file: PathBuf,
        /// Also report dangling parent references
        #[arg(long)]
        strict: bool,
    },
    /// Print node positions and sizes as JSON
    Layout { file: PathBuf },
    /// Print a built-in sample document
    Sample {
        /// The login journey with choice branches
        #[arg(long)]
        branching: bool,
    },
    /// Print the JSON Schema of the document format
    Schema,
    /// Add an edge and print the updated document
    Connect {
        file: PathBuf,
        from: String,
        to: String,
        /// Edge type (any, choice, parallel); defaults to the configured type
        #[arg(long = "type")]
        edge_type: Option<EdgeKind>,
        #[arg(long)]
        descriptor: Option<String>,
    },
    /// Move an action into a block and print the updated document
    Nest { file: PathBuf, action: String, block: String },
}

impl Command {
    /// The document this command reads, if any.
    pub fn input(&self) -> Option<&PathBuf> {
        match self {
            Self::Check { file, .. }
            | Self::Layout { file }
            | Self::Connect { file, .. }
            | Self::Nest { file, .. } => Some(file),
            Self::Sample { .. } | Self::Schema => None,
        }
    }
}
