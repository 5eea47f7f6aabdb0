// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Application configuration.
//!
//! Every section and field is optional; missing values fall back to the defaults below.
//!
//! ```toml
//! [validation]
//! strict = true
//!
//! [connection]
//! default_edge_type = "choice"
//!
//! [layout]
//! node_sep = 40.0
//! rank_sep = 120.0
//! ```

use serde::Deserialize;

use crate::layout::LayoutConfig;
use crate::model::{EdgeKind, ParseEdgeKindError};
use crate::store::StoreOptions;
use crate::validate::ValidationMode;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    validation: ValidationConfig,
    #[serde(default)]
    connection: ConnectionConfig,
    #[serde(default)]
    layout: LayoutConfig,
}

impl AppConfig {
    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }

    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Store options derived from the validation and connection sections.
    ///
    /// # Errors
    ///
    /// Returns an error if `connection.default_edge_type` is not a known edge type.
    pub fn store_options(&self) -> Result<StoreOptions, ParseEdgeKindError> {
        Ok(StoreOptions {
            validation_mode: self.validation.mode(),
            default_edge_kind: self.connection.default_edge_kind()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ValidationConfig {
    /// Also report dangling parent references.
    #[serde(default)]
    strict: bool,
}

impl ValidationConfig {
    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn mode(&self) -> ValidationMode {
        if self.strict {
            ValidationMode::Strict
        } else {
            ValidationMode::Standard
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_edge_type")]
    default_edge_type: String,
}

fn default_edge_type() -> String {
    EdgeKind::default().as_str().to_owned()
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { default_edge_type: default_edge_type() }
    }
}

impl ConnectionConfig {
    pub fn default_edge_kind(&self) -> Result<EdgeKind, ParseEdgeKindError> {
        self.default_edge_type.parse()
    }
}
