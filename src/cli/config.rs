// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Configuration file discovery.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use crate::config::AppConfig;

const LOCAL_CONFIG: &str = "servicemap.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration file: {0}")]
    MissingFile(PathBuf),
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Finds and loads the configuration.
///
/// Search order:
/// 1. `explicit_path`, which must exist
/// 2. `./servicemap.toml`
/// 3. `config.toml` in the platform config directory
/// 4. defaults
pub fn load_config(explicit_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    if let Some(path) = explicit_path {
        info!(path:% = path.display(); "loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new(LOCAL_CONFIG);
    if local_config.exists() {
        info!(path:% = local_config.display(); "loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(project_dirs) = ProjectDirs::from("com", "servicemap", "servicemap") {
        let system_config = project_dirs.config_dir().join("config.toml");
        if system_config.exists() {
            info!(path:% = system_config.display(); "loading configuration from system path");
            return load_config_file(&system_config);
        }
        debug!(path:% = system_config.display(); "system configuration file not found");
    } else {
        debug!("could not determine platform config directory");
    }

    debug!("no configuration file found, using defaults");
    Ok(AppConfig::default())
}

fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}
