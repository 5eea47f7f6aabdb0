// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Document formats.
//!
//! The only format is the JSON document the editor exports and re-imports.

pub mod json;

pub use json::{document_schema, export_document, import_document, FormatError};
