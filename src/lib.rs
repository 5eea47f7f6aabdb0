// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Servicemap: an editing core for service journey diagrams.
//!
//! A journey is a graph of phases, blocks and actions. Phases own blocks, blocks own actions,
//! and actions or blocks are connected by typed edges. [`store::DiagramStore`] is the single
//! mutable owner of a [`model::Diagram`] and keeps validation, selection and the
//! edge-drawing gesture consistent with it.

pub mod cli;
pub mod config;
pub mod format;
pub mod layout;
pub mod model;
pub mod ops;
pub mod store;
pub mod validate;
