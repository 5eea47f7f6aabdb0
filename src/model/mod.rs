// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A diagram holds phases, blocks and actions (nested in that order) plus typed edges between
//! blocks and actions.

pub mod diagram;
pub mod edge;
pub mod ids;
pub mod node;
pub mod samples;

pub use diagram::Diagram;
pub use edge::{Edge, EdgeKind, ParseEdgeKindError};
pub use ids::{generate_id, EdgeId, EntityKind, Id, IdError, NodeId};
pub use node::{Action, Block, Node, NodeKind, Phase, Position};
