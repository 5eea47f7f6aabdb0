// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Geometry for rendering.
//!
//! Layout is a pure function of the model: it never mutates the diagram and the store never
//! consults it.

pub mod layered;

pub use layered::{layout_diagram, DiagramLayout, LayoutConfig, LayoutEdge, LayoutNode};
