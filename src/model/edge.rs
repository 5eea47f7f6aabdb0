// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::ids::NodeId;

/// How the flow continues along an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgeKind {
    #[default]
    Any,
    /// One branch out of several; the descriptor usually names the condition.
    Choice,
    Parallel,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Choice => "choice",
            Self::Parallel => "parallel",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown edge type '{0}' (expected any, choice or parallel)")]
pub struct ParseEdgeKindError(String);

impl FromStr for EdgeKind {
    type Err = ParseEdgeKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(Self::Any),
            "choice" => Ok(Self::Choice),
            "parallel" => Ok(Self::Parallel),
            other => Err(ParseEdgeKindError(other.to_owned())),
        }
    }
}

/// Directed relationship between two block/action nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    from: NodeId,
    to: NodeId,
    kind: EdgeKind,
    descriptor: Option<String>,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to, kind: EdgeKind::Any, descriptor: None }
    }

    pub fn new_with(from: NodeId, to: NodeId, kind: EdgeKind, descriptor: Option<String>) -> Self {
        Self { from, to, kind, descriptor }
    }

    pub fn from(&self) -> &NodeId {
        &self.from
    }

    pub fn to(&self) -> &NodeId {
        &self.to
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: EdgeKind) {
        self.kind = kind;
    }

    pub fn descriptor(&self) -> Option<&str> {
        self.descriptor.as_deref()
    }

    pub fn set_descriptor<T: Into<String>>(&mut self, descriptor: Option<T>) {
        self.descriptor = descriptor.map(Into::into);
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.from == node_id || &self.to == node_id
    }
}

#[cfg(test)]
mod tests {
    use super::{Edge, EdgeKind};
    use crate::model::NodeId;

    #[test]
    fn edge_defaults_to_any_without_descriptor() {
        let from = NodeId::new("a1").expect("from");
        let to = NodeId::new("a2").expect("to");
        let mut edge = Edge::new(from.clone(), to.clone());

        assert_eq!(edge.kind(), EdgeKind::Any);
        assert_eq!(edge.descriptor(), None);
        assert!(edge.touches(&from));
        assert!(edge.touches(&to));

        edge.set_kind(EdgeKind::Choice);
        edge.set_descriptor(Some("valid"));
        assert_eq!(edge.kind(), EdgeKind::Choice);
        assert_eq!(edge.descriptor(), Some("valid"));

        edge.set_descriptor::<&str>(None);
        assert_eq!(edge.descriptor(), None);
    }

    #[test]
    fn edge_kind_parses_wire_names() {
        assert_eq!("any".parse::<EdgeKind>(), Ok(EdgeKind::Any));
        assert_eq!("choice".parse::<EdgeKind>(), Ok(EdgeKind::Choice));
        assert_eq!("parallel".parse::<EdgeKind>(), Ok(EdgeKind::Parallel));
        assert!("sequence".parse::<EdgeKind>().is_err());
        assert_eq!(EdgeKind::Parallel.to_string(), "parallel");
    }
}
