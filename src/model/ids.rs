// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use thiserror::Error;

/// A stable identifier shared by the model, the store API and the JSON document.
///
/// Ids are free-form strings (sample documents use ids like `phaseA` or `e1`, imported ones may
/// read `phase A`); the only requirement is that they are non-empty. Uniqueness is a property
/// of the [`Diagram`](super::Diagram) that holds them, not of the id type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id(&value)?;
        Ok(Self { value, _marker: PhantomData })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    /// A fresh id from [`generate_id`]; always valid, not checked against any model.
    pub(crate) fn generated(kind: EntityKind) -> Self {
        Self { value: generate_id(kind), _marker: PhantomData }
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("id must not be empty")]
    Empty,
}

fn validate_id(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeIdTag {}
pub type NodeId = Id<NodeIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeIdTag {}
pub type EdgeId = Id<EdgeIdTag>;

/// Entity families that receive generated ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Phase,
    Block,
    Action,
    Edge,
}

impl EntityKind {
    /// Single-letter prefix that makes generated ids readable in logs and exports.
    pub fn prefix(self) -> char {
        match self {
            Self::Phase => 'p',
            Self::Block => 'b',
            Self::Action => 'a',
            Self::Edge => 'e',
        }
    }
}

const RANDOM_SUFFIX_LEN: usize = 3;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates `<prefix><millis base36><3 random base36 chars>`, e.g. `pm3x9k2a7q`.
///
/// Uniqueness is best-effort (wall clock plus a little entropy). Callers that hold a model use
/// [`DiagramStore::generate_id`](crate::store::DiagramStore::generate_id), which retries until
/// the id is free.
pub fn generate_id(kind: EntityKind) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();

    let mut out = String::with_capacity(1 + 9 + RANDOM_SUFFIX_LEN);
    out.push(kind.prefix());
    push_base36(&mut out, millis);

    let mut rng = rand::rng();
    for _ in 0..RANDOM_SUFFIX_LEN {
        out.push(BASE36[rng.random_range(0..BASE36.len())] as char);
    }
    out
}

fn push_base36(out: &mut String, mut value: u128) {
    if value == 0 {
        out.push('0');
        return;
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    out.extend(digits.iter().rev().map(|&b| b as char));
}
