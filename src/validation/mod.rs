// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Request Validation
//!
//! Each request body type declares a [`Schema`] through [`Validate`]. The
//! [`ValidatedJson`] extractor checks the raw JSON against that schema
//! before deserializing, so a handler only ever sees a body that passed.

pub mod extractor;
pub mod schema;

use serde::de::DeserializeOwned;
use thiserror::Error;

pub use extractor::ValidatedJson;
pub use schema::{Field, Schema};

/// Every field-level violation found in one body, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", .0.join("; "))]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for ValidationErrors {
    fn from(messages: Vec<String>) -> Self {
        Self(messages)
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    /// The body broke one or more declared constraints.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// The declaration itself did not compile.
    #[error("schema failed to compile: {0}")]
    Compile(String),
}

/// A body type with a declared schema.
///
/// The schema is compiled once and kept in a static:
///
/// ```rust,ignore
/// static SCHEMA: LazyLock<Schema> =
///     LazyLock::new(|| Schema::new([Field::string("name").min_length(1)]));
///
/// impl Validate for CreateProjectRequest {
///     fn schema() -> &'static Schema {
///         &SCHEMA
///     }
/// }
/// ```
pub trait Validate: DeserializeOwned {
    fn schema() -> &'static Schema;
}
