/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Resolution options.
//!
//! Options are plain data so hosts can embed them in their own
//! configuration files and deserialize them with serde.

use serde::{Deserialize, Serialize};

/// Options controlling value resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Maximum number of sequences that may be open at once while
    /// resolving one value. `None` (the default) means unbounded; values
    /// that refer to themselves will then never finish.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit sequence nesting to `max_depth` levels.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}
