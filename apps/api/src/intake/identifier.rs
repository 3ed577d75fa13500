//! Identifier Assignment — collision-free, sortable ids for every document
//! in a batch, including members extracted from archives.
//!
//! An id combines the wall clock at microsecond resolution with a
//! process-wide monotonic counter, so two documents staged in the same
//! microsecond still get distinct ids. Nothing downstream ever parses an id
//! back apart — it is an opaque, ordered key.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::Serialize;

/// Opaque document identifier, unique within the process and sortable by
/// assignment order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DocId(String);

impl DocId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[cfg(test)]
    pub fn fixed(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out `DocId`s. Pure computation — never fails.
#[derive(Debug, Default)]
pub struct IdGenerator {
    counter: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> DocId {
        let micros = Utc::now().timestamp_micros();
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        DocId(format!("{micros:016}-{seq:012}"))
    }
}
