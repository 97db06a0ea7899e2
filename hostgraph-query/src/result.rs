//! The top-level query result envelope.

use std::collections::BTreeMap;

use serde::Serialize;

/// `{target, out, in, timings}` — `timings` is observational only, never
/// part of the correctness contract (two calls with the same input may
/// differ only in their timings).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub target: String,
    pub out: Vec<String>,
    #[serde(rename = "in")]
    pub incoming: Vec<String>,
    pub timings: BTreeMap<String, u64>,
}
