//! The `Vertex` data type shared by the index, store, and query layers.

/// One host in the graph: a dense integer id paired with its reversed
/// domain. Both fields travel as strings at the storage boundary (the
/// part-file and index text formats are all tab-separated text), so the id
/// is kept as a string here too rather than forcing a premature `u64`
/// conversion on every store that just passes it along.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    pub id: String,
    pub reversed_domain: String,
}

impl Vertex {
    pub fn new(id: impl Into<String>, reversed_domain: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reversed_domain: reversed_domain.into(),
        }
    }
}
