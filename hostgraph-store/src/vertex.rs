//! Resolves `domain -> vertex` and `id -> vertex` against the vertex index,
//! range-reading from a `Getter` only when the index doesn't already hold
//! an exact hit.

use std::sync::Arc;

use hostgraph_common::{Error as CoreError, Result as CoreResult, Vertex};
use hostgraph_index::{Bracket, VertexEntry, VertexIndex};
use hostgraph_io::Getter;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Width of the semaphore gating `get_by_ids` fan-out. Not an intrinsic
/// property of the problem — a tuned ceiling on concurrent Getter calls.
pub const DEFAULT_SEMAPHORE_WIDTH: usize = 100;

pub struct VertexStore {
    index: Arc<VertexIndex>,
    getter: Arc<dyn Getter>,
    semaphore_width: usize,
}

impl VertexStore {
    pub fn new(index: VertexIndex, getter: Arc<dyn Getter>) -> Self {
        Self::with_semaphore_width(index, getter, DEFAULT_SEMAPHORE_WIDTH)
    }

    pub fn with_semaphore_width(index: VertexIndex, getter: Arc<dyn Getter>, width: usize) -> Self {
        Self {
            index: Arc::new(index),
            getter,
            semaphore_width: width,
        }
    }

    pub async fn get_by_domain(
        &self,
        reversed_domain: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Vertex>> {
        resolve_by_domain(&self.index, self.getter.as_ref(), reversed_domain, cancel)
            .await
            .map_err(Error::from)
    }

    pub async fn get_by_id(&self, id: &str, cancel: &CancellationToken) -> Result<Option<Vertex>> {
        resolve_by_id(&self.index, self.getter.as_ref(), id, cancel)
            .await
            .map_err(Error::from)
    }

    /// Fans out one task per id, admitted through a semaphore of fixed
    /// width. On any sub-failure, returns `Error::PartialFailure` carrying
    /// both the vertices that did resolve and the ids that didn't.
    pub async fn get_by_ids(
        &self,
        ids: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<Vertex>> {
        let semaphore = Arc::new(Semaphore::new(self.semaphore_width));
        let mut tasks = JoinSet::new();

        for id in ids {
            let id = id.clone();
            let index = Arc::clone(&self.index);
            let getter = Arc::clone(&self.getter);
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore is never closed");
                let result = resolve_by_id(&index, getter.as_ref(), &id, &cancel).await;
                (id, result)
            });
        }

        let mut vertices = Vec::new();
        let mut errors = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let (id, result) = joined.expect("vertex resolution task panicked");
            match result {
                Ok(Some(vertex)) => vertices.push(vertex),
                Ok(None) => {}
                Err(err) => errors.push((id, err)),
            }
        }

        if errors.is_empty() {
            Ok(vertices)
        } else {
            tracing::warn!(
                resolved = vertices.len(),
                failed = errors.len(),
                "get_by_ids finished with partial failures"
            );
            Err(Error::PartialFailure { vertices, errors })
        }
    }
}

async fn resolve_by_domain(
    index: &VertexIndex,
    getter: &dyn Getter,
    reversed_domain: &str,
    cancel: &CancellationToken,
) -> CoreResult<Option<Vertex>> {
    match index.bracket_for_domain(reversed_domain) {
        Bracket::Exact(entry) => Ok(Some(vertex_from_entry(entry))),
        Bracket::Between {
            low: Some(low),
            high: Some(high),
        } => scan_for(getter, low, high, cancel, |_id, domain| domain == reversed_domain).await,
        Bracket::Between { .. } => Ok(None),
    }
}

async fn resolve_by_id(
    index: &VertexIndex,
    getter: &dyn Getter,
    id: &str,
    cancel: &CancellationToken,
) -> CoreResult<Option<Vertex>> {
    let numeric_id: u64 = id.parse().map_err(|_| CoreError::InvalidId(id.to_string()))?;
    match index.bracket_for_id(numeric_id)? {
        Bracket::Exact(entry) => Ok(Some(vertex_from_entry(entry))),
        Bracket::Between {
            low: Some(low),
            high: Some(high),
        } => scan_for(getter, low, high, cancel, |entry_id, _domain| entry_id == id).await,
        Bracket::Between { .. } => Ok(None),
    }
}

async fn scan_for(
    getter: &dyn Getter,
    from: &VertexEntry,
    to: &VertexEntry,
    cancel: &CancellationToken,
    matches: impl Fn(&str, &str) -> bool,
) -> CoreResult<Option<Vertex>> {
    let length = to.offset.saturating_sub(from.offset);
    let bytes = getter
        .fetch(&from.part_file, from.offset, length, cancel)
        .await?;

    for line in bytes.split(|&b| b == b'\n') {
        if line.is_empty() {
            continue;
        }
        let line = std::str::from_utf8(line).map_err(|_| CoreError::MalformedLine {
            file: from.part_file.clone(),
            line: String::from_utf8_lossy(line).into_owned(),
        })?;
        let mut fields = line.splitn(2, '\t');
        let (id, domain) = match (fields.next(), fields.next()) {
            (Some(id), Some(domain)) => (id, domain),
            _ => {
                return Err(CoreError::MalformedLine {
                    file: from.part_file.clone(),
                    line: line.to_string(),
                })
            }
        };
        if matches(id, domain) {
            return Ok(Some(Vertex::new(id, domain)));
        }
    }
    Ok(None)
}

fn vertex_from_entry(entry: &VertexEntry) -> Vertex {
    Vertex::new(entry.id.clone(), entry.reversed_domain.clone())
}
