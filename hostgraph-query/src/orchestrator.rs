//! Top-level search: reverse the domain, resolve the target vertex, fan out
//! outgoing/incoming edge resolution in parallel, translate ids back to
//! domains, sort, and assemble the result envelope.

use std::collections::BTreeMap;
use std::time::Instant;

use hostgraph_common::{reverse_domain, Error as CoreError, Vertex};
use hostgraph_store::{EdgeStore, VertexStore};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::result::SearchResult;

pub struct SearchEngine {
    vertex_store: VertexStore,
    out_edges: EdgeStore,
    in_edges: EdgeStore,
}

impl SearchEngine {
    pub fn new(vertex_store: VertexStore, out_edges: EdgeStore, in_edges: EdgeStore) -> Self {
        Self {
            vertex_store,
            out_edges,
            in_edges,
        }
    }

    pub async fn search(
        &self,
        domain: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<SearchResult>> {
        if domain.is_empty() {
            return Err(Error::Core(CoreError::EmptyDomain));
        }

        let mut timings = BTreeMap::new();
        let reversed = reverse_domain(domain);

        let started = Instant::now();
        let vertex = self.vertex_store.get_by_domain(&reversed, cancel).await?;
        timings.insert("get_by_domain".to_string(), started.elapsed().as_millis() as u64);

        let Some(vertex) = vertex else {
            tracing::debug!(domain, "no vertex found for domain");
            return Ok(None);
        };

        let (out_result, in_result) = tokio::join!(
            self.resolve_direction(&self.out_edges, &vertex, cancel, "out"),
            self.resolve_direction(&self.in_edges, &vertex, cancel, "in"),
        );
        let (out_vertices, out_timings) = out_result?;
        let (in_vertices, in_timings) = in_result?;
        timings.extend(out_timings);
        timings.extend(in_timings);

        let started = Instant::now();
        let mut out = natural_domains(&out_vertices);
        timings.insert("out_domains".to_string(), started.elapsed().as_millis() as u64);

        let started = Instant::now();
        let mut incoming = natural_domains(&in_vertices);
        timings.insert("in_domains".to_string(), started.elapsed().as_millis() as u64);

        out.sort();
        incoming.sort();

        tracing::info!(
            domain,
            out = out.len(),
            incoming = incoming.len(),
            "search complete"
        );

        Ok(Some(SearchResult {
            target: domain.to_string(),
            out,
            incoming,
            timings,
        }))
    }

    async fn resolve_direction(
        &self,
        edge_store: &EdgeStore,
        vertex: &Vertex,
        cancel: &CancellationToken,
        label: &str,
    ) -> Result<(Vec<Vertex>, BTreeMap<String, u64>)> {
        let mut timings = BTreeMap::new();

        let started = Instant::now();
        let ids = edge_store.get_out_ids(&vertex.id, cancel).await?;
        timings.insert(format!("edges_get_{label}"), started.elapsed().as_millis() as u64);

        let started = Instant::now();
        let vertices = self.vertex_store.get_by_ids(&ids, cancel).await?;
        timings.insert(
            format!("v_get_by_ids_{label}"),
            started.elapsed().as_millis() as u64,
        );

        Ok((vertices, timings))
    }
}

fn natural_domains(vertices: &[Vertex]) -> Vec<String> {
    vertices
        .iter()
        .map(|v| reverse_domain(&v.reversed_domain))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hostgraph_index::{EdgeEntry, EdgeIndex, VertexEntry, VertexIndex};
    use hostgraph_io::Getter;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct FakeGetter {
        files: HashMap<String, Vec<u8>>,
    }

    #[async_trait]
    impl Getter for FakeGetter {
        async fn fetch(
            &self,
            file_name: &str,
            offset: u64,
            length: u64,
            _cancel: &CancellationToken,
        ) -> hostgraph_common::Result<Vec<u8>> {
            let data = self.files.get(file_name).expect("file exists");
            let start = offset as usize;
            let end = start + length as usize;
            Ok(data[start..end].to_vec())
        }
    }

    /// A tiny graph: `binaryedge.io` links out to two hosts; nobody links
    /// back to it. Ids follow domain-sort order, so `com.a` < `com.b` <
    /// `io.binaryedge` assigns ids 0, 1, 2 respectively.
    fn engine() -> SearchEngine {
        let vertex_content = b"0\tcom.a\n1\tcom.b\n2\tio.binaryedge\n".to_vec();
        let mut vertex_index = VertexIndex::new();
        vertex_index.append([
            VertexEntry::new("com.a", 0, "0", "vertices0.txt"),
            VertexEntry::new("io.binaryedge", vertex_content.len() as u64, "2", "vertices0.txt"),
        ]);
        let mut vertex_files = HashMap::new();
        vertex_files.insert("vertices0.txt".to_string(), vertex_content);
        let vertex_store = VertexStore::new(vertex_index, Arc::new(FakeGetter { files: vertex_files }));

        let out_content = b"2\t0\n2\t1\n".to_vec();
        let mut out_index = EdgeIndex::new();
        out_index.append([
            EdgeEntry::new("2", 0, "edges0.txt"),
            EdgeEntry::new("2", out_content.len() as u64, "edges0.txt"),
        ]);
        let mut out_files = HashMap::new();
        out_files.insert("edges0.txt".to_string(), out_content);
        let out_edges = EdgeStore::new(out_index, Arc::new(FakeGetter { files: out_files }));

        // Nothing points to id 2; the in-index's only samples are for an
        // unrelated id, so a lookup for "2" falls below the first entry and
        // is suppressed without any fetch.
        let in_content = b"5\t9\n".to_vec();
        let mut in_index = EdgeIndex::new();
        in_index.append([
            EdgeEntry::new("5", 0, "edges_reversed0.txt"),
            EdgeEntry::new("5", in_content.len() as u64, "edges_reversed0.txt"),
        ]);
        let mut in_files = HashMap::new();
        in_files.insert("edges_reversed0.txt".to_string(), in_content);
        let in_edges = EdgeStore::new(in_index, Arc::new(FakeGetter { files: in_files }));

        SearchEngine::new(vertex_store, out_edges, in_edges)
    }

    #[tokio::test]
    async fn orchestrator_round_trip() {
        let engine = engine();
        let cancel = CancellationToken::new();
        let result = engine
            .search("binaryedge.io", &cancel)
            .await
            .unwrap()
            .expect("vertex exists");
        assert_eq!(result.target, "binaryedge.io");
        assert_eq!(result.out, vec!["a.com".to_string(), "b.com".to_string()]);
        assert!(result.incoming.is_empty());
    }

    #[tokio::test]
    async fn unknown_domain_is_none() {
        let engine = engine();
        let cancel = CancellationToken::new();
        assert!(engine.search("nothing-here.example", &cancel).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_domain_is_an_error() {
        let engine = engine();
        let cancel = CancellationToken::new();
        assert!(matches!(
            engine.search("", &cancel).await,
            Err(Error::Core(CoreError::EmptyDomain))
        ));
    }

    #[tokio::test]
    async fn idempotent_target_and_results() {
        let engine = engine();
        let cancel = CancellationToken::new();
        let first = engine.search("binaryedge.io", &cancel).await.unwrap().unwrap();
        let second = engine.search("binaryedge.io", &cancel).await.unwrap().unwrap();
        assert_eq!(first.target, second.target);
        assert_eq!(first.out, second.out);
        assert_eq!(first.incoming, second.incoming);
    }
}
