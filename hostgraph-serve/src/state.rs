//! Loaded-once server state: the three stores, shared read-only across every
//! request via `Arc`.

use std::sync::Arc;

use hostgraph_index::{EdgeIndex, VertexIndex};
use hostgraph_io::{Getter, LocalGetter, ObjectGetter};
use hostgraph_query::SearchEngine;
use hostgraph_store::{EdgeStore, VertexStore};

use crate::config::{Backend, Config};

const VERTEX_INDEX_BYTES: &[u8] =
    include_bytes!(concat!(env!("HOSTGRAPH_INDEX_DIR"), "/vertices.offsets.txt"));
const EDGE_INDEX_BYTES: &[u8] =
    include_bytes!(concat!(env!("HOSTGRAPH_INDEX_DIR"), "/edges.offsets.txt"));
const EDGE_REVERSED_INDEX_BYTES: &[u8] =
    include_bytes!(concat!(env!("HOSTGRAPH_INDEX_DIR"), "/edges_reversed.offsets.txt"));

pub struct ServerState {
    pub engine: SearchEngine,
}

impl ServerState {
    pub fn load(config: &Config) -> anyhow::Result<Self> {
        let vertex_index = VertexIndex::load(VERTEX_INDEX_BYTES)?;
        let edge_index = EdgeIndex::load(EDGE_INDEX_BYTES)?;
        let edge_reversed_index = EdgeIndex::load(EDGE_REVERSED_INDEX_BYTES)?;

        let vertex_getter = getter_for(config, "vertices");
        let edge_getter = getter_for(config, "edges");
        let edge_reversed_getter = getter_for(config, "edges_reversed");

        let vertex_store =
            VertexStore::with_semaphore_width(vertex_index, vertex_getter, config.semaphore_width);
        let out_edges = EdgeStore::new(edge_index, edge_getter);
        let in_edges = EdgeStore::new(edge_reversed_index, edge_reversed_getter);

        Ok(Self {
            engine: SearchEngine::new(vertex_store, out_edges, in_edges),
        })
    }
}

fn getter_for(config: &Config, folder: &str) -> Arc<dyn Getter> {
    match &config.backend {
        Backend::Object { base_url } => Arc::new(ObjectGetter::new(base_url, folder)),
        Backend::Local { root } => Arc::new(LocalGetter::new(format!("{root}/{folder}"))),
    }
}
