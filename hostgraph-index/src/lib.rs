//! Sparse offset indices over sorted vertex/edge part-files: small,
//! in-memory samples that bracket a key to a byte range worth fetching,
//! instead of holding the full graph.

pub mod bracket;
pub mod build;
pub mod edge_index;
pub mod vertex_index;

pub use bracket::{bracket_lookup, Bracket};
pub use build::{build_edge_index, build_vertex_index, EDGE_STRIDE, VERTEX_STRIDE};
pub use edge_index::{EdgeEntry, EdgeIndex, EdgeRange};
pub use vertex_index::{VertexEntry, VertexIndex};
