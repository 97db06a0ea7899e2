//! Common utilities shared across the hostgraph workspace.

pub mod domain;
pub mod error;
pub mod vertex;

pub use domain::reverse_domain;
pub use error::{Error, Result};
pub use vertex::Vertex;
