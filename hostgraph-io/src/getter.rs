//! The `Getter` capability: a byte-range fetch over a logical file name.
//!
//! A `Getter` is constructed for one folder (`vertices/`, `edges/`,
//! `edges_reversed/`) and prefixes that folder internally; callers only ever
//! pass the part-file's leaf name.

use async_trait::async_trait;
use hostgraph_common::Result;
use tokio_util::sync::CancellationToken;

/// Byte-range fetcher over a logical file name.
///
/// Implementations must not return a short read on success: a successful
/// `fetch` always returns exactly `length` bytes from `[offset, offset+length)`
/// of the named file.
#[async_trait]
pub trait Getter: Send + Sync {
    async fn fetch(
        &self,
        file_name: &str,
        offset: u64,
        length: u64,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>>;
}
