//! Local-filesystem `Getter`, used in tests and for local development.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hostgraph_common::{Error, Result};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::sync::CancellationToken;

use crate::getter::Getter;

/// Reads `<folder>/<file_name>` by seeking to `offset` and reading `length`
/// bytes, failing if fewer bytes are available.
pub struct LocalGetter {
    folder: PathBuf,
}

impl LocalGetter {
    pub fn new(folder: impl AsRef<Path>) -> Self {
        Self {
            folder: folder.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl Getter for LocalGetter {
    async fn fetch(
        &self,
        file_name: &str,
        offset: u64,
        length: u64,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let path = self.folder.join(file_name);
        let mut file = File::open(&path).await.map_err(|source| {
            tracing::warn!(file = file_name, %source, "failed to open local part-file");
            Error::Fetch {
                file: file_name.to_string(),
                source,
            }
        })?;

        file.seek(std::io::SeekFrom::Start(offset))
            .await
            .map_err(|source| Error::Fetch {
                file: file_name.to_string(),
                source,
            })?;

        let mut buffer = vec![0u8; length as usize];
        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            result = file.read_exact(&mut buffer) => result,
        };

        match read {
            Ok(n) if n as u64 == length => Ok(buffer),
            Ok(n) => Err(Error::ShortRead {
                file: file_name.to_string(),
                expected: length as usize,
                actual: n,
            }),
            Err(source) => {
                if source.kind() == std::io::ErrorKind::UnexpectedEof {
                    Err(Error::ShortRead {
                        file: file_name.to_string(),
                        expected: length as usize,
                        actual: 0,
                    })
                } else {
                    Err(Error::Fetch {
                        file: file_name.to_string(),
                        source,
                    })
                }
            }
        }
    }
}
