//! Object-store `Getter`: an HTTP range GET against a (bucket + folder) prefix.
//!
//! Modeled after the teacher's download client: one pooled `reqwest::Client`
//! with keepalive and timeouts, reused across every fetch.

use std::time::Duration;

use async_trait::async_trait;
use hostgraph_common::{Error, Result};
use once_cell::sync::Lazy;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::getter::Getter;

static GLOBAL_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .tcp_keepalive(Duration::from_secs(60))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(20)
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("hostgraph/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("failed to build object-store HTTP client")
});

/// Fetches byte ranges from an object store over HTTP, e.g. a presigned
/// bucket URL or a static-file gateway in front of S3-compatible storage.
pub struct ObjectGetter {
    client: Client,
    prefix: String,
}

impl ObjectGetter {
    /// `base_url` is the bucket root (e.g. `https://bucket.example.com`),
    /// `folder` the leaf folder this Getter serves (`vertices`, `edges`,
    /// `edges_reversed`).
    pub fn new(base_url: impl AsRef<str>, folder: impl AsRef<str>) -> Self {
        let prefix = format!(
            "{}/{}",
            base_url.as_ref().trim_end_matches('/'),
            folder.as_ref().trim_matches('/')
        );
        Self {
            client: GLOBAL_CLIENT.clone(),
            prefix,
        }
    }

    #[cfg(test)]
    fn with_client(base_url: impl AsRef<str>, folder: impl AsRef<str>, client: Client) -> Self {
        let prefix = format!(
            "{}/{}",
            base_url.as_ref().trim_end_matches('/'),
            folder.as_ref().trim_matches('/')
        );
        Self { client, prefix }
    }
}

#[async_trait]
impl Getter for ObjectGetter {
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

        let url = format!("{}/{}", self.prefix, file_name);
        let range = format!("bytes={}-{}", offset, offset + length - 1);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            result = self.client.get(&url).header(reqwest::header::RANGE, range).send() => {
                result.map_err(|source| Error::Http {
                    file: file_name.to_string(),
                    message: source.to_string(),
                })?
            }
        };

        let status = response.status();
        if status.as_u16() != 206 && !status.is_success() {
            tracing::warn!(file = file_name, %status, "object store returned unexpected status");
            return Err(Error::Http {
                file: file_name.to_string(),
                message: format!("unexpected status {status}"),
            });
        }

        if let Some(content_length) = response.content_length() {
            if content_length != length {
                tracing::warn!(
                    file = file_name,
                    expected = length,
                    actual = content_length,
                    "content-length mismatch on range fetch"
                );
                return Err(Error::ContentLengthMismatch {
                    file: file_name.to_string(),
                    expected: length as usize,
                    actual: content_length as usize,
                });
            }
        }

        let bytes = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            result = response.bytes() => result.map_err(|source| Error::Http {
                file: file_name.to_string(),
                message: source.to_string(),
            })?,
        };

        if bytes.len() as u64 != length {
            return Err(Error::ContentLengthMismatch {
                file: file_name.to_string(),
                expected: length as usize,
                actual: bytes.len(),
            });
        }

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_requested_range() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vertices/part0.txt"))
            .and(header("Range", "bytes=8-15"))
            .respond_with(
                ResponseTemplate::new(206)
                    .set_body_bytes(b"1\tcom.b\n".to_vec())
                    .insert_header("Content-Length", "8"),
            )
            .mount(&server)
            .await;

        let getter = ObjectGetter::with_client(server.uri(), "vertices", Client::new());
        let bytes = getter
            .fetch("part0.txt", 8, 8, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(bytes, b"1\tcom.b\n");
    }

    #[tokio::test]
    async fn content_length_mismatch_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vertices/part0.txt"))
            .respond_with(
                ResponseTemplate::new(206)
                    .set_body_bytes(b"short".to_vec())
                    .insert_header("Content-Length", "5"),
            )
            .mount(&server)
            .await;

        let getter = ObjectGetter::with_client(server.uri(), "vertices", Client::new());
        let err = getter
            .fetch("part0.txt", 0, 100, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ContentLengthMismatch { .. }));
    }

    #[tokio::test]
    async fn server_error_status_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/edges/part0.txt"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let getter = ObjectGetter::with_client(server.uri(), "edges", Client::new());
        let err = getter
            .fetch("part0.txt", 0, 10, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http { .. }));
    }
}
