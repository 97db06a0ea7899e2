//! Runtime configuration, read from the environment. Whatever's missing
//! falls back to values sane for local development against the placeholder
//! indices checked into `data/offsets`.

use std::env;

/// Where part-files actually live: either an HTTP object store (production)
/// or a local folder (dev, tests).
pub enum Backend {
    Object { base_url: String },
    Local { root: String },
}

pub struct Config {
    pub port: u16,
    pub backend: Backend,
    pub semaphore_width: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);

        let backend = match env::var("HOSTGRAPH_LOCAL_DATA_ROOT") {
            Ok(root) => Backend::Local { root },
            Err(_) => Backend::Object {
                base_url: env::var("HOSTGRAPH_BUCKET_URL")
                    .unwrap_or_else(|_| "https://hostgraph.example.com".to_string()),
            },
        };

        let semaphore_width = env::var("HOSTGRAPH_SEMAPHORE_WIDTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(hostgraph_store::DEFAULT_SEMAPHORE_WIDTH);

        Self {
            port,
            backend,
            semaphore_width,
        }
    }
}
