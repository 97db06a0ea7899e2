use anyhow::Result;
use hostgraph_serve::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    hostgraph_serve::init_tracing();
    let config = Config::from_env();
    hostgraph_serve::serve(config).await
}
