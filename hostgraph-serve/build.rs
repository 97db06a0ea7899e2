//! Resolves the embedded index directory at build time. `HOSTGRAPH_INDEX_DIR`
//! lets a release build point `include_bytes!` at indices produced by
//! `tools/hostgraph-indexer`; local dev falls back to the checked-in
//! placeholder under `data/offsets`.

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("set by cargo");
    let dir = std::env::var("HOSTGRAPH_INDEX_DIR")
        .unwrap_or_else(|_| format!("{manifest_dir}/data/offsets"));

    println!("cargo:rustc-env=HOSTGRAPH_INDEX_DIR={dir}");
    println!("cargo:rerun-if-env-changed=HOSTGRAPH_INDEX_DIR");
    println!("cargo:rerun-if-changed={dir}");
}
