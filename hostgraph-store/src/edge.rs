//! Resolves `from_id -> sorted list of to_id` by fanning out one range read
//! per edge part-file and streaming-scanning each chunk.

use std::sync::Arc;

use hostgraph_common::{Error as CoreError, Result as CoreResult};
use hostgraph_index::{EdgeIndex, EdgeRange};
use hostgraph_io::Getter;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Per-part-file hit cap. A popular host can appear as the source of
/// hundreds of thousands of edges; this bounds both memory and latency
/// while still giving the orchestrator enough signal downstream.
pub const DEFAULT_MAX_SIZE: usize = 10_000;

pub struct EdgeStore {
    index: Arc<EdgeIndex>,
    getter: Arc<dyn Getter>,
}

impl EdgeStore {
    pub fn new(index: EdgeIndex, getter: Arc<dyn Getter>) -> Self {
        Self {
            index: Arc::new(index),
            getter,
        }
    }

    pub async fn get_out_ids(&self, from_id: &str, cancel: &CancellationToken) -> Result<Vec<String>> {
        let ranges = self.index.ranges_for_from_id(from_id);
        let mut tasks = JoinSet::new();
        let mut spawned = 0;

        for range in ranges {
            if range.is_empty() {
                continue;
            }
            spawned += 1;
            let getter = Arc::clone(&self.getter);
            let target = from_id.to_string();
            let cancel = cancel.clone();
            tasks.spawn(async move { scan_part_file(getter.as_ref(), &range, &target, &cancel).await });
        }

        let mut to_ids = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let hits = joined.expect("edge scan task panicked")?;
            to_ids.extend(hits);
        }
        to_ids.sort();
        tracing::debug!(from_id, parts = spawned, hits = to_ids.len(), "edge fan-out complete");
        Ok(to_ids)
    }
}

async fn scan_part_file(
    getter: &dyn Getter,
    range: &EdgeRange,
    target: &str,
    cancel: &CancellationToken,
) -> CoreResult<Vec<String>> {
    let bytes = getter
        .fetch(&range.part_file, range.from_offset, range.len(), cancel)
        .await?;

    let mut hits = Vec::new();
    for line in bytes.split(|&b| b == b'\n') {
        if line.is_empty() {
            continue;
        }
        let line = std::str::from_utf8(line).map_err(|_| CoreError::MalformedLine {
            file: range.part_file.clone(),
            line: String::from_utf8_lossy(line).into_owned(),
        })?;
        let mut fields = line.splitn(2, '\t');
        let (line_from_id, to_id) = match (fields.next(), fields.next()) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(CoreError::MalformedLine {
                    file: range.part_file.clone(),
                    line: line.to_string(),
                })
            }
        };

        if line_from_id == target {
            hits.push(to_id.to_string());
            if hits.len() >= DEFAULT_MAX_SIZE {
                break;
            }
        } else if !hits.is_empty() {
            // from_id is non-decreasing within a part-file: a mismatch
            // after a run of matches means the run is over.
            break;
        }
    }
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hostgraph_index::EdgeEntry;
    use std::collections::HashMap;

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

    fn build(files: Vec<(&str, Vec<String>)>) -> (EdgeIndex, FakeGetter) {
        let mut index = EdgeIndex::new();
        let mut getter_files = HashMap::new();
        for (name, lines) in files {
            let content: String = lines.iter().map(|l| format!("{l}\n")).collect();
            let first_id = lines[0].split('\t').next().unwrap().to_string();
            let last_id = lines.last().unwrap().split('\t').next().unwrap().to_string();
            index.append([
                EdgeEntry::new(first_id, 0, name),
                EdgeEntry::new(last_id, content.len() as u64, name),
            ]);
            getter_files.insert(name.to_string(), content.into_bytes());
        }
        (index, FakeGetter { files: getter_files })
    }

    #[tokio::test]
    async fn fans_out_with_early_break() {
        let (index, getter) = build(vec![
            ("partA.txt", vec!["96033\t1".to_string(), "96033\t2".to_string(), "96034\t9".to_string()]),
            ("partB.txt", vec!["1\t5".to_string(), "2\t6".to_string()]),
        ]);
        let store = EdgeStore::new(index, Arc::new(getter));
        let cancel = CancellationToken::new();
        let mut result = store.get_out_ids("96033", &cancel).await.unwrap();
        result.sort();
        assert_eq!(result, vec!["1".to_string(), "2".to_string()]);
    }

    #[tokio::test]
    async fn enforces_cap_per_part() {
        let lines: Vec<String> = (0..20_000).map(|i| format!("7\t{i}")).collect();
        let (index, getter) = build(vec![("part0.txt", lines)]);
        let store = EdgeStore::new(index, Arc::new(getter));
        let cancel = CancellationToken::new();
        let result = store.get_out_ids("7", &cancel).await.unwrap();
        assert_eq!(result.len(), DEFAULT_MAX_SIZE);
    }

    #[tokio::test]
    async fn missing_id_returns_empty() {
        let (index, getter) = build(vec![("part0.txt", vec!["1\ta".to_string(), "2\tb".to_string()])]);
        let store = EdgeStore::new(index, Arc::new(getter));
        let cancel = CancellationToken::new();
        let result = store.get_out_ids("999", &cancel).await.unwrap();
        assert!(result.is_empty());
    }
}
