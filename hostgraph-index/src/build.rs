//! The offline indexing pass: one read-through of a store folder's
//! part-files, emitting sparse offset entries at the configured stride.
//!
//! Exposed as a library so the CLI in `tools/hostgraph-indexer` is a thin
//! wrapper over the same code path the test suite exercises directly.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use hostgraph_common::{Error, Result};

use crate::edge_index::{EdgeEntry, EdgeIndex};
use crate::vertex_index::{VertexEntry, VertexIndex};

pub const VERTEX_STRIDE: u64 = 32 * 1024;
pub const EDGE_STRIDE: u64 = 128 * 1024;

pub fn build_vertex_index(folder: &Path) -> Result<VertexIndex> {
    let mut index = VertexIndex::new();

    for file_name in sorted_part_files(folder)? {
        let reader = open(folder, &file_name)?;

        let mut offset: u64 = 0;
        let mut last_emitted: Option<u64> = None;
        let mut last_line: Option<(String, String)> = None;

        for line in reader.lines() {
            let line = line.map_err(|source| Error::Fetch {
                file: file_name.clone(),
                source,
            })?;
            let line_start = offset;
            let (id, domain) = parse_vertex_line(&file_name, &line)?;

            let due = last_emitted
                .map(|last| line_start.saturating_sub(last) >= VERTEX_STRIDE)
                .unwrap_or(true);
            if due {
                index.append([VertexEntry::new(
                    domain.clone(),
                    line_start,
                    id.clone(),
                    file_name.clone(),
                )]);
                last_emitted = Some(line_start);
            }

            offset += line.len() as u64 + 1;
            last_line = Some((id, domain));
        }

        if let Some((id, domain)) = last_line {
            index.append([VertexEntry::new(domain, offset, id, file_name)]);
        }
    }

    index.validate()?;
    Ok(index)
}

pub fn build_edge_index(folder: &Path) -> Result<EdgeIndex> {
    let mut index = EdgeIndex::new();

    for file_name in sorted_part_files(folder)? {
        let reader = open(folder, &file_name)?;

        let mut offset: u64 = 0;
        let mut last_emitted: Option<u64> = None;
        let mut last_from_id: Option<String> = None;

        for line in reader.lines() {
            let line = line.map_err(|source| Error::Fetch {
                file: file_name.clone(),
                source,
            })?;
            let line_start = offset;
            let from_id = parse_edge_line(&file_name, &line)?;

            let due = last_emitted
                .map(|last| line_start.saturating_sub(last) >= EDGE_STRIDE)
                .unwrap_or(true);
            if due {
                index.append([EdgeEntry::new(from_id.clone(), line_start, file_name.clone())]);
                last_emitted = Some(line_start);
            }

            offset += line.len() as u64 + 1;
            last_from_id = Some(from_id);
        }

        if let Some(from_id) = last_from_id {
            index.append([EdgeEntry::new(from_id, offset, file_name)]);
        }
    }

    index.validate()?;
    Ok(index)
}

fn open(folder: &Path, file_name: &str) -> Result<BufReader<fs::File>> {
    let path = folder.join(file_name);
    let file = fs::File::open(&path).map_err(|source| Error::Fetch {
        file: file_name.to_string(),
        source,
    })?;
    Ok(BufReader::new(file))
}

fn sorted_part_files(folder: &Path) -> Result<Vec<String>> {
    let read_dir = fs::read_dir(folder).map_err(|source| Error::Fetch {
        file: folder.display().to_string(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| Error::Fetch {
            file: folder.display().to_string(),
            source,
        })?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

fn parse_vertex_line(file_name: &str, line: &str) -> Result<(String, String)> {
    let mut fields = line.splitn(2, '\t');
    match (fields.next(), fields.next()) {
        (Some(id), Some(domain)) => Ok((id.to_string(), domain.to_string())),
        _ => Err(Error::MalformedLine {
            file: file_name.to_string(),
            line: line.to_string(),
        }),
    }
}

fn parse_edge_line(file_name: &str, line: &str) -> Result<String> {
    let mut fields = line.splitn(2, '\t');
    match (fields.next(), fields.next()) {
        (Some(from_id), Some(_to_id)) => Ok(from_id.to_string()),
        _ => Err(Error::MalformedLine {
            file: file_name.to_string(),
            line: line.to_string(),
        }),
    }
}
