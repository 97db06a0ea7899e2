//! Edge offset index: `(from_id, byte_offset, part_file_name)`.
//!
//! Unlike the vertex index, `from_id` is not unique and part-files are not
//! globally ordered against each other — every part-file independently
//! spans the whole id range, so a lookup must fan out across all of them.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use hostgraph_common::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeEntry {
    pub from_id: String,
    pub offset: u64,
    pub part_file: String,
}

impl EdgeEntry {
    pub fn new(from_id: impl Into<String>, offset: u64, part_file: impl Into<String>) -> Self {
        Self {
            from_id: from_id.into(),
            offset,
            part_file: part_file.into(),
        }
    }

    fn to_line(&self) -> String {
        format!("{}\t{}\t{}", self.from_id, self.offset, self.part_file)
    }

    fn parse(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.split('\t').collect();
        let [from_id, offset, part_file] = <[&str; 3]>::try_from(parts).map_err(|_| {
            Error::MalformedLine {
                file: "edge index".to_string(),
                line: line.to_string(),
            }
        })?;
        let offset: u64 = offset.parse().map_err(|_| Error::InvalidNumericField {
            file: "edge index".to_string(),
            value: offset.to_string(),
        })?;
        Ok(EdgeEntry::new(from_id, offset, part_file))
    }
}

/// A byte range `[from_offset, to_offset)` to scan in one part-file. A range
/// with `from_offset == to_offset` means "no data here, skip the fetch."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRange {
    pub part_file: String,
    pub from_offset: u64,
    pub to_offset: u64,
}

impl EdgeRange {
    pub fn is_empty(&self) -> bool {
        self.to_offset <= self.from_offset
    }

    pub fn len(&self) -> u64 {
        self.to_offset.saturating_sub(self.from_offset)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EdgeIndex {
    entries: Vec<EdgeEntry>,
}

impl EdgeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entries: impl IntoIterator<Item = EdgeEntry>) {
        self.entries.extend(entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn items(&self) -> &[EdgeEntry] {
        &self.entries
    }

    pub fn save(&self, mut writer: impl Write) -> Result<()> {
        for entry in &self.entries {
            writeln!(writer, "{}", entry.to_line()).map_err(|source| Error::Fetch {
                file: "edge index".to_string(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn load(reader: impl BufRead) -> Result<Self> {
        let mut index = EdgeIndex::new();
        for line in reader.lines() {
            let line = line.map_err(|source| Error::Fetch {
                file: "edge index".to_string(),
                source,
            })?;
            if line.is_empty() {
                continue;
            }
            index.entries.push(EdgeEntry::parse(&line)?);
        }
        Ok(index)
    }

    /// Within one part-file, offset strictly increases and from_id is
    /// non-decreasing; across part-files neither is constrained.
    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(Error::IndexValidation("no offsets found".into()));
        }

        let mut previous_offset: u64 = 0;
        let mut previous_file: Option<&str> = None;
        let mut previous_id: Option<u64> = None;

        for entry in &self.entries {
            if entry.part_file.is_empty() {
                return Err(Error::IndexValidation("empty part file name".into()));
            }
            if entry.from_id.is_empty() {
                return Err(Error::IndexValidation("empty from_id".into()));
            }
            let id: u64 = entry.from_id.parse().map_err(|_| Error::InvalidNumericField {
                file: "edge index".to_string(),
                value: entry.from_id.clone(),
            })?;

            let same_file = previous_file == Some(entry.part_file.as_str());
            if same_file {
                if entry.offset <= previous_offset {
                    return Err(Error::IndexValidation(format!(
                        "offset goes down: {}, previous {}",
                        entry.offset, previous_offset
                    )));
                }
                if let Some(prev_id) = previous_id {
                    if id < prev_id {
                        return Err(Error::IndexValidation(format!(
                            "from_id goes down within part file: {id}, previous {prev_id}"
                        )));
                    }
                }
            }

            previous_offset = entry.offset;
            previous_file = Some(entry.part_file.as_str());
            previous_id = Some(id);
        }
        Ok(())
    }

    /// Returns one range per known part-file. A `target` that fails to
    /// parse as an integer suppresses every file's contribution (each
    /// range comes back empty) rather than erroring — the id simply isn't
    /// found anywhere.
    pub fn ranges_for_from_id(&self, target: &str) -> Vec<EdgeRange> {
        let part_files = self.part_files_in_order();

        let Ok(target_id) = target.parse::<u64>() else {
            return part_files
                .into_iter()
                .map(|part_file| EdgeRange {
                    part_file,
                    from_offset: 0,
                    to_offset: 0,
                })
                .collect();
        };

        let grouped = self.group_by_part_file();
        part_files
            .into_iter()
            .map(|part_file| {
                let partition = grouped.get(part_file.as_str()).expect("grouped by part_files_in_order");
                range_within_partition(partition, target_id, part_file)
            })
            .collect()
    }

    fn part_files_in_order(&self) -> Vec<String> {
        let mut seen = BTreeMap::new();
        for (i, entry) in self.entries.iter().enumerate() {
            seen.entry(entry.part_file.clone()).or_insert(i);
        }
        let mut files: Vec<(String, usize)> = seen.into_iter().collect();
        files.sort_by_key(|(_, first_idx)| *first_idx);
        files.into_iter().map(|(name, _)| name).collect()
    }

    fn group_by_part_file(&self) -> BTreeMap<&str, Vec<&EdgeEntry>> {
        let mut groups: BTreeMap<&str, Vec<&EdgeEntry>> = BTreeMap::new();
        for entry in &self.entries {
            groups.entry(entry.part_file.as_str()).or_default().push(entry);
        }
        groups
    }
}

fn range_within_partition(partition: &[&EdgeEntry], target: u64, part_file: String) -> EdgeRange {
    let id_of = |e: &&EdgeEntry| e.from_id.parse::<u64>().unwrap_or(u64::MAX);

    // `from` must be the last entry whose from_id is *strictly less than*
    // target, not `<=`. A from_id can straddle a stride boundary (the same
    // id sampled at more than one offset), so if we started from the
    // sampled entry equal to target we'd skip that id's earlier occurrences
    // sitting just before the sample point. Starting one entry further back
    // — the last entry guaranteed to precede every occurrence of target —
    // keeps the scan complete.
    let lower = partition.partition_point(|e| id_of(e) < target);
    let from_idx = lower.saturating_sub(1);

    // `to` is the first entry whose from_id exceeds target; when nothing
    // does (target ties or exceeds the file's maximum), clamp to the last
    // entry so the scan still reaches end-of-file.
    let upper = partition.partition_point(|e| id_of(e) <= target);
    let to_idx = upper.min(partition.len() - 1);

    EdgeRange {
        part_file,
        from_offset: partition[from_idx].offset,
        to_offset: partition[to_idx].offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EdgeIndex {
        let mut idx = EdgeIndex::new();
        idx.append([
            EdgeEntry::new("0", 0, "part0.txt"),
            EdgeEntry::new("500", 131072, "part0.txt"),
            EdgeEntry::new("999", 200000, "part0.txt"), // terminal
            EdgeEntry::new("10", 0, "part1.txt"),
            EdgeEntry::new("800", 131072, "part1.txt"),
            EdgeEntry::new("1200", 180000, "part1.txt"), // terminal
        ]);
        idx
    }

    #[test]
    fn validates_per_file_monotone_index() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn rejects_offset_going_down_within_file() {
        let mut idx = EdgeIndex::new();
        idx.append([
            EdgeEntry::new("0", 100, "part0.txt"),
            EdgeEntry::new("5", 50, "part0.txt"),
        ]);
        assert!(idx.validate().is_err());
    }

    #[test]
    fn allows_from_id_reset_across_part_files() {
        let mut idx = EdgeIndex::new();
        idx.append([
            EdgeEntry::new("900", 0, "part0.txt"),
            EdgeEntry::new("10", 0, "part1.txt"),
        ]);
        assert!(idx.validate().is_ok());
    }

    #[test]
    fn rejects_from_id_going_down_within_file() {
        let mut idx = EdgeIndex::new();
        idx.append([
            EdgeEntry::new("900", 0, "part0.txt"),
            EdgeEntry::new("10", 100, "part0.txt"),
        ]);
        assert!(idx.validate().is_err());
    }

    #[test]
    fn interior_target_brackets_one_stride() {
        let idx = sample();
        let ranges = idx.ranges_for_from_id("600");
        let part0 = ranges.iter().find(|r| r.part_file == "part0.txt").unwrap();
        assert_eq!((part0.from_offset, part0.to_offset), (131072, 200000));
        let part1 = ranges.iter().find(|r| r.part_file == "part1.txt").unwrap();
        assert_eq!((part1.from_offset, part1.to_offset), (0, 131072));
    }

    #[test]
    fn below_first_entry_is_empty() {
        let idx = sample();
        let ranges = idx.ranges_for_from_id("5");
        let part1 = ranges.iter().find(|r| r.part_file == "part1.txt").unwrap();
        assert!(part1.is_empty());
    }

    #[test]
    fn exact_terminal_match_still_yields_nonempty_range() {
        let idx = sample();
        let ranges = idx.ranges_for_from_id("999");
        let part0 = ranges.iter().find(|r| r.part_file == "part0.txt").unwrap();
        assert!(!part0.is_empty());
        assert_eq!((part0.from_offset, part0.to_offset), (131072, 200000));
    }

    #[test]
    fn exact_sample_hit_starts_from_the_prior_entry() {
        // Mirrors the original source's offset_test.go fixture: a target
        // that lands exactly on a sampled from_id must start its scan from
        // the *previous* entry, not from the sampled entry itself, because
        // occurrences of that from_id can begin earlier than the sample
        // point when a run straddles a stride boundary.
        let mut idx = EdgeIndex::new();
        idx.append([
            EdgeEntry::new("75", 0, "part0.txt"),
            EdgeEntry::new("96033", 1_048_590, "part0.txt"),
            EdgeEntry::new("200000", 2_097_167, "part0.txt"), // terminal
        ]);
        let ranges = idx.ranges_for_from_id("96033");
        let part0 = ranges.iter().find(|r| r.part_file == "part0.txt").unwrap();
        assert_eq!((part0.from_offset, part0.to_offset), (0, 2_097_167));
    }

    #[test]
    fn non_integer_target_suppresses_every_file() {
        let idx = sample();
        let ranges = idx.ranges_for_from_id("not-a-number");
        assert!(ranges.iter().all(|r| r.is_empty()));
        assert_eq!(ranges.len(), 2);
    }

    #[test]
    fn save_and_load_round_trip() {
        let idx = sample();
        let mut buf = Vec::new();
        idx.save(&mut buf).unwrap();
        let loaded = EdgeIndex::load(std::io::Cursor::new(buf)).unwrap();
        assert_eq!(loaded.items(), idx.items());
    }
}
