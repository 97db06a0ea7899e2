//! Vertex offset index: `(reversed_domain, byte_offset, id, part_file_name)`.

use std::io::{BufRead, Write};

use hostgraph_common::{Error, Result};

use crate::bracket::{bracket_lookup, Bracket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexEntry {
    pub reversed_domain: String,
    pub offset: u64,
    pub id: String,
    pub part_file: String,
}

impl VertexEntry {
    pub fn new(
        reversed_domain: impl Into<String>,
        offset: u64,
        id: impl Into<String>,
        part_file: impl Into<String>,
    ) -> Self {
        Self {
            reversed_domain: reversed_domain.into(),
            offset,
            id: id.into(),
            part_file: part_file.into(),
        }
    }

    fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.reversed_domain, self.offset, self.id, self.part_file
        )
    }

    fn parse(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.split('\t').collect();
        let [domain, offset, id, part_file] = <[&str; 4]>::try_from(parts).map_err(|_| {
            Error::MalformedLine {
                file: "vertex index".to_string(),
                line: line.to_string(),
            }
        })?;
        let offset: u64 = offset.parse().map_err(|_| Error::InvalidNumericField {
            file: "vertex index".to_string(),
            value: offset.to_string(),
        })?;
        Ok(VertexEntry::new(domain, offset, id, part_file))
    }
}

#[derive(Debug, Clone, Default)]
pub struct VertexIndex {
    entries: Vec<VertexEntry>,
}

impl VertexIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entries: impl IntoIterator<Item = VertexEntry>) {
        self.entries.extend(entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn items(&self) -> &[VertexEntry] {
        &self.entries
    }

    pub fn save(&self, mut writer: impl Write) -> Result<()> {
        for entry in &self.entries {
            writeln!(writer, "{}", entry.to_line()).map_err(|source| Error::Fetch {
                file: "vertex index".to_string(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn load(reader: impl BufRead) -> Result<Self> {
        let mut index = VertexIndex::new();
        for line in reader.lines() {
            let line = line.map_err(|source| Error::Fetch {
                file: "vertex index".to_string(),
                source,
            })?;
            if line.is_empty() {
                continue;
            }
            index.entries.push(VertexEntry::parse(&line)?);
        }
        Ok(index)
    }

    /// Enforces every invariant in one pass; aborts (without partial commit
    /// to the caller, since `self` is left untouched on error) at the first
    /// violation.
    pub fn validate(&self) -> Result<()> {
        let mut previous_offset: u64 = 0;
        let mut previous_file: Option<&str> = None;
        let mut previous_domain: Option<&str> = None;
        let mut previous_id: Option<u64> = None;

        for entry in &self.entries {
            if entry.part_file.is_empty() {
                return Err(Error::IndexValidation("empty part file name".into()));
            }
            if previous_file == Some(entry.part_file.as_str()) && entry.offset <= previous_offset {
                return Err(Error::IndexValidation(format!(
                    "offset goes down: {}, previous {}",
                    entry.offset, previous_offset
                )));
            }
            previous_offset = entry.offset;
            previous_file = Some(entry.part_file.as_str());

            if entry.reversed_domain.is_empty() {
                return Err(Error::IndexValidation("empty domain".into()));
            }
            if let Some(prev) = previous_domain {
                if entry.reversed_domain.as_str() <= prev {
                    return Err(Error::IndexValidation(format!(
                        "domain goes down: {}, previous {}",
                        entry.reversed_domain, prev
                    )));
                }
            }
            previous_domain = Some(entry.reversed_domain.as_str());

            if entry.id.is_empty() {
                return Err(Error::IndexValidation("empty id".into()));
            }
            let id: u64 = entry.id.parse().map_err(|_| Error::InvalidNumericField {
                file: "vertex index".to_string(),
                value: entry.id.clone(),
            })?;
            if let Some(prev) = previous_id {
                if id <= prev {
                    return Err(Error::IndexValidation(format!(
                        "id goes down: {id}, previous {prev}"
                    )));
                }
            }
            previous_id = Some(id);
        }

        if self.entries.is_empty() {
            return Err(Error::IndexValidation("no offsets found".into()));
        }
        Ok(())
    }

    pub fn bracket_for_domain(&self, domain: &str) -> Bracket<&VertexEntry> {
        bracket_lookup(&self.entries, |e| e.reversed_domain.as_str(), &domain)
    }

    pub fn bracket_for_id(&self, id: u64) -> Result<Bracket<&VertexEntry>> {
        // The entries are sorted by domain, and by the dataset invariant
        // (ids assigned in sorted-domain order) that also sorts them by id,
        // so the same slice can be binary searched on either key.
        let keyed: Vec<(u64, &VertexEntry)> = self
            .entries
            .iter()
            .map(|e| {
                e.id.parse::<u64>()
                    .map(|parsed| (parsed, e))
                    .map_err(|_| Error::InvalidNumericField {
                        file: "vertex index".to_string(),
                        value: e.id.clone(),
                    })
            })
            .collect::<Result<_>>()?;

        Ok(match bracket_lookup(&keyed, |(k, _)| *k, &id) {
            Bracket::Exact((_, entry)) => Bracket::Exact(*entry),
            Bracket::Between { low, high } => Bracket::Between {
                low: low.map(|(_, e)| *e),
                high: high.map(|(_, e)| *e),
            },
        })
    }
}
