//! Agent lists from JSON or CSV.
//!
//! Node ids in agent files are already 0-based (the form written by
//! `mspp agents generate`). A missing `id` takes the record's position.

use mspp_core::{Agent, AgentId, MsppError, MsppResult, NodeId};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct AgentRecord {
    source: usize,
    terminus: usize,
    #[serde(default)]
    id: Option<usize>,
}

fn into_agents(records: Vec<AgentRecord>) -> Vec<Agent> {
    records
        .into_iter()
        .enumerate()
        .map(|(position, record)| Agent {
            source: NodeId::new(record.source),
            terminus: NodeId::new(record.terminus),
            id: AgentId::new(record.id.unwrap_or(position)),
        })
        .collect()
}

fn open(path: &Path) -> MsppResult<BufReader<File>> {
    let file = File::open(path).map_err(|e| {
        MsppError::Io(std::io::Error::new(
            e.kind(),
            format!("opening agents file '{}': {}", path.display(), e),
        ))
    })?;
    Ok(BufReader::new(file))
}

/// Parse a JSON array of `{ "source", "terminus", "id"? }` objects.
pub fn parse_agents_json<R: Read>(reader: R) -> MsppResult<Vec<Agent>> {
    let records: Vec<AgentRecord> = serde_json::from_reader(reader)
        .map_err(|e| MsppError::Parse(format!("agents JSON: {}", e)))?;
    Ok(into_agents(records))
}

/// Parse CSV with header `source,terminus[,id]`.
pub fn parse_agents_csv<R: Read>(reader: R) -> MsppResult<Vec<Agent>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    for (row, record) in reader.deserialize::<AgentRecord>().enumerate() {
        // header is line 1
        let record = record.map_err(|e| MsppError::Parse(format!("line {}: {}", row + 2, e)))?;
        records.push(record);
    }
    Ok(into_agents(records))
}

pub fn read_agents_json(path: impl AsRef<Path>) -> MsppResult<Vec<Agent>> {
    parse_agents_json(open(path.as_ref())?)
}

pub fn read_agents_csv(path: impl AsRef<Path>) -> MsppResult<Vec<Agent>> {
    parse_agents_csv(open(path.as_ref())?)
}

/// Read agents, choosing the parser from the file extension (`.csv` or JSON).
pub fn read_agents(path: impl AsRef<Path>) -> MsppResult<Vec<Agent>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        read_agents_csv(path)
    } else {
        read_agents_json(path)
    }
}
