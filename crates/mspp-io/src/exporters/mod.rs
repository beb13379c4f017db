//! JSON and DOT writers for agents and solutions.

pub mod metadata;

pub use metadata::ExportMetadata;

use mspp_core::{export_graph, Agent, ArcId, MsppError, MsppResult, Network};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// A solution report wrapped with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionDocument<T> {
    pub metadata: ExportMetadata,
    pub solution: T,
}

fn create(path: &Path) -> MsppResult<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path).map_err(|e| {
        MsppError::Io(std::io::Error::new(
            e.kind(),
            format!("creating '{}': {}", path.display(), e),
        ))
    })?;
    Ok(BufWriter::new(file))
}

/// Pretty-print any serializable value to `path`, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> MsppResult<()> {
    let mut writer = create(path.as_ref())?;
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| MsppError::Parse(format!("serializing JSON: {}", e)))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write a solution report together with its metadata.
pub fn write_solution_json<T: Serialize>(
    path: impl AsRef<Path>,
    solution: &T,
    metadata: &ExportMetadata,
) -> MsppResult<()> {
    write_json(
        path,
        &SolutionDocument {
            metadata: metadata.clone(),
            solution,
        },
    )
}

/// Write agents in the JSON form read back by `read_agents_json`.
pub fn write_agents_json(path: impl AsRef<Path>, agents: &[Agent]) -> MsppResult<()> {
    write_json(path, agents)
}

/// Render the network with the given routes highlighted as Graphviz DOT.
pub fn write_dot(
    path: impl AsRef<Path>,
    network: &Network,
    routes: &[Vec<ArcId>],
) -> MsppResult<()> {
    let dot = export_graph(network, "dot", routes)?;
    let mut writer = create(path.as_ref())?;
    writer.write_all(dot.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importers::read_agents_json;

    #[test]
    fn agents_written_as_json_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/agents.json");
        let agents = vec![Agent::new(0, 3, 0), Agent::new(1, 2, 1)];
        write_agents_json(&path, &agents).unwrap();
        assert_eq!(read_agents_json(&path).unwrap(), agents);
    }

    #[test]
    fn solution_document_carries_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solution.json");
        let metadata = ExportMetadata::now().with_source("grid.csv", "net0");
        write_solution_json(&path, &serde_json::json!({"objectives": [2.0, 0.0]}), &metadata)
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["metadata"]["instance"], "net0");
        assert_eq!(raw["solution"]["objectives"][1], 0.0);
    }
}
