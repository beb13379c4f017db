//! Importers for network weight tables and agent lists.
//!
//! ## Weight table layouts
//!
//! ```text
//! rows                         cols
//! i,    1,   1,   2,   2       i, j, net0, net1
//! j,    3,   4,   3,   4       1, 3, 1,5,  1
//! net0, 1,5, 2,   3,   0,5     1, 4, 2,    1
//! net1, 1,   1,   1,   1       ...
//! ```
//!
//! (decimal-comma weights are quoted in the actual files)

mod agents;
mod network_csv;

pub use agents::{
    parse_agents_csv, parse_agents_json, read_agents, read_agents_csv, read_agents_json,
};
pub use network_csv::{
    parse_network_instances, parse_node_label, parse_weight, validate_instances, NetworkInstance,
};

use mspp_core::{MsppError, MsppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Orientation of a weight table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Two header rows (origins, destinations), one instance per row
    #[default]
    Rows,
    /// One arc per row, one instance per column
    Cols,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Rows => "rows",
            Layout::Cols => "cols",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = MsppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "rows" | "row" => Ok(Layout::Rows),
            "cols" | "col" | "columns" => Ok(Layout::Cols),
            other => Err(MsppError::Parse(format!(
                "unknown layout '{}'; supported values: rows, cols",
                other
            ))),
        }
    }
}

/// Read every network instance of a weight table file.
pub fn read_network_instances(
    path: impl AsRef<Path>,
    layout: Layout,
) -> MsppResult<Vec<NetworkInstance>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        MsppError::Io(std::io::Error::new(
            e.kind(),
            format!("opening network file '{}': {}", path.display(), e),
        ))
    })?;
    let instances = parse_network_instances(BufReader::new(file), layout)?;
    debug!(
        path = %path.display(),
        layout = %layout,
        instances = instances.len(),
        "read network instances"
    );
    Ok(instances)
}
