//! Network instances stored as weight tables.
//!
//! Every instance of a file shares one arc set and differs only in weights.
//! Node labels are 1-based in the file and shifted to 0-based ids; weights
//! may use a decimal comma (`"1,5"`).

use super::Layout;
use mspp_core::{Diagnostics, MsppError, MsppResult, Network, NodeId};
use std::collections::BTreeSet;
use std::io::Read;

/// One weighted network read from a multi-instance file.
#[derive(Debug, Clone)]
pub struct NetworkInstance {
    pub label: String,
    pub network: Network,
}

/// Parse a weight, accepting a decimal comma.
pub fn parse_weight(cell: &str) -> MsppResult<f64> {
    let normalized = cell.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .map_err(|_| MsppError::Parse(format!("invalid weight '{}'", cell)))
}

/// Parse a 1-based node label into a 0-based node id.
pub fn parse_node_label(cell: &str) -> MsppResult<NodeId> {
    let trimmed = cell.trim();
    // pandas writes integer headers as "3" or "3.0"
    let label = trimmed
        .parse::<usize>()
        .ok()
        .or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.fract() == 0.0 && *v >= 0.0)
                .map(|v| v as usize)
        })
        .ok_or_else(|| MsppError::Parse(format!("invalid node label '{}'", cell)))?;
    if label == 0 {
        return Err(MsppError::Parse(
            "node labels are 1-based; found 0".to_string(),
        ));
    }
    Ok(NodeId::new(label - 1))
}

fn records<R: Read>(reader: R) -> MsppResult<Vec<csv::StringRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| MsppError::Parse(format!("line {}: {}", line + 1, e)))?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        rows.push(record);
    }
    Ok(rows)
}

/// Arc endpoints plus one weight vector per instance label.
struct WeightTable {
    arcs: Vec<(NodeId, NodeId)>,
    instances: Vec<(String, Vec<f64>)>,
}

fn rows_layout(rows: &[csv::StringRecord]) -> MsppResult<WeightTable> {
    if rows.len() < 2 {
        return Err(MsppError::Parse(
            "rows layout needs an origin row and a destination row".to_string(),
        ));
    }
    let origins: Vec<NodeId> = rows[0]
        .iter()
        .skip(1)
        .map(parse_node_label)
        .collect::<MsppResult<_>>()?;
    let destinations: Vec<NodeId> = rows[1]
        .iter()
        .skip(1)
        .map(parse_node_label)
        .collect::<MsppResult<_>>()?;
    if origins.len() != destinations.len() {
        return Err(MsppError::Parse(format!(
            "{} origins but {} destinations",
            origins.len(),
            destinations.len()
        )));
    }
    let arcs: Vec<(NodeId, NodeId)> = origins.into_iter().zip(destinations).collect();

    let mut instances = Vec::new();
    let mut labels = BTreeSet::new();
    for (offset, row) in rows[2..].iter().enumerate() {
        let line = offset + 3;
        let label = row.get(0).unwrap_or_default().to_string();
        if label.is_empty() {
            return Err(MsppError::Parse(format!("line {}: missing instance label", line)));
        }
        if !labels.insert(label.clone()) {
            return Err(MsppError::Parse(format!(
                "line {}: duplicate instance label '{}'",
                line, label
            )));
        }
        let weights: Vec<f64> = row
            .iter()
            .skip(1)
            .map(parse_weight)
            .collect::<MsppResult<_>>()
            .map_err(|e| MsppError::Parse(format!("line {}: {}", line, e)))?;
        if weights.len() != arcs.len() {
            return Err(MsppError::Parse(format!(
                "line {}: {} weights for {} arcs",
                line,
                weights.len(),
                arcs.len()
            )));
        }
        instances.push((label, weights));
    }
    Ok(WeightTable { arcs, instances })
}

fn cols_layout(rows: &[csv::StringRecord]) -> MsppResult<WeightTable> {
    let Some(header) = rows.first() else {
        return Err(MsppError::Parse("empty file".to_string()));
    };
    if header.len() < 3 {
        return Err(MsppError::Parse(
            "cols layout needs 'i, j' and at least one instance column".to_string(),
        ));
    }
    let labels: Vec<String> = header.iter().skip(2).map(str::to_string).collect();
    let mut seen = BTreeSet::new();
    for (offset, label) in labels.iter().enumerate() {
        let column = offset + 3;
        if label.is_empty() {
            return Err(MsppError::Parse(format!(
                "line 1, column {}: missing instance label",
                column
            )));
        }
        if !seen.insert(label.as_str()) {
            return Err(MsppError::Parse(format!(
                "line 1, column {}: duplicate instance label '{}'",
                column, label
            )));
        }
    }
    let mut weights = vec![Vec::new(); labels.len()];
    let mut arcs = Vec::new();

    for (offset, row) in rows[1..].iter().enumerate() {
        let line = offset + 2;
        if row.len() != header.len() {
            return Err(MsppError::Parse(format!(
                "line {}: expected {} cells, found {}",
                line,
                header.len(),
                row.len()
            )));
        }
        let at_line = |e: MsppError| MsppError::Parse(format!("line {}: {}", line, e));
        let origin = parse_node_label(&row[0]).map_err(at_line)?;
        let destination = parse_node_label(&row[1]).map_err(at_line)?;
        arcs.push((origin, destination));
        for (column, cell) in row.iter().skip(2).enumerate() {
            weights[column].push(parse_weight(cell).map_err(at_line)?);
        }
    }
    Ok(WeightTable {
        arcs,
        instances: labels.into_iter().zip(weights).collect(),
    })
}

/// Parse every instance of a weight table.
pub fn parse_network_instances<R: Read>(
    reader: R,
    layout: Layout,
) -> MsppResult<Vec<NetworkInstance>> {
    let rows = records(reader)?;
    let table = match layout {
        Layout::Rows => rows_layout(&rows)?,
        Layout::Cols => cols_layout(&rows)?,
    };

    let mut seen = BTreeSet::new();
    for (idx, arc) in table.arcs.iter().enumerate() {
        if !seen.insert(*arc) {
            return Err(MsppError::invalid_arc(
                idx,
                format!("duplicate arc {} -> {}", arc.0, arc.1),
            ));
        }
    }
    let nodes: Vec<NodeId> = table
        .arcs
        .iter()
        .flat_map(|(i, j)| [*i, *j])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    table
        .instances
        .into_iter()
        .map(|(label, weights)| -> MsppResult<NetworkInstance> {
            let arcs = table
                .arcs
                .iter()
                .zip(weights)
                .map(|((i, j), w)| (*i, *j, w));
            let network = Network::new(nodes.clone(), arcs)
                .map_err(|e| MsppError::Validation(format!("instance '{}': {}", label, e)))?;
            Ok(NetworkInstance { label, network })
        })
        .collect()
}

/// Check every instance, collecting structural warnings.
pub fn validate_instances(instances: &[NetworkInstance]) -> Diagnostics {
    let mut diag = Diagnostics::new();
    if instances.is_empty() {
        diag.add_error("structure", "File contains no network instance");
    }
    for instance in instances {
        let mut local = Diagnostics::new();
        instance.network.validate_into(&mut local);
        for mut issue in local.issues {
            issue.message = format!("[{}] {}", instance.label, issue.message);
            diag.add(issue);
        }
    }
    diag
}
