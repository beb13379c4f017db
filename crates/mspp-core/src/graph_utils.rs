use crate::{ArcId, MsppError, MsppResult, Network, NodeId};
use petgraph::algo::{has_path_connecting, tarjan_scc};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashSet;

/// Summary statistics produced by `mspp inspect` (density/degree/strong components).
#[derive(Debug)]
pub struct GraphStats {
    pub node_count: usize,
    pub arc_count: usize,
    pub strongly_connected_components: usize,
    pub min_out_degree: usize,
    pub avg_out_degree: f64,
    pub max_out_degree: usize,
    pub density: f64,
}

/// Calculates directed graph statistics: out-degree distribution, density and
/// the number of strongly connected components.
pub fn graph_stats(network: &Network) -> GraphStats {
    let node_count = network.graph.node_count();
    let arc_count = network.graph.edge_count();
    let degrees: Vec<usize> = network
        .graph
        .node_indices()
        .map(|node| {
            network
                .graph
                .neighbors_directed(node, Direction::Outgoing)
                .count()
        })
        .collect();
    let min_out_degree = *degrees.iter().min().unwrap_or(&0);
    let max_out_degree = *degrees.iter().max().unwrap_or(&0);
    let avg_out_degree = if node_count == 0 {
        0.0
    } else {
        arc_count as f64 / node_count as f64
    };
    let density = if node_count < 2 {
        0.0
    } else {
        arc_count as f64 / (node_count as f64 * (node_count as f64 - 1.0))
    };
    GraphStats {
        node_count,
        arc_count,
        strongly_connected_components: tarjan_scc(&network.graph).len(),
        min_out_degree,
        avg_out_degree,
        max_out_degree,
        density,
    }
}

/// True if a directed path leads from `from` to `to`.
pub fn has_route(network: &Network, from: NodeId, to: NodeId) -> bool {
    match (network.node_position(from), network.node_position(to)) {
        (Some(a), Some(b)) => has_path_connecting(
            &network.graph,
            NodeIndex::new(a),
            NodeIndex::new(b),
            None,
        ),
        _ => false,
    }
}

/// Export the topology to a DOT string (Graphviz); arcs listed in any of the
/// `highlighted` routes are drawn bold and labeled with their route number.
pub fn export_graph(
    network: &Network,
    format: &str,
    highlighted: &[Vec<ArcId>],
) -> MsppResult<String> {
    match format.to_ascii_lowercase().as_str() {
        "graphviz" | "dot" => Ok(render_dot(network, highlighted)),
        other => Err(MsppError::Validation(format!(
            "unsupported graph export format '{other}'"
        ))),
    }
}

/// DOT text for `network`, routes drawn bold.
pub fn render_dot(network: &Network, highlighted: &[Vec<ArcId>]) -> String {
    let mut buffer = String::new();
    buffer.push_str("digraph mspp_network {\n");
    for node in network.graph.node_indices() {
        buffer.push_str(&format!(
            "  n{} [label=\"{}\"];\n",
            node.index(),
            network.graph[node]
        ));
    }
    let route_sets: Vec<HashSet<ArcId>> = highlighted
        .iter()
        .map(|route| route.iter().copied().collect())
        .collect();
    for edge in network.graph.edge_references() {
        let source = edge.source().index();
        let target = edge.target().index();
        let arc = *edge.weight();
        let weight = network.arc(arc).map(|a| a.weight).unwrap_or_default();
        let routes: Vec<String> = route_sets
            .iter()
            .enumerate()
            .filter(|(_, set)| set.contains(&arc))
            .map(|(i, _)| i.to_string())
            .collect();
        if routes.is_empty() {
            buffer.push_str(&format!("  n{source} -> n{target} [label=\"{weight}\"];\n"));
        } else {
            buffer.push_str(&format!(
                "  n{source} -> n{target} [label=\"{weight} ({})\", style=bold];\n",
                routes.join(",")
            ));
        }
    }
    buffer.push('}');
    buffer
}
