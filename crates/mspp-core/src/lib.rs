//! # mspp-core: Network and Agent Data Model
//!
//! Provides the entities every multi-agent shortest path formulation operates on.
//!
//! ## Design
//!
//! A network instance is a **directed graph** where:
//! - **Nodes** are opaque integer identifiers ([`NodeId`])
//! - **Arcs** are weighted directed edges ([`WeightedArc`]) with a dense index ([`ArcId`])
//!
//! Arc and agent indices are used directly as rows/columns of the decision
//! variable matrices, so they must be dense and stable:
//! - arcs are numbered `0..|arcs|` in enumeration order when the network is built
//! - agents are numbered `0..|agents|` by the caller (or by an importer/generator)
//!
//! ## Quick Start
//!
//! ```rust
//! use mspp_core::*;
//!
//! // 2x2 layered grid: nodes 0,1 on the left, 2,3 on the right
//! let network = Network::from_weighted_pairs([
//!     (0, 2, 1.0),
//!     (0, 3, 1.0),
//!     (1, 2, 1.0),
//!     (1, 3, 1.0),
//! ])
//! .unwrap();
//!
//! let agents = vec![Agent::new(0, 3, 0), Agent::new(1, 2, 1)];
//! network.validate_agents(&agents).unwrap();
//! assert_eq!(network.num_arcs(), 4);
//! ```
//!
//! ## Modules
//!
//! - [`diagnostics`] - Validation and diagnostic reporting
//! - [`graph_utils`] - Topological queries (reachability, stats, DOT export)
//! - [`topology`] - Layered grid generator used by the paper's instances

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod diagnostics;
pub mod error;
pub mod graph_utils;
pub mod topology;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{MsppError, MsppResult};
pub use graph_utils::*;
pub use topology::{layered_grid, GridShape};

// Newtype wrappers for IDs for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArcId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(usize);

impl NodeId {
    #[inline]
    pub fn new(value: usize) -> Self {
        NodeId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl ArcId {
    #[inline]
    pub fn new(value: usize) -> Self {
        ArcId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl AgentId {
    #[inline]
    pub fn new(value: usize) -> Self {
        AgentId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A weighted directed arc of a network instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedArc {
    pub origin: NodeId,
    pub destination: NodeId,
    /// Traversal cost (e.g. distance); strictly positive
    pub weight: f64,
    /// Dense index within the owning network
    pub id: ArcId,
}

impl WeightedArc {
    pub fn new(origin: usize, destination: usize, weight: f64, id: usize) -> Self {
        Self {
            origin: NodeId(origin),
            destination: NodeId(destination),
            weight,
            id: ArcId(id),
        }
    }

    /// True if `node` is one of the two endpoints.
    #[inline]
    pub fn touches(&self, node: NodeId) -> bool {
        self.origin == node || self.destination == node
    }
}

/// One routing demand: an agent that must travel from `source` to `terminus`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Agent {
    pub source: NodeId,
    pub terminus: NodeId,
    /// Dense index within the agent set
    pub id: AgentId,
}

impl Agent {
    pub fn new(source: usize, terminus: usize, id: usize) -> Self {
        Self {
            source: NodeId(source),
            terminus: NodeId(terminus),
            id: AgentId(id),
        }
    }
}

/// A network instance: node set plus densely indexed weighted arcs.
///
/// Immutable after construction. The petgraph mirror is kept for topological
/// queries; its node indices line up with [`Network::node_position`].
#[derive(Debug, Clone)]
pub struct Network {
    nodes: Vec<NodeId>,
    arcs: Vec<WeightedArc>,
    positions: HashMap<NodeId, usize>,
    pub graph: DiGraph<NodeId, ArcId>,
}

impl Network {
    /// Build a network from an explicit node list and arc endpoints/weights.
    ///
    /// Arcs are enumerated in iteration order starting at 0. Fails with
    /// [`MsppError::InvalidArc`] for unknown endpoints, self-loops, or weights
    /// that are not strictly positive and finite (the formulations rely on
    /// positive weights instead of explicit cycle elimination).
    pub fn new<I>(nodes: Vec<NodeId>, arcs: I) -> MsppResult<Self>
    where
        I: IntoIterator<Item = (NodeId, NodeId, f64)>,
    {
        let mut positions = HashMap::with_capacity(nodes.len());
        let mut graph = DiGraph::with_capacity(nodes.len(), 0);
        for (position, node) in nodes.iter().enumerate() {
            if positions.insert(*node, position).is_some() {
                return Err(MsppError::Validation(format!(
                    "node {} declared more than once",
                    node
                )));
            }
            graph.add_node(*node);
        }

        let mut weighted = Vec::new();
        for (idx, (origin, destination, weight)) in arcs.into_iter().enumerate() {
            let from = *positions.get(&origin).ok_or_else(|| {
                MsppError::invalid_arc(idx, format!("origin {} is not a network node", origin))
            })?;
            let to = *positions.get(&destination).ok_or_else(|| {
                MsppError::invalid_arc(
                    idx,
                    format!("destination {} is not a network node", destination),
                )
            })?;
            if origin == destination {
                return Err(MsppError::invalid_arc(idx, "self-loop"));
            }
            if !weight.is_finite() || weight <= 0.0 {
                return Err(MsppError::invalid_arc(
                    idx,
                    format!("weight {} must be positive and finite", weight),
                ));
            }
            graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), ArcId(idx));
            weighted.push(WeightedArc {
                origin,
                destination,
                weight,
                id: ArcId(idx),
            });
        }

        Ok(Self {
            nodes,
            arcs: weighted,
            positions,
            graph,
        })
    }

    /// Build a network whose node set is the sorted union of arc endpoints.
    pub fn from_weighted_pairs<I>(pairs: I) -> MsppResult<Self>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let arcs: Vec<(NodeId, NodeId, f64)> = pairs
            .into_iter()
            .map(|(i, j, w)| (NodeId(i), NodeId(j), w))
            .collect();
        let mut nodes: Vec<NodeId> = arcs.iter().flat_map(|(i, j, _)| [*i, *j]).collect();
        nodes.sort();
        nodes.dedup();
        Self::new(nodes, arcs)
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn arcs(&self) -> &[WeightedArc] {
        &self.arcs
    }

    pub fn arc(&self, id: ArcId) -> Option<&WeightedArc> {
        self.arcs.get(id.0)
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    /// Dense position of a node (row index of node-based variable blocks).
    pub fn node_position(&self, node: NodeId) -> Option<usize> {
        self.positions.get(&node).copied()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.positions.contains_key(&node)
    }

    /// Arcs leaving `node`.
    pub fn outgoing(&self, node: NodeId) -> impl Iterator<Item = &WeightedArc> {
        self.arcs.iter().filter(move |arc| arc.origin == node)
    }

    /// Arcs entering `node`.
    pub fn incoming(&self, node: NodeId) -> impl Iterator<Item = &WeightedArc> {
        self.arcs.iter().filter(move |arc| arc.destination == node)
    }

    /// Check every agent against this network.
    ///
    /// Rejects an empty agent set, degenerate agents (source == terminus),
    /// endpoints that are not nodes of the network, and agent indices that
    /// are not a dense permutation of `0..agents.len()`.
    pub fn validate_agents(&self, agents: &[Agent]) -> MsppResult<()> {
        if agents.is_empty() {
            return Err(MsppError::EmptyAgentSet);
        }
        let mut seen = vec![false; agents.len()];
        for agent in agents {
            let idx = agent.id.value();
            if idx >= agents.len() {
                return Err(MsppError::invalid_agent(
                    idx,
                    format!("index out of range 0..{}", agents.len()),
                ));
            }
            if std::mem::replace(&mut seen[idx], true) {
                return Err(MsppError::invalid_agent(idx, "duplicate index"));
            }
            if agent.source == agent.terminus {
                return Err(MsppError::invalid_agent(
                    idx,
                    format!("source equals terminus ({})", agent.source),
                ));
            }
            if !self.contains_node(agent.source) {
                return Err(MsppError::invalid_agent(
                    idx,
                    format!("source {} is not a network node", agent.source),
                ));
            }
            if !self.contains_node(agent.terminus) {
                return Err(MsppError::invalid_agent(
                    idx,
                    format!("terminus {} is not a network node", agent.terminus),
                ));
            }
        }
        Ok(())
    }

    /// Compute basic statistics about the network
    pub fn stats(&self) -> NetworkStats {
        NetworkStats {
            num_nodes: self.nodes.len(),
            num_arcs: self.arcs.len(),
            total_weight: self.arcs.iter().map(|a| a.weight).sum(),
            min_weight: self
                .arcs
                .iter()
                .map(|a| a.weight)
                .fold(None, |acc: Option<f64>, w| Some(acc.map_or(w, |m| m.min(w)))),
            max_weight: self
                .arcs
                .iter()
                .map(|a| a.weight)
                .fold(None, |acc: Option<f64>, w| Some(acc.map_or(w, |m| m.max(w)))),
        }
    }

    /// Validate network structure for issues that make every formulation infeasible
    /// or degenerate. Populates the provided `Diagnostics`.
    pub fn validate_into(&self, diag: &mut Diagnostics) {
        if self.nodes.is_empty() {
            diag.add_error("structure", "Network has no nodes");
            return;
        }
        if self.arcs.is_empty() {
            diag.add_error("structure", "Network has nodes but no arcs");
            return;
        }
        for node in &self.nodes {
            if !self.arcs.iter().any(|arc| arc.touches(*node)) {
                diag.add_warning_with_entity(
                    "structure",
                    "Node is not incident to any arc",
                    &format!("Node {}", node),
                );
            }
        }
    }

    /// Report agents whose terminus cannot be reached from their source.
    pub fn validate_agents_into(&self, agents: &[Agent], diag: &mut Diagnostics) {
        for agent in agents {
            if !self.contains_node(agent.source) || !self.contains_node(agent.terminus) {
                diag.add_error_with_entity(
                    "reference",
                    "Agent references a node outside the network",
                    &format!("Agent {}", agent.id.value()),
                );
                continue;
            }
            if agent.source != agent.terminus && !has_route(self, agent.source, agent.terminus) {
                diag.add_error_with_entity(
                    "reachability",
                    &format!("No directed path from {} to {}", agent.source, agent.terminus),
                    &format!("Agent {}", agent.id.value()),
                );
            }
        }
    }
}

/// Summary statistics for a network instance
#[derive(Debug, Clone, Default, Serialize)]
pub struct NetworkStats {
    pub num_nodes: usize,
    pub num_arcs: usize,
    pub total_weight: f64,
    pub min_weight: Option<f64>,
    pub max_weight: Option<f64>,
}

impl std::fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} nodes, {} arcs", self.num_nodes, self.num_arcs)?;
        if let (Some(min), Some(max)) = (self.min_weight, self.max_weight) {
            write!(f, ", weights {:.3}..{:.3}", min, max)?;
        }
        Ok(())
    }
}
