//! Typed views over variable blocks.
//!
//! Each view maps domain indices (`ArcId`, node position, `AgentId`) to the
//! scalar [`VarId`] the model uses, so builders and reporting code never do
//! offset arithmetic by hand.

use super::model::{VarBlock, VarId};
use mspp_core::{AgentId, ArcId};

/// `X[arc, agent]` style block, row-major over arcs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcAgentVars {
    start: usize,
    arcs: usize,
    agents: usize,
}

impl ArcAgentVars {
    pub(crate) fn from_block(block: &VarBlock) -> Self {
        Self {
            start: block.start,
            arcs: block.shape[0],
            agents: block.shape[1],
        }
    }

    #[inline]
    pub fn get(&self, arc: ArcId, agent: AgentId) -> VarId {
        debug_assert!(arc.value() < self.arcs && agent.value() < self.agents);
        VarId::new(self.start + arc.value() * self.agents + agent.value())
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.arcs, self.agents)
    }
}

/// `R[node, agent]` style block indexed by node position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeAgentVars {
    start: usize,
    nodes: usize,
    agents: usize,
}

impl NodeAgentVars {
    pub(crate) fn from_block(block: &VarBlock) -> Self {
        Self {
            start: block.start,
            nodes: block.shape[0],
            agents: block.shape[1],
        }
    }

    #[inline]
    pub fn get(&self, node_position: usize, agent: AgentId) -> VarId {
        debug_assert!(node_position < self.nodes && agent.value() < self.agents);
        VarId::new(self.start + node_position * self.agents + agent.value())
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nodes, self.agents)
    }
}

/// One indicator per resource (arc index or node position).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceVars {
    start: usize,
    len: usize,
}

impl ResourceVars {
    pub(crate) fn from_block(block: &VarBlock) -> Self {
        Self {
            start: block.start,
            len: block.len,
        }
    }

    #[inline]
    pub fn get(&self, resource: usize) -> VarId {
        debug_assert!(resource < self.len);
        VarId::new(self.start + resource)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = VarId> {
        (self.start..self.start + self.len).map(VarId::new)
    }
}

/// `Z[resource, agent, agent']` for `agent' < agent` only.
///
/// Pairs are stored in lower-triangular order, so a set of `n` agents uses
/// `n(n-1)/2` variables per resource instead of `n²`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairVars {
    start: usize,
    resources: usize,
    agents: usize,
}

impl PairVars {
    /// Number of unordered pairs among `agents` agents.
    pub fn pair_count(agents: usize) -> usize {
        agents * agents.saturating_sub(1) / 2
    }

    pub(crate) fn from_block(block: &VarBlock, agents: usize) -> Self {
        Self {
            start: block.start,
            resources: block.shape[0],
            agents,
        }
    }

    /// Variable for the pair `(agent, other)`; `None` unless `other < agent`.
    #[inline]
    pub fn get(&self, resource: usize, agent: AgentId, other: AgentId) -> Option<VarId> {
        let (a, b) = (agent.value(), other.value());
        if b >= a || a >= self.agents || resource >= self.resources {
            return None;
        }
        let pair = a * (a - 1) / 2 + b;
        Some(VarId::new(
            self.start + resource * Self::pair_count(self.agents) + pair,
        ))
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.resources, Self::pair_count(self.agents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(start: usize, shape: &[usize]) -> VarBlock {
        VarBlock {
            name: "T".into(),
            shape: shape.to_vec(),
            start,
            len: shape.iter().product(),
        }
    }

    #[test]
    fn arc_agent_indexing_is_row_major() {
        let x = ArcAgentVars::from_block(&block(0, &[4, 3]));
        assert_eq!(x.get(ArcId::new(0), AgentId::new(0)).index(), 0);
        assert_eq!(x.get(ArcId::new(1), AgentId::new(0)).index(), 3);
        assert_eq!(x.get(ArcId::new(3), AgentId::new(2)).index(), 11);
    }

    #[test]
    fn pair_indexing_covers_lower_triangle_exactly_once() {
        let agents = 4;
        let z = PairVars::from_block(&block(10, &[2, PairVars::pair_count(agents)]), agents);
        let mut seen = Vec::new();
        for r in 0..2 {
            for a in 0..agents {
                for b in 0..agents {
                    if let Some(v) = z.get(r, AgentId::new(a), AgentId::new(b)) {
                        assert!(b < a);
                        seen.push(v.index());
                    }
                }
            }
        }
        seen.sort();
        let expected: Vec<usize> = (10..10 + 2 * 6).collect();
        assert_eq!(seen, expected);
        assert_eq!(z.get(0, AgentId::new(1), AgentId::new(1)), None);
        assert_eq!(z.get(0, AgentId::new(0), AgentId::new(1)), None);
    }

    #[test]
    fn resource_vars_iterate_in_order() {
        let psi = ResourceVars::from_block(&block(5, &[3]));
        let ids: Vec<usize> = psi.iter().map(|v| v.index()).collect();
        assert_eq!(ids, vec![5, 6, 7]);
        assert_eq!(psi.get(2).index(), 7);
    }
}
