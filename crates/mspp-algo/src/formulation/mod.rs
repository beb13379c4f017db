//! MSPP and MSPP-PD formulations
//!
//! Every formulation starts from the base Multi-agent Shortest Path Problem
//! and optionally layers a congestion penalty on top of it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  MSPP                                                                    │
//! │  ────                                                                    │
//! │  X[a,k] ∈ {0,1}          agent k traverses arc a                         │
//! │                                                                          │
//! │  min  Σ_a Σ_k w_a · X[a,k]                          objective 0 Distance │
//! │  s.t. Σ_{a∈δ⁺(i)} X[a,k] − Σ_{a∈δ⁻(i)} X[a,k] = { 1  i = s_k            │
//! │                                                  −1  i = t_k            │
//! │                                                   0  otherwise }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Penalty variants (objective 1 Penalty)
//!
//! | Variant | Resource | Penalty per resource                    |
//! |---------|----------|-----------------------------------------|
//! | ABP     | arc      | 1 if two or more agents use it          |
//! | NBP     | node     | 1 if two or more agents use it          |
//! | ALP     | arc      | `max(0, count − 1)`                     |
//! | NLP     | node     | `max(0, count − 1)`                     |
//! | AQP     | arc      | number of agent pairs sharing it        |
//! | NQP     | node     | number of agent pairs sharing it        |
//!
//! Node usage is derived through `R[i,k] ≥ X[a,k]` for every arc `a`
//! incident to `i`. Binary indicators are switched on with
//! `(1/K)·(Σ_k U[r,k] − 1) ≤ Ind[r]`, count indicators are pinned with
//! `(1/K)·Σ_k U[r,k] ≤ Ind[r] ≤ Σ_k U[r,k]`, and pair products use the
//! standard AND linearization `Z ≤ U, Z ≤ U', Z ≥ U + U' − 1`.
//!
//! No subtour elimination is added: arc weights are strictly positive
//! (enforced by [`mspp_core::Network`]), so a minimizing solver never
//! selects a detached cycle.

mod blocks;
mod indicator;
mod model;
mod mspp;
mod pairwise;
#[cfg(test)]
pub(crate) mod test_support;

pub use blocks::{ArcAgentVars, NodeAgentVars, PairVars, ResourceVars};
pub use indicator::{build_abp, build_alp, build_nbp, build_nlp};
pub use model::{
    ConstraintFamily, FormulationModel, LinExpr, LinearConstraint, ModelStats, Objective, Sense,
    VarBlock, VarId,
};
pub use mspp::build_mspp;
pub use pairwise::{build_aqp, build_nqp};

use crate::variant::Variant;
use mspp_core::{ArcId, Network};

/// Name of objective 0.
pub const DISTANCE_OBJECTIVE: &str = "Distance";
/// Name of objective 1 (penalty variants only).
pub const PENALTY_OBJECTIVE: &str = "Penalty";

/// Variant-specific auxiliary variables layered on top of `X`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PenaltyVars {
    /// Plain MSPP
    None,
    Abp {
        psi: ResourceVars,
    },
    Nbp {
        r: NodeAgentVars,
        zeta: ResourceVars,
    },
    Alp {
        eps: ResourceVars,
    },
    Nlp {
        r: NodeAgentVars,
        theta: ResourceVars,
    },
    Aqp {
        z: PairVars,
    },
    Nqp {
        r: NodeAgentVars,
        w: PairVars,
    },
}

impl PenaltyVars {
    /// Node presence block, for node-based variants.
    pub fn node_presence(&self) -> Option<&NodeAgentVars> {
        match self {
            PenaltyVars::Nbp { r, .. } | PenaltyVars::Nlp { r, .. } | PenaltyVars::Nqp { r, .. } => {
                Some(r)
            }
            _ => None,
        }
    }
}

/// A built model plus the handles needed to read its solution back.
#[derive(Debug, Clone, PartialEq)]
pub struct Formulation {
    pub variant: Variant,
    pub model: FormulationModel,
    /// Arc selection `X[arc, agent]`
    pub x: ArcAgentVars,
    pub penalty: PenaltyVars,
}

/// Arcs entering/leaving each node, by node position.
pub(crate) struct Incidence {
    pub outgoing: Vec<Vec<ArcId>>,
    pub incoming: Vec<Vec<ArcId>>,
}

impl Incidence {
    pub fn new(network: &Network) -> Self {
        let mut outgoing = vec![Vec::new(); network.num_nodes()];
        let mut incoming = vec![Vec::new(); network.num_nodes()];
        for arc in network.arcs() {
            // Endpoints are validated when the network is built
            if let Some(i) = network.node_position(arc.origin) {
                outgoing[i].push(arc.id);
            }
            if let Some(j) = network.node_position(arc.destination) {
                incoming[j].push(arc.id);
            }
        }
        Self { outgoing, incoming }
    }
}
