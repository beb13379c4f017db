//! Pairwise-conflict variants: AQP and NQP.
//!
//! The natural penalty `Σ_r Σ_{k'<k} U[r,k]·U[r,k']` is quadratic. Each
//! product gets its own binary with the AND linearization, and the penalty
//! objective sums those binaries.

use super::indicator::add_node_presence;
use super::{
    build_mspp, ConstraintFamily, Formulation, LinExpr, PairVars, PenaltyVars, Sense, VarId,
    PENALTY_OBJECTIVE,
};
use crate::variant::Variant;
use mspp_core::{Agent, MsppResult, Network};

/// Declare `name[resource, pair]` and link every pair to its two usages.
fn add_pair_products<F>(
    formulation: &mut Formulation,
    name: &str,
    resources: usize,
    agents: &[Agent],
    usage: F,
) -> PairVars
where
    F: Fn(usize, &Agent) -> VarId,
{
    let model = &mut formulation.model;
    let block = model.add_block(name, &[resources, PairVars::pair_count(agents.len())]);
    let z = PairVars::from_block(&block, agents.len());
    let mut penalty = LinExpr::new();

    for resource in 0..resources {
        for agent in agents {
            for other in agents {
                let Some(pair) = z.get(resource, agent.id, other.id) else {
                    continue;
                };
                let mine = usage(resource, agent);
                let theirs = usage(resource, other);

                for used in [mine, theirs] {
                    let upper = LinExpr::new().with_term(pair, 1.0).with_term(used, -1.0);
                    model.add_constraint(upper, Sense::Le, 0.0, ConstraintFamily::PairUpper);
                }
                let lower = LinExpr::new()
                    .with_term(pair, 1.0)
                    .with_term(mine, -1.0)
                    .with_term(theirs, -1.0);
                model.add_constraint(lower, Sense::Ge, -1.0, ConstraintFamily::PairLower);

                penalty.add_term(pair, 1.0);
            }
        }
    }
    model.add_objective(PENALTY_OBJECTIVE, 1.0, penalty);
    z
}

/// Arc Quadratic Penalty: one point per agent pair sharing an arc.
pub fn build_aqp(network: &Network, agents: &[Agent]) -> MsppResult<Formulation> {
    let mut formulation = build_mspp(network, agents)?;
    let x = formulation.x;
    let z = add_pair_products(
        &mut formulation,
        "Z",
        network.num_arcs(),
        agents,
        |arc, agent| x.get(network.arcs()[arc].id, agent.id),
    );
    formulation.variant = Variant::Aqp;
    formulation.penalty = PenaltyVars::Aqp { z };
    Ok(formulation)
}

/// Node Quadratic Penalty: one point per agent pair sharing a node.
///
/// Node presence is bounded on both sides here, otherwise the pair
/// products could be satisfied by presences no route supports.
pub fn build_nqp(network: &Network, agents: &[Agent]) -> MsppResult<Formulation> {
    let mut formulation = build_mspp(network, agents)?;
    let r = add_node_presence(&mut formulation, network, agents, true);
    let w = add_pair_products(
        &mut formulation,
        "W",
        network.num_nodes(),
        agents,
        |node, agent| r.get(node, agent.id),
    );
    formulation.variant = Variant::Nqp;
    formulation.penalty = PenaltyVars::Nqp { r, w };
    Ok(formulation)
}
