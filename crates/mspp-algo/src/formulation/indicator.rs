//! Congestion-indicator variants: ABP, NBP, ALP, NLP.
//!
//! Each variant adds one indicator per resource and a second objective over
//! those indicators. Binary variants (ABP/NBP) flag a resource once two or
//! more agents use it; count variants (ALP/NLP) charge every agent beyond
//! the first.

use super::{
    build_mspp, ConstraintFamily, Formulation, Incidence, LinExpr, NodeAgentVars, PenaltyVars,
    ResourceVars, Sense, PENALTY_OBJECTIVE,
};
use crate::variant::Variant;
use mspp_core::{Agent, MsppResult, Network};

/// Declare `R[node, agent]` and tie it to the incident arc selections.
///
/// `R >= X` for every incident arc always holds. With `upper_bound` the
/// reverse `R <= Σ incident X` is added too, so `R` is exactly the node
/// presence instead of a lower bound on it.
pub(super) fn add_node_presence(
    formulation: &mut Formulation,
    network: &Network,
    agents: &[Agent],
    upper_bound: bool,
) -> NodeAgentVars {
    let model = &mut formulation.model;
    let x = formulation.x;
    let r = NodeAgentVars::from_block(&model.add_block("R", &[network.num_nodes(), agents.len()]));
    let incidence = Incidence::new(network);

    for position in 0..network.num_nodes() {
        let incident: Vec<_> = incidence.outgoing[position]
            .iter()
            .chain(incidence.incoming[position].iter())
            .copied()
            .collect();
        for agent in agents {
            let presence = r.get(position, agent.id);
            for arc in &incident {
                let expr = LinExpr::new()
                    .with_term(presence, 1.0)
                    .with_term(x.get(*arc, agent.id), -1.0);
                model.add_constraint(expr, Sense::Ge, 0.0, ConstraintFamily::NodePresenceOn);
            }
            if upper_bound {
                let mut expr = LinExpr::new().with_term(presence, 1.0);
                for arc in &incident {
                    expr.add_term(x.get(*arc, agent.id), -1.0);
                }
                model.add_constraint(expr, Sense::Le, 0.0, ConstraintFamily::NodePresenceOff);
            }
        }
    }
    r
}

/// `(1/K)·(Σ_k U[k] − 1) ≤ Ind`: forces `Ind = 1` once two agents share.
fn add_binary_indicators<F>(
    formulation: &mut Formulation,
    name: &str,
    resources: usize,
    agents: &[Agent],
    usage: F,
) -> ResourceVars
where
    F: Fn(usize, &Agent) -> super::VarId,
{
    let model = &mut formulation.model;
    let ind = ResourceVars::from_block(&model.add_block(name, &[resources]));
    let scale = 1.0 / agents.len() as f64;

    for resource in 0..resources {
        let mut on = LinExpr::sum(agents.iter().map(|agent| usage(resource, agent)));
        on.add_constant(-1.0);
        let mut on = on.scaled(scale);
        on.add_term(ind.get(resource), -1.0);
        model.add_constraint(on, Sense::Le, 0.0, ConstraintFamily::IndicatorOn);
    }
    model.add_objective(PENALTY_OBJECTIVE, 1.0, LinExpr::sum(ind.iter()));
    ind
}

/// `(1/K)·Σ_k U[k] ≤ Ind ≤ Σ_k U[k]`, penalty `Σ_r (Σ_k U[r,k] − Ind[r])`.
///
/// `Ind` is binary, so it is 1 exactly when the resource is used at all and
/// the penalty per resource is `max(0, count − 1)`.
fn add_count_indicators<F>(
    formulation: &mut Formulation,
    name: &str,
    resources: usize,
    agents: &[Agent],
    usage: F,
) -> ResourceVars
where
    F: Fn(usize, &Agent) -> super::VarId,
{
    let model = &mut formulation.model;
    let ind = ResourceVars::from_block(&model.add_block(name, &[resources]));
    let scale = 1.0 / agents.len() as f64;
    let mut penalty = LinExpr::new();

    for resource in 0..resources {
        let used = LinExpr::sum(agents.iter().map(|agent| usage(resource, agent)));

        let on = used.clone().scaled(scale).with_term(ind.get(resource), -1.0);
        model.add_constraint(on, Sense::Le, 0.0, ConstraintFamily::IndicatorOn);

        let mut off = used.clone().scaled(-1.0);
        off.add_term(ind.get(resource), 1.0);
        model.add_constraint(off, Sense::Le, 0.0, ConstraintFamily::IndicatorOff);

        penalty.add_expr(&used);
        penalty.add_term(ind.get(resource), -1.0);
    }
    model.add_objective(PENALTY_OBJECTIVE, 1.0, penalty);
    ind
}

/// Arc Binary Penalty: one point per arc used by two or more agents.
pub fn build_abp(network: &Network, agents: &[Agent]) -> MsppResult<Formulation> {
    let mut formulation = build_mspp(network, agents)?;
    let x = formulation.x;
    let psi = add_binary_indicators(
        &mut formulation,
        "Psi",
        network.num_arcs(),
        agents,
        |arc, agent| x.get(network.arcs()[arc].id, agent.id),
    );
    formulation.variant = Variant::Abp;
    formulation.penalty = PenaltyVars::Abp { psi };
    Ok(formulation)
}

/// Node Binary Penalty: one point per node visited by two or more agents.
pub fn build_nbp(network: &Network, agents: &[Agent]) -> MsppResult<Formulation> {
    let mut formulation = build_mspp(network, agents)?;
    let r = add_node_presence(&mut formulation, network, agents, false);
    let zeta = add_binary_indicators(
        &mut formulation,
        "Zeta",
        network.num_nodes(),
        agents,
        |node, agent| r.get(node, agent.id),
    );
    formulation.variant = Variant::Nbp;
    formulation.penalty = PenaltyVars::Nbp { r, zeta };
    Ok(formulation)
}

/// Arc Linear Penalty: every agent beyond the first on an arc costs one.
pub fn build_alp(network: &Network, agents: &[Agent]) -> MsppResult<Formulation> {
    let mut formulation = build_mspp(network, agents)?;
    let x = formulation.x;
    let eps = add_count_indicators(
        &mut formulation,
        "Eps",
        network.num_arcs(),
        agents,
        |arc, agent| x.get(network.arcs()[arc].id, agent.id),
    );
    formulation.variant = Variant::Alp;
    formulation.penalty = PenaltyVars::Alp { eps };
    Ok(formulation)
}

/// Node Linear Penalty: every agent beyond the first at a node costs one.
pub fn build_nlp(network: &Network, agents: &[Agent]) -> MsppResult<Formulation> {
    let mut formulation = build_mspp(network, agents)?;
    let r = add_node_presence(&mut formulation, network, agents, false);
    let theta = add_count_indicators(
        &mut formulation,
        "Theta",
        network.num_nodes(),
        agents,
        |node, agent| r.get(node, agent.id),
    );
    formulation.variant = Variant::Nlp;
    formulation.penalty = PenaltyVars::Nlp { r, theta };
    Ok(formulation)
}
