//! Base MSPP: binary arc selection per agent with flow conservation.

use super::{
    ArcAgentVars, ConstraintFamily, Formulation, FormulationModel, Incidence, LinExpr,
    PenaltyVars, Sense, DISTANCE_OBJECTIVE,
};
use crate::variant::Variant;
use mspp_core::{Agent, MsppResult, Network};

/// Build the MSPP for `network` and `agents`.
///
/// Declares `X[arc, agent]`, registers the distance objective (index 0,
/// weight 1) and one flow-conservation row per (agent, node). Every penalty
/// variant starts from this model.
///
/// Fails fast on an empty agent set and on agents that are degenerate or
/// reference nodes outside the network.
pub fn build_mspp(network: &Network, agents: &[Agent]) -> MsppResult<Formulation> {
    network.validate_agents(agents)?;

    let mut model = FormulationModel::new();
    let x = ArcAgentVars::from_block(&model.add_block("X", &[network.num_arcs(), agents.len()]));

    let mut distance = LinExpr::new();
    for arc in network.arcs() {
        for agent in agents {
            distance.add_term(x.get(arc.id, agent.id), arc.weight);
        }
    }
    model.add_objective(DISTANCE_OBJECTIVE, 1.0, distance);

    let incidence = Incidence::new(network);
    for agent in agents {
        for (position, node) in network.nodes().iter().enumerate() {
            let mut flow = LinExpr::new();
            for arc in &incidence.outgoing[position] {
                flow.add_term(x.get(*arc, agent.id), 1.0);
            }
            for arc in &incidence.incoming[position] {
                flow.add_term(x.get(*arc, agent.id), -1.0);
            }
            let supply = if *node == agent.source {
                1.0
            } else if *node == agent.terminus {
                -1.0
            } else {
                0.0
            };
            model.add_constraint(flow, Sense::Eq, supply, ConstraintFamily::FlowConservation);
        }
    }

    Ok(Formulation {
        variant: Variant::Mspp,
        model,
        x,
        penalty: PenaltyVars::None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mspp_core::{AgentId, ArcId, MsppError};

    fn square() -> Network {
        Network::from_weighted_pairs([(0, 2, 1.0), (0, 3, 2.0), (1, 2, 3.0), (1, 3, 4.0)])
            .unwrap()
    }

    #[test]
    fn declares_one_row_per_agent_and_node() {
        let network = square();
        let agents = [Agent::new(0, 3, 0), Agent::new(1, 2, 1)];
        let f = build_mspp(&network, &agents).unwrap();

        assert_eq!(f.model.num_variables(), 8);
        assert_eq!(f.model.count_family(ConstraintFamily::FlowConservation), 8);
        assert_eq!(f.model.objectives().len(), 1);
        assert_eq!(f.model.objectives()[0].name, "Distance");
        assert_eq!(f.x.shape(), (4, 2));
    }

    #[test]
    fn flow_rows_carry_supply_by_node_role() {
        let network = square();
        let agents = [Agent::new(0, 3, 0)];
        let f = build_mspp(&network, &agents).unwrap();
        let rhs: Vec<f64> = f.model.constraints().iter().map(|c| c.rhs).collect();
        // nodes 0,1,2,3 in order: source, transit, transit, terminus
        assert_eq!(rhs, vec![1.0, 0.0, 0.0, -1.0]);
    }

    #[test]
    fn distance_uses_arc_weights() {
        let network = square();
        let agents = [Agent::new(0, 3, 0)];
        let f = build_mspp(&network, &agents).unwrap();
        let mut values = vec![0.0; f.model.num_variables()];
        values[f.x.get(ArcId::new(1), AgentId::new(0)).index()] = 1.0;
        assert!(f.model.is_feasible(&values, 1e-9));
        assert_eq!(f.model.objective_values(&values), vec![2.0]);
    }

    #[test]
    fn rejects_empty_and_degenerate_agent_sets() {
        let network = square();
        assert!(matches!(
            build_mspp(&network, &[]),
            Err(MsppError::EmptyAgentSet)
        ));
        assert!(matches!(
            build_mspp(&network, &[Agent::new(2, 2, 0)]),
            Err(MsppError::InvalidAgent { .. })
        ));
    }
}
