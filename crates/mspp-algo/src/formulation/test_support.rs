//! Brute-force helpers for checking formulations against enumerated routings.

use super::{Formulation, PenaltyVars};
use crate::variant::Variant;
use mspp_core::{Agent, ArcId, Network, NodeId};

/// Five arcs over four nodes: 0→1, 0→2, 1→3, 2→3, 1→2.
pub fn diamond() -> Network {
    Network::from_weighted_pairs([
        (0, 1, 1.0),
        (0, 2, 2.0),
        (1, 3, 2.0),
        (2, 3, 1.0),
        (1, 2, 1.0),
    ])
    .unwrap()
}

/// All simple directed paths from `from` to `to`, as arc lists.
pub fn simple_paths(network: &Network, from: NodeId, to: NodeId) -> Vec<Vec<ArcId>> {
    fn walk(
        network: &Network,
        at: NodeId,
        to: NodeId,
        visited: &mut Vec<NodeId>,
        path: &mut Vec<ArcId>,
        out: &mut Vec<Vec<ArcId>>,
    ) {
        if at == to {
            out.push(path.clone());
            return;
        }
        for arc in network.outgoing(at) {
            if visited.contains(&arc.destination) {
                continue;
            }
            visited.push(arc.destination);
            path.push(arc.id);
            walk(network, arc.destination, to, visited, path, out);
            path.pop();
            visited.pop();
        }
    }

    let mut out = Vec::new();
    walk(network, from, to, &mut vec![from], &mut Vec::new(), &mut out);
    out
}

/// Cartesian product of every agent's simple paths.
pub fn route_combinations(network: &Network, agents: &[Agent]) -> Vec<Vec<Vec<ArcId>>> {
    let mut combos: Vec<Vec<Vec<ArcId>>> = vec![Vec::new()];
    for agent in agents {
        let paths = simple_paths(network, agent.source, agent.terminus);
        combos = combos
            .into_iter()
            .flat_map(|prefix| {
                paths.iter().map(move |path| {
                    let mut next = prefix.clone();
                    next.push(path.clone());
                    next
                })
            })
            .collect();
    }
    combos
}

/// Agents per arc and per node position under `routes` (indexed by agent id).
pub fn usage(network: &Network, routes: &[Vec<ArcId>]) -> (Vec<Vec<bool>>, Vec<Vec<bool>>) {
    let mut arcs = vec![vec![false; routes.len()]; network.num_arcs()];
    let mut nodes = vec![vec![false; routes.len()]; network.num_nodes()];
    for (agent, route) in routes.iter().enumerate() {
        for arc_id in route {
            arcs[arc_id.value()][agent] = true;
            let arc = network.arc(*arc_id).unwrap();
            nodes[network.node_position(arc.origin).unwrap()][agent] = true;
            nodes[network.node_position(arc.destination).unwrap()][agent] = true;
        }
    }
    (arcs, nodes)
}

fn count(users: &[bool]) -> usize {
    users.iter().filter(|u| **u).count()
}

/// Penalty computed directly from resource usage, without the model.
pub fn expected_penalty(
    variant: Variant,
    network: &Network,
    _agents: &[Agent],
    routes: &[Vec<ArcId>],
) -> f64 {
    let (arcs, nodes) = usage(network, routes);
    let resources = match variant {
        Variant::Abp | Variant::Alp | Variant::Aqp => arcs,
        Variant::Nbp | Variant::Nlp | Variant::Nqp => nodes,
        Variant::Mspp => return 0.0,
    };
    resources
        .iter()
        .map(|users| {
            let c = count(users);
            match variant {
                Variant::Abp | Variant::Nbp => (c >= 2) as usize,
                Variant::Alp | Variant::Nlp => c.saturating_sub(1),
                _ => c * c.saturating_sub(1) / 2,
            }
        })
        .sum::<usize>() as f64
}

fn flag(on: bool) -> f64 {
    if on {
        1.0
    } else {
        0.0
    }
}

/// Full variable assignment for `routes` with every auxiliary at its exact value.
pub fn assignment(
    formulation: &Formulation,
    network: &Network,
    agents: &[Agent],
    routes: &[Vec<ArcId>],
) -> Vec<f64> {
    let (arc_users, node_users) = usage(network, routes);
    let mut values = vec![0.0; formulation.model.num_variables()];

    for agent in agents {
        for arc in &routes[agent.id.value()] {
            values[formulation.x.get(*arc, agent.id).index()] = 1.0;
        }
    }
    if let Some(r) = formulation.penalty.node_presence() {
        for (position, users) in node_users.iter().enumerate() {
            for agent in agents {
                values[r.get(position, agent.id).index()] = flag(users[agent.id.value()]);
            }
        }
    }

    let pairs = |users: &Vec<Vec<bool>>, z: &super::PairVars, values: &mut Vec<f64>| {
        for (resource, users) in users.iter().enumerate() {
            for agent in agents {
                for other in agents {
                    if let Some(var) = z.get(resource, agent.id, other.id) {
                        values[var.index()] =
                            flag(users[agent.id.value()] && users[other.id.value()]);
                    }
                }
            }
        }
    };

    match &formulation.penalty {
        PenaltyVars::None => {}
        PenaltyVars::Abp { psi } => {
            for (arc, users) in arc_users.iter().enumerate() {
                values[psi.get(arc).index()] = flag(count(users) >= 2);
            }
        }
        PenaltyVars::Nbp { zeta, .. } => {
            for (node, users) in node_users.iter().enumerate() {
                values[zeta.get(node).index()] = flag(count(users) >= 2);
            }
        }
        PenaltyVars::Alp { eps } => {
            for (arc, users) in arc_users.iter().enumerate() {
                values[eps.get(arc).index()] = flag(count(users) >= 1);
            }
        }
        PenaltyVars::Nlp { theta, .. } => {
            for (node, users) in node_users.iter().enumerate() {
                values[theta.get(node).index()] = flag(count(users) >= 1);
            }
        }
        PenaltyVars::Aqp { z } => pairs(&arc_users, z, &mut values),
        PenaltyVars::Nqp { w, .. } => pairs(&node_users, w, &mut values),
    }
    values
}

#[test]
fn diamond_has_three_routes_between_its_ends() {
    let network = diamond();
    assert_eq!(
        simple_paths(&network, NodeId::new(0), NodeId::new(3)).len(),
        3
    );
}
