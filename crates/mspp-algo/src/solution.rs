//! Result extraction and route reconstruction.

use crate::formulation::{Formulation, ModelStats, DISTANCE_OBJECTIVE};
use crate::solver::{ModelSolver, ModelStatus, SolvedModel};
use crate::variant::{build_model, Variant};
use mspp_core::{Agent, AgentId, ArcId, MsppError, MsppResult, Network, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Objective values of an optimally solved model, in registration order
/// (index 0 distance, index 1 penalty when present).
pub fn extract_objectives(solved: &SolvedModel) -> MsppResult<Vec<f64>> {
    if solved.status != ModelStatus::Optimal {
        return Err(MsppError::NotOptimal(solved.status.to_string()));
    }
    Ok(solved.objectives.clone())
}

/// Path of one agent, source first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub agent: AgentId,
    pub arcs: Vec<ArcId>,
    /// Visited nodes, `arcs.len() + 1` entries
    pub nodes: Vec<NodeId>,
    pub length: f64,
}

/// Post-solve routes keyed by agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingResult {
    pub routes: BTreeMap<AgentId, Route>,
}

impl RoutingResult {
    pub fn get(&self, agent: AgentId) -> Option<&Route> {
        self.routes.get(&agent)
    }

    pub fn total_length(&self) -> f64 {
        self.routes.values().map(|r| r.length).sum()
    }

    /// Arc lists in agent order, for highlighting in graph exports.
    pub fn arc_lists(&self) -> Vec<Vec<ArcId>> {
        self.routes.values().map(|r| r.arcs.clone()).collect()
    }
}

/// Walk the selected arcs of every agent from its source to its terminus.
///
/// Selected arcs left over after the walk (detached cycles, possible only in
/// non-optimal assignments) are dropped with a warning.
pub fn reconstruct_routes(
    formulation: &Formulation,
    network: &Network,
    agents: &[Agent],
    values: &[f64],
) -> MsppResult<RoutingResult> {
    if values.len() != formulation.model.num_variables() {
        return Err(MsppError::Solver(format!(
            "assignment has {} values, model has {} variables",
            values.len(),
            formulation.model.num_variables()
        )));
    }

    let (arcs, modelled_agents) = formulation.x.shape();
    if network.num_arcs() != arcs || agents.len() != modelled_agents {
        return Err(MsppError::Solver(format!(
            "formulation was built for {} arcs and {} agents, got {} arcs and {} agents",
            arcs,
            modelled_agents,
            network.num_arcs(),
            agents.len()
        )));
    }
    if let Some(agent) = agents.iter().find(|a| a.id.value() >= modelled_agents) {
        return Err(MsppError::invalid_agent(
            agent.id.value(),
            format!("index out of range 0..{}", modelled_agents),
        ));
    }

    let mut result = RoutingResult::default();
    for agent in agents {
        let selected: Vec<ArcId> = network
            .arcs()
            .iter()
            .map(|arc| arc.id)
            .filter(|arc| values[formulation.x.get(*arc, agent.id).index()] > 0.5)
            .collect();

        let mut used = HashSet::new();
        let mut arcs = Vec::new();
        let mut nodes = vec![agent.source];
        let mut length = 0.0;
        let mut at = agent.source;

        while at != agent.terminus {
            let next = selected.iter().copied().find(|id| {
                !used.contains(id)
                    && network
                        .arc(*id)
                        .is_some_and(|arc| arc.origin == at)
            });
            let Some(id) = next else {
                return Err(MsppError::RouteReconstruction {
                    agent: agent.id.value(),
                    reason: format!("no selected arc leaves node {}", at),
                });
            };
            let arc = network.arc(id).ok_or_else(|| MsppError::RouteReconstruction {
                agent: agent.id.value(),
                reason: format!("arc {} is not in the network", id.value()),
            })?;
            used.insert(id);
            arcs.push(id);
            nodes.push(arc.destination);
            length += arc.weight;
            at = arc.destination;
        }

        if used.len() < selected.len() {
            warn!(
                agent = agent.id.value(),
                dropped = selected.len() - used.len(),
                "selected arcs not on the source-terminus path"
            );
        }
        result.routes.insert(
            agent.id,
            Route {
                agent: agent.id,
                arcs,
                nodes,
                length,
            },
        );
    }
    Ok(result)
}

/// Resource sharing measured directly on reconstructed routes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CongestionSummary {
    /// Arcs used by two or more agents
    pub shared_arcs: usize,
    /// Nodes visited by two or more agents
    pub shared_nodes: usize,
    /// Σ max(0, users − 1) over arcs
    pub arc_excess: usize,
    /// Σ max(0, users − 1) over nodes
    pub node_excess: usize,
    /// Agent pairs sharing an arc, summed over arcs
    pub arc_pairs: usize,
    /// Agent pairs sharing a node, summed over nodes
    pub node_pairs: usize,
}

impl CongestionSummary {
    pub fn from_routes(network: &Network, routes: &RoutingResult) -> Self {
        let mut arc_users = vec![0usize; network.num_arcs()];
        let mut node_users = vec![0usize; network.num_nodes()];
        for route in routes.routes.values() {
            let arcs: HashSet<ArcId> = route.arcs.iter().copied().collect();
            for arc in arcs {
                arc_users[arc.value()] += 1;
            }
            let nodes: HashSet<NodeId> = route.nodes.iter().copied().collect();
            for node in nodes {
                if let Some(position) = network.node_position(node) {
                    node_users[position] += 1;
                }
            }
        }

        let mut summary = Self::default();
        for c in arc_users {
            summary.shared_arcs += (c >= 2) as usize;
            summary.arc_excess += c.saturating_sub(1);
            summary.arc_pairs += c * c.saturating_sub(1) / 2;
        }
        for c in node_users {
            summary.shared_nodes += (c >= 2) as usize;
            summary.node_excess += c.saturating_sub(1);
            summary.node_pairs += c * c.saturating_sub(1) / 2;
        }
        summary
    }

    /// The penalty `variant` charges for this usage pattern.
    pub fn penalty_for(&self, variant: Variant) -> usize {
        match variant {
            Variant::Mspp => 0,
            Variant::Abp => self.shared_arcs,
            Variant::Nbp => self.shared_nodes,
            Variant::Alp => self.arc_excess,
            Variant::Nlp => self.node_excess,
            Variant::Aqp => self.arc_pairs,
            Variant::Nqp => self.node_pairs,
        }
    }
}

/// Build, solve, extract and reconstruct in one call.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub formulation: Formulation,
    pub solved: SolvedModel,
    pub objectives: Vec<f64>,
    pub routes: RoutingResult,
}

pub fn route_agents(
    variant: Variant,
    network: &Network,
    agents: &[Agent],
    solver: &dyn ModelSolver,
) -> MsppResult<SolveOutcome> {
    let formulation = build_model(variant, network, agents)?;
    let solved = solver.solve(&formulation.model)?;
    solved.ensure_optimal()?;
    let objectives = extract_objectives(&solved)?;
    let routes = reconstruct_routes(&formulation, network, agents, &solved.values)?;
    Ok(SolveOutcome {
        formulation,
        solved,
        objectives,
        routes,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveValue {
    pub name: String,
    pub weight: f64,
    pub value: f64,
}

/// Serializable summary of one solved instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionReport {
    pub variant: Variant,
    pub backend: String,
    pub status: ModelStatus,
    pub solve_time_ms: f64,
    pub variables: usize,
    pub constraints: usize,
    pub objectives: Vec<ObjectiveValue>,
    pub total_length: f64,
    pub congestion: CongestionSummary,
    pub routes: Vec<Route>,
}

impl SolveOutcome {
    pub fn distance(&self) -> f64 {
        self.objectives.first().copied().unwrap_or_default()
    }

    pub fn penalty(&self) -> Option<f64> {
        self.objectives.get(1).copied()
    }

    pub fn model_stats(&self) -> ModelStats {
        self.formulation.model.stats()
    }

    pub fn report(&self, network: &Network) -> SolutionReport {
        let stats = self.model_stats();
        SolutionReport {
            variant: self.formulation.variant,
            backend: self.solved.backend.clone(),
            status: self.solved.status,
            solve_time_ms: self.solved.solve_time.as_secs_f64() * 1000.0,
            variables: stats.variables,
            constraints: stats.constraints,
            objectives: self
                .formulation
                .model
                .objectives()
                .iter()
                .zip(&self.objectives)
                .map(|(objective, value)| ObjectiveValue {
                    name: objective.name.clone(),
                    weight: objective.weight,
                    value: *value,
                })
                .collect(),
            total_length: self.routes.total_length(),
            congestion: CongestionSummary::from_routes(network, &self.routes),
            routes: self.routes.routes.values().cloned().collect(),
        }
    }
}

impl SolutionReport {
    pub fn objective(&self, name: &str) -> Option<f64> {
        self.objectives
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.value)
    }

    pub fn distance(&self) -> Option<f64> {
        self.objective(DISTANCE_OBJECTIVE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::test_support::{assignment, diamond, route_combinations};
    use crate::formulation::FormulationModel;
    use std::time::Duration;

    /// Returns a fixed assignment with a fixed status.
    struct FixedSolver {
        status: ModelStatus,
        values: Vec<f64>,
    }

    impl ModelSolver for FixedSolver {
        fn name(&self) -> &str {
            "fixed"
        }

        fn solve(&self, model: &FormulationModel) -> MsppResult<SolvedModel> {
            SolvedModel::new(
                model,
                self.status,
                self.values.clone(),
                Duration::ZERO,
                self.name(),
            )
        }
    }

    fn agents() -> Vec<Agent> {
        vec![Agent::new(0, 3, 0), Agent::new(0, 3, 1)]
    }

    #[test]
    fn extraction_requires_optimal_status() {
        let network = diamond();
        let agents = agents();
        let f = build_model(Variant::Abp, &network, &agents).unwrap();
        let routes = &route_combinations(&network, &agents)[0];
        let values = assignment(&f, &network, &agents, routes);

        for status in [ModelStatus::TimeLimit, ModelStatus::Error] {
            let solved =
                SolvedModel::new(&f.model, status, values.clone(), Duration::ZERO, "x").unwrap();
            assert!(matches!(
                extract_objectives(&solved),
                Err(MsppError::NotOptimal(_))
            ));
        }
        let solved =
            SolvedModel::new(&f.model, ModelStatus::Optimal, values.clone(), Duration::ZERO, "x")
                .unwrap();
        assert_eq!(
            extract_objectives(&solved).unwrap(),
            f.model.objective_values(&values)
        );
    }

    #[test]
    fn routes_follow_selected_arcs() {
        let network = diamond();
        let agents = agents();
        let f = build_model(Variant::Mspp, &network, &agents).unwrap();
        let chosen = vec![
            vec![ArcId::new(0), ArcId::new(4), ArcId::new(3)],
            vec![ArcId::new(1), ArcId::new(3)],
        ];
        let values = assignment(&f, &network, &agents, &chosen);
        let routes = reconstruct_routes(&f, &network, &agents, &values).unwrap();

        let first = routes.get(AgentId::new(0)).unwrap();
        assert_eq!(first.arcs, chosen[0]);
        assert_eq!(
            first.nodes,
            vec![NodeId::new(0), NodeId::new(1), NodeId::new(2), NodeId::new(3)]
        );
        assert_eq!(first.length, 3.0);
        assert_eq!(routes.total_length(), 6.0);
    }

    #[test]
    fn dangling_selection_is_reported() {
        let network = diamond();
        let agents = agents();
        let f = build_model(Variant::Mspp, &network, &agents).unwrap();
        let values = vec![0.0; f.model.num_variables()];
        let err = reconstruct_routes(&f, &network, &agents, &values).unwrap_err();
        assert!(matches!(err, MsppError::RouteReconstruction { agent: 0, .. }));
    }

    #[test]
    fn agent_set_must_match_the_formulation() {
        let network = diamond();
        let agents = agents();
        let f = build_model(Variant::Mspp, &network, &agents).unwrap();
        let values = vec![0.0; f.model.num_variables()];

        let mut more = agents.clone();
        more.push(Agent::new(1, 3, 2));
        let err = reconstruct_routes(&f, &network, &more, &values).unwrap_err();
        assert!(matches!(err, MsppError::Solver(_)));

        let shifted = vec![Agent::new(0, 3, 0), Agent::new(0, 3, 5)];
        let err = reconstruct_routes(&f, &network, &shifted, &values).unwrap_err();
        assert!(matches!(err, MsppError::InvalidAgent { agent: 5, .. }));
    }

    #[test]
    fn congestion_summary_matches_every_variant_penalty() {
        let network = diamond();
        let agents = vec![Agent::new(0, 3, 0), Agent::new(0, 3, 1), Agent::new(1, 3, 2)];
        for variant in Variant::ALL {
            let f = build_model(variant, &network, &agents).unwrap();
            for chosen in route_combinations(&network, &agents) {
                let values = assignment(&f, &network, &agents, &chosen);
                let routes = reconstruct_routes(&f, &network, &agents, &values).unwrap();
                let summary = CongestionSummary::from_routes(&network, &routes);
                let penalty = f.model.objective_values(&values).get(1).copied().unwrap_or(0.0);
                assert_eq!(summary.penalty_for(variant) as f64, penalty, "{variant}");
            }
        }
    }

    #[test]
    fn route_agents_surfaces_infeasibility_and_reports() {
        let network = diamond();
        let agents = agents();
        let infeasible = FixedSolver {
            status: ModelStatus::Infeasible,
            values: Vec::new(),
        };
        assert!(matches!(
            route_agents(Variant::Abp, &network, &agents, &infeasible),
            Err(MsppError::InfeasibleModel(_))
        ));

        let f = build_model(Variant::Abp, &network, &agents).unwrap();
        let chosen = vec![
            vec![ArcId::new(0), ArcId::new(2)],
            vec![ArcId::new(0), ArcId::new(2)],
        ];
        let fixed = FixedSolver {
            status: ModelStatus::Optimal,
            values: assignment(&f, &network, &agents, &chosen),
        };
        let outcome = route_agents(Variant::Abp, &network, &agents, &fixed).unwrap();
        assert_eq!(outcome.distance(), 6.0);
        assert_eq!(outcome.penalty(), Some(2.0));

        let report = outcome.report(&network);
        assert_eq!(report.distance(), Some(6.0));
        assert_eq!(report.objective("Penalty"), Some(2.0));
        assert_eq!(report.congestion.shared_arcs, 2);
        assert_eq!(report.routes.len(), 2);
    }
}
