//! # mspp-algo: MSPP formulations and solving
//!
//! Builds the Multi-agent Shortest Path Problem and its six congestion
//! penalized variants as binary programs, solves them through `good_lp`, and
//! turns the assignment back into per-agent routes.
//!
//! ```rust
//! use mspp_algo::{build_model, route_agents, GoodLpSolver, Variant};
//! use mspp_core::{layered_grid, Agent, GridShape};
//!
//! let network = layered_grid(GridShape::new(2, 2), |_, _| 1.0).unwrap();
//! let agents = vec![Agent::new(0, 3, 0), Agent::new(1, 2, 1)];
//!
//! let formulation = build_model(Variant::Abp, &network, &agents).unwrap();
//! assert_eq!(formulation.model.objectives().len(), 2);
//!
//! let outcome = route_agents(Variant::Abp, &network, &agents, &GoodLpSolver::default()).unwrap();
//! assert_eq!(outcome.objectives, vec![2.0, 0.0]);
//! ```
//!
//! ## Modules
//!
//! - [`formulation`] - Model description and the seven builders
//! - [`variant`] - Variant tags and the dispatcher
//! - [`solver`] - Backend adapter (microlp, optionally HiGHS)
//! - [`solution`] - Objective extraction, routes, congestion summaries
//! - [`agents`] - Agent sets for layered grids

pub mod agents;
pub mod formulation;
pub mod solution;
pub mod solver;
pub mod variant;

pub use agents::{generate_agents, Symmetry};
pub use formulation::{Formulation, FormulationModel, PenaltyVars};
pub use solution::{
    extract_objectives, reconstruct_routes, route_agents, CongestionSummary, ObjectiveValue,
    Route, RoutingResult, SolutionReport, SolveOutcome,
};
pub use solver::{GoodLpSolver, ModelSolver, ModelStatus, SolvedModel, SolverConfig, SolverKind};
pub use variant::{build_model, build_model_by_name, Variant};
