//! MILP backend adapter
//!
//! Translates a [`FormulationModel`] into a `good_lp` problem, runs the
//! selected backend and reads back a snapped binary assignment together
//! with the value of every registered objective.
//!
//! Objectives are blended into one weighted sum before solving. With the
//! default weights (all 1) distance and penalty are traded off one to one.

use crate::formulation::{FormulationModel, LinearConstraint, Sense};
use anyhow::anyhow;
use good_lp::solvers::SolutionStatus;
use good_lp::{
    constraint, variable, Constraint, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use mspp_core::{MsppError, MsppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Compiled-in MILP backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// Pure-Rust branch and bound
    #[default]
    Microlp,
    #[cfg(feature = "solver-highs")]
    Highs,
}

impl SolverKind {
    pub fn available() -> &'static [&'static str] {
        AVAILABLE_SOLVERS
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SolverKind::Microlp => "microlp",
            #[cfg(feature = "solver-highs")]
            SolverKind::Highs => "highs",
        }
    }
}

const AVAILABLE_SOLVERS: &[&str] = &[
    "microlp",
    #[cfg(feature = "solver-highs")]
    "highs",
];

fn unknown_solver_error(label: &str) -> anyhow::Error {
    anyhow!(
        "unknown solver '{}'; supported values: {}",
        label,
        SolverKind::available().join(", ")
    )
}

impl FromStr for SolverKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.to_ascii_lowercase();
        match normalized.as_str() {
            "microlp" => Ok(SolverKind::Microlp),
            "highs" => {
                #[cfg(feature = "solver-highs")]
                {
                    Ok(SolverKind::Highs)
                }
                #[cfg(not(feature = "solver-highs"))]
                {
                    Err(unknown_solver_error(&normalized))
                }
            }
            other => Err(unknown_solver_error(other)),
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options passed through to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub backend: SolverKind,
    /// Wall-clock limit (seconds); `None` runs to optimality
    pub time_limit_seconds: Option<f64>,
    /// Whether to enable verbose solver output
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverKind::default(),
            time_limit_seconds: None,
            verbose: false,
        }
    }
}

/// Terminal status reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    Optimal,
    /// Stopped by the time limit; the assignment is feasible but not proven optimal
    TimeLimit,
    Infeasible,
    Unbounded,
    Error,
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModelStatus::Optimal => "optimal",
            ModelStatus::TimeLimit => "time_limit",
            ModelStatus::Infeasible => "infeasible",
            ModelStatus::Unbounded => "unbounded",
            ModelStatus::Error => "error",
        })
    }
}

/// Outcome of one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedModel {
    pub status: ModelStatus,
    /// One value per model variable; empty unless a solution was found
    pub values: Vec<f64>,
    /// Objective values in registration order; empty unless a solution was found
    pub objectives: Vec<f64>,
    pub solve_time: Duration,
    pub backend: String,
    /// Backend message for `Error` statuses
    pub message: Option<String>,
}

impl SolvedModel {
    /// Wrap an assignment for `model`, evaluating its objectives.
    pub fn new(
        model: &FormulationModel,
        status: ModelStatus,
        values: Vec<f64>,
        solve_time: Duration,
        backend: impl Into<String>,
    ) -> MsppResult<Self> {
        if !values.is_empty() && values.len() != model.num_variables() {
            return Err(MsppError::Solver(format!(
                "backend returned {} values for {} variables",
                values.len(),
                model.num_variables()
            )));
        }
        let objectives = if values.is_empty() {
            Vec::new()
        } else {
            model.objective_values(&values)
        };
        Ok(Self {
            status,
            values,
            objectives,
            solve_time,
            backend: backend.into(),
            message: None,
        })
    }

    /// A solve that produced no assignment.
    pub fn without_solution(
        status: ModelStatus,
        solve_time: Duration,
        backend: impl Into<String>,
        message: Option<String>,
    ) -> Self {
        Self {
            status,
            values: Vec::new(),
            objectives: Vec::new(),
            solve_time,
            backend: backend.into(),
            message,
        }
    }

    pub fn has_solution(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn value(&self, var: crate::formulation::VarId) -> Option<f64> {
        self.values.get(var.index()).copied()
    }

    /// Map non-optimal statuses onto the matching error.
    pub fn ensure_optimal(&self) -> MsppResult<()> {
        let detail = || {
            self.message
                .clone()
                .unwrap_or_else(|| format!("reported by {}", self.backend))
        };
        match self.status {
            ModelStatus::Optimal => Ok(()),
            ModelStatus::Infeasible => Err(MsppError::InfeasibleModel(detail())),
            ModelStatus::Unbounded => Err(MsppError::UnboundedModel(detail())),
            ModelStatus::Error => Err(MsppError::Solver(detail())),
            ModelStatus::TimeLimit => Err(MsppError::NotOptimal(self.status.to_string())),
        }
    }
}

/// Anything that can solve a [`FormulationModel`].
pub trait ModelSolver: Send + Sync {
    fn name(&self) -> &str;
    fn solve(&self, model: &FormulationModel) -> MsppResult<SolvedModel>;
}

/// `good_lp` backed solver.
#[derive(Debug, Clone, Default)]
pub struct GoodLpSolver {
    config: SolverConfig,
}

impl GoodLpSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

fn to_expression(expr: &crate::formulation::LinExpr, vars: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant());
    for (var, coef) in expr.terms() {
        out += *coef * vars[var.index()];
    }
    out
}

fn to_constraint(row: &LinearConstraint, vars: &[Variable]) -> Constraint {
    let lhs = to_expression(&row.expr, vars);
    let rhs = row.rhs;
    match row.sense {
        Sense::Le => constraint!(lhs <= rhs),
        Sense::Ge => constraint!(lhs >= rhs),
        Sense::Eq => constraint!(lhs == rhs),
    }
}

/// Raw values plus the termination status reported by the backend itself.
fn run<M>(
    mut problem: M,
    model: &FormulationModel,
    vars: &[Variable],
) -> Result<(ModelStatus, Vec<f64>), ResolutionError>
where
    M: SolverModel<Error = ResolutionError>,
{
    for row in model.constraints() {
        problem = problem.with(to_constraint(row, vars));
    }
    let solution = problem.solve()?;
    let status = match solution.status() {
        SolutionStatus::Optimal => ModelStatus::Optimal,
        // stopped early with an incumbent (time or gap limit)
        _ => ModelStatus::TimeLimit,
    };
    Ok((status, vars.iter().map(|v| solution.value(*v)).collect()))
}

/// Snap a relaxed backend value to {0, 1}.
fn snap(value: f64) -> f64 {
    if value > 0.5 {
        1.0
    } else {
        0.0
    }
}

impl ModelSolver for GoodLpSolver {
    fn name(&self) -> &str {
        self.config.backend.as_str()
    }

    fn solve(&self, model: &FormulationModel) -> MsppResult<SolvedModel> {
        let mut problem_vars = ProblemVariables::new();
        let vars: Vec<Variable> = (0..model.num_variables())
            .map(|_| problem_vars.add(variable().binary()))
            .collect();

        let mut objective = Expression::from(0.0);
        for term in model.objectives() {
            objective += term.weight * to_expression(&term.expr, &vars);
        }

        info!(
            backend = self.name(),
            variables = model.num_variables(),
            constraints = model.constraints().len(),
            "solving model"
        );
        let start = Instant::now();
        let outcome = match self.config.backend {
            SolverKind::Microlp => {
                if self.config.time_limit_seconds.is_some() {
                    warn!("microlp does not support a time limit; running to optimality");
                }
                let problem = problem_vars
                    .minimise(objective)
                    .using(good_lp::solvers::microlp::microlp);
                run(problem, model, &vars)
            }
            #[cfg(feature = "solver-highs")]
            SolverKind::Highs => {
                let mut problem = problem_vars
                    .minimise(objective)
                    .using(good_lp::solvers::highs::highs)
                    .set_verbose(self.config.verbose);
                if let Some(limit) = self.config.time_limit_seconds {
                    problem = problem.set_time_limit(limit);
                }
                run(problem, model, &vars)
            }
        };
        let solve_time = start.elapsed();

        match outcome {
            Ok((status, raw)) => {
                let drift = raw
                    .iter()
                    .map(|v| (v - v.round()).abs())
                    .fold(0.0_f64, f64::max);
                if drift > 1e-6 {
                    warn!(drift, "backend returned fractional values for binaries");
                }
                let values = raw.into_iter().map(snap).collect();
                let solved = SolvedModel::new(model, status, values, solve_time, self.name())?;
                debug!(status = %solved.status, objectives = ?solved.objectives, "solve finished");
                Ok(solved)
            }
            Err(err) => {
                let status = match err {
                    ResolutionError::Infeasible => ModelStatus::Infeasible,
                    ResolutionError::Unbounded => ModelStatus::Unbounded,
                    _ => ModelStatus::Error,
                };
                debug!(status = %status, error = %err, "solve finished without a solution");
                Ok(SolvedModel::without_solution(
                    status,
                    solve_time,
                    self.name(),
                    Some(err.to_string()),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::{ConstraintFamily, LinExpr, VarId};

    #[test]
    fn solver_kind_parses_and_lists_backends() {
        assert_eq!("MicroLP".parse::<SolverKind>().unwrap(), SolverKind::Microlp);
        assert!(SolverKind::available().contains(&"microlp"));
        let err = "gurobi".parse::<SolverKind>().unwrap_err();
        assert!(err.to_string().contains("supported values"));
    }

    #[test]
    fn config_defaults_to_microlp_without_limit() {
        let config = SolverConfig::default();
        assert_eq!(config.backend, SolverKind::Microlp);
        assert_eq!(config.time_limit_seconds, None);
        let parsed: SolverConfig = serde_json::from_str(r#"{"time_limit_seconds": 5.0}"#).unwrap();
        assert_eq!(parsed.backend, SolverKind::Microlp);
        assert_eq!(parsed.time_limit_seconds, Some(5.0));
    }

    #[test]
    fn solves_a_tiny_binary_program() {
        // min 3a + 2b  s.t. a + b >= 1
        let mut model = FormulationModel::new();
        model.add_block("X", &[2]);
        model.add_objective(
            "Distance",
            1.0,
            LinExpr::new()
                .with_term(VarId::new(0), 3.0)
                .with_term(VarId::new(1), 2.0),
        );
        model.add_constraint(
            LinExpr::sum([VarId::new(0), VarId::new(1)]),
            Sense::Ge,
            1.0,
            ConstraintFamily::FlowConservation,
        );
        let solved = GoodLpSolver::default().solve(&model).unwrap();
        assert_eq!(solved.status, ModelStatus::Optimal);
        assert_eq!(solved.values, vec![0.0, 1.0]);
        assert_eq!(solved.objectives, vec![2.0]);
    }

    #[test]
    fn slow_microlp_solves_stay_optimal() {
        // microlp ignores the limit, so any finished solve is proven optimal
        let mut model = FormulationModel::new();
        model.add_block("X", &[2]);
        model.add_objective("Distance", 1.0, LinExpr::sum([VarId::new(0), VarId::new(1)]));
        model.add_constraint(
            LinExpr::sum([VarId::new(0), VarId::new(1)]),
            Sense::Eq,
            1.0,
            ConstraintFamily::FlowConservation,
        );
        let solver = GoodLpSolver::new(SolverConfig {
            time_limit_seconds: Some(0.0),
            ..SolverConfig::default()
        });
        let solved = solver.solve(&model).unwrap();
        assert_eq!(solved.status, ModelStatus::Optimal);
        assert!(solved.ensure_optimal().is_ok());
        assert_eq!(solved.objectives, vec![1.0]);
    }

    #[test]
    fn infeasible_models_report_status() {
        let mut model = FormulationModel::new();
        model.add_block("X", &[1]);
        model.add_objective("Distance", 1.0, LinExpr::sum([VarId::new(0)]));
        model.add_constraint(
            LinExpr::sum([VarId::new(0)]),
            Sense::Ge,
            2.0,
            ConstraintFamily::FlowConservation,
        );
        let solved = GoodLpSolver::default().solve(&model).unwrap();
        assert!(!solved.has_solution());
        assert_ne!(solved.status, ModelStatus::Optimal);
        assert!(solved.ensure_optimal().is_err());
    }

    #[test]
    fn solved_model_rejects_mismatched_assignments() {
        let mut model = FormulationModel::new();
        model.add_block("X", &[3]);
        let err = SolvedModel::new(&model, ModelStatus::Optimal, vec![1.0], Duration::ZERO, "fake")
            .unwrap_err();
        assert!(matches!(err, MsppError::Solver(_)));
    }
}
