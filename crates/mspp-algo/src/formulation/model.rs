//! Solver-independent model description.
//!
//! A [`FormulationModel`] is the static artifact handed to a solver: named
//! blocks of binary decision variables, linear constraints, and weighted
//! objectives kept in registration order. It owns no solver state, so it can
//! be inspected, compared, evaluated against an assignment, or translated to
//! any backend.

use serde::Serialize;

/// Index of a scalar decision variable in a [`FormulationModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct VarId(usize);

impl VarId {
    #[inline]
    pub fn new(value: usize) -> Self {
        VarId(value)
    }
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A named, contiguous, row-major array of binary variables (e.g. `X[arc, agent]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarBlock {
    pub name: String,
    pub shape: Vec<usize>,
    pub start: usize,
    pub len: usize,
}

/// Affine expression `Σ coef·var + constant`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinExpr {
    terms: Vec<(VarId, f64)>,
    constant: f64,
}

impl LinExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the given variables, each with coefficient 1.
    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
            constant: 0.0,
        }
    }

    pub fn with_term(mut self, var: VarId, coef: f64) -> Self {
        self.add_term(var, coef);
        self
    }

    pub fn add_term(&mut self, var: VarId, coef: f64) {
        self.terms.push((var, coef));
    }

    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    pub fn add_expr(&mut self, other: &LinExpr) {
        self.terms.extend_from_slice(&other.terms);
        self.constant += other.constant;
    }

    pub fn scaled(mut self, factor: f64) -> Self {
        for (_, coef) in &mut self.terms {
            *coef *= factor;
        }
        self.constant *= factor;
        self
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Value of the expression under a full variable assignment.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coef)| coef * values[var.0])
            .sum::<f64>()
            + self.constant
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sense {
    Le,
    Ge,
    Eq,
}

impl std::fmt::Display for Sense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Sense::Le => "<=",
            Sense::Ge => ">=",
            Sense::Eq => "==",
        })
    }
}

/// Which part of a formulation a constraint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintFamily {
    /// Net outflow per (agent, node)
    FlowConservation,
    /// `R[node, agent] >= X[arc, agent]` for incident arcs
    NodePresenceOn,
    /// `R[node, agent] <= Σ incident X[arc, agent]`
    NodePresenceOff,
    /// Lower bound forcing a congestion indicator on
    IndicatorOn,
    /// Upper bound keeping a count indicator off for unused resources
    IndicatorOff,
    /// `Z <= U` halves of the pairwise AND linearization
    PairUpper,
    /// `Z >= U + U' - 1`
    PairLower,
}

/// `expr (<=|>=|==) rhs`, with the constant of `expr` already moved to `rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub expr: LinExpr,
    pub sense: Sense,
    pub rhs: f64,
    pub family: ConstraintFamily,
}

impl LinearConstraint {
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.sense {
            Sense::Le => lhs <= self.rhs + tolerance,
            Sense::Ge => lhs >= self.rhs - tolerance,
            Sense::Eq => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// One term of the (blended) objective, minimized.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub name: String,
    pub weight: f64,
    pub expr: LinExpr,
}

/// Size summary used by `mspp inspect` and the solution report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    pub variables: usize,
    pub constraints: usize,
    pub objectives: usize,
    pub blocks: Vec<(String, usize)>,
}

/// Declared variables, constraints and objectives of one formulation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormulationModel {
    num_variables: usize,
    blocks: Vec<VarBlock>,
    constraints: Vec<LinearConstraint>,
    objectives: Vec<Objective>,
}

impl FormulationModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a block of `shape.iter().product()` binary variables.
    pub fn add_block(&mut self, name: &str, shape: &[usize]) -> VarBlock {
        let len = shape.iter().product();
        let block = VarBlock {
            name: name.to_string(),
            shape: shape.to_vec(),
            start: self.num_variables,
            len,
        };
        self.num_variables += len;
        self.blocks.push(block.clone());
        block
    }

    pub fn add_constraint(
        &mut self,
        mut expr: LinExpr,
        sense: Sense,
        rhs: f64,
        family: ConstraintFamily,
    ) {
        let rhs = rhs - expr.constant;
        expr.constant = 0.0;
        self.constraints.push(LinearConstraint {
            expr,
            sense,
            rhs,
            family,
        });
    }

    /// Register an objective; returns its index (registration order).
    pub fn add_objective(&mut self, name: &str, weight: f64, expr: LinExpr) -> usize {
        self.objectives.push(Objective {
            name: name.to_string(),
            weight,
            expr,
        });
        self.objectives.len() - 1
    }

    pub fn set_objective_weight(&mut self, index: usize, weight: f64) -> bool {
        match self.objectives.get_mut(index) {
            Some(objective) => {
                objective.weight = weight;
                true
            }
            None => false,
        }
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn blocks(&self) -> &[VarBlock] {
        &self.blocks
    }

    pub fn block(&self, name: &str) -> Option<&VarBlock> {
        self.blocks.iter().find(|b| b.name == name)
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn count_family(&self, family: ConstraintFamily) -> usize {
        self.constraints
            .iter()
            .filter(|c| c.family == family)
            .count()
    }

    /// Objective values, in registration order, under `values`.
    pub fn objective_values(&self, values: &[f64]) -> Vec<f64> {
        self.objectives
            .iter()
            .map(|o| o.expr.evaluate(values))
            .collect()
    }

    /// Indices of the constraints violated by `values`.
    pub fn violated_constraints(&self, values: &[f64], tolerance: f64) -> Vec<usize> {
        self.constraints
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_satisfied(values, tolerance))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        values.len() == self.num_variables
            && values.iter().all(|v| *v == 0.0 || *v == 1.0)
            && self
                .constraints
                .iter()
                .all(|c| c.is_satisfied(values, tolerance))
    }

    pub fn stats(&self) -> ModelStats {
        ModelStats {
            variables: self.num_variables,
            constraints: self.constraints.len(),
            objectives: self.objectives.len(),
            blocks: self
                .blocks
                .iter()
                .map(|b| (b.name.clone(), b.len))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_are_laid_out_contiguously() {
        let mut model = FormulationModel::new();
        let x = model.add_block("X", &[3, 2]);
        let psi = model.add_block("Psi", &[3]);
        assert_eq!((x.start, x.len), (0, 6));
        assert_eq!((psi.start, psi.len), (6, 3));
        assert_eq!(model.num_variables(), 9);
        assert_eq!(model.block("Psi"), Some(&psi));
    }

    #[test]
    fn constraint_constant_moves_to_rhs() {
        let mut model = FormulationModel::new();
        model.add_block("X", &[2]);
        let mut expr = LinExpr::sum([VarId::new(0), VarId::new(1)]);
        expr.add_constant(-1.0);
        model.add_constraint(expr, Sense::Le, 0.0, ConstraintFamily::IndicatorOn);

        let c = &model.constraints()[0];
        assert_eq!(c.rhs, 1.0);
        assert_eq!(c.expr.constant(), 0.0);
        assert!(c.is_satisfied(&[1.0, 0.0], 1e-9));
        assert!(!c.is_satisfied(&[1.0, 1.0], 1e-9));
    }

    #[test]
    fn feasibility_requires_binary_values() {
        let mut model = FormulationModel::new();
        model.add_block("X", &[1]);
        model.add_constraint(
            LinExpr::sum([VarId::new(0)]),
            Sense::Le,
            1.0,
            ConstraintFamily::PairUpper,
        );
        assert!(model.is_feasible(&[1.0], 1e-9));
        assert!(!model.is_feasible(&[0.5], 1e-9));
        assert!(!model.is_feasible(&[], 1e-9));
    }

    #[test]
    fn objectives_keep_registration_order() {
        let mut model = FormulationModel::new();
        model.add_block("X", &[2]);
        let first = model.add_objective("Distance", 1.0, LinExpr::new().with_term(VarId::new(0), 3.0));
        let second = model.add_objective("Penalty", 1.0, LinExpr::sum([VarId::new(1)]));
        assert_eq!((first, second), (0, 1));
        assert_eq!(model.objective_values(&[1.0, 1.0]), vec![3.0, 1.0]);
        assert!(model.set_objective_weight(1, 10.0));
        assert!(!model.set_objective_weight(2, 1.0));
    }

    #[test]
    fn scaled_expression_scales_constant() {
        let mut expr = LinExpr::sum([VarId::new(0), VarId::new(1)]);
        expr.add_constant(-1.0);
        let expr = expr.scaled(0.5);
        assert_eq!(expr.terms(), &[(VarId::new(0), 0.5), (VarId::new(1), 0.5)]);
        assert_eq!(expr.constant(), -0.5);
    }
}
