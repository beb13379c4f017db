//! Agent sets for layered grids.
//!
//! Sources are drawn from the first column and termini from the last one.
//! The symmetry level controls how much the agents overlap: `High` sends
//! everyone between the same pair of nodes, `Medium` spreads agents over the
//! rows deterministically, `Low` picks both endpoints at random.

use mspp_core::{Agent, GridShape, MsppError, MsppResult, NodeId};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symmetry {
    High,
    #[default]
    Medium,
    Low,
}

impl Symmetry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Symmetry::High => "high",
            Symmetry::Medium => "medium",
            Symmetry::Low => "low",
        }
    }
}

impl fmt::Display for Symmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symmetry {
    type Err = MsppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "high" => Ok(Symmetry::High),
            "medium" => Ok(Symmetry::Medium),
            "low" => Ok(Symmetry::Low),
            other => Err(MsppError::Parse(format!(
                "unknown symmetry '{}'; supported values: high, medium, low",
                other
            ))),
        }
    }
}

fn pick<R: Rng + ?Sized>(nodes: &[NodeId], rng: &mut R) -> MsppResult<usize> {
    nodes
        .choose(rng)
        .map(|node| node.value())
        .ok_or_else(|| MsppError::Validation("grid column is empty".into()))
}

/// Generate `count` agents on a `shape` grid, ids `0..count`.
///
/// Randomness comes only from `rng`, so a seeded generator reproduces the
/// same set.
pub fn generate_agents<R: Rng + ?Sized>(
    shape: GridShape,
    count: usize,
    symmetry: Symmetry,
    rng: &mut R,
) -> MsppResult<Vec<Agent>> {
    if shape.rows == 0 || shape.cols < 2 {
        return Err(MsppError::Validation(format!(
            "agents need a grid with at least one row and two columns, got {}x{}",
            shape.rows, shape.cols
        )));
    }
    let sources = shape.first_column();
    let termini = shape.last_column();
    match symmetry {
        Symmetry::High => {
            let source = pick(&sources, rng)?;
            let terminus = pick(&termini, rng)?;
            Ok((0..count)
                .map(|id| Agent::new(source, terminus, id))
                .collect())
        }
        Symmetry::Medium => {
            // after one agent per row, refill even rows first, then odd rows
            let refill: Vec<usize> = (0..shape.rows)
                .step_by(2)
                .chain((1..shape.rows).step_by(2))
                .collect();
            Ok((0..count)
                .map(|id| {
                    let row = if id < shape.rows {
                        id
                    } else {
                        refill[(id - shape.rows) % refill.len()]
                    };
                    Agent::new(row, shape.mirror_terminus(row).value(), id)
                })
                .collect())
        }
        Symmetry::Low => (0..count)
            .map(|id| -> MsppResult<Agent> {
                Ok(Agent::new(pick(&sources, rng)?, pick(&termini, rng)?, id))
            })
            .collect(),
    }
}
