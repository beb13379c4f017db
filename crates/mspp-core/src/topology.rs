//! Layered grid networks.
//!
//! Nodes are numbered column by column: column `c` holds nodes
//! `c·rows .. (c+1)·rows`. Every node of a column has an arc to every node of
//! the next column, so agents enter at the first column and leave at the last.

use crate::{MsppError, MsppResult, Network, NodeId};
use serde::{Deserialize, Serialize};

/// Shape of a layered grid: `rows` nodes per column, `cols` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn num_nodes(&self) -> usize {
        self.rows * self.cols
    }

    /// Nodes of the first column (agent sources).
    pub fn first_column(&self) -> Vec<NodeId> {
        (0..self.rows).map(NodeId::new).collect()
    }

    /// Nodes of the last column (agent termini).
    pub fn last_column(&self) -> Vec<NodeId> {
        let offset = self.num_nodes() - self.rows;
        (0..self.rows).map(|r| NodeId::new(r + offset)).collect()
    }

    /// Same row, last column.
    pub fn mirror_terminus(&self, source_row: usize) -> NodeId {
        NodeId::new(source_row + self.num_nodes() - self.rows)
    }
}

/// Build a layered grid, asking `weight` for the cost of every arc.
pub fn layered_grid<F>(shape: GridShape, mut weight: F) -> MsppResult<Network>
where
    F: FnMut(NodeId, NodeId) -> f64,
{
    if shape.rows == 0 || shape.cols < 2 {
        return Err(MsppError::Validation(format!(
            "layered grid needs at least one row and two columns, got {}x{}",
            shape.rows, shape.cols
        )));
    }
    let nodes: Vec<NodeId> = (0..shape.num_nodes()).map(NodeId::new).collect();
    let mut arcs = Vec::with_capacity(shape.rows * shape.rows * (shape.cols - 1));
    for col in 0..shape.cols - 1 {
        for from_row in 0..shape.rows {
            for to_row in 0..shape.rows {
                let origin = NodeId::new(col * shape.rows + from_row);
                let destination = NodeId::new((col + 1) * shape.rows + to_row);
                arcs.push((origin, destination, weight(origin, destination)));
            }
        }
    }
    Network::new(nodes, arcs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_by_two_grid_matches_reference_layout() {
        let network = layered_grid(GridShape::new(2, 2), |_, _| 1.0).unwrap();
        let pairs: Vec<(usize, usize)> = network
            .arcs()
            .iter()
            .map(|a| (a.origin.value(), a.destination.value()))
            .collect();
        assert_eq!(pairs, vec![(0, 2), (0, 3), (1, 2), (1, 3)]);
    }

    #[test]
    fn columns_and_mirrors() {
        let shape = GridShape::new(3, 4);
        assert_eq!(shape.num_nodes(), 12);
        assert_eq!(
            shape.last_column(),
            vec![NodeId::new(9), NodeId::new(10), NodeId::new(11)]
        );
        assert_eq!(shape.mirror_terminus(1), NodeId::new(10));
        let network = layered_grid(shape, |_, _| 2.0).unwrap();
        assert_eq!(network.num_arcs(), 27);
    }

    #[test]
    fn rejects_single_column() {
        assert!(layered_grid(GridShape::new(3, 1), |_, _| 1.0).is_err());
    }
}
