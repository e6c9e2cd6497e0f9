//! Seed values for drainage area and discharge

use drainstack_core::{Error, FlowElement, NodeId, Result};
use serde::{Deserialize, Serialize};

/// A per-node input that is either one value for every node or an explicit
/// array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seed {
    /// Same value at every node
    Uniform(f64),
    /// One value per node
    PerNode(Vec<f64>),
}

impl Default for Seed {
    fn default() -> Self {
        Seed::Uniform(1.0)
    }
}

impl Seed {
    /// Value at `node`. Call [`Seed::validate`] first for per-node seeds.
    #[inline]
    pub fn value_at(&self, node: NodeId) -> f64 {
        match self {
            Seed::Uniform(v) => *v,
            Seed::PerNode(values) => values[node],
        }
    }

    /// Check the seed against the node count.
    pub fn validate(&self, name: &'static str, num_nodes: usize) -> Result<()> {
        match self {
            Seed::Uniform(v) => {
                if !v.is_finite() {
                    return Err(Error::InvalidParameter {
                        name,
                        value: v.to_string(),
                        reason: "must be finite".into(),
                    });
                }
            }
            Seed::PerNode(values) => {
                if values.len() != num_nodes {
                    return Err(Error::shape(name, num_nodes, values.len()));
                }
                if let Some((node, v)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
                    return Err(Error::InvalidParameter {
                        name,
                        value: format!("[{}] = {}", node, v),
                        reason: "must be finite".into(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl From<f64> for Seed {
    fn from(value: f64) -> Self {
        Seed::Uniform(value)
    }
}

impl From<Vec<f64>> for Seed {
    fn from(values: Vec<f64>) -> Self {
        Seed::PerNode(values)
    }
}

/// Parameters for seeding and accumulation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccumulationParams {
    /// Area contributed by each node itself
    pub cell_area: Seed,
    /// Runoff rate per unit area; negative values model losing reaches
    pub runoff: Seed,
    /// Nodes that contribute no area of their own (grid boundary)
    pub boundary_nodes: Vec<NodeId>,
}

impl AccumulationParams {
    /// Check every field against the node count.
    pub fn validate(&self, num_nodes: usize) -> Result<()> {
        self.cell_area.validate("cell_area", num_nodes)?;
        self.runoff.validate("runoff", num_nodes)?;
        if let Some(&bad) = self.boundary_nodes.iter().find(|&&b| b >= num_nodes) {
            return Err(Error::node_out_of_range("boundary node", bad, num_nodes));
        }
        Ok(())
    }
}

/// Convert a seed to the accumulator type; the result must stay finite.
fn convert<T: FlowElement>(name: &'static str, node: NodeId, value: f64) -> Result<T> {
    T::from_f64(value)
        .filter(|v| v.is_finite_value())
        .ok_or_else(|| Error::InvalidParameter {
            name,
            value: format!("[{}] = {}", node, value),
            reason: "not representable in the accumulator type".into(),
        })
}

/// Build seeded `(drainage_area, discharge)` arrays for `num_nodes` nodes.
///
/// `drainage_area[i] = cell_area[i]`, zero at boundary nodes.
/// `discharge[i] = cell_area[i] * runoff[i]`.
pub fn seed_arrays<T: FlowElement>(
    num_nodes: usize,
    params: &AccumulationParams,
) -> Result<(Vec<T>, Vec<T>)> {
    params.validate(num_nodes)?;

    let mut drainage_area = Vec::with_capacity(num_nodes);
    let mut discharge = Vec::with_capacity(num_nodes);

    for node in 0..num_nodes {
        let area = params.cell_area.value_at(node);
        let runoff = params.runoff.value_at(node);
        drainage_area.push(convert("cell_area", node, area)?);
        discharge.push(convert("discharge", node, area * runoff)?);
    }

    for &b in &params.boundary_nodes {
        drainage_area[b] = T::zero();
    }

    Ok((drainage_area, discharge))
}
