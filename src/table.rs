//! Calibration table model.
//!
//! A table is a pair of shared axis vectors (log10 NH and photon index) plus
//! a nested mapping whose leaves are 2D grids of precomputed ECF values. The
//! nesting order is instrument specific (e.g. detector tag, then epoch, then
//! mode, then energy band, then filter for XMM-EPIC); the axes are common to
//! every grid in the table.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{EcfError, Result};

/// A 2D value grid of shape `(lognh.len(), gamma.len())`.
pub(crate) type Grid = Vec<Vec<f64>>;

/// One node of the nested grid mapping: either a leaf grid or a further
/// level of string keys.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum GridNode {
    Grid(Grid),
    Branch(BTreeMap<String, GridNode>),
}

/// A calibration table as shipped in the compressed data assets.
///
/// Immutable after load; validated once by [`CalibrationTable::validate`].
#[derive(Debug, Deserialize)]
pub(crate) struct CalibrationTable {
    /// log10 of the hydrogen column density, strictly increasing.
    pub lognh: Vec<f64>,
    /// Photon index of the assumed power law, strictly increasing.
    pub gamma: Vec<f64>,
    /// Everything else in the JSON object is the nested grid mapping.
    #[serde(flatten)]
    grids: BTreeMap<String, GridNode>,
}

impl CalibrationTable {
    /// Check the structural invariants: axis vectors strictly increasing
    /// with at least two points, and every leaf grid matching the axis
    /// lengths.
    pub fn validate(&self, instrument: &'static str) -> Result<()> {
        check_axis(instrument, "lognh", &self.lognh)?;
        check_axis(instrument, "gamma", &self.gamma)?;

        let mut stack: Vec<(String, &GridNode)> = self
            .grids
            .iter()
            .map(|(k, v)| (k.clone(), v))
            .collect();

        while let Some((path, node)) = stack.pop() {
            match node {
                GridNode::Branch(children) => {
                    for (key, child) in children {
                        stack.push((format!("{path}/{key}"), child));
                    }
                }
                GridNode::Grid(grid) => {
                    if grid.len() != self.lognh.len()
                        || grid.iter().any(|row| row.len() != self.gamma.len())
                    {
                        return Err(EcfError::CalibrationDataUnavailable {
                            instrument,
                            reason: format!(
                                "grid {} does not match the {}x{} axes",
                                path,
                                self.lognh.len(),
                                self.gamma.len()
                            ),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Walk the nested mapping along `path` and return the leaf grid.
    ///
    /// A missing key or a premature leaf means the data asset does not match
    /// the instrument descriptor, which is a data problem rather than a
    /// configuration problem.
    pub fn grid(&self, instrument: &'static str, path: &[&str]) -> Result<&Grid> {
        let missing = |key: &str| EcfError::CalibrationDataUnavailable {
            instrument,
            reason: format!("no grid at {} (missing key {key})", path.join("/")),
        };

        let (first, rest) = path.split_first().ok_or_else(|| missing("<root>"))?;
        let mut node = self.grids.get(*first).ok_or_else(|| missing(first))?;

        for key in rest {
            match node {
                GridNode::Branch(children) => {
                    node = children.get(*key).ok_or_else(|| missing(key))?;
                }
                GridNode::Grid(_) => return Err(missing(key)),
            }
        }

        match node {
            GridNode::Grid(grid) => Ok(grid),
            GridNode::Branch(_) => Err(missing("<leaf>")),
        }
    }
}

fn check_axis(instrument: &'static str, name: &str, axis: &[f64]) -> Result<()> {
    if axis.len() < 2 {
        return Err(EcfError::CalibrationDataUnavailable {
            instrument,
            reason: format!("axis {name} has fewer than two points"),
        });
    }

    for pair in axis.windows(2) {
        if pair[1] <= pair[0] {
            return Err(EcfError::CalibrationDataUnavailable {
                instrument,
                reason: format!("axis {name} is not strictly increasing"),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> CalibrationTable {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_and_slice() {
        let table = parse(
            r#"{
                "lognh": [20.0, 21.0],
                "gamma": [1.0, 2.0, 3.0],
                "e1": {"SOFT": [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]}
            }"#,
        );

        table.validate("test").unwrap();
        let grid = table.grid("test", &["e1", "SOFT"]).unwrap();
        assert_eq!(grid[1][2], 6.0);
    }

    #[test]
    fn test_missing_path() {
        let table = parse(
            r#"{
                "lognh": [20.0, 21.0],
                "gamma": [1.0, 2.0],
                "e1": {"SOFT": [[1.0, 2.0], [3.0, 4.0]]}
            }"#,
        );

        let err = table.grid("test", &["e1", "HARD"]).unwrap_err();
        assert!(matches!(err, EcfError::CalibrationDataUnavailable { .. }));

        let err = table.grid("test", &["e2", "SOFT"]).unwrap_err();
        assert!(matches!(err, EcfError::CalibrationDataUnavailable { .. }));
    }

    #[test]
    fn test_axis_not_increasing() {
        let table = parse(
            r#"{
                "lognh": [21.0, 20.0],
                "gamma": [1.0, 2.0],
                "e1": [[1.0, 2.0], [3.0, 4.0]]
            }"#,
        );

        let err = table.validate("test").unwrap_err();
        assert!(matches!(err, EcfError::CalibrationDataUnavailable { .. }));
    }

    #[test]
    fn test_grid_shape_mismatch() {
        let table = parse(
            r#"{
                "lognh": [20.0, 21.0],
                "gamma": [1.0, 2.0, 3.0],
                "e1": [[1.0, 2.0], [3.0, 4.0]]
            }"#,
        );

        let err = table.validate("test").unwrap_err();
        assert!(matches!(err, EcfError::CalibrationDataUnavailable { .. }));
    }
}
