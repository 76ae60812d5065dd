use std::fmt;

use glam::DVec3;

use crate::document::DocumentRoot;
use crate::error::{EditError, Result};

/// A uniform scale factor. Zero and negative factors are allowed and give
/// degenerate or mirrored nodes; only non-finite values are rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub fn new(factor: f64) -> Result<Self> {
        if factor.is_finite() {
            Ok(Self(factor))
        } else {
            Err(EditError::InvalidScale(factor.to_string()))
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let factor = input
            .trim()
            .parse::<f64>()
            .map_err(|_| EditError::InvalidScale(input.to_owned()))?;
        if !factor.is_finite() {
            return Err(EditError::InvalidScale(input.to_owned()));
        }
        Ok(Self(factor))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Multiplies the scale of every node by `factor`. Nodes without a scale get
/// `(factor, factor, factor)`. Returns the number of nodes changed.
pub fn apply_scale(root: &mut DocumentRoot, factor: ScaleFactor) -> Result<usize> {
    let mut changed = 0;
    for (index, node) in root.nodes_mut().enumerate() {
        let scaled = match node.scale {
            Some(scale) => DVec3::from_array(scale) * factor.get(),
            None => DVec3::splat(factor.get()),
        };
        if !scaled.is_finite() {
            return Err(EditError::Mutation(format!(
                "scale of node {} overflowed ({})",
                index, scaled
            )));
        }
        node.scale = Some(scaled.to_array());
        changed += 1;
    }
    Ok(changed)
}
