//! Decision tree types shared by the forest classifier and the regression ensembles.
//!
//! A tree is a flat node array rooted at index 0. Children always sit at a
//! higher index than their parent, so a validated tree cannot loop.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Split condition for a decision node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitCondition {
    /// Feature index to split on
    pub feature: u32,
    /// Threshold value (go left if feature <= threshold)
    pub threshold: f64,
    /// Direction for missing values (true = left, false = right)
    pub default_left: bool,
}

impl SplitCondition {
    pub fn new(feature: u32, threshold: f64, default_left: bool) -> Self {
        Self { feature, threshold, default_left }
    }

    /// Returns true for left, false for right.
    #[inline]
    pub fn go_left(&self, value: f64) -> bool {
        if value.is_nan() {
            self.default_left
        } else {
            value <= self.threshold
        }
    }
}

/// A node in a decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal split node
    Split {
        feature: u32,
        threshold: f64,
        #[serde(default)]
        default_left: bool,
        left: u32,
        right: u32,
    },
    /// Leaf node with a value
    Leaf(f64),
}

impl TreeNode {
    pub fn split(condition: SplitCondition, left: u32, right: u32) -> Self {
        Self::Split {
            feature: condition.feature,
            threshold: condition.threshold,
            default_left: condition.default_left,
            left,
            right,
        }
    }

    pub fn leaf(value: f64) -> Self {
        Self::Leaf(value)
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Get the split condition, if this is a split node.
    #[inline]
    pub fn condition(&self) -> Option<SplitCondition> {
        match *self {
            Self::Split { feature, threshold, default_left, .. } => {
                Some(SplitCondition::new(feature, threshold, default_left))
            }
            Self::Leaf(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Check structure against an input of `width` features.
    pub fn validate(&self, width: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(ModelError::Malformed("tree has no nodes".to_string()));
        }
        let n = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { feature, threshold, left, right, .. } = *node {
                if feature as usize >= width {
                    return Err(ModelError::Malformed(format!(
                        "node {} splits on feature {} but the input has {} features",
                        idx, feature, width
                    )));
                }
                if threshold.is_nan() {
                    return Err(ModelError::Malformed(format!("node {} has a NaN threshold", idx)));
                }
                for child in [left, right] {
                    let child = child as usize;
                    if child <= idx || child >= n {
                        return Err(ModelError::Malformed(format!(
                            "node {} points to invalid child {} (tree has {} nodes)",
                            idx, child, n
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk the tree for one row and return the leaf value.
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        let mut idx = 0usize;
        // A validated tree reaches a leaf in at most n steps.
        for _ in 0..=self.nodes.len() {
            let node = self.nodes.get(idx).ok_or_else(|| {
                ModelError::Malformed(format!("node index {} out of range", idx))
            })?;
            match *node {
                TreeNode::Leaf(value) => return Ok(value),
                TreeNode::Split { feature, threshold, default_left, left, right } => {
                    let value = *row.get(feature as usize).ok_or(ModelError::WidthMismatch {
                        expected: feature as usize + 1,
                        actual: row.len(),
                    })?;
                    let cond = SplitCondition::new(feature, threshold, default_left);
                    idx = if cond.go_left(value) { left as usize } else { right as usize };
                }
            }
        }
        Err(ModelError::Malformed("tree traversal did not reach a leaf".to_string()))
    }
}
