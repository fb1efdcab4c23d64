//! CART regression tree
//!
//! Splits are chosen greedily to maximize the reduction of the summed squared
//! error; leaves predict the mean target of their samples.

use crate::error::{Result, TsError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Decision tree configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of tree (None = grow until leaves are pure)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf node
    pub min_samples_leaf: usize,
    /// Features considered per split (None = all)
    pub max_features: Option<usize>,
    /// Seed for feature subsampling
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn n_leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Split { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Regression tree over fixed-width feature rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<Node>,
    n_features: usize,
}

impl DecisionTree {
    /// Create an untrained tree
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            n_features: 0,
        }
    }

    /// Train on every row
    pub fn fit(&mut self, features: &[Vec<f64>], targets: &[f64]) -> Result<()> {
        let indices: Vec<usize> = (0..targets.len()).collect();
        self.fit_indices(features, targets, &indices)
    }

    /// Train on the given rows (duplicates allowed, as in a bootstrap sample)
    pub fn fit_indices(
        &mut self,
        features: &[Vec<f64>],
        targets: &[f64],
        indices: &[usize],
    ) -> Result<()> {
        self.n_features = validate_dataset(features, targets)?;
        if indices.is_empty() {
            return Err(TsError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let root = self.build(features, targets, indices.to_vec(), 0, &mut rng);
        self.root = Some(root);
        Ok(())
    }

    /// Predict a single row
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        let mut node = self.root.as_ref().ok_or(TsError::NotFitted)?;
        if row.len() != self.n_features {
            return Err(TsError::InvalidData(format!(
                "Expected {} features, got {}",
                self.n_features,
                row.len()
            )));
        }
        loop {
            match node {
                Node::Leaf { value } => return Ok(*value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Predict several rows
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }

    /// Whether the tree has been trained
    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    /// Depth of the trained tree (0 when untrained)
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, Node::depth)
    }

    /// Number of leaves of the trained tree
    pub fn n_leaves(&self) -> usize {
        self.root.as_ref().map_or(0, Node::n_leaves)
    }

    fn build(
        &self,
        features: &[Vec<f64>],
        targets: &[f64],
        indices: Vec<usize>,
        depth: usize,
        rng: &mut StdRng,
    ) -> Node {
        let n = indices.len();
        let sum: f64 = indices.iter().map(|&i| targets[i]).sum();
        let mean = sum / n as f64;

        let depth_reached = self.config.max_depth.map_or(false, |max| depth >= max);
        if depth_reached || n < self.config.min_samples_split.max(2) {
            return Node::Leaf { value: mean };
        }

        let Some(best) = self.best_split(features, targets, &indices, rng) else {
            return Node::Leaf { value: mean };
        };

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| features[i][best.feature] <= best.threshold);

        Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left: Box::new(self.build(features, targets, left, depth + 1, rng)),
            right: Box::new(self.build(features, targets, right, depth + 1, rng)),
        }
    }

    fn best_split(
        &self,
        features: &[Vec<f64>],
        targets: &[f64],
        indices: &[usize],
        rng: &mut StdRng,
    ) -> Option<SplitCandidate> {
        let n = indices.len();
        let min_leaf = self.config.min_samples_leaf.max(1);
        if n < 2 * min_leaf {
            return None;
        }

        let total_sum: f64 = indices.iter().map(|&i| targets[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| targets[i] * targets[i]).sum();
        let parent_sse = total_sq - total_sum * total_sum / n as f64;
        if parent_sse <= 1e-12 {
            return None;
        }

        let mut candidates: Vec<usize> = (0..self.n_features).collect();
        candidates.shuffle(rng);
        let considered = self
            .config
            .max_features
            .map_or(self.n_features, |m| m.clamp(1, self.n_features));

        let mut best: Option<SplitCandidate> = None;
        let mut order = indices.to_vec();
        for &feature in candidates.iter().take(considered) {
            order.sort_by(|&a, &b| features[a][feature].total_cmp(&features[b][feature]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for split in 1..n {
                let y = targets[order[split - 1]];
                left_sum += y;
                left_sq += y * y;

                let lower = features[order[split - 1]][feature];
                let upper = features[order[split]][feature];
                if split < min_leaf || n - split < min_leaf || upper <= lower {
                    continue;
                }

                let left_n = split as f64;
                let right_n = (n - split) as f64;
                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let child_sse = (left_sq - left_sum * left_sum / left_n)
                    + (right_sq - right_sum * right_sum / right_n);
                let gain = parent_sse - child_sse;

                if best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: lower + (upper - lower) / 2.0,
                        gain,
                    });
                }
            }
        }

        best.filter(|b| b.gain > 1e-12)
    }
}

/// Check shape and values; returns the feature width.
pub(crate) fn validate_dataset(features: &[Vec<f64>], targets: &[f64]) -> Result<usize> {
    if features.len() != targets.len() {
        return Err(TsError::InvalidData(format!(
            "{} feature rows but {} targets",
            features.len(),
            targets.len()
        )));
    }
    let first = features.first().ok_or(TsError::InsufficientData {
        required: 1,
        actual: 0,
    })?;
    let width = first.len();
    if width == 0 {
        return Err(TsError::InvalidData("Feature rows are empty".to_string()));
    }
    if features.iter().any(|row| row.len() != width) {
        return Err(TsError::InvalidData(
            "Feature rows have different widths".to_string(),
        ));
    }
    if features.iter().flatten().chain(targets).any(|x| !x.is_finite()) {
        return Err(TsError::InvalidData(
            "Data contains NaN or infinite values".to_string(),
        ));
    }
    Ok(width)
}
