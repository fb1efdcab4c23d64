//! Random forest regressor
//!
//! Bagged regression trees trained in parallel. Each tree sees a bootstrap
//! sample drawn from its own seed, so a forest is reproducible from
//! `ForestConfig::seed` regardless of thread scheduling.

use super::decision_tree::{validate_dataset, DecisionTree, TreeConfig};
use crate::error::{Result, TsError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Random Forest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features considered per split (None = all)
    pub max_features: Option<usize>,
    /// Bootstrap sampling
    pub bootstrap: bool,
    /// Random seed
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

/// Random Forest model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Create a new random forest
    pub fn new(config: ForestConfig) -> Result<Self> {
        if config.n_trees == 0 {
            return Err(TsError::invalid_parameter("n_trees", "must be at least 1"));
        }
        Ok(Self {
            config,
            trees: Vec::new(),
        })
    }

    /// Number of trained trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Whether the forest has been trained
    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Train the forest
    pub fn fit(&mut self, features: &[Vec<f64>], targets: &[f64]) -> Result<()> {
        validate_dataset(features, targets)?;
        let n_samples = targets.len();
        let config = &self.config;

        let trees = (0..config.n_trees)
            .into_par_iter()
            .map(|i| -> Result<DecisionTree> {
                let seed = config.seed.wrapping_add(i as u64);
                let mut tree = DecisionTree::new(TreeConfig {
                    max_depth: config.max_depth,
                    min_samples_split: config.min_samples_split,
                    min_samples_leaf: config.min_samples_leaf,
                    max_features: config.max_features,
                    seed,
                });

                if config.bootstrap {
                    let indices = bootstrap_indices(n_samples, seed);
                    tree.fit_indices(features, targets, &indices)?;
                } else {
                    tree.fit(features, targets)?;
                }
                Ok(tree)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(trees = trees.len(), samples = n_samples, "random forest fitted");
        self.trees = trees;
        Ok(())
    }

    /// Predict a single row as the mean over all trees
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(TsError::NotFitted);
        }
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict_row(row)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    /// Predict several rows
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.par_iter().map(|row| self.predict_row(row)).collect()
    }
}

/// Sample `n` indices with replacement.
fn bootstrap_indices(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_dataset(n: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
        let features: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64, (i % 3) as f64]).collect();
        let targets: Vec<f64> = (0..n).map(|i| 2.0 * i as f64).collect();
        (features, targets)
    }

    #[test]
    fn test_forest_fit_predict() {
        let (features, targets) = linear_dataset(60);
        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 20,
            ..ForestConfig::default()
        })
        .unwrap();
        forest.fit(&features, &targets).unwrap();

        assert_eq!(forest.n_trees(), 20);
        let prediction = forest.predict_row(&[30.0, 0.0]).unwrap();
        assert!((prediction - 60.0).abs() < 10.0, "prediction was {}", prediction);
    }

    #[test]
    fn test_forest_is_reproducible() {
        let (features, targets) = linear_dataset(40);
        let config = ForestConfig {
            n_trees: 10,
            ..ForestConfig::default()
        };

        let mut first = RandomForest::new(config.clone()).unwrap();
        let mut second = RandomForest::new(config).unwrap();
        first.fit(&features, &targets).unwrap();
        second.fit(&features, &targets).unwrap();

        assert_eq!(
            first.predict(&features).unwrap(),
            second.predict(&features).unwrap()
        );
    }

    #[test]
    fn test_without_bootstrap_trees_agree() {
        let (features, targets) = linear_dataset(30);
        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 5,
            bootstrap: false,
            ..ForestConfig::default()
        })
        .unwrap();
        forest.fit(&features, &targets).unwrap();

        // Fully grown trees on the full data reproduce the training targets
        let predictions = forest.predict(&features).unwrap();
        for (p, t) in predictions.iter().zip(&targets) {
            assert!((p - t).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_trees_rejected() {
        let config = ForestConfig {
            n_trees: 0,
            ..ForestConfig::default()
        };
        assert!(RandomForest::new(config).is_err());
    }

    #[test]
    fn test_predict_before_fit() {
        let forest = RandomForest::new(ForestConfig::default()).unwrap();
        assert_eq!(forest.predict_row(&[1.0]), Err(TsError::NotFitted));
    }
}
