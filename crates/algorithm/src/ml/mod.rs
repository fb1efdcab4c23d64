//! Machine learning models over feature rows
//!
//! Unlike the [`Predictor`](crate::Predictor) models these learn a mapping
//! from a feature vector to a target, so they are trained on engineered
//! feature rows rather than on a raw price window.

mod decision_tree;
mod random_forest;

pub use decision_tree::{DecisionTree, TreeConfig};
pub use random_forest::{ForestConfig, RandomForest};
