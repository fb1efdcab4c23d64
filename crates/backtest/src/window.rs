//! Training-window policies.

use serde::{Deserialize, Serialize};

/// How the training window moves between iterations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowPolicy {
    /// Window of constant length sliding forward one step per iteration
    #[default]
    Fixed,
    /// Window anchored at the start of the series, growing one step per iteration
    Expanding,
}

impl WindowPolicy {
    /// Training window used at `iteration` for a base length of `train_len`.
    pub fn window(&self, train_len: usize, iteration: usize) -> Window {
        match self {
            WindowPolicy::Fixed => Window {
                start: iteration,
                len: train_len,
            },
            WindowPolicy::Expanding => Window {
                start: 0,
                len: train_len + iteration,
            },
        }
    }
}

/// Contiguous sub-range of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// First index
    pub start: usize,
    /// Number of points
    pub len: usize,
}

impl Window {
    /// One past the last index; also the index of the point being forecast.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Borrow the window out of `series`. Callers guarantee it fits.
    pub fn slice<'a>(&self, series: &'a [f64]) -> &'a [f64] {
        &series[self.start..self.end()]
    }
}
