//! Reservoir computing models
//!
//! An echo state network drives a fixed random recurrent reservoir with the
//! input signal and trains only a linear readout over the reservoir states.

mod esn;

pub use esn::{EchoStateNetwork, EsnConfig, MAX_RESERVOIR_SIZE};
