//! Output of simulation histories.

pub mod export;
