//! Stochastic hourly energy balance for a home with solar and a battery.

pub mod config;
pub mod devices;
pub mod error;
pub mod io;
/// Hourly consumption profile and its estimator.
pub mod profile;
/// Sampling, balance engine, scenario driver, and reporting.
pub mod sim;
