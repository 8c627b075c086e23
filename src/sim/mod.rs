/// Battery balance engine.
pub mod engine;
pub mod kpi;
/// Season-fitted daily total sampler.
pub mod sampler;
/// Multi-day scenario driver.
pub mod scenario;
pub mod types;
