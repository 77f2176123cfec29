//! Diode model library and harmonic distortion toolkit.
//!
//! Decodes SPICE `.MODEL ... D(...)` cards into typed parameter sets, estimates
//! forward voltage, and reads `.four` Fourier analysis reports to compute
//! cumulative THD per harmonic.

pub mod batch;
pub mod cents;
pub mod distortion;
pub mod error;
pub mod fourier;
pub mod ir;
pub mod netlist;
pub mod output;
pub mod parser;
pub mod physics;
pub mod schema;
pub mod units;
