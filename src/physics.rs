//! Diode forward voltage.
//!
//! Inverts the Shockley equation `I = IS * (exp(V / (N*Vt)) - 1)`:
//!
//! ```text
//! V  = N * Vt * ln(I/IS - 1)     for I/IS > 1
//! V  = N * Vt * ln(I/IS)         otherwise
//! Vt = T * k/q
//! ```
//!
//! Below `I = IS` the `- 1` would put the logarithm out of its domain, so it is
//! dropped. The result is then the small-current (negative) approximation.
//! Both forms are evaluated as a difference of logarithms, so the ratio itself
//! never has to fit in an `f64`.

use crate::ir::DiodeModel;

/// Boltzmann constant over elementary charge (V/K).
pub const K_OVER_Q: f64 = 8.6173324e-5;

/// Kelvin.
pub const DEFAULT_TEMPERATURE: f64 = 300.0;

/// Thermal voltage at `temperature` kelvin.
pub fn thermal_voltage(temperature: f64) -> f64 {
    temperature * K_OVER_Q
}

/// Forward voltage of `model` at `current` amps and 300 K.
pub fn forward_voltage(model: &DiodeModel, current: f64) -> Option<f64> {
    forward_voltage_at(model, current, DEFAULT_TEMPERATURE)
}

/// Forward voltage of `model` at `current` amps and `temperature` kelvin.
pub fn forward_voltage_at(model: &DiodeModel, current: f64, temperature: f64) -> Option<f64> {
    junction_voltage(model.params.is, model.params.n, current, temperature)
}

/// `None` unless both `current` and `is` are positive and finite.
pub fn junction_voltage(is: f64, n: f64, current: f64, temperature: f64) -> Option<f64> {
    if !(current > 0.0 && is > 0.0 && current.is_finite() && is.is_finite()) {
        return None;
    }
    // current > is implies current - is > 0, even for subnormals.
    let log_arg = if current > is {
        (current - is).ln() - is.ln()
    } else {
        current.ln() - is.ln()
    };
    Some(n * thermal_voltage(temperature) * log_arg)
}
