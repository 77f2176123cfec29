//! Harmonic distortion figures.
//!
//! ```text
//! THD(k) = 100 * sqrt( sum_{i=2..=k} Mag[i]^2 ) / Mag[1]
//! delta(i) = THD(i) - THD(i-1),  THD(1) = 0,  2 <= i < n
//! ```
//!
//! The declared count `n` includes the DC row at index 0, so the highest
//! harmonic in a report is `n - 1`. A bound of 0, or one at or past `n`,
//! resolves to `n - 1`; `THD(0)` is then the report's total THD.

use std::collections::BTreeMap;

use crate::error::{LookupGap, NotComputable};
use crate::ir::HarmonicAnalysis;

/// One step of the cumulative THD series. `None` marks a figure that could
/// not be computed for this report.
#[derive(Debug, Clone, PartialEq)]
pub struct ThdStep {
    pub index: u32,
    pub magnitude: Option<f64>,
    pub thd: Option<f64>,
    pub delta: Option<f64>,
}

impl HarmonicAnalysis {
    /// Highest harmonic index included for a requested bound `k`.
    pub fn effective_bound(&self, k: u32) -> u32 {
        if k == 0 || k >= self.n {
            self.n.saturating_sub(1)
        } else {
            k
        }
    }

    pub fn magnitude(&self, index: u32) -> Result<f64, LookupGap> {
        self.harmonics
            .get(&index)
            .map(|h| h.magnitude)
            .ok_or(LookupGap { index })
    }

    /// Cumulative THD in percent over harmonics `2..=effective_bound(k)`.
    pub fn cumulative_thd(&self, k: u32) -> Result<f64, NotComputable> {
        let fundamental = self.magnitude(1)?;
        let sum_sq = (2..=self.effective_bound(k))
            .map(|i| self.magnitude(i).map(|m| m * m))
            .sum::<Result<f64, LookupGap>>()?;
        if fundamental == 0.0 {
            return Err(NotComputable::ZeroFundamental);
        }
        Ok(100.0 * sum_sq.sqrt() / fundamental)
    }

    /// THD added by harmonic `index`.
    pub fn delta(&self, index: u32) -> Result<f64, NotComputable> {
        match self.deltas.get(&index) {
            Some(delta) => *delta,
            None => Err(LookupGap { index }.into()),
        }
    }

    /// Whether harmonics `m` and `n` add comparable distortion.
    pub fn deltas_close(&self, m: u32, n: u32, ratio: f64) -> Result<bool, NotComputable> {
        let close = self
            .delta(m)
            .and_then(|dm| self.delta(n).map(|dn| deltas_close(dm, dn, ratio)));
        if let Err(reason) = &close {
            tracing::debug!(source = %self.source, m, n, %reason, "closeness not computable");
        }
        close
    }

    /// `(index, magnitude, THD, delta)` for every `2 <= index < n`.
    pub fn thd_series(&self) -> Vec<ThdStep> {
        (2..self.n)
            .map(|index| ThdStep {
                index,
                magnitude: self.magnitude(index).ok(),
                thd: self.cumulative_thd(index).ok(),
                delta: self.delta(index).ok(),
            })
            .collect()
    }

    /// Sum of normalized magnitudes over indices `0..n`.
    pub fn normalized_magnitude_sum(&self) -> Result<f64, LookupGap> {
        (0..self.n)
            .map(|index| {
                self.harmonics
                    .get(&index)
                    .map(|h| h.norm_magnitude)
                    .ok_or(LookupGap { index })
            })
            .sum()
    }

    pub(crate) fn compute_deltas(&self) -> BTreeMap<u32, Result<f64, NotComputable>> {
        (2..self.n)
            .map(|i| {
                let previous = if i == 2 {
                    Ok(0.0)
                } else {
                    self.cumulative_thd(i - 1)
                };
                let delta = self
                    .cumulative_thd(i)
                    .and_then(|thd| previous.map(|prev| thd - prev));
                (i, delta)
            })
            .collect()
    }
}

/// Equal deltas are close; a zero delta is close only to itself; otherwise
/// the larger magnitude must be less than `ratio` times the smaller.
pub fn deltas_close(dm: f64, dn: f64, ratio: f64) -> bool {
    if dm == dn {
        return true;
    }
    if dm == 0.0 || dn == 0.0 {
        return false;
    }
    let (a, b) = (dm.abs(), dn.abs());
    a.max(b) / a.min(b) < ratio
}
