//! Records produced by the parsers.
//!
//! The model parser produces [`DiodeModel`]s for netlist generation; the
//! Fourier parser produces [`HarmonicAnalysis`] records for tabular reports.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{NotComputable, Warning};
use crate::schema::{DiodeParams, Param, INFORMATIONAL};

/// One decoded `.MODEL <name> D(...)` card.
#[derive(Debug, Clone, PartialEq)]
pub struct DiodeModel {
    pub name: String,
    /// Every schema parameter, explicit or defaulted.
    pub params: DiodeParams,
    /// Informational fields (`MFG`, `TYPE`) as written.
    pub info: BTreeMap<String, String>,
    /// Physical line the card started on.
    pub line: usize,
    /// Dropped parameters and lenient decodes met while building the card.
    pub warnings: Vec<Warning>,
}

impl DiodeModel {
    pub fn get(&self, param: Param) -> f64 {
        self.params.get(param)
    }

    pub fn info(&self, key: &str) -> Option<&str> {
        self.info
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Renders a canonical single-line card with every parameter spelled out.
impl fmt::Display for DiodeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".MODEL {} D(", self.name)?;
        let numeric = Param::ALL
            .iter()
            .map(|&p| format!("{}={}", p.name(), spice_number(self.params.get(p))));
        let info = INFORMATIONAL
            .iter()
            .filter_map(|&k| self.info.get(k).map(|v| format!("{k}={v}")));
        let fields: Vec<String> = numeric.chain(info).collect();
        write!(f, "{})", fields.join(" "))
    }
}

/// Shortest decimal form for ordinary magnitudes, exponent form otherwise.
pub fn spice_number(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 || (1e-3..1e6).contains(&magnitude) {
        format!("{value}")
    } else {
        format!("{value:e}")
    }
}

/// One row of a Fourier analysis table.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicRecord {
    pub index: u32,
    /// Hz.
    pub frequency: u64,
    pub magnitude: f64,
    /// Degrees.
    pub phase: f64,
    pub norm_magnitude: f64,
    pub norm_phase: f64,
}

impl fmt::Display for HarmonicRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}, {}",
            self.index,
            self.frequency,
            self.magnitude,
            self.phase,
            self.norm_magnitude,
            self.norm_phase
        )
    }
}

/// A parsed Fourier analysis report.
///
/// Distortion deltas are computed once at construction. Row count may differ
/// from the declared harmonic count; missing rows surface as
/// [`NotComputable`] values rather than construction errors.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicAnalysis {
    pub(crate) source: String,
    pub(crate) n: u32,
    pub(crate) thd: f64,
    pub(crate) harmonics: BTreeMap<u32, HarmonicRecord>,
    pub(crate) deltas: BTreeMap<u32, Result<f64, NotComputable>>,
}

impl HarmonicAnalysis {
    pub fn new(
        source: impl Into<String>,
        n: u32,
        thd: f64,
        harmonics: BTreeMap<u32, HarmonicRecord>,
    ) -> Self {
        let mut analysis = Self {
            source: source.into(),
            n,
            thd,
            harmonics,
            deltas: BTreeMap::new(),
        };
        if n >= 1 && !analysis.harmonics.contains_key(&1) {
            tracing::warn!(source = %analysis.source, "report has no fundamental row");
        }
        analysis.deltas = analysis.compute_deltas();
        analysis
    }

    /// Where the report came from (usually its path).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Declared harmonic count, including the DC row.
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Declared THD, percent.
    pub fn thd(&self) -> f64 {
        self.thd
    }

    pub fn harmonics(&self) -> &BTreeMap<u32, HarmonicRecord> {
        &self.harmonics
    }

    pub fn harmonic(&self, index: u32) -> Option<&HarmonicRecord> {
        self.harmonics.get(&index)
    }

    pub fn deltas(&self) -> &BTreeMap<u32, Result<f64, NotComputable>> {
        &self.deltas
    }
}

impl fmt::Display for HarmonicAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourierAnalysis({}): n={} thd={}", self.source, self.n, self.thd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> DiodeModel {
        let mut params = DiodeParams::default();
        params.is = 1.5e-9;
        params.rs = 14.0;
        DiodeModel {
            name: "BAS70LP".into(),
            params,
            info: BTreeMap::from([("MFG".to_string(), "Diodes".to_string())]),
            line: 9,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_display_renders_full_card() {
        let card = model().to_string();
        assert!(card.starts_with(".MODEL BAS70LP D(BV=1e100 IBV=0.001 "));
        assert!(card.contains(" IS=1.5e-9 "));
        assert!(card.contains(" RS=14 "));
        assert!(card.ends_with(" DISS=0 MFG=Diodes)"));
    }

    #[test]
    fn test_info_lookup_ignores_case() {
        let m = model();
        assert_eq!(m.info("mfg"), Some("Diodes"));
        assert_eq!(m.info("TYPE"), None);
    }

    #[test]
    fn test_spice_number_forms() {
        assert_eq!(spice_number(0.0), "0");
        assert_eq!(spice_number(0.5), "0.5");
        assert_eq!(spice_number(27.0), "27");
        assert_eq!(spice_number(1e-14), "1e-14");
        assert_eq!(spice_number(1e100), "1e100");
        assert_eq!(spice_number(-2.5e-9), "-2.5e-9");
    }

    #[test]
    fn test_harmonic_record_display() {
        let h = HarmonicRecord {
            index: 2,
            frequency: 2000,
            magnitude: 0.25,
            phase: -90.0,
            norm_magnitude: 0.025,
            norm_phase: -180.5,
        };
        assert_eq!(h.to_string(), "2, 2000, 0.25, -90, 0.025, -180.5");
    }
}
