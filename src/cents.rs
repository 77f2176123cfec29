//! Harmonic series against the twelve-tone equal-tempered scale.
//!
//! Harmonic `h` sits `1200 * log2(h)` cents above the fundamental. Folded into
//! one octave, it is labelled with the nearest scale degree and the signed
//! deviation from it.

/// Degree labels by semitone above the root. The octave wraps to the root.
pub const DEGREE_LABELS: [&str; 13] = [
    "  ", "m2", " 2", "m3", " 3", "P4", "tt", "P5", "m6", " 6", "m7", " 7", "  ",
];

const CENTS_PER_OCTAVE: f64 = 1200.0;
const CENTS_PER_SEMITONE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleDegree {
    pub harmonic: u32,
    pub degree: &'static str,
    /// Deviation from the degree, in `(-50, 50]`.
    pub cents: f64,
}

/// Nearest scale degree to harmonic `harmonic`. `None` for harmonic 0.
pub fn closest_degree(harmonic: u32) -> Option<ScaleDegree> {
    if harmonic == 0 {
        return None;
    }
    let folded = (CENTS_PER_OCTAVE * f64::from(harmonic).log2()).rem_euclid(CENTS_PER_OCTAVE);
    let mut semitone = (folded / CENTS_PER_SEMITONE) as usize;
    let mut cents = folded % CENTS_PER_SEMITONE;
    if cents > CENTS_PER_SEMITONE / 2.0 {
        semitone += 1;
        cents -= CENTS_PER_SEMITONE;
    }
    Some(ScaleDegree {
        harmonic,
        degree: DEGREE_LABELS[semitone.min(DEGREE_LABELS.len() - 1)],
        cents,
    })
}

/// Degrees for harmonics `1..=count`.
pub fn degree_table(count: u32) -> Vec<ScaleDegree> {
    (1..=count).filter_map(closest_degree).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_octaves_land_on_root() {
        for h in [1, 2, 4, 8, 16, 32] {
            let d = closest_degree(h).unwrap();
            assert_eq!(d.degree, "  ", "harmonic {h}");
            assert_abs_diff_eq!(d.cents, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_third_harmonic_is_fifth() {
        let d = closest_degree(3).unwrap();
        assert_eq!(d.degree, "P5");
        assert_abs_diff_eq!(d.cents, 1.955, epsilon = 1e-3);
    }

    #[test]
    fn test_fifth_harmonic_is_flat_major_third() {
        let d = closest_degree(5).unwrap();
        assert_eq!(d.degree, " 3");
        assert_abs_diff_eq!(d.cents, -13.686, epsilon = 1e-3);
    }

    #[test]
    fn test_seventh_harmonic_is_flat_minor_seventh() {
        let d = closest_degree(7).unwrap();
        assert_eq!(d.degree, "m7");
        assert_abs_diff_eq!(d.cents, -31.174, epsilon = 1e-3);
    }

    #[test]
    fn test_rounds_up_into_octave() {
        // 1200*log2(63) folds to about 1173 cents.
        let d = closest_degree(63).unwrap();
        assert_eq!(d.degree, "  ");
        assert_abs_diff_eq!(d.cents, -27.264, epsilon = 1e-2);
    }

    #[test]
    fn test_harmonic_zero_has_no_degree() {
        assert_eq!(closest_degree(0), None);
    }

    #[test]
    fn test_deviation_range() {
        for d in degree_table(64) {
            assert!(d.cents > -50.0 && d.cents <= 50.0, "{d:?}");
        }
    }

    #[test]
    fn test_degree_table_numbering() {
        let table = degree_table(20);
        assert_eq!(table.len(), 20);
        assert_eq!(table[0].harmonic, 1);
        assert_eq!(table[19].harmonic, 20);
        assert!(degree_table(0).is_empty());
    }
}
