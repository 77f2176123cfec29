use approx::{assert_abs_diff_eq, assert_relative_eq};
use diodelab::batch;
use diodelab::error::{DiodelabError, LookupGap, NotComputable};
use diodelab::fourier;
use diodelab::output;
use std::path::{Path, PathBuf};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/four")
}

#[test]
fn test_cumulative_thd_reproduces_declared_total() {
    for name in ["1N4148__1N4148.four", "1N4148__BAT41.four"] {
        let analysis = fourier::read_report(fixtures().join(name)).unwrap();
        // The header rounds to six significant digits.
        assert_relative_eq!(analysis.cumulative_thd(0).unwrap(), analysis.thd(), max_relative = 1e-5);
        assert_eq!(
            analysis.cumulative_thd(analysis.n()),
            analysis.cumulative_thd(0)
        );
    }
}

#[test]
fn test_report_shape() {
    let analysis = fourier::read_report(fixtures().join("1N4148__1N4148.four")).unwrap();
    assert_eq!(analysis.n(), 10);
    assert_eq!(analysis.thd(), 12.5121);
    assert_eq!(analysis.harmonics().len(), 10);
    let dc = analysis.harmonic(0).unwrap();
    assert_eq!(dc.magnitude, -2.13e-06);
    let fundamental = analysis.harmonic(1).unwrap();
    assert_eq!(fundamental.frequency, 1000);
    assert_eq!(fundamental.norm_magnitude, 1.0);
    assert!(analysis.to_string().ends_with("): n=10 thd=12.5121"));
}

#[test]
fn test_odd_harmonics_dominate_symmetric_clipper() {
    let analysis = fourier::read_report(fixtures().join("1N4148__1N4148.four")).unwrap();
    let d2 = analysis.delta(2).unwrap();
    let d3 = analysis.delta(3).unwrap();
    assert!(d3 > 10.0 * d2);
    assert_eq!(analysis.deltas_close(2, 3, 2.0), Ok(false));
    assert_eq!(analysis.deltas().len(), 8);

    let sum: f64 = analysis.deltas().values().map(|d| d.unwrap()).sum();
    assert_relative_eq!(sum, analysis.cumulative_thd(0).unwrap(), max_relative = 1e-12);
}

#[test]
fn test_thd_series_monotonic() {
    let analysis = fourier::read_report(fixtures().join("1N4148__BAT41.four")).unwrap();
    let series = analysis.thd_series();
    assert_eq!(series.len(), 6);
    let thds: Vec<f64> = series.iter().map(|s| s.thd.unwrap()).collect();
    assert!(thds.windows(2).all(|w| w[1] >= w[0]));
    assert_eq!(analysis.delta(8), Err(NotComputable::Gap(LookupGap { index: 8 })));
}

#[test]
fn test_normalized_magnitude_sum() {
    let analysis = fourier::read_report(fixtures().join("1N4148__BAT41.four")).unwrap();
    let expected: f64 = analysis.harmonics().values().map(|h| h.norm_magnitude).sum();
    assert_abs_diff_eq!(analysis.normalized_magnitude_sum().unwrap(), expected, epsilon = 1e-12);
}

#[test]
fn test_truncated_report_is_format_error() {
    let result = fourier::read_report(fixtures().join("truncated.four"));
    assert!(matches!(result, Err(DiodelabError::Format { .. })));
}

#[test]
fn test_flattened_table_for_pairs() {
    let pairs = vec![
        ("1N4148".to_string(), "1N4148".to_string()),
        ("1N4148".to_string(), "BAT41".to_string()),
        ("BAT41".to_string(), "BAT41".to_string()),
    ];
    let reports = batch::analyze_pairs(fixtures(), &pairs);
    assert_eq!(reports.len(), 3);
    assert!(matches!(reports[2].analysis, Err(DiodelabError::Io(_))));

    let mut out = Vec::new();
    for report in &reports {
        if let Ok(analysis) = &report.analysis {
            output::write_flat_row(&report.positive, &report.negative, analysis, &mut out).unwrap();
        }
    }
    let text = String::from_utf8(out).unwrap();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[1],
        "1N4148, BAT41, 12.9736, 0.0695255, 0.0983434, 0.0219106, 0.0384061, 0.0102029, 0.0163405"
    );
    assert!(rows[0].starts_with("1N4148, 1N4148, 12.5121, 0.0020308, 0.1153520, 0.0000321, "));
}

#[test]
fn test_analyze_reports_in_parallel() {
    let paths: Vec<PathBuf> = ["1N4148__1N4148.four", "truncated.four", "1N4148__BAT41.four"]
        .iter()
        .map(|name| fixtures().join(name))
        .collect();
    let results = batch::analyze_reports(&paths);
    assert_eq!(results[0].as_ref().unwrap().n(), 10);
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().n(), 8);
}
