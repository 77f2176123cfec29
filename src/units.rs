//! Engineering-notation numeric literals.
//!
//! A token is tried against each notation in a fixed order and the first one
//! that accounts for the whole token wins:
//!
//! | Notation     | Example   | Value              |
//! |--------------|-----------|--------------------|
//! | scientific   | `2.9E-11` | unit letter ignored |
//! | scaled       | `35pF`    | mantissa × 10^scale, trailing letters ignored |
//! | plain        | `799.9v`  | decorative unit (`A`, `V`, `F`, `H`) discarded |
//! | raw          | `inf`     | whatever `f64::from_str` accepts |
//! | unregistered | `5z`, `1.5E-3mA` | number kept, [`Warning::ScaleSuffix`] raised |
//!
//! Scale suffixes (case-insensitive):
//!
//! | Suffix     | Scale |
//! |------------|-------|
//! | T          | E+12  |
//! | G          | E+09  |
//! | X or MEG   | E+06  |
//! | K          | E+03  |
//! | M          | E-03  |
//! | U          | E-06  |
//! | N          | E-09  |
//! | P          | E-12  |
//! | F          | E-15  |
//!
//! `F` is femto, never farad: `1F` decodes to `1e-15`.

use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{alpha0, alpha1, char, digit0, digit1, one_of};
use nom::combinator::{eof, opt, recognize};
use nom::IResult;
use nom::Parser;

use crate::error::{DecodeError, Warning};

/// Registered scale suffixes and their power-of-ten exponents.
pub const SCALE_SUFFIXES: &[(&str, i32)] = &[
    ("t", 12),
    ("g", 9),
    ("x", 6),
    ("meg", 6),
    ("k", 3),
    ("m", -3),
    ("u", -6),
    ("n", -9),
    ("p", -12),
    ("f", -15),
];

/// Unit letters that may trail a number without changing its value.
pub const DECORATIVE_UNITS: &str = "AVFHavfh";

/// Which notation a token was decoded as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notation {
    Scientific,
    Scaled { suffix: String, exponent: i32 },
    Plain,
    Raw,
    UnregisteredSuffix { suffix: String },
}

/// A decoded literal together with the notation that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub value: f64,
    pub notation: Notation,
}

impl Decoded {
    /// The diagnostic owed for this decode, if any.
    pub fn warning(&self, token: &str) -> Option<Warning> {
        match &self.notation {
            Notation::UnregisteredSuffix { suffix } => Some(Warning::ScaleSuffix {
                token: token.trim().to_string(),
                suffix: suffix.clone(),
            }),
            _ => None,
        }
    }
}

type Matcher = fn(&str) -> Option<Decoded>;

/// Notation matchers in precedence order.
const MATCHERS: [Matcher; 5] = [scientific, scaled, plain, raw, unregistered_suffix];

/// Decode a token, reporting which notation matched.
pub fn classify(token: &str) -> Result<Decoded, DecodeError> {
    let token = token.trim();
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(token))
        .ok_or_else(|| DecodeError {
            token: token.to_string(),
        })
}

/// Decode a token to a float. An unregistered suffix is logged and ignored.
pub fn decode(token: &str) -> Result<f64, DecodeError> {
    let decoded = classify(token)?;
    if let Some(warning) = decoded.warning(token) {
        tracing::warn!("{warning}");
    }
    Ok(decoded.value)
}

/// Power-of-ten exponent for a registered suffix.
pub fn scale_exponent(suffix: &str) -> Option<i32> {
    SCALE_SUFFIXES
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(suffix))
        .map(|&(_, exponent)| exponent)
}

// ---------------------------------------------------------------------------
// Matchers
// ---------------------------------------------------------------------------

fn scientific(token: &str) -> Option<Decoded> {
    let (_, literal) = scientific_literal(token).ok()?;
    let value = literal.parse().ok()?;
    Some(Decoded {
        value,
        notation: Notation::Scientific,
    })
}

fn scaled(token: &str) -> Option<Decoded> {
    let (_, (number, suffix)) = scaled_literal(token).ok()?;
    let exponent = scale_exponent(suffix)?;
    // Re-parse as scientific so the result is the correctly rounded literal.
    let value = format!("{number}e{exponent}").parse().ok()?;
    Some(Decoded {
        value,
        notation: Notation::Scaled {
            suffix: suffix.to_ascii_lowercase(),
            exponent,
        },
    })
}

fn plain(token: &str) -> Option<Decoded> {
    let (_, number) = plain_literal(token).ok()?;
    let value = number.parse().ok()?;
    Some(Decoded {
        value,
        notation: Notation::Plain,
    })
}

fn raw(token: &str) -> Option<Decoded> {
    let value = token.parse().ok()?;
    Some(Decoded {
        value,
        notation: Notation::Raw,
    })
}

fn unregistered_suffix(token: &str) -> Option<Decoded> {
    let (_, (number, suffix)) = suffixed_literal(token).ok()?;
    // A dangling exponent marker is a malformed number, not a suffix.
    if suffix.starts_with(['e', 'E']) {
        return None;
    }
    let value = number.parse().ok()?;
    Some(Decoded {
        value,
        notation: Notation::UnregisteredSuffix {
            suffix: suffix.to_string(),
        },
    })
}

// ---------------------------------------------------------------------------
// Token grammar
// ---------------------------------------------------------------------------

/// Signed decimal: `5`, `-3.3`, `.73`, `5.`
fn mantissa(input: &str) -> IResult<&str, &str> {
    recognize((
        opt(one_of("+-")),
        alt((
            recognize((digit1, opt((char('.'), digit0)))),
            recognize((char('.'), digit1)),
        )),
    ))
    .parse(input)
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize((one_of("eE"), opt(one_of("+-")), digit1)).parse(input)
}

fn unit(input: &str) -> IResult<&str, char> {
    one_of(DECORATIVE_UNITS).parse(input)
}

/// Match a registered scale suffix. Order matters: MEG must come before M.
fn scale_suffix(input: &str) -> IResult<&str, &str> {
    alt((
        tag_no_case("meg"),
        tag_no_case("t"),
        tag_no_case("g"),
        tag_no_case("x"),
        tag_no_case("k"),
        tag_no_case("m"),
        tag_no_case("u"),
        tag_no_case("n"),
        tag_no_case("p"),
        tag_no_case("f"),
    ))
    .parse(input)
}

fn scientific_literal(input: &str) -> IResult<&str, &str> {
    let (rest, literal) = recognize((mantissa, exponent)).parse(input)?;
    let (rest, _) = (opt(unit), eof).parse(rest)?;
    Ok((rest, literal))
}

fn scaled_literal(input: &str) -> IResult<&str, (&str, &str)> {
    let (rest, (number, suffix, _, _)) = (mantissa, scale_suffix, alpha0, eof).parse(input)?;
    Ok((rest, (number, suffix)))
}

fn plain_literal(input: &str) -> IResult<&str, &str> {
    let (rest, (number, _, _)) = (mantissa, opt(unit), eof).parse(input)?;
    Ok((rest, number))
}

/// Mantissa, optional exponent, then any letters: `5z`, `1.5E-3mA`.
fn suffixed_literal(input: &str) -> IResult<&str, (&str, &str)> {
    let (rest, (number, suffix, _)) =
        (recognize((mantissa, opt(exponent))), alpha1, eof).parse(input)?;
    Ok((rest, (number, suffix)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_every_suffix_scales_mantissa() {
        for &(suffix, exp) in SCALE_SUFFIXES {
            for mantissa in [1.0, 4.7, 303.3] {
                let expected = mantissa * 10f64.powi(exp);
                let lower = decode(&format!("{mantissa}{suffix}")).unwrap();
                let upper = decode(&format!("{mantissa}{}", suffix.to_uppercase())).unwrap();
                assert_relative_eq!(lower, expected, max_relative = 1e-12);
                assert_relative_eq!(upper, expected, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(decode("1e-14").unwrap(), 1e-14);
        assert_eq!(decode("2.92655E-011").unwrap(), 2.92655e-11);
        assert_eq!(decode("1.2003E3").unwrap(), 1200.3);
        assert_eq!(decode("1E+3").unwrap(), 1000.0);
    }

    #[test]
    fn test_scientific_ignores_unit() {
        let decoded = classify("2.01E-17A").unwrap();
        assert_eq!(decoded.notation, Notation::Scientific);
        assert_eq!(decoded.value, 2.01e-17);
    }

    #[test]
    fn test_scale_with_unit() {
        assert_eq!(decode("35pF").unwrap(), 35e-12);
        assert_eq!(decode("30mA").unwrap(), 30e-3);
        assert_eq!(decode(".4mA").unwrap(), 0.4e-3);
    }

    #[test]
    fn test_meg_before_milli() {
        assert_eq!(decode("1MEG").unwrap(), 1e6);
        assert_eq!(decode("2.2meg").unwrap(), 2.2e6);
        assert_eq!(decode("1m").unwrap(), 1e-3);
        assert_eq!(decode("3x").unwrap(), 3e6);
    }

    #[test]
    fn test_f_is_femto_not_farad() {
        assert_eq!(decode("1F").unwrap(), 1e-15);
    }

    #[test]
    fn test_trailing_letters_after_suffix_ignored() {
        assert_eq!(decode("10kOhm").unwrap(), 10e3);
    }

    #[test]
    fn test_plain_with_decorative_unit() {
        let decoded = classify("799.9v").unwrap();
        assert_eq!(decoded.notation, Notation::Plain);
        assert!((decoded.value - 799.9).abs() < 1e-12);
        assert_eq!(decode("5A").unwrap(), 5.0);
        assert_eq!(decode("12H").unwrap(), 12.0);
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(decode("14").unwrap(), 14.0);
        assert_eq!(decode(".73").unwrap(), 0.73);
        assert_eq!(decode("-3.3").unwrap(), -3.3);
        assert_eq!(decode("+2").unwrap(), 2.0);
        assert_eq!(decode("5.").unwrap(), 5.0);
        assert_eq!(decode("  27  ").unwrap(), 27.0);
    }

    #[test]
    fn test_raw_fallback() {
        let decoded = classify("inf").unwrap();
        assert_eq!(decoded.notation, Notation::Raw);
        assert!(decoded.value.is_infinite());
    }

    #[test]
    fn test_unregistered_suffix_is_lenient() {
        let decoded = classify("5z").unwrap();
        assert_eq!(decoded.value, 5.0);
        assert_eq!(
            decoded.warning("5z"),
            Some(Warning::ScaleSuffix {
                token: "5z".into(),
                suffix: "z".into(),
            })
        );
        assert_eq!(decode("5z").unwrap(), 5.0);
    }

    #[test]
    fn test_letters_after_exponent_are_lenient() {
        let decoded = classify("1.5E-3mA").unwrap();
        assert_eq!(decoded.value, 1.5e-3);
        assert_eq!(
            decoded.notation,
            Notation::UnregisteredSuffix {
                suffix: "mA".into()
            }
        );
        assert!(decoded.warning("1.5E-3mA").is_some());
        assert_eq!(decode("2E3kohm").unwrap(), 2e3);
    }

    #[test]
    fn test_registered_suffix_has_no_warning() {
        assert_eq!(classify("10k").unwrap().warning("10k"), None);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert_eq!(
            decode("BAD"),
            Err(DecodeError {
                token: "BAD".into()
            })
        );
        assert!(decode("").is_err());
        assert!(decode("1.2.3").is_err());
        assert!(decode("5%").is_err());
    }

    #[test]
    fn test_dangling_exponent_is_decode_error() {
        assert!(decode("2.5E").is_err());
        assert!(decode("2.5e-").is_err());
    }

    #[test]
    fn test_scale_exponent_lookup() {
        assert_eq!(scale_exponent("MEG"), Some(6));
        assert_eq!(scale_exponent("p"), Some(-12));
        assert_eq!(scale_exponent("z"), None);
    }
}
