//! Diode `.MODEL` parameter schema.
//!
//! | Name | Parameter                                           | Units | Default  |
//! |------|-----------------------------------------------------|-------|----------|
//! | BV   | Reverse breakdown voltage                           | V     | infinite |
//! | IBV  | Reverse breakdown current                           | A     | 1E-3     |
//! | IK   | Forward knee current (alias IKF)                    | A     | 1E-3     |
//! | IKR  | Reverse knee current                                | A     | 1E-3     |
//! | IS   | Saturation current (alias JS)                       | A     | 1E-14    |
//! | JSW  | Sidewall saturation current                         | A     | 1E-14    |
//! | N    | Emission coefficient                                | -     | 1        |
//! | RS   | Series resistance                                   | ohm   | 0        |
//! | CJO  | Zero-bias junction capacitance (alias CJ0)          | F     | 0        |
//! | CJP  | Zero-bias sidewall capacitance (alias CJSW)         | F     | 0        |
//! | FC   | Forward-bias depletion capacitance coefficient      | -     | 0.5      |
//! | FCS  | Forward-bias sidewall depletion coefficient         | -     | 0.5      |
//! | M    | Junction grading coefficient (alias MJ)             | -     | 0.5      |
//! | MJSW | Periphery junction grading coefficient              | -     | 0.33     |
//! | VJ   | Junction potential (alias PB)                       | V     | 1        |
//! | PHP  | Periphery junction potential                        | V     | 1        |
//! | TT   | Transit time                                        | s     | 0        |
//! | EG   | Activation energy                                   | eV    | 1.11     |
//! | TNOM | Parameter measurement temperature (alias TREF)      | C     | 27       |
//! | XTI  | IS temperature exponent                             | -     | 3        |
//! | KF   | Flicker noise coefficient                           | -     | 0        |
//! | AF   | Flicker noise exponent                              | -     | 1        |
//! | VPK  | Peak voltage rating                                 | V     | 0        |
//! | IPK  | Peak current rating                                 | A     | 0        |
//! | IAVE | Average current rating                              | A     | 0        |
//! | IRMS | RMS current rating                                  | A     | 0        |
//! | DISS | Maximum power dissipation rating                    | W     | 0        |
//!
//! `MFG` and `TYPE` are informational and kept as strings.

macro_rules! diode_params {
    ($($variant:ident, $field:ident, $name:literal, $default:expr, $unit:literal, $desc:literal;)*) => {
        /// A recognized numeric diode parameter.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Param {
            $($variant,)*
        }

        impl Param {
            /// Every numeric parameter, in schema order.
            pub const ALL: &'static [Param] = &[$(Param::$variant,)*];

            /// Canonical upper-case SPICE name.
            pub fn name(self) -> &'static str {
                match self {
                    $(Param::$variant => $name,)*
                }
            }

            pub fn default_value(self) -> f64 {
                match self {
                    $(Param::$variant => $default,)*
                }
            }

            pub fn unit(self) -> &'static str {
                match self {
                    $(Param::$variant => $unit,)*
                }
            }

            pub fn description(self) -> &'static str {
                match self {
                    $(Param::$variant => $desc,)*
                }
            }
        }

        /// Numeric parameters of one diode model, one field per schema entry.
        #[derive(Debug, Clone, PartialEq)]
        pub struct DiodeParams {
            $(pub $field: f64,)*
        }

        impl Default for DiodeParams {
            fn default() -> Self {
                Self {
                    $($field: $default,)*
                }
            }
        }

        impl DiodeParams {
            pub fn get(&self, param: Param) -> f64 {
                match param {
                    $(Param::$variant => self.$field,)*
                }
            }

            pub fn set(&mut self, param: Param, value: f64) {
                match param {
                    $(Param::$variant => self.$field = value,)*
                }
            }
        }
    };
}

diode_params! {
    Bv,   bv,   "BV",   1e100, "V",   "Reverse breakdown voltage";
    Ibv,  ibv,  "IBV",  1e-3,  "A",   "Reverse breakdown current";
    Ik,   ik,   "IK",   1e-3,  "A",   "Forward knee current";
    Ikr,  ikr,  "IKR",  1e-3,  "A",   "Reverse knee current";
    Is,   is,   "IS",   1e-14, "A",   "Saturation current";
    Jsw,  jsw,  "JSW",  1e-14, "A",   "Sidewall saturation current";
    N,    n,    "N",    1.0,   "-",   "Emission coefficient";
    Rs,   rs,   "RS",   0.0,   "ohm", "Series resistance";
    Cjo,  cjo,  "CJO",  0.0,   "F",   "Zero-bias junction capacitance";
    Cjp,  cjp,  "CJP",  0.0,   "F",   "Zero-bias junction sidewall capacitance";
    Fc,   fc,   "FC",   0.5,   "-",   "Forward-bias depletion capacitance coefficient";
    Fcs,  fcs,  "FCS",  0.5,   "-",   "Forward-bias sidewall depletion capacitance coefficient";
    M,    m,    "M",    0.5,   "-",   "Junction grading coefficient";
    Mjsw, mjsw, "MJSW", 0.33,  "-",   "Periphery junction grading coefficient";
    Vj,   vj,   "VJ",   1.0,   "V",   "Junction potential";
    Php,  php,  "PHP",  1.0,   "V",   "Periphery junction potential";
    Tt,   tt,   "TT",   0.0,   "s",   "Transit time";
    Eg,   eg,   "EG",   1.11,  "eV",  "Activation energy";
    Tnom, tnom, "TNOM", 27.0,  "C",   "Parameter measurement temperature";
    Xti,  xti,  "XTI",  3.0,   "-",   "IS temperature exponent";
    Kf,   kf,   "KF",   0.0,   "-",   "Flicker noise coefficient";
    Af,   af,   "AF",   1.0,   "-",   "Flicker noise exponent";
    Vpk,  vpk,  "VPK",  0.0,   "V",   "Peak voltage rating";
    Ipk,  ipk,  "IPK",  0.0,   "A",   "Peak current rating";
    Iave, iave, "IAVE", 0.0,   "A",   "Average current rating";
    Irms, irms, "IRMS", 0.0,   "A",   "RMS current rating";
    Diss, diss, "DISS", 0.0,   "W",   "Maximum power dissipation rating";
}

/// Alternate spellings and the canonical parameter they stand for.
pub const ALIASES: &[(&str, Param)] = &[
    ("CJ0", Param::Cjo),
    ("MJ", Param::M),
    ("IKF", Param::Ik),
    ("JS", Param::Is),
    ("CJSW", Param::Cjp),
    ("PB", Param::Vj),
    ("TREF", Param::Tnom),
];

/// String-valued parameters that carry no electrical meaning.
pub const INFORMATIONAL: &[&str] = &["MFG", "TYPE"];

/// What a `.MODEL` parameter key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Numeric(Param),
    Informational(&'static str),
}

impl Param {
    /// Look up a canonical name, ignoring case. Aliases are not considered.
    pub fn from_name(name: &str) -> Option<Param> {
        Param::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }
}

/// Resolve a key: informational names first, then canonical names, then aliases.
pub fn resolve(key: &str) -> Option<Key> {
    if let Some(&info) = INFORMATIONAL.iter().find(|k| k.eq_ignore_ascii_case(key)) {
        return Some(Key::Informational(info));
    }
    if let Some(param) = Param::from_name(key) {
        return Some(Key::Numeric(param));
    }
    ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(key))
        .map(|&(_, param)| Key::Numeric(param))
}
