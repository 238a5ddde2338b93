//! printf-style axis label formats.
//!
//! A template holds exactly one conversion (`%d`, `%i`, `%f`, `%.Nf`, `%e`,
//! `%.Ne`, `%g`, `%.Ng`, `%s`) plus any literal prefix and suffix; `%%` is a
//! literal percent sign, so `"$%.1fk"` formats `12.34` as `$12.3k`.

use std::fmt;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Largest precision a template may ask for.
const MAX_PRECISION: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Integer,
    Fixed,
    Exponent,
    General,
    Plain,
}

/// A parsed axis label template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct AxisFormat {
    template: String,
    prefix: String,
    suffix: String,
    conversion: Conversion,
    precision: Option<usize>,
}

impl AxisFormat {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] when the template has no conversion,
    /// more than one, an unsupported one, or a dangling `%`.
    pub fn parse(template: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidFormat {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut found: Option<(Conversion, Option<usize>)> = None;
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                if found.is_some() {
                    suffix.push(c);
                } else {
                    prefix.push(c);
                }
                continue;
            }
            match chars.peek() {
                None => return Err(invalid("dangling '%' at end of template")),
                Some('%') => {
                    chars.next();
                    if found.is_some() {
                        suffix.push('%');
                    } else {
                        prefix.push('%');
                    }
                    continue;
                }
                Some(_) => {}
            }

            let mut precision = None;
            if chars.peek() == Some(&'.') {
                chars.next();
                let mut digits = String::new();
                while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                    digits.push(d);
                    chars.next();
                }
                // "%.f" means precision 0, as in C
                let digits = if digits.is_empty() {
                    "0"
                } else {
                    digits.as_str()
                };
                match digits.parse::<usize>() {
                    Ok(p) if p <= MAX_PRECISION => precision = Some(p),
                    _ => {
                        return Err(invalid(&format!(
                            "precision out of range (at most {MAX_PRECISION})"
                        )))
                    }
                }
            }

            let conversion = match chars.next() {
                Some('d' | 'i') => Conversion::Integer,
                Some('f') => Conversion::Fixed,
                Some('e') => Conversion::Exponent,
                Some('g') => Conversion::General,
                Some('s') => Conversion::Plain,
                Some(other) => return Err(invalid(&format!("unsupported conversion '%{other}'"))),
                None => return Err(invalid("dangling '%' at end of template")),
            };
            if found.is_some() {
                return Err(invalid("more than one conversion"));
            }
            found = Some((conversion, precision));
        }

        let (conversion, precision) = found.ok_or_else(|| invalid("no conversion"))?;
        Ok(Self {
            template: template.to_string(),
            prefix,
            suffix,
            conversion,
            precision,
        })
    }

    /// The template as given.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Format a value.
    #[must_use]
    pub fn format(&self, value: f32) -> String {
        let body = if value.is_finite() {
            match self.conversion {
                Conversion::Integer => format!("{}", value.round() as i64),
                Conversion::Fixed => format!("{:.*}", self.precision.unwrap_or(6), value),
                Conversion::Exponent => c_exponent(value, self.precision.unwrap_or(6)),
                Conversion::General => c_general(value, self.precision.unwrap_or(6)),
                Conversion::Plain => default_label(value),
            }
        } else {
            format!("{value}")
        };
        format!("{}{body}{}", self.prefix, self.suffix)
    }
}

impl TryFrom<String> for AxisFormat {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl fmt::Display for AxisFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// `1.500000e+03` rather than Rust's `1.5e3`.
fn c_exponent(value: f32, precision: usize) -> String {
    let rust = format!("{value:.precision$e}");
    let Some((mantissa, exp)) = rust.split_once('e') else {
        return rust;
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.abs())
}

fn c_general(value: f32, precision: usize) -> String {
    let p = precision.max(1);
    if value == 0.0 {
        return "0".to_string();
    }
    let sci = format!("{:.*e}", p - 1, value);
    let exp: i32 = sci
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);

    if exp < -4 || exp >= p as i32 {
        let formatted = c_exponent(value, p - 1);
        match formatted.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{exp}", strip_zeros(mantissa)),
            None => formatted,
        }
    } else {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        strip_zeros(&format!("{value:.decimals$}"))
    }
}

fn strip_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

/// Default tick label: whole numbers without a fractional part, otherwise
/// the shortest representation.
#[must_use]
pub fn default_label(value: f32) -> String {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_with_affixes() {
        let f = AxisFormat::parse("$%.1fk").unwrap();
        assert_eq!(f.format(12.34), "$12.3k");
    }

    #[test]
    fn test_percent_escape() {
        let f = AxisFormat::parse("%d%%").unwrap();
        assert_eq!(f.format(42.4), "42%");
    }

    #[test]
    fn test_default_precision() {
        assert_eq!(AxisFormat::parse("%f").unwrap().format(1.5), "1.500000");
    }

    #[test]
    fn test_exponent_is_c_style() {
        assert_eq!(
            AxisFormat::parse("%e").unwrap().format(1500.0),
            "1.500000e+03"
        );
        assert_eq!(
            AxisFormat::parse("%.2e").unwrap().format(0.00123),
            "1.23e-03"
        );
    }

    #[test]
    fn test_general() {
        let g = AxisFormat::parse("%g").unwrap();
        assert_eq!(g.format(100_000.0), "100000");
        assert_eq!(g.format(1_000_000.0), "1e+06");
        assert_eq!(g.format(0.5), "0.5");
        assert_eq!(g.format(0.0), "0");
    }

    #[test]
    fn test_plain() {
        let s = AxisFormat::parse("%s units").unwrap();
        assert_eq!(s.format(3.0), "3 units");
        assert_eq!(s.format(2.5), "2.5 units");
    }

    #[test]
    fn test_rejects_bad_templates() {
        for bad in ["no conversion", "%d and %d", "%q", "trailing %", "%.2"] {
            assert!(
                matches!(AxisFormat::parse(bad), Err(Error::InvalidFormat { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_precision_out_of_range() {
        for bad in [
            "%.99999999999999999999999f",
            "%.100000000f",
            "%.33f",
            "%.40e",
        ] {
            match AxisFormat::parse(bad) {
                Err(Error::InvalidFormat { template, reason }) => {
                    assert_eq!(template, bad);
                    assert!(reason.contains("precision"), "{reason}");
                }
                other => panic!("{bad} should be rejected, got {other:?}"),
            }
        }
        assert!(serde_yaml_ng::from_str::<AxisFormat>("\"%.100000000f\"").is_err());
    }

    #[test]
    fn test_precision_bounds_accepted() {
        let f = AxisFormat::parse("%.32f").unwrap();
        assert_eq!(f.format(0.5).len(), 34);
        assert_eq!(AxisFormat::parse("%.f").unwrap().format(2.4), "2");
    }

    #[test]
    fn test_deserialize_from_string() {
        let f: AxisFormat = serde_yaml_ng::from_str("\"%.2f\"").unwrap();
        assert_eq!(f.template(), "%.2f");
        assert!(serde_yaml_ng::from_str::<AxisFormat>("\"%z\"").is_err());
    }
}
