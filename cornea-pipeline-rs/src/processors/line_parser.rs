//! Record extraction from CORNEA export lines.
//!
//! Data lines look like
//!
//! ```text
//! Seg:  12   y=  3.500   x=  0.725
//! ```
//!
//! where `y=` is the radial distance and `x=` the depth magnitude. A record is
//! exactly those three fields; leading or trailing text makes the whole line
//! a non-record. Everything else in an export (patient header, device
//! settings, footer) is handled according to the configured [`LinePolicy`].

use std::sync::OnceLock;

use log::debug;
use regex::Regex;
use thiserror::Error;

use crate::config::LinePolicy;
use crate::core::loaders::CylindricalPoint;

/// Errors raised by the line parser under [`LinePolicy::FailFast`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line_number} is not a Seg/y/x record: {line:?}")]
    MalformedLine { line_number: usize, line: String },

    #[error("line {line_number}: {field} value {token:?} is not a valid number")]
    NonNumericField {
        line_number: usize,
        field: Field,
        token: String,
    },
}

/// The captured columns of a record line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Segment,
    RadialDistance,
    Depth,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Segment => write!(f, "segment (Seg:)"),
            Field::RadialDistance => write!(f, "radial distance (y=)"),
            Field::Depth => write!(f, "depth (x=)"),
        }
    }
}

/// Parsed records plus the line numbers that were dropped.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub points: Vec<CylindricalPoint>,
    /// 1-based numbers of non-blank lines that produced no record.
    pub skipped_lines: Vec<usize>,
}

impl ParseOutcome {
    #[inline]
    pub fn skipped(&self) -> usize {
        self.skipped_lines.len()
    }
}

fn record_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*Seg:\s*(\S+)\s+y=\s*(\S+)\s+x=\s*(\S+)\s*$").expect("record pattern is valid")
    })
}

fn parse_float(token: &str, field: Field, line_number: usize) -> Result<f64, ParseError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::NonNumericField {
            line_number,
            field,
            token: token.to_string(),
        })
}

/// Parse a single line.
///
/// Returns `Ok(None)` for blank lines. Lines that do not have the
/// `Seg:`/`y=`/`x=` shape give `MalformedLine`, and captures that are not
/// numbers give `NonNumericField`. `line_number` is used only for error
/// reporting.
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<CylindricalPoint>, ParseError> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let caps = record_pattern()
        .captures(line)
        .ok_or_else(|| ParseError::MalformedLine {
            line_number,
            line: line.to_string(),
        })?;

    let segment_token = &caps[1];
    let segment = segment_token
        .parse::<u32>()
        .map_err(|_| ParseError::NonNumericField {
            line_number,
            field: Field::Segment,
            token: segment_token.to_string(),
        })?;
    let radial_distance = parse_float(&caps[2], Field::RadialDistance, line_number)?;
    let depth = parse_float(&caps[3], Field::Depth, line_number)?;

    Ok(Some(CylindricalPoint::new(segment, radial_distance, depth)))
}

/// Parse a sequence of export lines, keeping track of dropped lines.
///
/// Under [`LinePolicy::Skip`] this never fails; under
/// [`LinePolicy::FailFast`] the first bad line aborts parsing.
pub fn parse_lines_with_report<I, S>(lines: I, policy: LinePolicy) -> Result<ParseOutcome, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut outcome = ParseOutcome::default();

    for (idx, line) in lines.into_iter().enumerate() {
        let line_number = idx + 1;
        match parse_line(line.as_ref(), line_number) {
            Ok(Some(point)) => outcome.points.push(point),
            Ok(None) => {}
            Err(err) => match policy {
                LinePolicy::FailFast => return Err(err),
                LinePolicy::Skip => {
                    debug!("skipping {}", err);
                    outcome.skipped_lines.push(line_number);
                }
            },
        }
    }

    Ok(outcome)
}

/// Parse a sequence of export lines into cylindrical points, in input order.
pub fn parse_lines<I, S>(lines: I, policy: LinePolicy) -> Result<Vec<CylindricalPoint>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_lines_with_report(lines, policy).map(|outcome| outcome.points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_basic() {
        let point = parse_line("Seg: 12   y= 3.5   x= 7.25", 1).unwrap().unwrap();
        assert_eq!(point.segment, 12);
        assert_eq!(point.radial_distance, 3.5);
        assert_eq!(point.depth, 7.25);
    }

    #[test]
    fn test_parse_line_whitespace_width() {
        let variants = [
            "Seg: 12 y= 3.5 x= 7.25",
            "Seg:12\ty=3.5\tx=7.25",
            "   Seg:     12      y=    3.5        x=   7.25   ",
        ];
        for line in variants {
            let point = parse_line(line, 1).unwrap().unwrap();
            assert_eq!(point, CylindricalPoint::new(12, 3.5, 7.25), "{line:?}");
        }
    }

    #[test]
    fn test_parse_line_negative_depth_kept() {
        let point = parse_line("Seg: 3 y= 1.0 x= -0.5", 1).unwrap().unwrap();
        assert_eq!(point.depth, -0.5);
    }

    #[test]
    fn test_parse_line_blank() {
        assert_eq!(parse_line("", 1), Ok(None));
        assert_eq!(parse_line("   \t ", 1), Ok(None));
    }

    #[test]
    fn test_parse_line_malformed() {
        let err = parse_line("Pat-ID: 0042", 4).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedLine {
                line_number: 4,
                line: "Pat-ID: 0042".to_string()
            }
        );

        // Tokens are case-sensitive
        assert!(parse_line("seg: 1 y= 1 x= 1", 1).is_err());
    }

    #[test]
    fn test_parse_line_non_numeric_segment() {
        let err = parse_line("Seg: abc y= 1 x= 2", 7).unwrap_err();
        match err {
            ParseError::NonNumericField {
                line_number,
                field,
                token,
            } => {
                assert_eq!(line_number, 7);
                assert_eq!(field, Field::Segment);
                assert_eq!(token, "abc");
            }
            other => panic!("Expected NonNumericField, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_line_rejects_negative_segment_and_nan() {
        assert!(matches!(
            parse_line("Seg: -1 y= 1 x= 2", 1),
            Err(ParseError::NonNumericField { field: Field::Segment, .. })
        ));
        assert!(matches!(
            parse_line("Seg: 1 y= NaN x= 2", 1),
            Err(ParseError::NonNumericField { field: Field::RadialDistance, .. })
        ));
        assert!(matches!(
            parse_line("Seg: 1 y= 1 x= inf", 1),
            Err(ParseError::NonNumericField { field: Field::Depth, .. })
        ));
    }

    #[test]
    fn test_parse_lines_skip_policy() {
        let lines = [
            "OCULUS Keratograph",
            "",
            "Seg: 0 y= 0.5 x= 0.01",
            "Seg: abc y= 1 x= 2",
            "Seg: 1 y= 0.5 x= 0.02",
            "End",
        ];

        let outcome = parse_lines_with_report(lines, LinePolicy::Skip).unwrap();
        assert_eq!(outcome.points.len(), 2);
        assert_eq!(outcome.points[0].segment, 0);
        assert_eq!(outcome.points[1].segment, 1);
        assert_eq!(outcome.skipped_lines, vec![1, 4, 6]);
        assert_eq!(outcome.skipped(), 3);
    }

    #[test]
    fn test_parse_lines_fail_fast_policy() {
        let lines = vec![
            "Seg: 0 y= 0.5 x= 0.01".to_string(),
            "Seg: abc y= 1 x= 2".to_string(),
        ];

        let err = parse_lines(&lines, LinePolicy::FailFast).unwrap_err();
        assert!(matches!(
            err,
            ParseError::NonNumericField { line_number: 2, .. }
        ));
    }

    #[test]
    fn test_parse_lines_fail_fast_header() {
        let err = parse_lines(["Header", "Seg: 0 y= 1 x= 2"], LinePolicy::FailFast).unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { line_number: 1, .. }));
    }

    #[test]
    fn test_parse_line_rejects_surrounding_text() {
        let lines = [
            "#Seg: 1 y= 2 x= 3",
            "Seg: 1 y= 2 x= 3 x= 99 garbage",
            "Seg: 1 y= 2 x= 3 mm",
            "note Seg: 1 y= 2 x= 3",
        ];
        for line in lines {
            assert!(
                matches!(parse_line(line, 3), Err(ParseError::MalformedLine { line_number: 3, .. })),
                "{line:?}"
            );
        }
    }

    #[test]
    fn test_parse_lines_surrounding_text_under_both_policies() {
        let lines = ["Seg: 0 y= 1 x= 2", "Seg: 1 y= 1 x= 2 trailing", "#Seg: 2 y= 1 x= 2"];

        let outcome = parse_lines_with_report(lines, LinePolicy::Skip).unwrap();
        assert_eq!(outcome.points, vec![CylindricalPoint::new(0, 1.0, 2.0)]);
        assert_eq!(outcome.skipped_lines, vec![2, 3]);

        let err = parse_lines(lines, LinePolicy::FailFast).unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { line_number: 2, .. }));
    }

    #[test]
    fn test_parse_lines_malformed_only_is_empty_under_skip() {
        let points = parse_lines(["Seg: abc y= 1 x= 2"], LinePolicy::Skip).unwrap();
        assert!(points.is_empty());
    }
}
