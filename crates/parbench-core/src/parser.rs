//! Extraction of labeled numeric fields from the program's standard output.
//!
//! The external program prints lines such as
//!
//! ```text
//! Result (d): 1.234e+12
//! Execution Time: 0.8421
//! ```
//!
//! Matching is substring based, so any prefix a launcher adds (rank tags,
//! timestamps) is tolerated. The first well-formed occurrence of a label wins.

use serde::{Deserialize, Serialize};

use crate::constants::{EXECUTION_TIME_LABEL, RESULT_LABEL};

/// Fields recovered from one invocation's output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedOutput {
    /// Seconds reported on the `Execution Time` line.
    pub execution_time: Option<f64>,
    /// Value reported on the `Result (d)` line.
    pub result: Option<f64>,
}

impl ParsedOutput {
    /// Whether both fields were found.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.execution_time.is_some() && self.result.is_some()
    }
}

/// Parse both labeled fields from captured standard output.
#[must_use]
pub fn parse_output(stdout: &str) -> ParsedOutput {
    ParsedOutput {
        execution_time: extract_field(stdout, EXECUTION_TIME_LABEL),
        result: extract_field(stdout, RESULT_LABEL),
    }
}

/// Find the first line containing `label` and parse the text after its colon.
///
/// Lines where the value does not parse, or parses to NaN or infinity, are
/// logged and skipped.
#[must_use]
pub fn extract_field(stdout: &str, label: &str) -> Option<f64> {
    stdout
        .lines()
        .filter(|line| line.contains(label))
        .find_map(|line| match value_after_label(line, label) {
            Some(v) => Some(v),
            None => {
                tracing::warn!(label, line, "unparseable value on labeled line");
                None
            }
        })
}

fn value_after_label(line: &str, label: &str) -> Option<f64> {
    let start = line.find(label)? + label.len();
    let (_, value) = line[start..].split_once(':')?;
    value
        .split_whitespace()
        .next()?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_fields() {
        let out = "Generating random data...\nResult (d): 123.5\nExecution Time: 0.25\n";
        let parsed = parse_output(out);
        assert_eq!(parsed.execution_time, Some(0.25));
        assert_eq!(parsed.result, Some(123.5));
        assert!(parsed.is_complete());
    }

    #[test]
    fn missing_time_is_none() {
        let parsed = parse_output("Result (d): 4.0\n");
        assert_eq!(parsed.execution_time, None);
        assert_eq!(parsed.result, Some(4.0));
        assert!(!parsed.is_complete());
    }

    #[test]
    fn empty_output() {
        assert_eq!(parse_output(""), ParsedOutput::default());
    }

    #[test]
    fn scientific_notation() {
        let parsed = parse_output("Result (d): 2.71828e+15\nExecution Time: 1e-3");
        assert_eq!(parsed.result, Some(2.718_28e15));
        assert_eq!(parsed.execution_time, Some(0.001));
    }

    #[test]
    fn prefixed_line_is_matched() {
        let parsed = parse_output("[rank 0] Execution Time: 3.5\n");
        assert_eq!(parsed.execution_time, Some(3.5));
    }

    #[test]
    fn first_occurrence_wins() {
        let out = "Execution Time: 1.0\nExecution Time: 2.0\n";
        assert_eq!(extract_field(out, EXECUTION_TIME_LABEL), Some(1.0));
    }

    #[test]
    fn malformed_value_is_skipped() {
        let out = "Execution Time: n/a\nExecution Time: 0.5\n";
        assert_eq!(extract_field(out, EXECUTION_TIME_LABEL), Some(0.5));
        assert_eq!(extract_field("Execution Time: oops", EXECUTION_TIME_LABEL), None);
    }

    #[test]
    fn non_finite_values_are_skipped() {
        assert_eq!(extract_field("Execution Time: nan", EXECUTION_TIME_LABEL), None);
        assert_eq!(extract_field("Result (d): -inf", RESULT_LABEL), None);
        let out = "Execution Time: inf\nExecution Time: 0.5\n";
        assert_eq!(extract_field(out, EXECUTION_TIME_LABEL), Some(0.5));
    }

    #[test]
    fn label_without_colon() {
        assert_eq!(extract_field("Execution Time 0.5", EXECUTION_TIME_LABEL), None);
    }

    #[test]
    fn trailing_units_are_ignored() {
        assert_eq!(
            extract_field("Execution Time: 0.75 seconds", EXECUTION_TIME_LABEL),
            Some(0.75)
        );
    }

    #[test]
    fn windows_line_endings() {
        let parsed = parse_output("Result (d): 9.5\r\nExecution Time: 0.1\r\n");
        assert_eq!(parsed.result, Some(9.5));
        assert_eq!(parsed.execution_time, Some(0.1));
    }
}
