//! Parser for the SWPC 3-day forecast text product.
//!
//! The report is mostly prose; the part this parser extracts is the
//! "NOAA Kp index breakdown" table, which looks like:
//!
//! ```text
//!              Jan 11       Jan 12       Jan 13
//! 00-03UT       2.67         1.33         1.67
//! 03-06UT       0.67         1.67         1.67
//! ```
//!
//! The header row (deeply indented date labels) must appear before any data
//! row; data rows are recognized by the `NN-NNUT` time-bucket shape.

use crate::forecast::error::ForecastError;
use serde::{Deserialize, Serialize};

/// One 3-hour forecast slot: time bucket label and predicted Kp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kp3Value {
    pub time: String,
    pub kp_index: f64,
}

/// One forecast day: its date label and the day's slots in source row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kp3Column {
    pub date: String,
    pub values: Vec<Kp3Value>,
}

/// Parses the 3-day forecast into one column per date, each holding the
/// day's (time bucket, kp) pairs in source row order.
pub fn parse_kp_3_forecast(data: &str) -> Result<Vec<Kp3Column>, ForecastError> {
    let mut columns: Vec<Kp3Column> = Vec::new();
    let mut columns_initialized = false;

    for (index, raw_line) in data.lines().enumerate() {
        let line_no = index + 1;
        if raw_line.starts_with('#') || raw_line.starts_with(':') {
            continue;
        }
        if raw_line.len() < 3 {
            continue;
        }

        if !columns_initialized && is_header_line(raw_line) {
            columns = split_header_dates(raw_line)
                .into_iter()
                .map(|date| Kp3Column {
                    date,
                    values: Vec::new(),
                })
                .collect();
            columns_initialized = true;
        }

        // Data rows look like "00-03UT  2.67  1.33  1.67".
        if raw_line.as_bytes().get(2) != Some(&b'-') || !raw_line.contains("UT") {
            continue;
        }
        let line = raw_line.trim();

        if !columns_initialized {
            return Err(ForecastError::ColumnsNotInitialized {
                line_no,
                line: line.to_string(),
            });
        }

        let (bucket, rest) = match line.split_once(char::is_whitespace) {
            Some(parts) => parts,
            None => {
                return Err(ForecastError::ColumnCountMismatch {
                    line_no,
                    line: line.to_string(),
                    expected: columns.len(),
                    found: 0,
                })
            }
        };

        let tokens = split_maxsplit(rest, columns.len());
        if tokens.len() < columns.len() {
            return Err(ForecastError::ColumnCountMismatch {
                line_no,
                line: line.to_string(),
                expected: columns.len(),
                found: tokens.len(),
            });
        }

        for (column, token) in columns.iter_mut().zip(&tokens) {
            let token = token.trim();
            let kp_index = token.parse::<f64>().map_err(|e| ForecastError::InvalidKpValue {
                line_no,
                token: token.to_string(),
                source: e,
            })?;
            column.values.push(Kp3Value {
                time: bucket.to_string(),
                kp_index,
            });
        }
    }

    Ok(columns)
}

/// The header row is the only table row that starts with deep indentation:
/// its first ten characters are all whitespace.
fn is_header_line(line: &str) -> bool {
    let mut count = 0;
    for c in line.chars().take(10) {
        if !c.is_whitespace() {
            return false;
        }
        count += 1;
    }
    count == 10
}

/// Splits the header into at most three date labels on runs of four or more
/// spaces, right to left, returning them in left-to-right order.
fn split_header_dates(line: &str) -> Vec<String> {
    let mut dates: Vec<String> = line
        .trim()
        .rsplitn(3, "    ")
        .map(|part| part.trim().to_string())
        .collect();
    dates.reverse();
    dates
}

/// Python-style `str.split(maxsplit=parts-1)`: runs of whitespace separate
/// tokens, and the final token keeps whatever tail remains.
fn split_maxsplit(text: &str, parts: usize) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text.trim_start();
    while tokens.len() + 1 < parts {
        match rest.find(char::is_whitespace) {
            Some(end) => {
                tokens.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => break,
        }
    }
    if !rest.is_empty() {
        tokens.push(rest.trim_end());
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
:Product: 3-Day Forecast
:Issued: 2025 Jan 11 1230 UTC
# Prepared by the U.S. Dept. of Commerce, NOAA, Space Weather Prediction Center
#
A. NOAA Geomagnetic Activity Observation and Forecast

The greatest observed 3 hr Kp over the past 24 hours was 4 (below NOAA
Scale levels).
The greatest expected 3 hr Kp for Jan 11-Jan 13 2025 is 2.67 (below NOAA
Scale levels).

NOAA Kp index breakdown Jan 11-Jan 13 2025

             Jan 11       Jan 12       Jan 13
00-03UT       2.67         1.33         1.67
03-06UT       0.67         1.67         1.67
06-09UT       1.00         1.33         1.67
09-12UT       1.67         1.33         1.33
12-15UT       2.33         1.33         1.33
15-18UT       2.67         1.33         1.33
18-21UT       2.67         1.67         1.33
21-00UT       2.67         1.67         1.33

Rationale: No G1 (Minor) or greater geomagnetic storms are expected.  No
significant transient or recurrent solar wind features are forecast.
";

    #[test]
    fn test_parses_three_columns_of_eight_rows() {
        let columns = parse_kp_3_forecast(SAMPLE).unwrap();

        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].date, "Jan 11");
        assert_eq!(columns[1].date, "Jan 12");
        assert_eq!(columns[2].date, "Jan 13");
        for column in &columns {
            assert_eq!(column.values.len(), 8);
        }

        assert_eq!(columns[0].values[0].time, "00-03UT");
        assert_eq!(columns[0].values[0].kp_index, 2.67);
        assert_eq!(columns[0].values[1].kp_index, 0.67);
        assert_eq!(columns[1].values[0].kp_index, 1.33);
        assert_eq!(columns[1].values[7].kp_index, 1.67);
        assert_eq!(columns[2].values[7].time, "21-00UT");
        assert_eq!(columns[2].values[7].kp_index, 1.33);
    }

    #[test]
    fn test_row_order_follows_source_order() {
        let columns = parse_kp_3_forecast(SAMPLE).unwrap();
        let buckets: Vec<&str> = columns[0].values.iter().map(|v| v.time.as_str()).collect();
        assert_eq!(
            buckets,
            [
                "00-03UT", "03-06UT", "06-09UT", "09-12UT", "12-15UT", "15-18UT", "18-21UT",
                "21-00UT"
            ]
        );
    }

    #[test]
    fn test_data_line_before_header_is_a_structural_error() {
        let data = "00-03UT       2.67         1.33         1.67\n";
        let err = parse_kp_3_forecast(data).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::ColumnsNotInitialized { line_no: 1, .. }
        ));
    }

    #[test]
    fn test_header_is_consumed_only_once() {
        let data = "             Jan 11       Jan 12       Jan 13
00-03UT       2.67         1.33         1.67
             stray        indented     prose
03-06UT       0.67         1.67         1.67
";
        let columns = parse_kp_3_forecast(data).unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].date, "Jan 11");
        assert_eq!(columns[0].values.len(), 2);
    }

    #[test]
    fn test_too_few_values_is_a_column_count_mismatch() {
        let data = "             Jan 11       Jan 12       Jan 13
00-03UT       2.67         1.33
";
        let err = parse_kp_3_forecast(data).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::ColumnCountMismatch {
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_non_numeric_value_is_reported_with_line_context() {
        let data = "             Jan 11       Jan 12       Jan 13
00-03UT       2.67         n/a          1.67
";
        let err = parse_kp_3_forecast(data).unwrap_err();
        match err {
            ForecastError::InvalidKpValue { line_no, token, .. } => {
                assert_eq!(line_no, 2);
                assert_eq!(token, "n/a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_comment_and_directive_lines_are_skipped() {
        let data = "\
:Product: 3-Day Forecast
# comment
             Jan 11       Jan 12       Jan 13
00-03UT       2.67         1.33         1.67
";
        let columns = parse_kp_3_forecast(data).unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[2].values[0].kp_index, 1.67);
    }

    #[test]
    fn test_report_without_table_yields_no_columns() {
        let data = ":Product: 3-Day Forecast\n\nProse only, no table here.\n";
        let columns = parse_kp_3_forecast(data).unwrap();
        assert!(columns.is_empty());
    }
}
